// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Objects as returned by a single-object GET.
//!
//! Fields only the modern backend reports (member weight/backup, tags,
//! availability zone) are optional or default to empty.

use super::key::{ResourceKey, ResourceKind};
use super::status::{nullable, ProvisioningStatus};
use serde::{Deserialize, Serialize};

/// Back-reference to another object by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: String,
}

impl IdRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub vip_address: String,
    #[serde(default, deserialize_with = "nullable")]
    pub vip_subnet_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub provisioning_status: ProvisioningStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub operating_status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub listeners: Vec<IdRef>,
    #[serde(default, deserialize_with = "nullable")]
    pub pools: Vec<IdRef>,
    #[serde(default)]
    pub availability_zone: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listener {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub protocol: String,
    #[serde(default)]
    pub protocol_port: Option<u16>,
    #[serde(default)]
    pub default_pool_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub loadbalancers: Vec<IdRef>,
    #[serde(default, deserialize_with = "nullable")]
    pub l7policies: Vec<IdRef>,
    #[serde(default, deserialize_with = "nullable")]
    pub provisioning_status: ProvisioningStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
}

impl Listener {
    pub fn load_balancer_id(&self) -> Option<&str> {
        self.loadbalancers.first().map(|r| r.id.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub protocol: String,
    #[serde(default, deserialize_with = "nullable")]
    pub lb_algorithm: String,
    #[serde(default, deserialize_with = "nullable")]
    pub loadbalancers: Vec<IdRef>,
    #[serde(default, deserialize_with = "nullable")]
    pub listeners: Vec<IdRef>,
    #[serde(default, deserialize_with = "nullable")]
    pub members: Vec<IdRef>,
    #[serde(default)]
    pub healthmonitor_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub provisioning_status: ProvisioningStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    /// Filled from the request path; the API body does not carry it.
    #[serde(default)]
    pub pool_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub address: String,
    #[serde(default)]
    pub protocol_port: Option<u16>,
    #[serde(default)]
    pub subnet_id: Option<String>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub backup: Option<bool>,
    #[serde(default)]
    pub admin_state_up: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub provisioning_status: ProvisioningStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub monitor_type: String,
    #[serde(default)]
    pub delay: Option<u32>,
    #[serde(default)]
    pub timeout: Option<u32>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub pools: Vec<IdRef>,
    #[serde(default, deserialize_with = "nullable")]
    pub provisioning_status: ProvisioningStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct L7Policy {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub action: String,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub listener_id: Option<String>,
    #[serde(default)]
    pub redirect_pool_id: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub rules: Vec<IdRef>,
    #[serde(default, deserialize_with = "nullable")]
    pub provisioning_status: ProvisioningStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct L7Rule {
    pub id: String,
    /// Filled from the request path; the API body does not carry it.
    #[serde(default)]
    pub l7policy_id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub rule_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub compare_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub value: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub invert: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub provisioning_status: ProvisioningStatus,
}

/// Any object a single-object GET can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceObject {
    LoadBalancer(LoadBalancer),
    Listener(Listener),
    Pool(Pool),
    Monitor(Monitor),
    Member(Member),
    L7Policy(L7Policy),
    L7Rule(L7Rule),
}

impl ResourceObject {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceObject::LoadBalancer(_) => ResourceKind::LoadBalancer,
            ResourceObject::Listener(_) => ResourceKind::Listener,
            ResourceObject::Pool(_) => ResourceKind::Pool,
            ResourceObject::Monitor(_) => ResourceKind::Monitor,
            ResourceObject::Member(_) => ResourceKind::Member,
            ResourceObject::L7Policy(_) => ResourceKind::L7Policy,
            ResourceObject::L7Rule(_) => ResourceKind::L7Rule,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ResourceObject::LoadBalancer(o) => &o.id,
            ResourceObject::Listener(o) => &o.id,
            ResourceObject::Pool(o) => &o.id,
            ResourceObject::Monitor(o) => &o.id,
            ResourceObject::Member(o) => &o.id,
            ResourceObject::L7Policy(o) => &o.id,
            ResourceObject::L7Rule(o) => &o.id,
        }
    }

    pub fn provisioning_status(&self) -> &ProvisioningStatus {
        match self {
            ResourceObject::LoadBalancer(o) => &o.provisioning_status,
            ResourceObject::Listener(o) => &o.provisioning_status,
            ResourceObject::Pool(o) => &o.provisioning_status,
            ResourceObject::Monitor(o) => &o.provisioning_status,
            ResourceObject::Member(o) => &o.provisioning_status,
            ResourceObject::L7Policy(o) => &o.provisioning_status,
            ResourceObject::L7Rule(o) => &o.provisioning_status,
        }
    }

    pub fn key(&self) -> ResourceKey {
        match self {
            ResourceObject::Member(m) => ResourceKey {
                kind: ResourceKind::Member,
                id: m.id.clone(),
                parent_id: m.pool_id.clone(),
            },
            ResourceObject::L7Rule(r) => ResourceKey {
                kind: ResourceKind::L7Rule,
                id: r.id.clone(),
                parent_id: r.l7policy_id.clone(),
            },
            other => ResourceKey::new(other.kind(), other.id()),
        }
    }

    /// Decodes an object of the given kind from its unwrapped JSON body.
    pub fn from_json(kind: ResourceKind, body: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            ResourceKind::LoadBalancer => ResourceObject::LoadBalancer(serde_json::from_value(body)?),
            ResourceKind::Listener => ResourceObject::Listener(serde_json::from_value(body)?),
            ResourceKind::Pool => ResourceObject::Pool(serde_json::from_value(body)?),
            ResourceKind::Monitor => ResourceObject::Monitor(serde_json::from_value(body)?),
            ResourceKind::Member => ResourceObject::Member(serde_json::from_value(body)?),
            ResourceKind::L7Policy => ResourceObject::L7Policy(serde_json::from_value(body)?),
            ResourceKind::L7Rule => ResourceObject::L7Rule(serde_json::from_value(body)?),
        })
    }

    /// Records the parent id for kinds whose body omits it.
    pub fn with_parent(mut self, parent_id: Option<&str>) -> Self {
        if let Some(parent) = parent_id {
            match &mut self {
                ResourceObject::Member(m) if m.pool_id.is_none() => {
                    m.pool_id = Some(parent.to_string())
                }
                ResourceObject::L7Rule(r) if r.l7policy_id.is_none() => {
                    r.l7policy_id = Some(parent.to_string())
                }
                _ => {}
            }
        }
        self
    }
}
