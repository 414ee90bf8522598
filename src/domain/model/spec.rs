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

//! Create/update request bodies.
//!
//! A spec names its parent through the `*_id` fields. Parents addressed in
//! the URL path (the pool of a member, the policy of a rule) are skipped
//! when serialising.

use super::key::ResourceKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalancerSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip_subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loadbalancer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_limit: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loadbalancer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listener_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lb_algorithm: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberSpec {
    #[serde(skip_serializing)]
    pub pool_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub monitor_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct L7PolicySpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listener_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct L7RuleSpec {
    #[serde(skip_serializing)]
    pub l7policy_id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invert: Option<bool>,
}

/// A create or update request for one kind, as read from a spec file:
///
/// ```yaml
/// kind: member
/// pool_id: 0f6c...
/// address: 10.0.0.12
/// protocol_port: 8080
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResourceSpec {
    #[serde(rename = "loadbalancer")]
    LoadBalancer(LoadBalancerSpec),
    Listener(ListenerSpec),
    Pool(PoolSpec),
    Monitor(MonitorSpec),
    Member(MemberSpec),
    #[serde(rename = "l7policy")]
    L7Policy(L7PolicySpec),
    #[serde(rename = "l7rule")]
    L7Rule(L7RuleSpec),
}

impl ResourceSpec {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceSpec::LoadBalancer(_) => ResourceKind::LoadBalancer,
            ResourceSpec::Listener(_) => ResourceKind::Listener,
            ResourceSpec::Pool(_) => ResourceKind::Pool,
            ResourceSpec::Monitor(_) => ResourceKind::Monitor,
            ResourceSpec::Member(_) => ResourceKind::Member,
            ResourceSpec::L7Policy(_) => ResourceKind::L7Policy,
            ResourceSpec::L7Rule(_) => ResourceKind::L7Rule,
        }
    }

    /// Pool or policy id that appears in the request path.
    pub fn path_parent(&self) -> Option<&str> {
        match self {
            ResourceSpec::Member(m) => Some(m.pool_id.as_str()),
            ResourceSpec::L7Rule(r) => Some(r.l7policy_id.as_str()),
            _ => None,
        }
    }

    /// Serialises the body without the `kind` tag or path parents.
    pub fn body(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            ResourceSpec::LoadBalancer(s) => serde_json::to_value(s),
            ResourceSpec::Listener(s) => serde_json::to_value(s),
            ResourceSpec::Pool(s) => serde_json::to_value(s),
            ResourceSpec::Monitor(s) => serde_json::to_value(s),
            ResourceSpec::Member(s) => serde_json::to_value(s),
            ResourceSpec::L7Policy(s) => serde_json::to_value(s),
            ResourceSpec::L7Rule(s) => serde_json::to_value(s),
        }
    }

    /// Fields only the modern backend understands, as (name, is_set) pairs.
    pub fn modern_only_fields(&self) -> Vec<(&'static str, bool)> {
        match self {
            ResourceSpec::LoadBalancer(s) => vec![
                ("availability_zone", s.availability_zone.is_some()),
                ("tags", !s.tags.is_empty()),
            ],
            ResourceSpec::Listener(s) => vec![("tags", !s.tags.is_empty())],
            ResourceSpec::Pool(s) => vec![("tags", !s.tags.is_empty())],
            ResourceSpec::Monitor(s) => vec![("tags", !s.tags.is_empty())],
            ResourceSpec::Member(s) => vec![
                ("weight", s.weight.is_some()),
                ("backup", s.backup.is_some()),
                ("tags", !s.tags.is_empty()),
            ],
            ResourceSpec::L7Policy(_) | ResourceSpec::L7Rule(_) => Vec::new(),
        }
    }
}
