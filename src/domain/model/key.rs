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

use crate::shared::error::LbError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[serde(rename = "loadbalancer")]
    LoadBalancer,
    Listener,
    Pool,
    Monitor,
    Member,
    #[serde(rename = "l7policy")]
    L7Policy,
    #[serde(rename = "l7rule")]
    L7Rule,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::LoadBalancer,
        ResourceKind::Listener,
        ResourceKind::Pool,
        ResourceKind::Monitor,
        ResourceKind::Member,
        ResourceKind::L7Policy,
        ResourceKind::L7Rule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::LoadBalancer => "loadbalancer",
            ResourceKind::Listener => "listener",
            ResourceKind::Pool => "pool",
            ResourceKind::Monitor => "monitor",
            ResourceKind::Member => "member",
            ResourceKind::L7Policy => "l7policy",
            ResourceKind::L7Rule => "l7rule",
        }
    }

    /// Member and rule ids are only unique within their pool or policy.
    pub fn requires_parent(&self) -> bool {
        matches!(self, ResourceKind::Member | ResourceKind::L7Rule)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = LbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "loadbalancer" | "lb" => Ok(ResourceKind::LoadBalancer),
            "listener" => Ok(ResourceKind::Listener),
            "pool" => Ok(ResourceKind::Pool),
            "monitor" | "healthmonitor" => Ok(ResourceKind::Monitor),
            "member" => Ok(ResourceKind::Member),
            "l7policy" => Ok(ResourceKind::L7Policy),
            "l7rule" => Ok(ResourceKind::L7Rule),
            _ => Err(LbError::ConfigError(format!("Invalid resource kind: {}", s))),
        }
    }
}

/// Identifies one remote object: kind, id, and the pool/policy id for
/// members and rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub kind: ResourceKind,
    pub id: String,
    pub parent_id: Option<String>,
}

impl ResourceKey {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            parent_id: None,
        }
    }

    pub fn with_parent(kind: ResourceKind, id: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            parent_id: Some(parent.into()),
        }
    }

    pub fn load_balancer(id: impl Into<String>) -> Self {
        Self::new(ResourceKind::LoadBalancer, id)
    }

    pub fn member(pool_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self::with_parent(ResourceKind::Member, id, pool_id)
    }

    pub fn l7rule(policy_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self::with_parent(ResourceKind::L7Rule, id, policy_id)
    }

    /// Parent id, or an error for kinds that cannot be addressed without one.
    pub fn require_parent(&self) -> Result<&str, LbError> {
        self.parent_id.as_deref().ok_or_else(|| {
            LbError::ValidationError(format!(
                "{} '{}' requires a parent id",
                self.kind, self.id
            ))
        })
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent_id {
            Some(parent) => write!(f, "{} '{}' (parent '{}')", self.kind, self.id, parent),
            None => write!(f, "{} '{}'", self.kind, self.id),
        }
    }
}
