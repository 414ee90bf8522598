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

//! Status tree: one nested snapshot of a load balancer and everything it owns.

use super::key::{ResourceKey, ResourceKind};
use super::status::{nullable, ProvisioningStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancerStatus {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub provisioning_status: ProvisioningStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub operating_status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub listeners: Vec<ListenerStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub pools: Vec<PoolStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListenerStatus {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub provisioning_status: ProvisioningStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub operating_status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub pools: Vec<PoolStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub l7policies: Vec<L7PolicyStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolStatus {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub provisioning_status: ProvisioningStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub operating_status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub members: Vec<MemberStatus>,
    /// The legacy API names this `healthmonitor`.
    #[serde(default, alias = "healthmonitor")]
    pub health_monitor: Option<MonitorStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberStatus {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub address: String,
    #[serde(default)]
    pub protocol_port: Option<u16>,
    #[serde(default, deserialize_with = "nullable")]
    pub provisioning_status: ProvisioningStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub operating_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorStatus {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub monitor_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub provisioning_status: ProvisioningStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub operating_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct L7PolicyStatus {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub action: String,
    #[serde(default, deserialize_with = "nullable")]
    pub provisioning_status: ProvisioningStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub operating_status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub rules: Vec<L7RuleStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct L7RuleStatus {
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub rule_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub provisioning_status: ProvisioningStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub operating_status: String,
}

/// Wire envelope: `{"statuses": {"loadbalancer": {...}}}`. Either level may
/// be `null`.
#[derive(Debug, Default, Deserialize)]
pub struct StatusTreeEnvelope {
    #[serde(default)]
    pub statuses: Option<StatusTreeBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusTreeBody {
    #[serde(default)]
    pub loadbalancer: Option<LoadBalancerStatus>,
}

/// Immutable point-in-time snapshot rooted at a load balancer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusTree {
    pub loadbalancer: LoadBalancerStatus,
}

/// One entry of a status tree, tagged by kind, with its parent id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TreeNode<'a> {
    LoadBalancer(&'a LoadBalancerStatus),
    Listener {
        loadbalancer_id: &'a str,
        listener: &'a ListenerStatus,
    },
    Pool {
        parent_id: &'a str,
        pool: &'a PoolStatus,
    },
    Monitor {
        pool_id: &'a str,
        monitor: &'a MonitorStatus,
    },
    Member {
        pool_id: &'a str,
        member: &'a MemberStatus,
    },
    L7Policy {
        listener_id: &'a str,
        policy: &'a L7PolicyStatus,
    },
    L7Rule {
        policy_id: &'a str,
        rule: &'a L7RuleStatus,
    },
}

impl<'a> TreeNode<'a> {
    pub fn kind(&self) -> ResourceKind {
        match self {
            TreeNode::LoadBalancer(_) => ResourceKind::LoadBalancer,
            TreeNode::Listener { .. } => ResourceKind::Listener,
            TreeNode::Pool { .. } => ResourceKind::Pool,
            TreeNode::Monitor { .. } => ResourceKind::Monitor,
            TreeNode::Member { .. } => ResourceKind::Member,
            TreeNode::L7Policy { .. } => ResourceKind::L7Policy,
            TreeNode::L7Rule { .. } => ResourceKind::L7Rule,
        }
    }

    pub fn id(&self) -> &'a str {
        match *self {
            TreeNode::LoadBalancer(lb) => &lb.id,
            TreeNode::Listener { listener, .. } => &listener.id,
            TreeNode::Pool { pool, .. } => &pool.id,
            TreeNode::Monitor { monitor, .. } => &monitor.id,
            TreeNode::Member { member, .. } => &member.id,
            TreeNode::L7Policy { policy, .. } => &policy.id,
            TreeNode::L7Rule { rule, .. } => &rule.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            TreeNode::LoadBalancer(lb) => &lb.name,
            TreeNode::Listener { listener, .. } => &listener.name,
            TreeNode::Pool { pool, .. } => &pool.name,
            TreeNode::Monitor { monitor, .. } => &monitor.name,
            TreeNode::Member { member, .. } => &member.name,
            TreeNode::L7Policy { policy, .. } => &policy.name,
            TreeNode::L7Rule { rule, .. } => &rule.rule_type,
        }
    }

    pub fn parent_id(&self) -> Option<&'a str> {
        match *self {
            TreeNode::LoadBalancer(_) => None,
            TreeNode::Listener {
                loadbalancer_id, ..
            } => Some(loadbalancer_id),
            TreeNode::Pool { parent_id, .. } => Some(parent_id),
            TreeNode::Monitor { pool_id, .. } | TreeNode::Member { pool_id, .. } => Some(pool_id),
            TreeNode::L7Policy { listener_id, .. } => Some(listener_id),
            TreeNode::L7Rule { policy_id, .. } => Some(policy_id),
        }
    }

    pub fn provisioning_status(&self) -> &'a ProvisioningStatus {
        match *self {
            TreeNode::LoadBalancer(lb) => &lb.provisioning_status,
            TreeNode::Listener { listener, .. } => &listener.provisioning_status,
            TreeNode::Pool { pool, .. } => &pool.provisioning_status,
            TreeNode::Monitor { monitor, .. } => &monitor.provisioning_status,
            TreeNode::Member { member, .. } => &member.provisioning_status,
            TreeNode::L7Policy { policy, .. } => &policy.provisioning_status,
            TreeNode::L7Rule { rule, .. } => &rule.provisioning_status,
        }
    }

    /// Kind and id must match; the parent must match too when the key
    /// carries one and the kind is only unique within its parent.
    pub fn matches(&self, key: &ResourceKey) -> bool {
        if self.kind() != key.kind || self.id() != key.id {
            return false;
        }
        match (&key.parent_id, key.kind.requires_parent()) {
            (Some(parent), true) => self.parent_id() == Some(parent.as_str()),
            _ => true,
        }
    }
}

impl StatusTree {
    /// Builds a tree from a possibly empty envelope. A missing body or root
    /// becomes an empty load balancer with an empty status.
    pub fn from_envelope(envelope: StatusTreeEnvelope) -> Self {
        let loadbalancer = envelope
            .statuses
            .and_then(|body| body.loadbalancer)
            .unwrap_or_default();
        Self { loadbalancer }
    }

    pub fn root_status(&self) -> &ProvisioningStatus {
        &self.loadbalancer.provisioning_status
    }

    /// Every entry, depth first: listeners with their pools and policies,
    /// then root pools. A pool listed under both appears twice.
    pub fn nodes(&self) -> Vec<TreeNode<'_>> {
        let lb = &self.loadbalancer;
        let mut nodes = vec![TreeNode::LoadBalancer(lb)];

        for listener in &lb.listeners {
            nodes.push(TreeNode::Listener {
                loadbalancer_id: &lb.id,
                listener,
            });
            for policy in &listener.l7policies {
                nodes.push(TreeNode::L7Policy {
                    listener_id: &listener.id,
                    policy,
                });
                for rule in &policy.rules {
                    nodes.push(TreeNode::L7Rule {
                        policy_id: &policy.id,
                        rule,
                    });
                }
            }
            for pool in &listener.pools {
                push_pool(&mut nodes, &listener.id, pool);
            }
        }
        for pool in &lb.pools {
            push_pool(&mut nodes, &lb.id, pool);
        }
        nodes
    }

    /// Finds the entry addressed by `key`.
    pub fn find(&self, key: &ResourceKey) -> Option<TreeNode<'_>> {
        self.nodes().into_iter().find(|node| node.matches(key))
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.find(key).is_some()
    }
}

fn push_pool<'a>(nodes: &mut Vec<TreeNode<'a>>, parent_id: &'a str, pool: &'a PoolStatus) {
    nodes.push(TreeNode::Pool { parent_id, pool });
    if let Some(monitor) = &pool.health_monitor {
        if !monitor.id.is_empty() {
            nodes.push(TreeNode::Monitor {
                pool_id: &pool.id,
                monitor,
            });
        }
    }
    for member in &pool.members {
        nodes.push(TreeNode::Member {
            pool_id: &pool.id,
            member,
        });
    }
}
