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

use crate::domain::model::{
    L7Policy, L7Rule, Listener, LoadBalancer, Member, Monitor, Pool, ResourceKey, ResourceKind,
    ResourceObject, ResourceSpec, StatusTree,
};
use crate::shared::error::{LbError, Result};
use std::fmt;

/// Which of the two load-balancer APIs a backend speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Modern standalone service with the richer object model.
    Octavia,
    /// Legacy networking extension with a reduced object model.
    Neutron,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Octavia => "octavia",
            BackendKind::Neutron => "neutron-lbaas",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the reconciler needs from a load-balancer API.
///
/// Call sites only ever see this trait; the two concrete backends differ in
/// URL layout and in which request fields they accept.
#[async_trait::async_trait]
pub trait LoadBalancerBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// One nested snapshot of `lb_id` and everything it owns. A `null` body
    /// or root comes back as an empty load balancer, never an error.
    async fn status_tree(&self, lb_id: &str) -> Result<StatusTree>;

    async fn list_load_balancers(&self) -> Result<Vec<LoadBalancer>>;

    async fn fetch(&self, key: &ResourceKey) -> Result<ResourceObject>;

    async fn create(&self, spec: &ResourceSpec) -> Result<ResourceObject>;

    async fn update(&self, key: &ResourceKey, spec: &ResourceSpec) -> Result<ResourceObject>;

    async fn delete(&self, key: &ResourceKey) -> Result<()>;

    async fn get_load_balancer(&self, id: &str) -> Result<LoadBalancer> {
        match self.fetch(&ResourceKey::load_balancer(id)).await? {
            ResourceObject::LoadBalancer(lb) => Ok(lb),
            other => Err(kind_mismatch(ResourceKind::LoadBalancer, &other)),
        }
    }

    async fn get_listener(&self, id: &str) -> Result<Listener> {
        match self.fetch(&ResourceKey::new(ResourceKind::Listener, id)).await? {
            ResourceObject::Listener(listener) => Ok(listener),
            other => Err(kind_mismatch(ResourceKind::Listener, &other)),
        }
    }

    async fn get_pool(&self, id: &str) -> Result<Pool> {
        match self.fetch(&ResourceKey::new(ResourceKind::Pool, id)).await? {
            ResourceObject::Pool(pool) => Ok(pool),
            other => Err(kind_mismatch(ResourceKind::Pool, &other)),
        }
    }

    async fn get_monitor(&self, id: &str) -> Result<Monitor> {
        match self.fetch(&ResourceKey::new(ResourceKind::Monitor, id)).await? {
            ResourceObject::Monitor(monitor) => Ok(monitor),
            other => Err(kind_mismatch(ResourceKind::Monitor, &other)),
        }
    }

    async fn get_member(&self, pool_id: &str, id: &str) -> Result<Member> {
        match self.fetch(&ResourceKey::member(pool_id, id)).await? {
            ResourceObject::Member(member) => Ok(member),
            other => Err(kind_mismatch(ResourceKind::Member, &other)),
        }
    }

    async fn get_l7policy(&self, id: &str) -> Result<L7Policy> {
        match self.fetch(&ResourceKey::new(ResourceKind::L7Policy, id)).await? {
            ResourceObject::L7Policy(policy) => Ok(policy),
            other => Err(kind_mismatch(ResourceKind::L7Policy, &other)),
        }
    }

    async fn get_l7rule(&self, policy_id: &str, id: &str) -> Result<L7Rule> {
        match self.fetch(&ResourceKey::l7rule(policy_id, id)).await? {
            ResourceObject::L7Rule(rule) => Ok(rule),
            other => Err(kind_mismatch(ResourceKind::L7Rule, &other)),
        }
    }
}

fn kind_mismatch(expected: ResourceKind, got: &ResourceObject) -> LbError {
    LbError::InvalidResponse(format!(
        "expected a {} but the backend returned {} '{}'",
        expected,
        got.kind(),
        got.id()
    ))
}
