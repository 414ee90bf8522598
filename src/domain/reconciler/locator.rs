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

//! Finds the load balancer that owns an object.

use crate::domain::model::{
    L7Policy, Listener, Pool, ResourceKey, ResourceKind, ResourceObject,
};
use crate::infrastructure::constants::LOCATOR_SCAN_CONCURRENCY;
use crate::infrastructure::openstack::LoadBalancerBackend;
use crate::shared::error::{LbError, Result};
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

/// Owning load balancer id of `resource`.
///
/// Back-references are followed first. Only an L7 policy without a listener
/// reference falls back to scanning every load balancer's status tree.
pub async fn locate_load_balancer_id(
    backend: &dyn LoadBalancerBackend,
    resource: &ResourceObject,
) -> Result<String> {
    match resource {
        ResourceObject::LoadBalancer(lb) => Ok(lb.id.clone()),
        ResourceObject::Listener(listener) => listener_owner(listener),
        ResourceObject::Pool(pool) => pool_owner(backend, pool).await,
        ResourceObject::Monitor(monitor) => {
            let pool_id = monitor
                .pools
                .first()
                .map(|r| r.id.as_str())
                .ok_or_else(|| {
                    LbError::owner_not_found(ResourceKind::Monitor.as_str(), &monitor.id)
                })?;
            let pool = backend.get_pool(pool_id).await?;
            pool_owner(backend, &pool).await
        }
        ResourceObject::Member(member) => {
            let pool_id = member
                .pool_id
                .as_deref()
                .ok_or_else(|| {
                    LbError::owner_not_found(ResourceKind::Member.as_str(), &member.id)
                })?;
            let pool = backend.get_pool(pool_id).await?;
            pool_owner(backend, &pool).await
        }
        ResourceObject::L7Policy(policy) => policy_owner(backend, policy).await,
        ResourceObject::L7Rule(rule) => {
            let policy_id = rule
                .l7policy_id
                .as_deref()
                .ok_or_else(|| {
                    LbError::owner_not_found(ResourceKind::L7Rule.as_str(), &rule.id)
                })?;
            let policy = backend.get_l7policy(policy_id).await?;
            policy_owner(backend, &policy).await
        }
    }
}

/// Fetches the object addressed by `key` and locates its owner.
pub async fn resolve_owning_load_balancer_id(
    backend: &dyn LoadBalancerBackend,
    key: &ResourceKey,
) -> Result<String> {
    if key.kind == ResourceKind::LoadBalancer {
        return Ok(key.id.clone());
    }
    let object = backend.fetch(key).await?;
    locate_load_balancer_id(backend, &object).await
}

pub(crate) fn listener_owner(listener: &Listener) -> Result<String> {
    listener
        .load_balancer_id()
        .map(str::to_string)
        .ok_or_else(|| LbError::owner_not_found(ResourceKind::Listener.as_str(), &listener.id))
}

pub(crate) async fn pool_owner(backend: &dyn LoadBalancerBackend, pool: &Pool) -> Result<String> {
    if let Some(lb) = pool.loadbalancers.first() {
        return Ok(lb.id.clone());
    }
    match pool.listeners.first() {
        Some(listener_ref) => {
            debug!(
                "pool '{}' has no load balancer reference, following listener '{}'",
                pool.id, listener_ref.id
            );
            let listener = backend.get_listener(&listener_ref.id).await?;
            listener_owner(&listener)
        }
        None => Err(LbError::owner_not_found(ResourceKind::Pool.as_str(), &pool.id)),
    }
}

pub(crate) async fn policy_owner(
    backend: &dyn LoadBalancerBackend,
    policy: &L7Policy,
) -> Result<String> {
    if let Some(listener_id) = policy.listener_id.as_deref().filter(|id| !id.is_empty()) {
        let listener = backend.get_listener(listener_id).await?;
        return listener_owner(&listener);
    }
    scan_for_policy(backend, &policy.id).await
}

/// Slow path: walks every load balancer's status tree looking for the policy.
async fn scan_for_policy(backend: &dyn LoadBalancerBackend, policy_id: &str) -> Result<String> {
    let load_balancers = backend.list_load_balancers().await?;
    warn!(
        "l7policy '{}' carries no listener reference, scanning {} load balancers",
        policy_id,
        load_balancers.len()
    );

    let key = ResourceKey::new(ResourceKind::L7Policy, policy_id);
    let mut trees = stream::iter(load_balancers.iter())
        .map(|lb| async move { (lb.id.as_str(), backend.status_tree(&lb.id).await) })
        .buffered(LOCATOR_SCAN_CONCURRENCY);

    while let Some((lb_id, tree)) = trees.next().await {
        match tree {
            Ok(tree) if tree.contains(&key) => return Ok(lb_id.to_string()),
            Ok(_) => {}
            // Deleted between the listing and the tree fetch.
            Err(e) if e.is_not_found() => debug!("Skipping load balancer '{}': {}", lb_id, e),
            Err(e) => return Err(e),
        }
    }
    Err(LbError::owner_not_found(ResourceKind::L7Policy.as_str(), policy_id))
}
