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

//! Per-kind wait entry points.
//!
//! Every wait except the load balancer's own polls the owning load
//! balancer's status tree, fetched fresh on each tick, and resolves the
//! resource's status from it.

use super::locator::{self, listener_owner, pool_owner};
use super::ops::LoadBalancerReconciler;
use super::resolver::resolve_status;
use super::waiter::{WaitOutcome, Waiter};
use crate::domain::model::{
    Listener, Pool, ProvisioningStatus, ResourceKey, ResourceKind, ResourceObject,
};
use crate::shared::error::{LbError, Result};
use std::time::Duration;

impl LoadBalancerReconciler {
    fn waiter(
        &self,
        subject: &ResourceKey,
        target: ProvisioningStatus,
        pending: Vec<ProvisioningStatus>,
        timeout: Duration,
    ) -> Waiter {
        Waiter::new(subject.to_string(), target, pending, timeout)
            .settings(self.settings())
            .cancel_on(self.cancel_token().clone())
    }

    /// Polls the load balancer itself through a direct GET.
    pub async fn wait_for_load_balancer(
        &self,
        id: &str,
        target: ProvisioningStatus,
        pending: Vec<ProvisioningStatus>,
        timeout: Duration,
    ) -> Result<()> {
        let key = ResourceKey::load_balancer(id);
        let backend = self.backend();
        self.waiter(&key, target, pending, timeout)
            .wait(|| async move {
                let lb = backend.get_load_balancer(id).await?;
                let status = lb.provisioning_status.clone();
                Ok::<_, LbError>((lb, status))
            })
            .await
            .map(drop_outcome)
    }

    pub async fn wait_for_listener(
        &self,
        listener: &Listener,
        target: ProvisioningStatus,
        pending: Vec<ProvisioningStatus>,
        timeout: Duration,
    ) -> Result<()> {
        let lb_id = listener_owner(listener)?;
        let key = ResourceKey::new(ResourceKind::Listener, &listener.id);
        self.wait_in_tree(&lb_id, &key, target, pending, timeout).await
    }

    pub async fn wait_for_pool(
        &self,
        pool: &Pool,
        target: ProvisioningStatus,
        pending: Vec<ProvisioningStatus>,
        timeout: Duration,
    ) -> Result<()> {
        let lb_id = pool_owner(self.backend(), pool).await?;
        let key = ResourceKey::new(ResourceKind::Pool, &pool.id);
        self.wait_in_tree(&lb_id, &key, target, pending, timeout).await
    }

    pub async fn wait_for_member(
        &self,
        parent_pool: &Pool,
        member_id: &str,
        target: ProvisioningStatus,
        pending: Vec<ProvisioningStatus>,
        timeout: Duration,
    ) -> Result<()> {
        let lb_id = pool_owner(self.backend(), parent_pool).await?;
        let key = ResourceKey::member(&parent_pool.id, member_id);
        self.wait_in_tree(&lb_id, &key, target, pending, timeout).await
    }

    pub async fn wait_for_monitor(
        &self,
        parent_pool: &Pool,
        monitor_id: &str,
        target: ProvisioningStatus,
        pending: Vec<ProvisioningStatus>,
        timeout: Duration,
    ) -> Result<()> {
        let lb_id = pool_owner(self.backend(), parent_pool).await?;
        let key = ResourceKey::new(ResourceKind::Monitor, monitor_id);
        self.wait_in_tree(&lb_id, &key, target, pending, timeout).await
    }

    pub async fn wait_for_l7policy(
        &self,
        parent_listener: &Listener,
        policy_id: &str,
        target: ProvisioningStatus,
        pending: Vec<ProvisioningStatus>,
        timeout: Duration,
    ) -> Result<()> {
        let lb_id = listener_owner(parent_listener)?;
        let key = ResourceKey::new(ResourceKind::L7Policy, policy_id);
        self.wait_in_tree(&lb_id, &key, target, pending, timeout).await
    }

    pub async fn wait_for_l7rule(
        &self,
        parent_listener: &Listener,
        policy_id: &str,
        rule_id: &str,
        target: ProvisioningStatus,
        pending: Vec<ProvisioningStatus>,
        timeout: Duration,
    ) -> Result<()> {
        let lb_id = listener_owner(parent_listener)?;
        let key = ResourceKey::l7rule(policy_id, rule_id);
        self.wait_in_tree(&lb_id, &key, target, pending, timeout).await
    }

    /// Waits for any object already fetched, locating its load balancer
    /// through its back-references.
    pub async fn wait_for_object(
        &self,
        object: &ResourceObject,
        target: ProvisioningStatus,
        pending: Vec<ProvisioningStatus>,
        timeout: Duration,
    ) -> Result<()> {
        match object {
            ResourceObject::LoadBalancer(lb) => {
                self.wait_for_load_balancer(&lb.id, target, pending, timeout)
                    .await
            }
            other => {
                let lb_id = locator::locate_load_balancer_id(self.backend(), other).await?;
                self.wait_in_tree(&lb_id, &other.key(), target, pending, timeout)
                    .await
            }
        }
    }

    /// Waits for the object addressed by `key`. A missing object counts as
    /// already deleted when the target is `DELETED`.
    pub async fn wait_for_key(
        &self,
        key: &ResourceKey,
        target: ProvisioningStatus,
        pending: Vec<ProvisioningStatus>,
        timeout: Duration,
    ) -> Result<()> {
        if key.kind == ResourceKind::LoadBalancer {
            return self
                .wait_for_load_balancer(&key.id, target, pending, timeout)
                .await;
        }
        let object = match self.backend().fetch(key).await {
            Ok(object) => object,
            Err(e) if e.is_not_found() && target == ProvisioningStatus::Deleted => {
                return Ok(())
            }
            Err(e) => return Err(e),
        };
        self.wait_for_object(&object, target, pending, timeout).await
    }

    /// Owning load balancer id of the object addressed by `key`.
    pub async fn resolve_owning_load_balancer_id(&self, key: &ResourceKey) -> Result<String> {
        locator::resolve_owning_load_balancer_id(self.backend(), key).await
    }

    pub(crate) async fn wait_in_tree(
        &self,
        lb_id: &str,
        key: &ResourceKey,
        target: ProvisioningStatus,
        pending: Vec<ProvisioningStatus>,
        timeout: Duration,
    ) -> Result<()> {
        let backend = self.backend();
        self.waiter(key, target, pending, timeout)
            .wait(|| async move {
                let tree = backend.status_tree(lb_id).await?;
                let status = resolve_status(backend, &tree, key).await?.status;
                Ok::<_, LbError>(((), status))
            })
            .await
            .map(drop_outcome)
    }
}

fn drop_outcome<T>(_: WaitOutcome<T>) {}
