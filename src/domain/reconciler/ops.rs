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

//! Create, update and delete flows.
//!
//! Each flow waits for the parent to be `ACTIVE`, issues the mutation under
//! the retry decorator, then waits for the resource itself to settle. Every
//! phase gets the full configured timeout.

use super::locator::{listener_owner, policy_owner, pool_owner};
use super::retry::{check_deleted, is_retryable, retry_mutation, RetryPolicy};
use super::waiter::WaitSettings;
use crate::domain::model::{
    pending_delete_statuses, pending_statuses, ProvisioningStatus, ResourceKey, ResourceKind,
    ResourceObject, ResourceSpec,
};
use crate::infrastructure::openstack::LoadBalancerBackend;
use crate::shared::error::{LbError, Result};
use crate::shared::locks::LockRegistry;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Clone)]
pub struct LoadBalancerReconciler {
    backend: Arc<dyn LoadBalancerBackend>,
    settings: WaitSettings,
    locks: Option<LockRegistry>,
    cancel: CancellationToken,
}

impl LoadBalancerReconciler {
    pub fn new(backend: Arc<dyn LoadBalancerBackend>, settings: WaitSettings) -> Self {
        Self {
            backend,
            settings,
            locks: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Serialises mutations that share an owning load balancer.
    pub fn with_locks(mut self, locks: LockRegistry) -> Self {
        self.locks = Some(locks);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn backend(&self) -> &dyn LoadBalancerBackend {
        self.backend.as_ref()
    }

    pub fn settings(&self) -> &WaitSettings {
        &self.settings
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Creates `spec` once its parent is `ACTIVE` and waits for it to
    /// become `ACTIVE` too.
    pub async fn create(&self, spec: &ResourceSpec) -> Result<ResourceObject> {
        let owner = self.settle_spec_parent(spec).await?;
        let _guard = match &owner {
            Some(lb_id) => self.lock(lb_id).await,
            None => None,
        };

        let subject = format!("create {}", spec.kind());
        let created = retry_mutation(&subject, &self.retry_policy(), is_retryable, || {
            self.backend.create(spec)
        })
        .await?;
        info!("Created {}", created.key());

        let lb_id = owner.unwrap_or_else(|| created.id().to_string());
        self.wait_settled(
            &lb_id,
            &created.key(),
            ProvisioningStatus::Active,
            pending_statuses(),
        )
        .await?;
        Ok(created)
    }

    /// Updates the object at `key` once its parent is `ACTIVE` and waits for
    /// it to be `ACTIVE` again.
    pub async fn update(&self, key: &ResourceKey, spec: &ResourceSpec) -> Result<ResourceObject> {
        if spec.kind() != key.kind {
            return Err(LbError::ValidationError(format!(
                "cannot update {} with a {} spec",
                key,
                spec.kind()
            )));
        }

        let current = self.backend.fetch(key).await?;
        let lb_id = self.settle_object_parent(&current).await?;
        let _guard = self.lock(&lb_id).await;

        let subject = format!("update {}", key);
        let updated = retry_mutation(&subject, &self.retry_policy(), is_retryable, || {
            self.backend.update(key, spec)
        })
        .await?;
        info!("Updated {}", key);

        self.wait_settled(&lb_id, key, ProvisioningStatus::Active, pending_statuses())
            .await?;
        Ok(updated)
    }

    /// Deletes the object at `key` and waits until it is gone. An object
    /// that is already missing is a success.
    pub async fn delete(&self, key: &ResourceKey) -> Result<()> {
        let current = match self.backend.fetch(key).await {
            Ok(object) => object,
            Err(e) if e.is_not_found() => {
                info!("{} is already gone", key);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let lb_id = match &current {
            ResourceObject::LoadBalancer(lb) => lb.id.clone(),
            other => self.settle_object_parent(other).await?,
        };
        let _guard = self.lock(&lb_id).await;

        let subject = format!("delete {}", key);
        retry_mutation(&subject, &self.retry_policy(), is_retryable, || async {
            check_deleted(self.backend.delete(key).await)
        })
        .await?;
        info!("Deleted {}", key);

        self.wait_settled(
            &lb_id,
            key,
            ProvisioningStatus::Deleted,
            pending_delete_statuses(),
        )
        .await
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            budget: self.settings.timeout,
            interval: self.settings.retry_interval,
            cancel: Some(self.cancel.clone()),
        }
    }

    async fn lock(&self, lb_id: &str) -> Option<OwnedMutexGuard<()>> {
        match &self.locks {
            Some(locks) => {
                debug!("Locking load balancer '{}'", lb_id);
                Some(locks.lock(lb_id).await)
            }
            None => None,
        }
    }

    async fn wait_settled(
        &self,
        lb_id: &str,
        key: &ResourceKey,
        target: ProvisioningStatus,
        pending: Vec<ProvisioningStatus>,
    ) -> Result<()> {
        let timeout = self.settings.timeout;
        if key.kind == ResourceKind::LoadBalancer {
            self.wait_for_load_balancer(&key.id, target, pending, timeout)
                .await
        } else {
            self.wait_in_tree(lb_id, key, target, pending, timeout)
                .await
        }
    }

    async fn settle_load_balancer(&self, lb_id: &str) -> Result<String> {
        self.wait_for_load_balancer(
            lb_id,
            ProvisioningStatus::Active,
            pending_statuses(),
            self.settings.timeout,
        )
        .await?;
        Ok(lb_id.to_string())
    }

    async fn settle_listener(&self, listener_id: &str) -> Result<String> {
        let listener = self.backend.get_listener(listener_id).await?;
        self.wait_for_listener(
            &listener,
            ProvisioningStatus::Active,
            pending_statuses(),
            self.settings.timeout,
        )
        .await?;
        listener_owner(&listener)
    }

    async fn settle_pool(&self, pool_id: &str) -> Result<String> {
        let pool = self.backend.get_pool(pool_id).await?;
        self.wait_for_pool(
            &pool,
            ProvisioningStatus::Active,
            pending_statuses(),
            self.settings.timeout,
        )
        .await?;
        pool_owner(self.backend(), &pool).await
    }

    /// Waits for the policy's listener and then the policy itself.
    async fn settle_policy(&self, policy_id: &str) -> Result<String> {
        let policy = self.backend.get_l7policy(policy_id).await?;
        let timeout = self.settings.timeout;
        match policy.listener_id.as_deref().filter(|id| !id.is_empty()) {
            Some(listener_id) => {
                let listener = self.backend.get_listener(listener_id).await?;
                self.wait_for_listener(
                    &listener,
                    ProvisioningStatus::Active,
                    pending_statuses(),
                    timeout,
                )
                .await?;
                self.wait_for_l7policy(
                    &listener,
                    &policy.id,
                    ProvisioningStatus::Active,
                    pending_statuses(),
                    timeout,
                )
                .await?;
                listener_owner(&listener)
            }
            None => {
                let lb_id = policy_owner(self.backend(), &policy).await?;
                let key = ResourceKey::new(ResourceKind::L7Policy, &policy.id);
                self.wait_in_tree(
                    &lb_id,
                    &key,
                    ProvisioningStatus::Active,
                    pending_statuses(),
                    timeout,
                )
                .await?;
                Ok(lb_id)
            }
        }
    }

    /// Parent wait for a resource about to be created. Returns the owning
    /// load balancer id, or `None` when creating a load balancer.
    async fn settle_spec_parent(&self, spec: &ResourceSpec) -> Result<Option<String>> {
        let lb_id = match spec {
            ResourceSpec::LoadBalancer(_) => return Ok(None),
            ResourceSpec::Listener(s) => {
                let lb_id = required(s.loadbalancer_id.as_deref(), "listener.loadbalancer_id")?;
                self.settle_load_balancer(lb_id).await?
            }
            ResourceSpec::Pool(s) => {
                match (s.listener_id.as_deref(), s.loadbalancer_id.as_deref()) {
                    (Some(listener_id), _) if !listener_id.is_empty() => {
                        self.settle_listener(listener_id).await?
                    }
                    (_, Some(lb_id)) if !lb_id.is_empty() => {
                        self.settle_load_balancer(lb_id).await?
                    }
                    _ => {
                        return Err(LbError::ValidationError(
                            "pool needs either listener_id or loadbalancer_id".to_string(),
                        ))
                    }
                }
            }
            ResourceSpec::Member(s) => {
                let pool_id = required(Some(s.pool_id.as_str()), "member.pool_id")?;
                self.settle_pool(pool_id).await?
            }
            ResourceSpec::Monitor(s) => {
                let pool_id = required(s.pool_id.as_deref(), "monitor.pool_id")?;
                self.settle_pool(pool_id).await?
            }
            ResourceSpec::L7Policy(s) => {
                let listener_id = required(s.listener_id.as_deref(), "l7policy.listener_id")?;
                self.settle_listener(listener_id).await?
            }
            ResourceSpec::L7Rule(s) => {
                let policy_id = required(Some(s.l7policy_id.as_str()), "l7rule.l7policy_id")?;
                self.settle_policy(policy_id).await?
            }
        };
        Ok(Some(lb_id))
    }

    /// Parent wait for an existing object about to be updated or deleted.
    /// A load balancer waits for itself.
    async fn settle_object_parent(&self, object: &ResourceObject) -> Result<String> {
        match object {
            ResourceObject::LoadBalancer(lb) => self.settle_load_balancer(&lb.id).await,
            ResourceObject::Listener(listener) => {
                let lb_id = listener_owner(listener)?;
                self.settle_load_balancer(&lb_id).await
            }
            ResourceObject::Pool(pool) => match pool.listeners.first() {
                Some(listener) => self.settle_listener(&listener.id).await,
                None => {
                    let lb_id = pool_owner(self.backend(), pool).await?;
                    self.settle_load_balancer(&lb_id).await
                }
            },
            ResourceObject::Member(member) => {
                let pool_id = required(member.pool_id.as_deref(), "member.pool_id")?;
                self.settle_pool(pool_id).await
            }
            ResourceObject::Monitor(monitor) => {
                let pool_id = required(
                    monitor.pools.first().map(|r| r.id.as_str()),
                    "monitor.pools",
                )?;
                self.settle_pool(pool_id).await
            }
            ResourceObject::L7Policy(policy) => {
                match policy.listener_id.as_deref().filter(|id| !id.is_empty()) {
                    Some(listener_id) => self.settle_listener(listener_id).await,
                    None => {
                        let lb_id = policy_owner(self.backend(), policy).await?;
                        self.settle_load_balancer(&lb_id).await
                    }
                }
            }
            ResourceObject::L7Rule(rule) => {
                let policy_id = required(rule.l7policy_id.as_deref(), "l7rule.l7policy_id")?;
                self.settle_policy(policy_id).await
            }
        }
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| LbError::ValidationError(format!("{} is required", field)))
}
