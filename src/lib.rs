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

// Core modules
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export commonly used types
pub use domain::config::{CloudConf, ReconcilerConf, WaitConf};
pub use domain::model::{
    ProvisioningStatus, ResourceKey, ResourceKind, ResourceObject, ResourceSpec, StatusTree,
    TreeNode,
};
pub use domain::reconciler::{
    is_retryable, locate_load_balancer_id, resolve_status, LoadBalancerReconciler, WaitOutcome,
    WaitSettings, Waiter,
};
pub use infrastructure::openstack::{choose_backend, BackendKind, LoadBalancerBackend};
pub use shared::{LbError, LockRegistry, Result};
