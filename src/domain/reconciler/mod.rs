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

//! Provisioning-status reconciliation for load-balancer resources

pub mod locator;
pub mod ops;
pub mod resolver;
pub mod retry;
pub mod waiter;
pub mod waits;

pub use self::locator::{locate_load_balancer_id, resolve_owning_load_balancer_id};
pub use self::ops::LoadBalancerReconciler;
pub use self::resolver::{resolve_status, Observation, Observed};
pub use self::retry::{check_deleted, is_retryable, retry_mutation, RetryPolicy};
pub use self::waiter::{WaitOutcome, WaitSettings, Waiter};
