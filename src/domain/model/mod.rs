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

//! Load-balancer object model

pub mod key;
pub mod objects;
pub mod spec;
pub mod status;
pub mod tree;

pub use self::key::{ResourceKey, ResourceKind};
pub use self::objects::{
    IdRef, L7Policy, L7Rule, Listener, LoadBalancer, Member, Monitor, Pool, ResourceObject,
};
pub use self::spec::{
    L7PolicySpec, L7RuleSpec, ListenerSpec, LoadBalancerSpec, MemberSpec, MonitorSpec, PoolSpec,
    ResourceSpec,
};
pub use self::status::{pending_delete_statuses, pending_statuses, ProvisioningStatus};
pub use self::tree::{
    L7PolicyStatus, L7RuleStatus, ListenerStatus, LoadBalancerStatus, MemberStatus,
    MonitorStatus, PoolStatus, StatusTree, StatusTreeEnvelope, TreeNode,
};
