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

use crate::domain::model::{ProvisioningStatus, ResourceKey, ResourceObject, StatusTree, TreeNode};
use crate::infrastructure::openstack::LoadBalancerBackend;
use crate::shared::error::Result;
use tracing::debug;

/// Where a resolved status came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Observed<'a> {
    /// An entry of the status tree. When the root is still pending this is
    /// the root itself, whatever the key asked for.
    Node(TreeNode<'a>),
    /// The tree did not carry the object, so it was fetched directly.
    Fetched(ResourceObject),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Observation<'a> {
    pub object: Observed<'a>,
    pub status: ProvisioningStatus,
}

/// Most precise status available for `key` in `tree`.
///
/// Children are only trusted once the root is `ACTIVE` or `ERROR`. An object
/// missing from a settled tree, or listed there without a status, is fetched
/// by id and reported `ACTIVE` if the fetch succeeds. Fetch errors, including
/// not-found, are returned unchanged.
pub async fn resolve_status<'a>(
    backend: &dyn LoadBalancerBackend,
    tree: &'a StatusTree,
    key: &ResourceKey,
) -> Result<Observation<'a>> {
    let root = tree.root_status();
    if !root.is_terminal() {
        return Ok(Observation {
            object: Observed::Node(TreeNode::LoadBalancer(&tree.loadbalancer)),
            status: root.clone(),
        });
    }

    if let Some(node) = tree.find(key) {
        let status = node.provisioning_status();
        if !status.is_empty() {
            return Ok(Observation {
                object: Observed::Node(node),
                status: status.clone(),
            });
        }
    }

    debug!(
        "{} not settled in the status tree of load balancer '{}', fetching it directly",
        key, tree.loadbalancer.id
    );
    let object = backend.fetch(key).await?;
    Ok(Observation {
        object: Observed::Fetched(object),
        status: ProvisioningStatus::Active,
    })
}
