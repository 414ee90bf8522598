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

use super::backend::{BackendKind, LoadBalancerBackend};
use super::layout::{self, ApiLayout};
use super::transport::HttpTransport;
use crate::domain::model::{LoadBalancer, ResourceKey, ResourceObject, ResourceSpec, StatusTree};
use crate::infrastructure::constants::{OCTAVIA_PREFIX, OCTAVIA_STATUS_SUFFIX};
use crate::shared::error::Result;

const LAYOUT: ApiLayout = ApiLayout {
    prefix: OCTAVIA_PREFIX,
    status_suffix: OCTAVIA_STATUS_SUFFIX,
};

/// Modern backend. Accepts every field a spec can carry.
pub struct OctaviaBackend {
    transport: HttpTransport,
}

impl OctaviaBackend {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }
}

#[async_trait::async_trait]
impl LoadBalancerBackend for OctaviaBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Octavia
    }

    async fn status_tree(&self, lb_id: &str) -> Result<StatusTree> {
        layout::fetch_status_tree(&self.transport, &LAYOUT, lb_id).await
    }

    async fn list_load_balancers(&self) -> Result<Vec<LoadBalancer>> {
        layout::list_load_balancers(&self.transport, &LAYOUT).await
    }

    async fn fetch(&self, key: &ResourceKey) -> Result<ResourceObject> {
        layout::fetch_object(&self.transport, &LAYOUT, key).await
    }

    async fn create(&self, spec: &ResourceSpec) -> Result<ResourceObject> {
        layout::create_object(&self.transport, &LAYOUT, spec, spec.body()?).await
    }

    async fn update(&self, key: &ResourceKey, spec: &ResourceSpec) -> Result<ResourceObject> {
        layout::update_object(&self.transport, &LAYOUT, key, spec.body()?).await
    }

    async fn delete(&self, key: &ResourceKey) -> Result<()> {
        layout::delete_object(&self.transport, &LAYOUT, key).await
    }
}
