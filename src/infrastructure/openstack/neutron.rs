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
use crate::infrastructure::constants::{NEUTRON_PREFIX, NEUTRON_STATUS_SUFFIX};
use crate::shared::error::{LbError, Result};
use serde_json::Value;

const LAYOUT: ApiLayout = ApiLayout {
    prefix: NEUTRON_PREFIX,
    status_suffix: NEUTRON_STATUS_SUFFIX,
};

/// Legacy backend. Has no member weight/backup, tags or availability
/// zones, and its single-object GETs may omit `provisioning_status`.
pub struct NeutronBackend {
    transport: HttpTransport,
}

impl NeutronBackend {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Serialises a spec, refusing fields this API does not model.
    pub fn legacy_body(spec: &ResourceSpec) -> Result<Value> {
        if let Some((field, _)) = spec.modern_only_fields().into_iter().find(|(_, set)| *set) {
            return Err(LbError::unsupported(
                BackendKind::Neutron.as_str(),
                format!("{}.{}", spec.kind(), field),
            ));
        }
        let mut body = spec.body()?;
        if let Value::Object(map) = &mut body {
            for (field, _) in spec.modern_only_fields() {
                map.remove(field);
            }
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl LoadBalancerBackend for NeutronBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Neutron
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
        let body = Self::legacy_body(spec)?;
        layout::create_object(&self.transport, &LAYOUT, spec, body).await
    }

    async fn update(&self, key: &ResourceKey, spec: &ResourceSpec) -> Result<ResourceObject> {
        let body = Self::legacy_body(spec)?;
        layout::update_object(&self.transport, &LAYOUT, key, body).await
    }

    async fn delete(&self, key: &ResourceKey) -> Result<()> {
        layout::delete_object(&self.transport, &LAYOUT, key).await
    }
}
