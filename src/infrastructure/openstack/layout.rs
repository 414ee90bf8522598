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

//! REST layout shared by both backends: paths, envelopes and the CRUD calls
//! built on them.

use super::transport::HttpTransport;
use crate::domain::model::{
    LoadBalancer, ResourceKey, ResourceKind, ResourceObject, ResourceSpec, StatusTree,
    StatusTreeEnvelope,
};
use crate::shared::error::{LbError, Result};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy)]
pub struct ApiLayout {
    pub prefix: &'static str,
    pub status_suffix: &'static str,
}

impl ApiLayout {
    pub fn collection_path(&self, kind: ResourceKind, parent: Option<&str>) -> Result<String> {
        let path = match kind {
            ResourceKind::LoadBalancer => "loadbalancers".to_string(),
            ResourceKind::Listener => "listeners".to_string(),
            ResourceKind::Pool => "pools".to_string(),
            ResourceKind::Monitor => "healthmonitors".to_string(),
            ResourceKind::L7Policy => "l7policies".to_string(),
            ResourceKind::Member => format!("pools/{}/members", require(kind, parent)?),
            ResourceKind::L7Rule => format!("l7policies/{}/rules", require(kind, parent)?),
        };
        Ok(format!("{}/{}", self.prefix, path))
    }

    pub fn object_path(&self, key: &ResourceKey) -> Result<String> {
        let collection = self.collection_path(key.kind, key.parent_id.as_deref())?;
        Ok(format!("{}/{}", collection, key.id))
    }

    pub fn status_path(&self, lb_id: &str) -> String {
        format!(
            "{}/loadbalancers/{}/{}",
            self.prefix, lb_id, self.status_suffix
        )
    }
}

fn require(kind: ResourceKind, parent: Option<&str>) -> Result<String> {
    match parent {
        Some(p) if !p.is_empty() => Ok(p.to_string()),
        _ => Err(LbError::ValidationError(format!(
            "{} requests need a parent id",
            kind
        ))),
    }
}

/// JSON key wrapping a single object of this kind.
pub fn envelope_key(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::LoadBalancer => "loadbalancer",
        ResourceKind::Listener => "listener",
        ResourceKind::Pool => "pool",
        ResourceKind::Monitor => "healthmonitor",
        ResourceKind::Member => "member",
        ResourceKind::L7Policy => "l7policy",
        ResourceKind::L7Rule => "rule",
    }
}

/// Fields the API refuses on update.
pub fn immutable_fields(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::LoadBalancer => &["vip_subnet_id", "vip_address", "availability_zone"],
        ResourceKind::Listener => &["loadbalancer_id", "protocol", "protocol_port"],
        ResourceKind::Pool => &["loadbalancer_id", "listener_id", "protocol"],
        ResourceKind::Monitor => &["pool_id", "type"],
        ResourceKind::Member => &["address", "protocol_port", "subnet_id"],
        ResourceKind::L7Policy => &["listener_id"],
        ResourceKind::L7Rule => &[],
    }
}

pub fn wrap(kind: ResourceKind, body: Value) -> Value {
    let mut map = Map::new();
    map.insert(envelope_key(kind).to_string(), body);
    Value::Object(map)
}

pub fn unwrap(kind: ResourceKind, mut response: Value) -> Result<Value> {
    response
        .get_mut(envelope_key(kind))
        .map(Value::take)
        .ok_or_else(|| {
            LbError::InvalidResponse(format!(
                "response has no '{}' object",
                envelope_key(kind)
            ))
        })
}

pub fn decode(kind: ResourceKind, response: Value, parent: Option<&str>) -> Result<ResourceObject> {
    let body = unwrap(kind, response)?;
    Ok(ResourceObject::from_json(kind, body)?.with_parent(parent))
}

pub async fn fetch_object(
    transport: &HttpTransport,
    layout: &ApiLayout,
    key: &ResourceKey,
) -> Result<ResourceObject> {
    let response = transport.get(&layout.object_path(key)?, key).await?;
    decode(key.kind, response, key.parent_id.as_deref())
}

pub async fn fetch_status_tree(
    transport: &HttpTransport,
    layout: &ApiLayout,
    lb_id: &str,
) -> Result<StatusTree> {
    let key = ResourceKey::load_balancer(lb_id);
    let response = transport.get(&layout.status_path(lb_id), &key).await?;
    let envelope: StatusTreeEnvelope = if response.is_null() {
        StatusTreeEnvelope::default()
    } else {
        serde_json::from_value(response)?
    };
    Ok(StatusTree::from_envelope(envelope))
}

pub async fn list_load_balancers(
    transport: &HttpTransport,
    layout: &ApiLayout,
) -> Result<Vec<LoadBalancer>> {
    let key = ResourceKey::load_balancer("*");
    let path = layout.collection_path(ResourceKind::LoadBalancer, None)?;
    let mut response = transport.get(&path, &key).await?;
    let items = response
        .get_mut("loadbalancers")
        .map(Value::take)
        .unwrap_or(Value::Array(Vec::new()));
    if items.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(items)?)
}

pub async fn create_object(
    transport: &HttpTransport,
    layout: &ApiLayout,
    spec: &ResourceSpec,
    body: Value,
) -> Result<ResourceObject> {
    let kind = spec.kind();
    let parent = spec.path_parent();
    let path = layout.collection_path(kind, parent)?;
    let subject = match parent {
        Some(p) => ResourceKey::with_parent(kind, "<new>", p),
        None => ResourceKey::new(kind, "<new>"),
    };
    let response = transport.post(&path, &wrap(kind, body), &subject).await?;
    decode(kind, response, parent)
}

pub async fn update_object(
    transport: &HttpTransport,
    layout: &ApiLayout,
    key: &ResourceKey,
    mut body: Value,
) -> Result<ResourceObject> {
    if let Value::Object(map) = &mut body {
        for field in immutable_fields(key.kind) {
            map.remove(*field);
        }
    }
    let response = transport
        .put(&layout.object_path(key)?, &wrap(key.kind, body), key)
        .await?;
    decode(key.kind, response, key.parent_id.as_deref())
}

pub async fn delete_object(
    transport: &HttpTransport,
    layout: &ApiLayout,
    key: &ResourceKey,
) -> Result<()> {
    transport.delete(&layout.object_path(key)?, key).await
}
