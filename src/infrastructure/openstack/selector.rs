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
use super::neutron::NeutronBackend;
use super::octavia::OctaviaBackend;
use super::transport::HttpTransport;
use crate::domain::config::CloudConf;
use crate::shared::error::Result;
use std::sync::Arc;

/// Picks the backend for a deployment from its capability flag.
pub fn choose_backend_kind(use_octavia: bool) -> BackendKind {
    if use_octavia {
        BackendKind::Octavia
    } else {
        BackendKind::Neutron
    }
}

/// Builds the selected backend once; everything downstream holds the handle.
pub fn choose_backend(use_octavia: bool, transport: HttpTransport) -> Arc<dyn LoadBalancerBackend> {
    match choose_backend_kind(use_octavia) {
        BackendKind::Octavia => Arc::new(OctaviaBackend::new(transport)),
        BackendKind::Neutron => Arc::new(NeutronBackend::new(transport)),
    }
}

pub fn backend_from_conf(conf: &CloudConf) -> Result<Arc<dyn LoadBalancerBackend>> {
    let transport = HttpTransport::new(conf)?;
    Ok(choose_backend(conf.use_octavia, transport))
}
