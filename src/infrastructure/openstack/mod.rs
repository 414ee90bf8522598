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

//! HTTP backends for the two load-balancer APIs

pub mod backend;
pub mod layout;
pub mod neutron;
pub mod octavia;
pub mod selector;
pub mod transport;

pub use self::backend::{BackendKind, LoadBalancerBackend};
pub use self::neutron::NeutronBackend;
pub use self::octavia::OctaviaBackend;
pub use self::selector::{backend_from_conf, choose_backend, choose_backend_kind};
pub use self::transport::HttpTransport;
