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

/// Environment variables
pub const CONF_FILE_ENV: &str = "LB_RECONCILER_CONF_FILE";
pub const AUTH_TOKEN_ENV: &str = "OS_AUTH_TOKEN";
pub const ENDPOINT_ENV: &str = "OS_LOADBALANCER_ENDPOINT";

/// HTTP
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
pub const USER_AGENT: &str = "lb-reconciler";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Modern (Octavia) API layout
pub const OCTAVIA_PREFIX: &str = "v2/lbaas";
pub const OCTAVIA_STATUS_SUFFIX: &str = "status";

/// Legacy (Neutron LBaaS v2 extension) API layout
pub const NEUTRON_PREFIX: &str = "v2.0/lbaas";
pub const NEUTRON_STATUS_SUFFIX: &str = "statuses";

/// Wait defaults
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_WAIT_DELAY_SECS: u64 = 1;
pub const DEFAULT_MIN_POLL_INTERVAL_SECS: u64 = 1;
pub const DEFAULT_RETRY_INTERVAL_SECS: u64 = 2;
pub const MAX_POLL_INTERVAL_SECS: u64 = 10;

/// Slow-path enumeration concurrency when searching for an L7 policy owner
pub const LOCATOR_SCAN_CONCURRENCY: usize = 4;

/// HTTP statuses worth re-issuing a mutation for
pub const RETRYABLE_HTTP_STATUSES: [u16; 3] = [409, 500, 503];
