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

use crate::domain::config::ReconcilerConf;
use std::collections::HashMap;
use tracing::warn;

/// Applies `-D key=value` overrides on top of the loaded configuration.
pub fn apply_to_conf(configs: &HashMap<String, String>, conf: &mut ReconcilerConf) {
    if let Some(endpoint) = configs.get("cloud.endpoint") {
        conf.cloud.endpoint = endpoint.clone();
    }

    if let Some(token) = configs.get("cloud.token") {
        conf.cloud.token = Some(token.clone());
    }

    if let Some(flag) = configs.get("cloud.use-octavia") {
        match flag.parse::<bool>() {
            Ok(value) => conf.cloud.use_octavia = value,
            Err(_) => warn!("Ignoring cloud.use-octavia={}: not a boolean", flag),
        }
    }

    if let Some(timeout) = configs.get("cloud.request-timeout") {
        conf.cloud.request_timeout = timeout.clone();
    }

    if let Some(timeout) = configs.get("wait.timeout") {
        conf.wait.timeout = timeout.clone();
    }

    if let Some(delay) = configs.get("wait.delay") {
        conf.wait.delay = delay.clone();
    }

    if let Some(interval) = configs.get("wait.min-interval") {
        conf.wait.min_interval = interval.clone();
    }

    if let Some(interval) = configs.get("wait.retry-interval") {
        conf.wait.retry_interval = interval.clone();
    }
}

/// Parses `key=value` pairs as given on the command line.
pub fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>, String> {
    let mut map = HashMap::new();
    for config in configs {
        let (key, value) = config
            .split_once('=')
            .ok_or_else(|| format!("Invalid property '{}', expected key=value", config))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("Invalid property '{}', empty key", config));
        }
        map.insert(key.to_string(), value.trim().to_string());
    }
    Ok(map)
}
