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

//! Type definitions for the reconciler configuration file

use crate::domain::reconciler::WaitSettings;
use crate::infrastructure::constants::{
    AUTH_TOKEN_ENV, DEFAULT_MIN_POLL_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RETRY_INTERVAL_SECS, DEFAULT_WAIT_DELAY_SECS, DEFAULT_WAIT_TIMEOUT_SECS, ENDPOINT_ENV,
};
use crate::shared::error::{LbError, Result};
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::time::Duration;

// ============================================================================
// Main configuration
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConf {
    pub cloud: CloudConf,
    pub wait: WaitConf,
}

impl ReconcilerConf {
    /// Load configuration from TOML file
    pub fn from<T: AsRef<str>>(path: T) -> Result<Self> {
        let content = read_to_string(path.as_ref()).map_err(|e| {
            LbError::config_error(format!(
                "Failed to read config file {}: {}",
                path.as_ref(),
                e
            ))
        })?;

        let conf: Self = toml::from_str(&content)?;
        Ok(conf)
    }

    /// Fills endpoint and token from the environment when the file left
    /// them empty.
    pub fn apply_env(&mut self) {
        if self.cloud.endpoint.is_empty() {
            if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
                self.cloud.endpoint = endpoint;
            }
        }
        if self.cloud.token.is_none() {
            self.cloud.token = std::env::var(AUTH_TOKEN_ENV).ok();
        }
    }

    pub fn wait_settings(&self) -> Result<WaitSettings> {
        self.wait.settings()
    }
}

// ============================================================================
// Cloud endpoint
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConf {
    pub endpoint: String,
    pub token: Option<String>,
    /// Modern backend when true, legacy networking extension otherwise.
    pub use_octavia: bool,
    pub request_timeout: String,
}

impl Default for CloudConf {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            token: None,
            use_octavia: true,
            request_timeout: format!("{}s", DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl CloudConf {
    pub fn request_timeout(&self) -> Result<Duration> {
        parse_duration_string(&self.request_timeout)
    }
}

// ============================================================================
// Wait behaviour
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConf {
    pub timeout: String,
    pub delay: String,
    pub min_interval: String,
    pub retry_interval: String,
}

impl Default for WaitConf {
    fn default() -> Self {
        Self {
            timeout: format!("{}s", DEFAULT_WAIT_TIMEOUT_SECS),
            delay: format!("{}s", DEFAULT_WAIT_DELAY_SECS),
            min_interval: format!("{}s", DEFAULT_MIN_POLL_INTERVAL_SECS),
            retry_interval: format!("{}s", DEFAULT_RETRY_INTERVAL_SECS),
        }
    }
}

impl WaitConf {
    pub fn settings(&self) -> Result<WaitSettings> {
        Ok(WaitSettings {
            timeout: parse_duration_string(&self.timeout)?,
            delay: parse_duration_string(&self.delay)?,
            min_interval: parse_duration_string(&self.min_interval)?,
            retry_interval: parse_duration_string(&self.retry_interval)?,
        })
    }
}

// ============================================================================
// Utility functions
// ============================================================================

/// Parse duration string like "10m", "30s", "500ms", "1h". A bare number is seconds.
pub fn parse_duration_string(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();

    let (num_str, unit_ms) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1u64)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1000)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60 * 1000)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 60 * 60 * 1000)
    } else {
        (s.as_str(), 1000)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| LbError::config_error(format!("Invalid duration string: {}", s)))?;

    let millis = num
        .checked_mul(unit_ms)
        .ok_or_else(|| LbError::config_error(format!("Duration out of range: {}", s)))?;
    Ok(Duration::from_millis(millis))
}
