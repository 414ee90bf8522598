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
use crate::shared::error::{LbError, Result};
use regex::Regex;

const RESOURCE_ID_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_-]{0,63}$";

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(conf: &ReconcilerConf) -> Result<()> {
        Self::validate_endpoint(&conf.cloud.endpoint)?;
        conf.cloud.request_timeout()?;

        let wait = conf.wait_settings()?;
        if wait.timeout.is_zero() {
            return Err(LbError::ValidationError(
                "wait.timeout must be greater than zero".to_string(),
            ));
        }
        if wait.min_interval.is_zero() {
            return Err(LbError::ValidationError(
                "wait.min_interval must be greater than zero".to_string(),
            ));
        }
        if wait.min_interval > wait.timeout || wait.delay > wait.timeout {
            return Err(LbError::ValidationError(format!(
                "wait intervals (delay {:?}, min_interval {:?}) cannot exceed wait.timeout {:?}",
                wait.delay, wait.min_interval, wait.timeout
            )));
        }
        Ok(())
    }

    pub fn validate_endpoint(endpoint: &str) -> Result<()> {
        if endpoint.is_empty() {
            return Err(LbError::ValidationError(
                "cloud.endpoint is required (config file, -Dcloud.endpoint or OS_LOADBALANCER_ENDPOINT)"
                    .to_string(),
            ));
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(LbError::ValidationError(format!(
                "cloud.endpoint must be an http(s) URL, got '{}'",
                endpoint
            )));
        }
        Ok(())
    }

    pub fn validate_resource_id(id: &str) -> Result<()> {
        let re = Regex::new(RESOURCE_ID_PATTERN)
            .map_err(|e| LbError::ValidationError(format!("Invalid id pattern: {}", e)))?;
        if re.is_match(id) {
            Ok(())
        } else {
            Err(LbError::ValidationError(format!(
                "'{}' is not a valid resource id",
                id
            )))
        }
    }
}
