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

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LbError>;

#[derive(Error, Debug)]
pub enum LbError {
    #[error("Resource not found: {resource_type} '{id}'")]
    NotFound { resource_type: String, id: String },

    #[error("Unable to find the load balancer owning {resource_type} '{id}'")]
    OwnerNotFound { resource_type: String, id: String },

    #[error("Conflict on {resource_type} '{id}': {message}")]
    Conflict {
        resource_type: String,
        id: String,
        message: String,
    },

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout after {timeout:?} waiting for {subject} to become {target} (last status: {last_status})")]
    Timeout {
        subject: String,
        target: String,
        last_status: String,
        timeout: Duration,
    },

    #[error("Unexpected status '{status}' for {subject}, wanted {target}")]
    UnexpectedStatus {
        subject: String,
        target: String,
        status: String,
    },

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Field '{field}' is not supported by the {backend} backend")]
    Unsupported { backend: String, field: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for LbError {
    fn from(err: reqwest::Error) -> Self {
        LbError::Transport(err.to_string())
    }
}

impl LbError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    pub fn owner_not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::OwnerNotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    pub fn unsupported(backend: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Unsupported {
            backend: backend.into(),
            field: field.into(),
        }
    }

    /// True when the remote object (or its owner) does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::OwnerNotFound { .. })
    }

    /// HTTP status carried by the error, if it came from an API response.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
