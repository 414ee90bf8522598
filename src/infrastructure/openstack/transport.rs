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

use crate::domain::config::CloudConf;
use crate::domain::model::ResourceKey;
use crate::infrastructure::constants::{AUTH_TOKEN_HEADER, USER_AGENT};
use crate::shared::error::{LbError, Result};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::debug;

/// Thin JSON-over-HTTP client shared by both backends.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(conf: &CloudConf) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(conf.request_timeout()?)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LbError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: conf.endpoint.trim_end_matches('/').to_string(),
            token: conf.token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str, subject: &ResourceKey) -> Result<Value> {
        self.send(Method::GET, path, None, subject).await
    }

    pub async fn post(&self, path: &str, body: &Value, subject: &ResourceKey) -> Result<Value> {
        self.send(Method::POST, path, Some(body), subject).await
    }

    pub async fn put(&self, path: &str, body: &Value, subject: &ResourceKey) -> Result<Value> {
        self.send(Method::PUT, path, Some(body), subject).await
    }

    pub async fn delete(&self, path: &str, subject: &ResourceKey) -> Result<()> {
        self.send(Method::DELETE, path, None, subject).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        subject: &ResourceKey,
    ) -> Result<Value> {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if let Some(token) = &self.token {
            request = request.header(AUTH_TOKEN_HEADER, token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(map_status(status, &text, subject));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Maps a non-2xx response to the error taxonomy.
pub fn map_status(status: StatusCode, body: &str, subject: &ResourceKey) -> LbError {
    let message = fault_message(body);
    match status {
        StatusCode::NOT_FOUND => LbError::not_found(subject.kind.as_str(), subject.id.clone()),
        StatusCode::CONFLICT => LbError::Conflict {
            resource_type: subject.kind.to_string(),
            id: subject.id.clone(),
            message,
        },
        other => LbError::Api {
            status: other.as_u16(),
            message: format!("{}: {}", subject, message),
        },
    }
}

/// Pulls a human message out of the usual fault envelopes.
fn fault_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.get("faultstring")
                .or_else(|| v.get("NeutronError").and_then(|e| e.get("message")))
                .or_else(|| v.get("description"))
                .or_else(|| v.get("message"))
        })
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ResourceKind;

    #[test]
    fn test_map_status_taxonomy() {
        let key = ResourceKey::new(ResourceKind::Pool, "p1");
        assert!(map_status(StatusCode::NOT_FOUND, "", &key).is_not_found());

        let conflict = map_status(
            StatusCode::CONFLICT,
            r#"{"faultstring": "Load Balancer lb1 is immutable"}"#,
            &key,
        );
        match conflict {
            LbError::Conflict { message, .. } => assert!(message.contains("immutable")),
            other => panic!("unexpected {:?}", other),
        }

        let api = map_status(StatusCode::SERVICE_UNAVAILABLE, "busy", &key);
        assert_eq!(api.http_status(), Some(503));
    }

    #[test]
    fn test_fault_message_neutron_envelope() {
        let body = r#"{"NeutronError": {"message": "Invalid state PENDING_UPDATE"}}"#;
        assert_eq!(fault_message(body), "Invalid state PENDING_UPDATE");
        assert_eq!(fault_message("plain text"), "plain text");
    }
}
