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

//! Retry decorator for mutating calls that can race the backend's own
//! provisioning.

use crate::infrastructure::constants::RETRYABLE_HTTP_STATUSES;
use crate::shared::error::{LbError, Result};
use backon::{ConstantBuilder, Retryable};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// True when re-issuing the same call may succeed: the aggregate is busy
/// (409) or the API hiccuped (500, 503).
pub fn is_retryable(err: &LbError) -> bool {
    err.http_status()
        .is_some_and(|status| RETRYABLE_HTTP_STATUSES.contains(&status))
}

/// Turns a not-found answer to a delete into success.
pub fn check_deleted(result: Result<()>) -> Result<()> {
    match result {
        Err(LbError::NotFound { .. }) => Ok(()),
        other => other,
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total time the call may keep being re-issued.
    pub budget: Duration,
    pub interval: Duration,
    pub cancel: Option<CancellationToken>,
}

/// Runs `op`, re-issuing it every `policy.interval` while `classify` says
/// the error is worth another attempt. Terminal errors come back at once;
/// running out of budget yields `Timeout` carrying the last error seen.
pub async fn retry_mutation<T, F, Fut, C>(
    subject: &str,
    policy: &RetryPolicy,
    classify: C,
    op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    C: Fn(&LbError) -> bool,
{
    let last_error: Mutex<Option<String>> = Mutex::new(None);

    let attempts = op
        .retry(
            ConstantBuilder::default()
                .with_delay(policy.interval)
                .with_max_times(usize::MAX),
        )
        .sleep(tokio::time::sleep)
        .when(|e: &LbError| classify(e))
        .notify(|e: &LbError, dur: Duration| {
            warn!("{} failed: {}, retrying in {:?}", subject, e, dur);
            if let Ok(mut slot) = last_error.lock() {
                *slot = Some(e.to_string());
            }
        });

    let cancelled = async {
        match &policy.cancel {
            Some(token) => token.cancelled().await,
            None => std::future::pending::<()>().await,
        }
    };

    let outcome = tokio::select! {
        biased;
        _ = cancelled => Err(LbError::Cancelled(subject.to_string())),
        res = tokio::time::timeout(policy.budget, attempts) => Ok(res),
    };

    match outcome? {
        Ok(result) => result,
        Err(_) => {
            let last_status = last_error
                .lock()
                .ok()
                .and_then(|slot| slot.clone())
                .unwrap_or_else(|| "no response".to_string());
            Err(LbError::Timeout {
                subject: subject.to_string(),
                target: "accepted".to_string(),
                last_status,
                timeout: policy.budget,
            })
        }
    }
}
