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

//! Bounded polling loop.
//!
//! A [`Waiter`] calls a refresh function until it reports the target status,
//! fails, times out or is cancelled. The first call happens after an initial
//! delay; later calls are spaced by an interval that starts at the minimum
//! interval and doubles up to a ceiling, never sleeping past the deadline.

use crate::domain::model::ProvisioningStatus;
use crate::infrastructure::constants::{
    DEFAULT_MIN_POLL_INTERVAL_SECS, DEFAULT_RETRY_INTERVAL_SECS, DEFAULT_WAIT_DELAY_SECS,
    DEFAULT_WAIT_TIMEOUT_SECS, MAX_POLL_INTERVAL_SECS,
};
use crate::shared::error::{LbError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Timing knobs shared by every wait and retry of one reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    pub timeout: Duration,
    pub delay: Duration,
    pub min_interval: Duration,
    pub retry_interval: Duration,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
            delay: Duration::from_secs(DEFAULT_WAIT_DELAY_SECS),
            min_interval: Duration::from_secs(DEFAULT_MIN_POLL_INTERVAL_SECS),
            retry_interval: Duration::from_secs(DEFAULT_RETRY_INTERVAL_SECS),
        }
    }
}

/// How a successful wait ended.
#[derive(Debug, Clone, PartialEq)]
pub enum WaitOutcome<T> {
    /// The refresh function reported the target status.
    Reached(T),
    /// The object is gone and the target was `DELETED`.
    Gone,
}

#[derive(Debug, Clone)]
pub struct Waiter {
    subject: String,
    target: ProvisioningStatus,
    pending: Vec<ProvisioningStatus>,
    timeout: Duration,
    delay: Duration,
    min_interval: Duration,
    cancel: Option<CancellationToken>,
}

impl Waiter {
    pub fn new(
        subject: impl Into<String>,
        target: ProvisioningStatus,
        pending: Vec<ProvisioningStatus>,
        timeout: Duration,
    ) -> Self {
        Self {
            subject: subject.into(),
            target,
            pending,
            timeout,
            delay: Duration::from_secs(DEFAULT_WAIT_DELAY_SECS),
            min_interval: Duration::from_secs(DEFAULT_MIN_POLL_INTERVAL_SECS),
            cancel: None,
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// Takes delay and minimum interval from `settings`. The timeout stays
    /// the one given to [`Waiter::new`].
    pub fn settings(self, settings: &WaitSettings) -> Self {
        self.delay(settings.delay).min_interval(settings.min_interval)
    }

    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn target(&self) -> &ProvisioningStatus {
        &self.target
    }

    /// Polls `refresh` until it settles.
    ///
    /// `refresh` returns the observed object and its status. A not-found
    /// error is success when the target is `DELETED` and a failure
    /// otherwise. An empty status counts as still pending; any other status
    /// outside the pending set ends the wait with `UnexpectedStatus`.
    pub async fn wait<T, F, Fut>(&self, mut refresh: F) -> Result<WaitOutcome<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(T, ProvisioningStatus)>>,
    {
        let deadline = Instant::now() + self.timeout;
        let ceiling = Duration::from_secs(MAX_POLL_INTERVAL_SECS).max(self.min_interval);
        let mut interval = self.min_interval;
        let mut last = ProvisioningStatus::default();

        debug!(
            "Waiting up to {:?} for {} to become {}",
            self.timeout, self.subject, self.target
        );

        if !self.delay.is_zero() {
            self.guard(deadline, &last, sleep(self.delay)).await?;
        }

        loop {
            if Instant::now() >= deadline {
                return Err(self.timed_out(&last));
            }
            match self.guard(deadline, &last, refresh()).await? {
                Err(e) if e.is_not_found() && self.target == ProvisioningStatus::Deleted => {
                    debug!("{} is gone", self.subject);
                    return Ok(WaitOutcome::Gone);
                }
                Err(e) => return Err(e),
                Ok((value, status)) => {
                    if status == self.target {
                        debug!("{} reached {}", self.subject, status);
                        return Ok(WaitOutcome::Reached(value));
                    }
                    if !status.is_empty() && !self.pending.contains(&status) {
                        return Err(LbError::UnexpectedStatus {
                            subject: self.subject.clone(),
                            target: self.target.to_string(),
                            status: status.to_string(),
                        });
                    }
                    debug!("{} is {}, still waiting for {}", self.subject, status, self.target);
                    last = status;
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(self.timed_out(&last));
            }
            self.guard(deadline, &last, sleep(interval.min(deadline - now)))
                .await?;
            interval = (interval * 2).min(ceiling);
        }
    }

    /// Runs `fut` until it completes, the deadline passes or the token fires.
    async fn guard<O>(
        &self,
        deadline: Instant,
        last: &ProvisioningStatus,
        fut: impl Future<Output = O>,
    ) -> Result<O> {
        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(LbError::Cancelled(format!(
                "wait for {} to become {} (last status: {})",
                self.subject, self.target, last
            ))),
            res = timeout_at(deadline, fut) => res.map_err(|_| self.timed_out(last)),
        }
    }

    fn timed_out(&self, last: &ProvisioningStatus) -> LbError {
        LbError::Timeout {
            subject: self.subject.clone(),
            target: self.target.to_string(),
            last_status: last.to_string(),
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{pending_delete_statuses, pending_statuses};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn active_waiter(timeout: Duration) -> Waiter {
        Waiter::new(
            "pool 'p1'",
            ProvisioningStatus::Active,
            pending_statuses(),
            timeout,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_deleted_target_not_found_is_gone() {
        let calls = AtomicUsize::new(0);
        let waiter = Waiter::new(
            "pool 'p1'",
            ProvisioningStatus::Deleted,
            pending_delete_statuses(),
            Duration::from_secs(60),
        );

        let outcome = waiter
            .wait(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<((), ProvisioningStatus), _>(LbError::not_found("pool", "p1")) }
            })
            .await
            .unwrap();

        assert_eq!(outcome, WaitOutcome::Gone);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_fails_when_target_is_active() {
        let waiter = active_waiter(Duration::from_secs(60));
        let err = waiter
            .wait(|| async { Err::<((), ProvisioningStatus), _>(LbError::not_found("pool", "p1")) })
            .await
            .unwrap_err();
        assert!(matches!(err, LbError::NotFound { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaches_target_after_pending_ticks() {
        let calls = AtomicUsize::new(0);
        let waiter = active_waiter(Duration::from_secs(60));

        let outcome = waiter
            .wait(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    let status = if n < 3 {
                        ProvisioningStatus::PendingCreate
                    } else {
                        ProvisioningStatus::Active
                    };
                    Ok((n, status))
                }
            })
            .await
            .unwrap();

        assert_eq!(outcome, WaitOutcome::Reached(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_pending_times_out_within_one_interval() {
        let timeout = Duration::from_secs(30);
        let min_interval = Duration::from_secs(1);
        let waiter = active_waiter(timeout).min_interval(min_interval);
        let start = Instant::now();

        let err = waiter
            .wait(|| async { Ok(((), ProvisioningStatus::PendingUpdate)) })
            .await
            .unwrap_err();

        let elapsed = start.elapsed();
        match err {
            LbError::Timeout { last_status, .. } => assert_eq!(last_status, "PENDING_UPDATE"),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(elapsed >= timeout);
        assert!(elapsed <= timeout + min_interval);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_refresh_once_deadline_reached() {
        let calls = AtomicUsize::new(0);
        let interval = Duration::from_secs(5);
        let waiter = active_waiter(interval)
            .delay(Duration::ZERO)
            .min_interval(interval);

        let err = waiter
            .wait(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(((), ProvisioningStatus::PendingCreate)) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, LbError::Timeout { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_is_terminal() {
        let calls = AtomicUsize::new(0);
        let waiter = active_waiter(Duration::from_secs(60));
        let err = waiter
            .wait(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<((), ProvisioningStatus), _>(LbError::Transport("reset".into())) }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LbError::Transport(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_outside_pending_set_fails() {
        let waiter = active_waiter(Duration::from_secs(60));
        let err = waiter
            .wait(|| async { Ok(((), ProvisioningStatus::Error)) })
            .await
            .unwrap_err();
        match err {
            LbError::UnexpectedStatus { status, target, .. } => {
                assert_eq!(status, "ERROR");
                assert_eq!(target, "ACTIVE");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_status_keeps_polling() {
        let calls = AtomicUsize::new(0);
        let waiter = active_waiter(Duration::from_secs(60));
        let outcome = waiter
            .wait(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    let status = if n == 0 {
                        ProvisioningStatus::default()
                    } else {
                        ProvisioningStatus::Active
                    };
                    Ok(((), status))
                }
            })
            .await
            .unwrap();
        assert_eq!(outcome, WaitOutcome::Reached(()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_aborts_wait() {
        let token = CancellationToken::new();
        let waiter = active_waiter(Duration::from_secs(600)).cancel_on(token.clone());

        let trigger = token.clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(5)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let err = waiter
            .wait(|| async { Ok(((), ProvisioningStatus::PendingCreate)) })
            .await
            .unwrap_err();
        assert!(matches!(err, LbError::Cancelled(_)));
        assert!(start.elapsed() < Duration::from_secs(600));
    }
}
