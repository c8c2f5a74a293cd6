// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Periodic session re-validation.
//!
//! While a protected view is mounted, the stored access token is re-checked
//! on a fixed interval so that an expired session is noticed without a page
//! reload. The monitor is a Tokio task owned by a [`MonitorHandle`]: dropping
//! the handle (unmounting the view) aborts it, so no timers outlive their
//! view.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::auth::{AuthService, LogoutReason};
use super::token::TokenStatus;

/// What a single check concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Token still valid; keep monitoring
    Valid,
    /// No token, and there never was one while monitoring
    NoSession,
    /// Session ended; logout was triggered
    LoggedOut,
    /// Session ended but the store could not be cleared; monitoring goes on
    LogoutFailed,
}

/// Session re-validation loop.
pub struct SessionMonitor {
    auth: Arc<AuthService>,
    /// Whether a token has been seen since the monitor started
    seen_token: bool,
}

impl SessionMonitor {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self {
            auth,
            seen_token: false,
        }
    }

    /// Run one validity check, logging out if the session has ended.
    ///
    /// An absent token only counts as "ended" if one was present at an
    /// earlier check.
    pub fn check(&mut self) -> CheckOutcome {
        let status = self.auth.token_status();
        tracing::debug!(?status, "Session check");

        let ended = match status {
            TokenStatus::Valid => {
                self.seen_token = true;
                return CheckOutcome::Valid;
            }
            TokenStatus::Expired | TokenStatus::Malformed => true,
            TokenStatus::Missing => self.seen_token,
        };

        if !ended {
            return CheckOutcome::NoSession;
        }

        match self.auth.logout(LogoutReason::Expired) {
            Ok(_) => CheckOutcome::LoggedOut,
            Err(e) => {
                tracing::error!(error = %e, "Expiry logout failed, retrying on next check");
                CheckOutcome::LogoutFailed
            }
        }
    }

    /// Spawn the monitor: check now, then every `interval`.
    ///
    /// The task ends by itself after triggering a logout.
    pub fn start(auth: Arc<AuthService>, interval: Duration) -> MonitorHandle {
        let mut monitor = SessionMonitor::new(auth);

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // First tick completes immediately
                ticker.tick().await;
                if monitor.check() == CheckOutcome::LoggedOut {
                    tracing::info!("Session monitor stopped after logout");
                    break;
                }
            }
        });

        tracing::debug!(interval_secs = interval.as_secs(), "Session monitor started");
        MonitorHandle { task: Some(task) }
    }
}

/// Owns the monitor task. Dropping it stops monitoring.
#[derive(Debug)]
pub struct MonitorHandle {
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Whether the monitor task is still scheduled.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Wait until the monitor task ends by itself (after a logout).
    ///
    /// Cancel safe: dropping the future leaves the task running.
    pub async fn finished(&mut self) {
        if let Some(task) = self.task.as_mut() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Session monitor task ended abnormally");
            }
            self.task = None;
        }
    }

    /// Stop monitoring.
    pub fn stop(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Session monitor released");
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.release();
    }
}
