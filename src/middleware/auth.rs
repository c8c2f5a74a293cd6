// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication guard for views.
//!
//! Every navigation goes through [`require_auth`]. Protected pages come back
//! as a [`ProtectedView`], which owns the session monitor for as long as the
//! page is mounted.

use std::sync::Arc;

use super::race_scope::scope_to_race;
use crate::routes::{Access, Page, RouteAuthorizer, RouteDecision};
use crate::services::session_monitor::{MonitorHandle, SessionMonitor};
use crate::AppState;

/// A mounted protected page.
///
/// Session monitoring runs exactly as long as this value lives.
#[derive(Debug)]
pub struct ProtectedView {
    page: Page,
    monitor: MonitorHandle,
}

impl ProtectedView {
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitor.is_running()
    }

    /// Resolve once the session monitor has ended the session.
    pub async fn wait_for_session_end(&mut self) {
        self.monitor.finished().await;
    }

    /// Unmount the view, releasing its monitor.
    pub fn unmount(self) {
        self.monitor.stop();
    }
}

/// Result of mounting a path.
#[derive(Debug)]
pub enum Mount {
    /// A protected page, monitored while mounted
    Protected(ProtectedView),
    /// An auth form or the loading placeholder; not monitored
    Public(Page),
    /// Navigation was redirected
    Redirected(String),
}

impl Mount {
    pub fn page(&self) -> Option<&Page> {
        match self {
            Mount::Protected(view) => Some(view.page()),
            Mount::Public(page) => Some(page),
            Mount::Redirected(_) => None,
        }
    }
}

/// Authorize `path` and mount the result.
///
/// Must be called from within a Tokio runtime: protected pages start the
/// session monitor.
pub fn require_auth(state: &Arc<AppState>, authorizer: &mut RouteAuthorizer, path: &str) -> Mount {
    let session = state.auth.session_state();
    let decision = authorizer.authorize(&session, path);
    let decision = scope_to_race(decision, &state.context().snapshot());

    match decision {
        RouteDecision::Redirect { to, replace } => {
            tracing::debug!(from = path, to = %to, "Route redirect");
            state.auth.navigator().navigate(&to, replace);
            Mount::Redirected(to)
        }
        RouteDecision::Render { page } if page == Page::Loading => Mount::Public(page),
        RouteDecision::Render { page } if page.access() == Access::Anonymous => Mount::Public(page),
        RouteDecision::Render { page } => {
            let monitor =
                SessionMonitor::start(state.auth.clone(), state.config.session_check_interval());
            Mount::Protected(ProtectedView { page, monitor })
        }
    }
}
