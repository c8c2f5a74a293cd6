// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route authorization.
//!
//! A small state machine (`Checking → Authorized | Unauthorized`) decides,
//! for every navigation, whether to render the requested page or redirect.
//! The state is re-derived from a fresh [`SessionState`] each time, so login,
//! logout and expiry all take effect on the next navigation without any
//! extra bookkeeping.

use super::{paths, Access, Navigator, Page, RouteDecision};
use crate::models::{SessionState, UserProfile};

/// Authorization state.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Before the first session check; nothing but a loading view is shown
    Checking,
    Authorized(UserProfile),
    Unauthorized,
}

impl From<&SessionState> for AuthState {
    fn from(session: &SessionState) -> Self {
        match session {
            SessionState::LoggedIn(user) => AuthState::Authorized(user.clone()),
            SessionState::LoggedOut => AuthState::Unauthorized,
        }
    }
}

/// Maps (auth state, role, path) to render or redirect.
#[derive(Debug, Clone)]
pub struct RouteAuthorizer {
    state: AuthState,
    landing_path: String,
}

impl RouteAuthorizer {
    pub fn new(landing_path: impl Into<String>) -> Self {
        Self {
            state: AuthState::Checking,
            landing_path: landing_path.into(),
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    /// Move to the state implied by `session`.
    pub fn update(&mut self, session: &SessionState) {
        let next = AuthState::from(session);
        if next == self.state {
            return;
        }

        match (&self.state, &next) {
            (AuthState::Authorized(user), AuthState::Unauthorized) => {
                tracing::info!(user_id = %user.id, "Session ended, routes locked");
            }
            (_, AuthState::Authorized(user)) => {
                tracing::info!(
                    user_id = %user.id,
                    admin = user.is_administrator,
                    "Session authorized"
                );
            }
            _ => tracing::debug!("Session unauthorized"),
        }
        self.state = next;
    }

    /// Decide what to do with `path` in the current state.
    pub fn decide(&self, path: &str) -> RouteDecision {
        let user = match &self.state {
            AuthState::Checking => return RouteDecision::render(Page::Loading),
            AuthState::Unauthorized => {
                return match Page::from_path(path) {
                    Some(page) if page.access() == Access::Anonymous => {
                        RouteDecision::render(page)
                    }
                    _ => RouteDecision::redirect(paths::LOGIN),
                };
            }
            AuthState::Authorized(user) => user,
        };

        let Some(page) = Page::from_path(path) else {
            return RouteDecision::redirect(self.landing_path.as_str());
        };

        match page.access() {
            Access::Anonymous => RouteDecision::redirect(self.landing_path.as_str()),
            Access::Admin if !user.is_administrator => {
                tracing::warn!(user_id = %user.id, path, "Non-admin denied admin route");
                RouteDecision::redirect(self.landing_path.as_str())
            }
            Access::Admin | Access::Authenticated => RouteDecision::render(page),
        }
    }

    /// Re-evaluate with a fresh session and decide.
    pub fn authorize(&mut self, session: &SessionState, path: &str) -> RouteDecision {
        self.update(session);
        self.decide(path)
    }

    /// Authorize `path` and carry out any redirect through `navigator`.
    pub fn navigate(
        &mut self,
        navigator: &dyn Navigator,
        session: &SessionState,
        path: &str,
    ) -> RouteDecision {
        let decision = self.authorize(session, path);
        if let RouteDecision::Redirect { to, replace } = &decision {
            tracing::debug!(from = path, to = %to, "Route redirect");
            navigator.navigate(to, *replace);
        }
        decision
    }
}
