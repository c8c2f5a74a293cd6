// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application routes and render/redirect decisions.

pub mod authorizer;
pub mod navigator;

pub use authorizer::{AuthState, RouteAuthorizer};
pub use navigator::{MemoryNavigator, Navigator};

use serde::Serialize;

use crate::models::RaceId;

/// Path constants.
pub mod paths {
    use crate::models::RaceId;

    pub const LOGIN: &str = "/login";
    pub const FORGOT_PASSWORD: &str = "/forgot-password";
    pub const RESET_PASSWORD: &str = "/reset-password";
    /// Home with the race picker
    pub const HOME: &str = "/home";
    pub const RACE: &str = "/race";
    pub const PROFILE: &str = "/profile";
    pub const ADMIN: &str = "/admin";

    /// Race-scoped map view.
    pub fn race_map(id: &RaceId) -> String {
        format!("{}/{}/map", RACE, urlencoding::encode(id.as_str()))
    }
}

/// Who may see a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Auth forms; only shown to signed-out users
    Anonymous,
    Authenticated,
    Admin,
}

/// Something the UI can render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Neutral placeholder while the session is being checked
    Loading,
    Login,
    ForgotPassword,
    ResetPassword { token: Option<String> },
    Home,
    /// Race-scoped home; resolves to the active race
    RaceHome,
    RaceMap(RaceId),
    /// Shown in place of a race-scoped page when there is no race context
    RacePicker,
    Profile,
    Admin,
}

impl Page {
    /// Map a URL path to a page. Query strings and trailing slashes are
    /// ignored; `None` means the path is unknown.
    pub fn from_path(path: &str) -> Option<Page> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let page = match segments.as_slice() {
            ["login"] => Page::Login,
            ["forgot-password"] => Page::ForgotPassword,
            ["reset-password"] => Page::ResetPassword { token: None },
            ["reset-password", token] => Page::ResetPassword {
                token: Some(decode_segment(token)?),
            },
            ["home"] => Page::Home,
            ["race"] => Page::RaceHome,
            ["race", id] | ["race", id, "map"] => Page::RaceMap(RaceId::new(decode_segment(id)?)),
            ["profile"] => Page::Profile,
            ["admin", ..] => Page::Admin,
            _ => return None,
        };
        Some(page)
    }

    pub fn access(&self) -> Access {
        match self {
            Page::Login | Page::ForgotPassword | Page::ResetPassword { .. } => Access::Anonymous,
            Page::Admin => Access::Admin,
            Page::Loading
            | Page::Home
            | Page::RaceHome
            | Page::RaceMap(_)
            | Page::RacePicker
            | Page::Profile => Access::Authenticated,
        }
    }
}

fn decode_segment(segment: &str) -> Option<String> {
    let decoded = urlencoding::decode(segment).ok()?.into_owned();
    (!decoded.trim().is_empty()).then_some(decoded)
}

/// What the routing layer should do for a requested path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteDecision {
    Render { page: Page },
    Redirect { to: String, replace: bool },
}

impl RouteDecision {
    pub fn render(page: Page) -> Self {
        RouteDecision::Render { page }
    }

    /// Redirects from guards replace the history entry so "back" does not
    /// bounce the user into the same redirect.
    pub fn redirect(to: impl Into<String>) -> Self {
        RouteDecision::Redirect {
            to: to.into(),
            replace: true,
        }
    }

    pub fn page(&self) -> Option<&Page> {
        match self {
            RouteDecision::Render { page } => Some(page),
            RouteDecision::Redirect { .. } => None,
        }
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            RouteDecision::Redirect { to, .. } => Some(to),
            RouteDecision::Render { .. } => None,
        }
    }
}
