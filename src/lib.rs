// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Racetrack session: session and authorization core for the race tracker
//! client.
//!
//! This crate decides whether the user is signed in, which pages they may
//! open, and which race the race-scoped views operate on.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod store;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use routes::{Navigator, RouteAuthorizer};
use services::{AuthApi, AuthService, TokenValidator};
use session::SessionContext;
use store::{CredentialStore, KeyValueStore};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Wire the core together over the given collaborators.
    ///
    /// The session context starts from whatever enrollments were persisted.
    pub fn new(
        config: Config,
        kv: Arc<dyn KeyValueStore>,
        api: Arc<dyn AuthApi>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let store = CredentialStore::new(kv);
        let context = SessionContext::from_store(&store);
        let auth = Arc::new(AuthService::new(
            store,
            context,
            navigator,
            api,
            TokenValidator::new(config.token_skew_secs),
            config.landing_path.clone(),
        ));
        Self { config, auth }
    }

    pub fn store(&self) -> &CredentialStore {
        self.auth.store()
    }

    pub fn context(&self) -> &SessionContext {
        self.auth.context()
    }

    /// A route authorizer in its initial `Checking` state.
    pub fn authorizer(&self) -> RouteAuthorizer {
        RouteAuthorizer::new(self.config.landing_path.as_str())
    }
}
