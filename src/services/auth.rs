// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, logout and password flows.
//!
//! This is the only writer of the credential store and the session context:
//! login writes both (store first, all-or-nothing), logout clears both
//! before redirecting, and everything else reads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use super::api::AuthApi;
use super::race_resolver::{self, Resolution};
use super::token::{TokenStatus, TokenValidator};
use crate::error::{AppError, Result};
use crate::models::{SessionState, UserProfile};
use crate::routes::{paths, Navigator};
use crate::session::SessionContext;
use crate::store::CredentialStore;

/// Login form input.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Forgot-password form input.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordForm {
    #[validate(email)]
    pub email: String,
}

/// Reset-password form input (token comes from the emailed link).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordForm {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub confirm_password: String,
}

/// Tracks whether the view that started a request is still mounted.
///
/// The view keeps the [`ViewScope`]; requests carry a [`Liveness`]. Once the
/// scope is dropped, late completions are ignored.
#[derive(Debug)]
pub struct ViewScope {
    alive: Arc<AtomicBool>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn liveness(&self) -> Liveness {
        Liveness {
            alive: self.alive.clone(),
        }
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

/// Cheap handle telling whether a [`ViewScope`] is still alive.
#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Liveness {
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    UserRequested,
    Expired,
}

/// A completed sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedIn {
    pub user: UserProfile,
    pub resolution: Resolution,
    /// Where navigation went next
    pub landing: String,
}

/// Result of a login attempt that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    SignedIn(SignedIn),
    /// The login view went away before the reply arrived; nothing changed
    Discarded,
}

/// Marks a request in flight; cleared on drop, including on error.
struct PendingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> PendingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::RequestPending)?;
        Ok(Self { flag })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Session flows over the credential store and session context.
pub struct AuthService {
    store: CredentialStore,
    context: SessionContext,
    navigator: Arc<dyn Navigator>,
    api: Arc<dyn AuthApi>,
    validator: TokenValidator,
    landing_path: String,
    pending: AtomicBool,
    logged_out: AtomicBool,
}

impl AuthService {
    pub fn new(
        store: CredentialStore,
        context: SessionContext,
        navigator: Arc<dyn Navigator>,
        api: Arc<dyn AuthApi>,
        validator: TokenValidator,
        landing_path: impl Into<String>,
    ) -> Self {
        Self {
            store,
            context,
            navigator,
            api,
            validator,
            landing_path: landing_path.into(),
            pending: AtomicBool::new(false),
            logged_out: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    pub fn validator(&self) -> TokenValidator {
        self.validator
    }

    /// Whether a network request is outstanding (forms disable inputs).
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Status of the stored access token right now.
    pub fn token_status(&self) -> TokenStatus {
        self.validator.status(self.store.access_token().as_deref())
    }

    /// Derive the session state from the stored credential.
    ///
    /// Computed on every call; a valid token without a readable profile is
    /// treated as signed out.
    pub fn session_state(&self) -> SessionState {
        if !self.token_status().is_valid() {
            return SessionState::LoggedOut;
        }
        match self.store.user_profile() {
            Some(user) => SessionState::LoggedIn(user),
            None => SessionState::LoggedOut,
        }
    }

    /// Sign in, persist the session, resolve the active race and navigate.
    ///
    /// On failure nothing is written and the error carries a displayable
    /// message (see [`AppError::user_message`]).
    pub async fn login(&self, form: &LoginForm, view: &Liveness) -> Result<LoginOutcome> {
        form.validate()?;
        let _pending = PendingGuard::acquire(&self.pending)?;

        let response = self.api.login(form.email.trim(), &form.password).await;
        if !view.is_alive() {
            tracing::debug!("Login view gone, ignoring login response");
            return Ok(LoginOutcome::Discarded);
        }

        let session = response?.into_session()?;
        self.store.save_login(&session)?;

        let resolution = race_resolver::resolve(&session.signed_races, Utc::now());
        self.context.set_signed_races(session.signed_races.clone());
        self.context.set_active_race(resolution.active_race());
        self.logged_out.store(false, Ordering::Release);

        let landing = match &resolution.active_race_id {
            Some(id) => paths::race_map(id),
            None => self.landing_path.clone(),
        };

        tracing::info!(
            user_id = %session.user.id,
            races = session.signed_races.len(),
            active_race = ?resolution.active_race_id.as_ref().map(|id| id.as_str()),
            "Signed in"
        );

        self.navigator.navigate(&landing, true);

        Ok(LoginOutcome::SignedIn(SignedIn {
            user: session.user,
            resolution,
            landing,
        }))
    }

    /// Ask the server to email a reset link. Returns the server's message.
    pub async fn request_password_reset(
        &self,
        form: &ForgotPasswordForm,
        view: &Liveness,
    ) -> Result<Option<String>> {
        form.validate()?;
        let _pending = PendingGuard::acquire(&self.pending)?;

        let response = self.api.request_password_reset(form.email.trim()).await;
        if !view.is_alive() {
            return Ok(None);
        }
        Ok(response?.msg)
    }

    /// Set a new password with the emailed token. Returns the server's message.
    pub async fn reset_password(
        &self,
        form: &ResetPasswordForm,
        view: &Liveness,
    ) -> Result<Option<String>> {
        form.validate()?;
        let _pending = PendingGuard::acquire(&self.pending)?;

        let response = self.api.reset_password(&form.token, &form.password).await;
        if !view.is_alive() {
            return Ok(None);
        }
        Ok(response?.msg)
    }

    /// End the session: clear the store, then the context, then redirect.
    ///
    /// Returns `Ok(false)` when a logout already happened and no new login
    /// has occurred since, in which case nothing is done. If the store cannot
    /// be cleared, nothing else happens, the error is returned and a later
    /// logout tries again.
    pub fn logout(&self, reason: LogoutReason) -> Result<bool> {
        if self.logged_out.swap(true, Ordering::AcqRel) {
            tracing::debug!(?reason, "Logout already done");
            return Ok(false);
        }

        if let Err(e) = self.store.clear() {
            self.logged_out.store(false, Ordering::Release);
            tracing::error!(?reason, error = %e, "Failed to clear credential store, staying put");
            return Err(e.into());
        }
        self.context.set_active_race(None);
        self.context.set_signed_races(Vec::new());

        tracing::info!(?reason, "Signed out");
        self.navigator.navigate(paths::LOGIN, true);
        Ok(true)
    }
}
