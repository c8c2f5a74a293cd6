// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session logic layer.

pub mod api;
pub mod auth;
pub mod race_resolver;
pub mod session_monitor;
pub mod token;

pub use api::{ApiMessage, AuthApi, HttpAuthApi, LoginResponse};
pub use auth::{
    AuthService, ForgotPasswordForm, Liveness, LoginForm, LoginOutcome, LogoutReason,
    ResetPasswordForm, SignedIn, ViewScope,
};
pub use race_resolver::{resolve, Resolution};
pub use session_monitor::{CheckOutcome, MonitorHandle, SessionMonitor};
pub use token::{is_expired, is_expired_at, TokenStatus, TokenValidator};
