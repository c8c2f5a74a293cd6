// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the session core.

pub mod credential;
pub mod ids;
pub mod race;
pub mod user;

pub use credential::{Credential, LoginSession, SessionState};
pub use ids::{RaceId, UserId};
pub use race::{ActiveRace, EnrollmentError, RaceEnrollment};
pub use user::UserProfile;
