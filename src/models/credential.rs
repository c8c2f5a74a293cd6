//! Credential and login session models.

use serde::{Deserialize, Serialize};

use super::race::RaceEnrollment;
use super::user::UserProfile;

/// Bearer credentials issued at login.
///
/// Both fields are opaque; only the access token's `exp` claim is ever read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
}

/// Everything a successful login writes to the credential store.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSession {
    pub credential: Credential,
    pub user: UserProfile,
    pub signed_races: Vec<RaceEnrollment>,
}

/// Authentication state derived from the stored credential.
///
/// Never persisted: it is recomputed on every check so that it cannot drift
/// from the token it describes.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn(UserProfile),
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::LoggedIn(_))
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            SessionState::LoggedIn(user) => Some(user),
            SessionState::LoggedOut => None,
        }
    }
}
