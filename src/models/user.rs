//! User profile model.

use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Profile of the signed-in user, written at login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Server-side user ID
    pub id: UserId,
    /// Email address used to sign in
    #[serde(default)]
    pub email: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Grants access to the admin area. Missing means `false`.
    #[serde(
        default,
        alias = "isAdministrator",
        alias = "is_admin",
        alias = "isAdmin"
    )]
    pub is_administrator: bool,
    /// Preferred UI language (e.g. "es")
    #[serde(
        default,
        alias = "preferredLanguage",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred_language: Option<String>,
}
