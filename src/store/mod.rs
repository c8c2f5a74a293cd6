// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential storage.
//!
//! The persistent key-value store is an external collaborator; the core only
//! relies on the narrow [`KeyValueStore`] interface. [`CredentialStore`] adds
//! typed access on top and owns the all-or-nothing write discipline for
//! login and logout.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use serde_json::Value;

use crate::models::{Credential, LoginSession, RaceEnrollment, UserProfile};

/// Storage key names as constants.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    /// Serialized `UserProfile`
    pub const USER: &str = "user";
    /// Serialized list of `RaceEnrollment`
    pub const SIGNED_RACES: &str = "signedRaces";

    /// Every key owned by the session core. The access token comes first so
    /// that a partially completed clear never leaves a usable credential.
    pub const ALL: [&str; 4] = [ACCESS_TOKEN, REFRESH_TOKEN, USER, SIGNED_RACES];
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous, process-wide key-value storage that survives restarts.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed access to the persisted session data.
#[derive(Clone)]
pub struct CredentialStore {
    kv: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Stored access token. An empty value counts as absent.
    pub fn access_token(&self) -> Option<String> {
        self.kv
            .get(keys::ACCESS_TOKEN)
            .filter(|token| !token.trim().is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.kv
            .get(keys::REFRESH_TOKEN)
            .filter(|token| !token.trim().is_empty())
    }

    pub fn credential(&self) -> Option<Credential> {
        Some(Credential {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token().unwrap_or_default(),
        })
    }

    /// Stored user profile. Corrupt data reads as no profile.
    pub fn user_profile(&self) -> Option<UserProfile> {
        let raw = self.kv.get(keys::USER)?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable stored user profile");
                None
            }
        }
    }

    /// Stored race enrollments, normalized.
    ///
    /// Entries without a usable race id are skipped rather than failing the
    /// whole list.
    pub fn signed_races(&self) -> Vec<RaceEnrollment> {
        let Some(raw) = self.kv.get(keys::SIGNED_RACES) else {
            return Vec::new();
        };

        let entries = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) | Err(_) => {
                tracing::warn!("Ignoring unreadable stored race enrollments");
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .filter_map(|entry| match RaceEnrollment::try_from(entry) {
                Ok(race) => Some(race),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping stored race enrollment");
                    None
                }
            })
            .collect()
    }

    /// Persist a successful login.
    ///
    /// Everything is serialized before the first write, and the access token
    /// is written last. If any write fails, all session keys are removed
    /// again so callers never observe a half-written session.
    pub fn save_login(&self, session: &LoginSession) -> Result<(), StoreError> {
        let user = serde_json::to_string(&session.user)?;
        let races = serde_json::to_string(&session.signed_races)?;

        let writes = [
            (keys::REFRESH_TOKEN, session.credential.refresh_token.as_str()),
            (keys::USER, user.as_str()),
            (keys::SIGNED_RACES, races.as_str()),
            (keys::ACCESS_TOKEN, session.credential.access_token.as_str()),
        ];

        for (key, value) in writes {
            if let Err(e) = self.kv.set(key, value) {
                tracing::error!(key, error = %e, "Failed to persist login, rolling back");
                if let Err(rollback) = self.clear() {
                    tracing::error!(error = %rollback, "Rollback of partial login failed");
                }
                return Err(e);
            }
        }

        Ok(())
    }

    /// Remove every session key.
    ///
    /// Keeps going after a failed removal and reports the first error.
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut first_error = None;
        for key in keys::ALL {
            if let Err(e) = self.kv.remove(key) {
                tracing::warn!(key, error = %e, "Failed to remove stored session key");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Whether any session key is present.
    pub fn has_session_data(&self) -> bool {
        keys::ALL.iter().any(|key| self.kv.get(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RaceId, UserId};

    /// Store that refuses writes to one key.
    struct FailingStore {
        inner: MemoryStore,
        fail_on: &'static str,
    }

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if key == self.fail_on {
                return Err(StoreError::Unavailable("quota exceeded".to_string()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    fn sample_session() -> LoginSession {
        LoginSession {
            credential: Credential {
                access_token: "access".to_string(),
                refresh_token: "refresh".to_string(),
            },
            user: UserProfile {
                id: UserId::new("u1"),
                email: "runner@example.com".to_string(),
                name: "Runner".to_string(),
                is_administrator: false,
                preferred_language: None,
            },
            signed_races: vec![RaceEnrollment::new(RaceId::new("7"))],
        }
    }

    #[test]
    fn test_save_and_read_back() {
        let store = CredentialStore::new(Arc::new(MemoryStore::new()));
        store.save_login(&sample_session()).unwrap();

        assert_eq!(store.access_token().as_deref(), Some("access"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh"));
        assert_eq!(store.user_profile().unwrap().email, "runner@example.com");
        assert_eq!(store.signed_races()[0].race_id.as_str(), "7");
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let store = CredentialStore::new(Arc::new(FailingStore {
            inner: MemoryStore::new(),
            fail_on: keys::SIGNED_RACES,
        }));

        assert!(store.save_login(&sample_session()).is_err());
        assert!(!store.has_session_data());
        assert_eq!(store.access_token(), None);
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = CredentialStore::new(Arc::new(MemoryStore::new()));
        store.save_login(&sample_session()).unwrap();

        store.clear().unwrap();

        assert!(!store.has_session_data());
        assert!(store.signed_races().is_empty());
        assert!(store.user_profile().is_none());
    }

    #[test]
    fn test_empty_access_token_is_absent() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(keys::ACCESS_TOKEN, "").unwrap();
        let store = CredentialStore::new(kv);

        assert_eq!(store.access_token(), None);
        assert_eq!(store.credential(), None);
    }

    #[test]
    fn test_corrupt_entries_are_skipped() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(
            keys::SIGNED_RACES,
            r#"[{"race_id": 1}, {"name": "no id"}, {"raceId": "2"}]"#,
        )
        .unwrap();
        kv.set(keys::USER, "{not json").unwrap();
        let store = CredentialStore::new(kv);

        let ids: Vec<String> = store
            .signed_races()
            .into_iter()
            .map(|r| r.race_id.to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(store.user_profile().is_none());
    }
}
