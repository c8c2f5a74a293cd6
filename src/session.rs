// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session context: the active race and the user's race enrollments.
//!
//! One instance lives for the whole application and is handed to whoever
//! needs it; there is no global. Two setters are the only way to change it,
//! and consumers (navigation, menus, race-scoped guards) either read a
//! snapshot or subscribe to changes.

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::{ActiveRace, RaceEnrollment, RaceId};
use crate::store::CredentialStore;

/// Point-in-time view of the session context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// `None` means no race context; race-scoped views offer a picker
    pub active_race: Option<ActiveRace>,
    pub signed_races: Vec<RaceEnrollment>,
}

impl SessionSnapshot {
    pub fn active_race_id(&self) -> Option<&RaceId> {
        self.active_race.as_ref().map(ActiveRace::race_id)
    }

    pub fn find_race(&self, id: &RaceId) -> Option<&RaceEnrollment> {
        self.signed_races.iter().find(|race| &race.race_id == id)
    }
}

/// Shared session context.
#[derive(Clone)]
pub struct SessionContext {
    tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(SessionSnapshot::default())
    }
}

impl SessionContext {
    pub fn new(initial: SessionSnapshot) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Initialize from persisted enrollments.
    ///
    /// The active race is left unset: it is only chosen by an explicit
    /// login/resolve flow or by the user.
    pub fn from_store(store: &CredentialStore) -> Self {
        let signed_races = store.signed_races();
        tracing::debug!(races = signed_races.len(), "Session context initialized");
        Self::new(SessionSnapshot {
            active_race: None,
            signed_races,
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    pub fn active_race(&self) -> Option<ActiveRace> {
        self.tx.borrow().active_race.clone()
    }

    pub fn signed_races(&self) -> Vec<RaceEnrollment> {
        self.tx.borrow().signed_races.clone()
    }

    pub fn find_race(&self, id: &RaceId) -> Option<RaceEnrollment> {
        self.tx.borrow().find_race(id).cloned()
    }

    /// Receive every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// Set (or clear) the active race.
    ///
    /// The race is checked against the current enrollments: a known id is
    /// stored as [`ActiveRace::Enrolled`], anything else as
    /// [`ActiveRace::Unverified`].
    pub fn set_active_race(&self, race: Option<ActiveRace>) {
        self.tx.send_modify(|state| {
            let race = race.map(|race| race.reconcile(&state.signed_races));
            if let Some(race) = &race {
                if !race.is_verified() {
                    tracing::warn!(race_id = %race.race_id(), "Active race is not among signed races");
                }
            }
            state.active_race = race;
        });
    }

    /// Replace the enrollment list, re-checking the active race against it.
    pub fn set_signed_races(&self, races: Vec<RaceEnrollment>) {
        self.tx.send_modify(|state| {
            state.active_race = state
                .active_race
                .take()
                .map(|race| race.reconcile(&races));
            state.signed_races = races;
        });
    }
}
