// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Active-race resolution.
//!
//! Picks the race that race-scoped views should operate on when a user is
//! enrolled in several. The resolver never guesses: if it cannot narrow the
//! enrollments to a single race, the caller gets no active race and the full
//! list to offer as a choice.

use chrono::{DateTime, Utc};

use crate::models::{ActiveRace, RaceEnrollment, RaceId};

/// Outcome of resolving the active race.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The single eligible race, or `None` when the user must choose
    pub active_race_id: Option<RaceId>,
    /// The eligible race when resolved, otherwise every enrollment
    pub candidates: Vec<RaceEnrollment>,
}

impl Resolution {
    pub fn is_ambiguous(&self) -> bool {
        self.active_race_id.is_none() && self.candidates.len() > 1
    }

    /// The resolved race as session context expects it.
    pub fn active_race(&self) -> Option<ActiveRace> {
        let id = self.active_race_id.as_ref()?;
        let race = self
            .candidates
            .iter()
            .find(|race| &race.race_id == id)
            .cloned()
            .map(ActiveRace::Enrolled)
            .unwrap_or_else(|| ActiveRace::Unverified(id.clone()));
        Some(race)
    }
}

/// Resolve the active race among `enrollments` at instant `now`.
///
/// A race is eligible when its scheduling window contains `now` (see
/// [`RaceEnrollment::is_scheduled_at`]). Exactly one eligible race resolves;
/// zero or several leave the choice to the user.
pub fn resolve(enrollments: &[RaceEnrollment], now: DateTime<Utc>) -> Resolution {
    let mut eligible = enrollments.iter().filter(|race| race.is_scheduled_at(now));

    match (eligible.next(), eligible.next()) {
        (Some(only), None) => Resolution {
            active_race_id: Some(only.race_id.clone()),
            candidates: vec![only.clone()],
        },
        _ => Resolution {
            active_race_id: None,
            candidates: enrollments.to_vec(),
        },
    }
}
