// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Race enrollment model.
//!
//! Enrollment payloads come from several API generations and name the race
//! identifier `race_id`, `id`, or `raceId`. They are normalized here, once,
//! into [`RaceEnrollment::race_id`]; nothing downstream looks at the aliases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::{id_from_json, RaceId};
use crate::time_utils::{parse_window_bound, WindowBound};

/// Keys that may carry the race identifier, in priority order.
const RACE_ID_KEYS: [&str; 3] = ["race_id", "id", "raceId"];
const TEAM_ID_KEYS: [&str; 2] = ["team_id", "teamId"];
const START_KEYS: [&str; 3] = ["start_date", "startDate", "starts_at"];
const END_KEYS: [&str; 3] = ["end_date", "endDate", "ends_at"];
/// Field names used in the stored form.
const CANONICAL_KEYS: [&str; 5] = ["race_id", "name", "team_id", "start_date", "end_date"];

/// Errors raised when an enrollment payload cannot be normalized.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnrollmentError {
    #[error("Enrollment must be a JSON object")]
    NotAnObject,

    #[error("Enrollment has no race identifier (race_id, id or raceId)")]
    MissingRaceId,
}

/// A race the current user is registered for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct RaceEnrollment {
    /// Canonical race identifier
    pub race_id: RaceId,
    /// Race display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Team the user races with, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// Start of the race window (RFC3339 or YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// End of the race window (RFC3339 or YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Any other race metadata, passed through untouched
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl RaceEnrollment {
    /// Minimal enrollment carrying only an id.
    pub fn new(race_id: impl Into<RaceId>) -> Self {
        Self {
            race_id: race_id.into(),
            name: None,
            team_id: None,
            start_date: None,
            end_date: None,
            metadata: Map::new(),
        }
    }

    /// Set the scheduling window.
    pub fn with_window(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start_date = start.map(String::from);
        self.end_date = end.map(String::from);
        self
    }

    pub fn window_start(&self) -> Option<DateTime<Utc>> {
        self.start_date
            .as_deref()
            .and_then(|s| parse_window_bound(s, WindowBound::Start))
    }

    pub fn window_end(&self) -> Option<DateTime<Utc>> {
        self.end_date
            .as_deref()
            .and_then(|s| parse_window_bound(s, WindowBound::End))
    }

    /// Whether the race window contains `now`.
    ///
    /// Missing or unparseable bounds are open, so an enrollment without any
    /// schedule is always considered in progress.
    pub fn is_scheduled_at(&self, now: DateTime<Utc>) -> bool {
        let started = self.window_start().map_or(true, |start| start <= now);
        let not_over = self.window_end().map_or(true, |end| now <= end);
        started && not_over
    }
}

/// Remove the first present key from `map`, in priority order.
fn take_first(map: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter().find_map(|key| {
        let usable = map.get(*key).is_some_and(|v| !v.is_null());
        if usable {
            map.remove(*key)
        } else {
            None
        }
    })
}

fn take_string(map: &mut Map<String, Value>, keys: &[&str]) -> Option<String> {
    take_first(map, keys).and_then(|v| match v {
        Value::String(s) => Some(s),
        other => id_from_json(&other),
    })
}

impl TryFrom<Value> for RaceEnrollment {
    type Error = EnrollmentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut map) = value else {
            return Err(EnrollmentError::NotAnObject);
        };

        // Only the winning id key is consumed; e.g. an enrollment row `id`
        // stays in metadata when `race_id` is also present.
        let race_id = RACE_ID_KEYS
            .iter()
            .find_map(|key| {
                let id = map.get(*key).and_then(RaceId::from_json)?;
                map.remove(*key);
                Some(id)
            })
            .ok_or(EnrollmentError::MissingRaceId)?;

        let name = take_string(&mut map, &["name"]);
        let team_id = take_string(&mut map, &TEAM_ID_KEYS);
        let start_date = take_string(&mut map, &START_KEYS);
        let end_date = take_string(&mut map, &END_KEYS);

        // Leftover null or unusable values under canonical names would
        // collide with the typed fields when serialized
        for key in CANONICAL_KEYS {
            map.remove(key);
        }

        Ok(Self {
            race_id,
            name,
            team_id,
            start_date,
            end_date,
            metadata: map,
        })
    }
}

/// The race currently driving race-scoped views.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveRace {
    /// A race present in the current enrollment set.
    Enrolled(RaceEnrollment),
    /// A bare id not (yet) confirmed against the enrollment set.
    Unverified(RaceId),
}

impl ActiveRace {
    pub fn race_id(&self) -> &RaceId {
        match self {
            ActiveRace::Enrolled(race) => &race.race_id,
            ActiveRace::Unverified(id) => id,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, ActiveRace::Enrolled(_))
    }

    /// Re-classify against an enrollment set.
    ///
    /// An id found in `races` becomes `Enrolled` with the current record;
    /// anything else degrades to `Unverified`.
    pub fn reconcile(self, races: &[RaceEnrollment]) -> Self {
        let id = self.race_id();
        match races.iter().find(|race| &race.race_id == id) {
            Some(race) => ActiveRace::Enrolled(race.clone()),
            None => ActiveRace::Unverified(id.clone()),
        }
    }
}
