//! Race-scoped route guard.
//!
//! Race pages need a race context. Without one they degrade to the race
//! picker instead of failing.

use crate::models::ActiveRace;
use crate::routes::{paths, Page, RouteDecision};
use crate::session::SessionSnapshot;

/// Adjust an authorized decision for the current race context.
///
/// - `/race` goes to the active race's map, or the picker when unresolved.
/// - A race map for a race the user is not enrolled in shows the picker.
pub fn scope_to_race(decision: RouteDecision, snapshot: &SessionSnapshot) -> RouteDecision {
    match decision {
        RouteDecision::Render {
            page: Page::RaceHome,
        } => match &snapshot.active_race {
            Some(ActiveRace::Enrolled(race)) => {
                RouteDecision::redirect(paths::race_map(&race.race_id))
            }
            Some(ActiveRace::Unverified(_)) | None => RouteDecision::render(Page::RacePicker),
        },
        RouteDecision::Render {
            page: Page::RaceMap(id),
        } if snapshot.find_race(&id).is_none() => {
            tracing::warn!(race_id = %id, "Race page requested for a race not signed up for");
            RouteDecision::render(Page::RacePicker)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RaceEnrollment, RaceId};

    fn snapshot(active: Option<ActiveRace>) -> SessionSnapshot {
        SessionSnapshot {
            active_race: active,
            signed_races: vec![
                RaceEnrollment::new(RaceId::new("1")),
                RaceEnrollment::new(RaceId::new("2")),
            ],
        }
    }

    #[test]
    fn test_race_home_without_context_shows_picker() {
        let decision = scope_to_race(RouteDecision::render(Page::RaceHome), &snapshot(None));
        assert_eq!(decision, RouteDecision::render(Page::RacePicker));
    }

    #[test]
    fn test_race_home_with_context_redirects_to_map() {
        let active = ActiveRace::Enrolled(RaceEnrollment::new(RaceId::new("2")));
        let decision = scope_to_race(
            RouteDecision::render(Page::RaceHome),
            &snapshot(Some(active)),
        );
        assert_eq!(decision, RouteDecision::redirect("/race/2/map"));
    }

    #[test]
    fn test_foreign_race_map_shows_picker() {
        let decision = scope_to_race(
            RouteDecision::render(Page::RaceMap(RaceId::new("99"))),
            &snapshot(None),
        );
        assert_eq!(decision, RouteDecision::render(Page::RacePicker));

        let own = RouteDecision::render(Page::RaceMap(RaceId::new("1")));
        assert_eq!(scope_to_race(own.clone(), &snapshot(None)), own);
    }

    #[test]
    fn test_other_decisions_pass_through() {
        let redirect = RouteDecision::redirect(paths::LOGIN);
        assert_eq!(scope_to_race(redirect.clone(), &snapshot(None)), redirect);
    }
}
