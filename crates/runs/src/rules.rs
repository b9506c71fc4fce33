//! Achievement rules, evaluated once per successful stop.
//!
//! The rules are independent; the fixed evaluation order only pins down
//! test determinism. Grants are append-only Challenge records.

use tracing::info;
use uuid::Uuid;

use crate::{models::Run, store::Store};

pub const TEN_RUNS: &str = "Сделай 10 Забегов!";
pub const FIFTY_KM: &str = "Пробеги 50 километров!";
pub const FAST_2K: &str = "2 километра за 10 минут!";

const FIFTY_KM_THRESHOLD: f64 = 50.0;
const FAST_2K_DISTANCE_KM: f64 = 2.0;
const FAST_2K_MAX_SECONDS: i64 = 600;

pub fn process_finish(store: &Store, run: &Run) {
    check_ten_runs(store, run.athlete_id);
    check_fifty_km(store, run.athlete_id);
    check_fast_2k(store, run);
}

/// Fires on the athlete's exactly-10th finished run. The exact match makes
/// the rule one-shot; the conditional insert keeps it safe when finishes
/// of different runs race.
fn check_ten_runs(store: &Store, athlete_id: Uuid) {
    if store.count_finished_runs(athlete_id) != 10 {
        return;
    }
    if store.insert_challenge_once(athlete_id, TEN_RUNS) {
        info!(%athlete_id, challenge = TEN_RUNS, "challenge granted");
    }
}

/// Threshold rule: every finish past 50 km total would re-qualify, so the
/// grant must be conditional to stay at most once per athlete.
fn check_fifty_km(store: &Store, athlete_id: Uuid) {
    if store.sum_finished_distance(athlete_id) < FIFTY_KM_THRESHOLD {
        return;
    }
    if store.insert_challenge_once(athlete_id, FIFTY_KM) {
        info!(%athlete_id, challenge = FIFTY_KM, "challenge granted");
    }
}

/// Per-run rule: 2 km or more within 10 minutes. May legitimately grant
/// again for each qualifying run.
fn check_fast_2k(store: &Store, run: &Run) {
    let qualifies = matches!(
        (run.distance, run.run_time_seconds),
        (Some(distance), Some(seconds))
            if distance >= FAST_2K_DISTANCE_KM && seconds <= FAST_2K_MAX_SECONDS
    );
    if qualifies {
        store.insert_challenge(run.athlete_id, FAST_2K);
        info!(athlete_id = %run.athlete_id, run_id = %run.id, challenge = FAST_2K, "challenge granted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, Run, RunStatus, User};

    fn athlete(store: &Store) -> Uuid {
        let user = User::new("runner".into(), "R".into(), "R".into(), Role::Athlete);
        let id = user.id;
        store.insert_user(user);
        id
    }

    fn finished_run(athlete_id: Uuid, distance: f64, seconds: Option<i64>) -> Run {
        let mut run = Run::new(athlete_id, String::new());
        run.status = RunStatus::Finished;
        run.distance = Some(distance);
        run.run_time_seconds = seconds;
        run.average_speed = Some(0.0);
        run
    }

    fn grants(store: &Store, athlete_id: Uuid, name: &str) -> usize {
        store
            .list_challenges(Some(athlete_id))
            .into_iter()
            .filter(|c| c.full_name == name)
            .count()
    }

    #[test]
    fn ten_runs_granted_exactly_on_tenth_finish() {
        let store = Store::new();
        let athlete_id = athlete(&store);

        for i in 1..=11 {
            let run = finished_run(athlete_id, 1.0, Some(1200));
            store.insert_run(run.clone());
            process_finish(&store, &run);
            let expected = usize::from(i >= 10);
            assert_eq!(grants(&store, athlete_id, TEN_RUNS), expected, "after {i}");
        }
        // The 11th finish saw a count of 11, not 10, and did not re-grant.
        assert_eq!(grants(&store, athlete_id, TEN_RUNS), 1);
    }

    #[test]
    fn fifty_km_granted_once_across_qualifying_finishes() {
        let store = Store::new();
        let athlete_id = athlete(&store);

        for total in [30.0, 30.0, 30.0] {
            let run = finished_run(athlete_id, total, Some(20_000));
            store.insert_run(run.clone());
            process_finish(&store, &run);
        }
        // 90 km total, threshold crossed on the second finish, still one grant.
        assert_eq!(grants(&store, athlete_id, FIFTY_KM), 1);
    }

    #[test]
    fn fifty_km_not_granted_below_threshold() {
        let store = Store::new();
        let athlete_id = athlete(&store);
        let run = finished_run(athlete_id, 49.99, Some(20_000));
        store.insert_run(run.clone());
        process_finish(&store, &run);
        assert_eq!(grants(&store, athlete_id, FIFTY_KM), 0);
    }

    #[test]
    fn fast_2k_boundary_conditions() {
        let store = Store::new();
        let athlete_id = athlete(&store);

        // Exactly on both boundaries qualifies.
        let run = finished_run(athlete_id, 2.0, Some(600));
        store.insert_run(run.clone());
        process_finish(&store, &run);
        assert_eq!(grants(&store, athlete_id, FAST_2K), 1);

        // 1.99 km does not.
        let run = finished_run(athlete_id, 1.99, Some(500));
        store.insert_run(run.clone());
        process_finish(&store, &run);
        assert_eq!(grants(&store, athlete_id, FAST_2K), 1);

        // 601 seconds does not.
        let run = finished_run(athlete_id, 3.0, Some(601));
        store.insert_run(run.clone());
        process_finish(&store, &run);
        assert_eq!(grants(&store, athlete_id, FAST_2K), 1);
    }

    #[test]
    fn fast_2k_repeats_across_qualifying_runs() {
        let store = Store::new();
        let athlete_id = athlete(&store);

        for _ in 0..3 {
            let run = finished_run(athlete_id, 2.5, Some(550));
            store.insert_run(run.clone());
            process_finish(&store, &run);
        }
        assert_eq!(grants(&store, athlete_id, FAST_2K), 3);
    }

    #[test]
    fn fast_2k_skipped_without_elapsed_time() {
        let store = Store::new();
        let athlete_id = athlete(&store);
        let run = finished_run(athlete_id, 2.5, None);
        store.insert_run(run.clone());
        process_finish(&store, &run);
        assert_eq!(grants(&store, athlete_id, FAST_2K), 0);
    }
}
