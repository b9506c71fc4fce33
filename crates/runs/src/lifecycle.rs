//! Run state machine: INIT -> IN_PROGRESS -> FINISHED, no other edges.
//!
//! The stop transition computes the run's final metrics exactly once from
//! the ordered position sequence and then fires the achievement rules
//! synchronously. Stop takes the same per-run lock as position appends, so
//! the aggregation always reads a stable sequence.

use tracing::info;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{Run, RunStatus},
    rules,
    store::Store,
    telemetry,
};

pub async fn start_run(store: &Store, run_id: Uuid) -> Result<Run, AppError> {
    let lock = store.run_lock(run_id);
    let _guard = lock.lock().await;

    let mut run = store.get_run(run_id).ok_or(AppError::NotFound)?;
    if run.status != RunStatus::Init {
        return Err(AppError::InvalidTransition("Only a new run can be started"));
    }

    run.status = RunStatus::InProgress;
    store.update_run(run.clone());
    info!(run_id = %run.id, athlete_id = %run.athlete_id, "run started");
    Ok(run)
}

pub async fn stop_run(store: &Store, run_id: Uuid) -> Result<Run, AppError> {
    let run = {
        let lock = store.run_lock(run_id);
        let _guard = lock.lock().await;

        let mut run = store.get_run(run_id).ok_or(AppError::NotFound)?;
        if run.status != RunStatus::InProgress {
            return Err(AppError::InvalidTransition(
                "Only an in-progress run can be stopped",
            ));
        }

        let summary = telemetry::summarize(&store.positions_by_time(run_id));
        run.status = RunStatus::Finished;
        run.distance = Some(summary.distance_km);
        run.run_time_seconds = summary.run_time_seconds;
        run.average_speed = Some(summary.average_speed);
        store.update_run(run.clone());
        info!(
            run_id = %run.id,
            athlete_id = %run.athlete_id,
            distance_km = summary.distance_km,
            "run finished"
        );
        run
    };

    // Rules read athlete-wide aggregates; they run outside the per-run
    // critical section, after the finished run is visible.
    rules::process_finish(store, &run);
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};
    use time::OffsetDateTime;

    fn ts(offset: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000 + offset).unwrap()
    }

    fn new_run(store: &Store) -> Run {
        let athlete = User::new("runner".into(), "R".into(), "R".into(), Role::Athlete);
        let run = Run::new(athlete.id, "morning loop".into());
        store.insert_user(athlete);
        store.insert_run(run.clone());
        run
    }

    #[tokio::test]
    async fn start_only_from_init() {
        let store = Store::new();
        let run = new_run(&store);

        let started = start_run(&store, run.id).await.unwrap();
        assert_eq!(started.status, RunStatus::InProgress);

        let err = start_run(&store, run.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn stop_only_from_in_progress() {
        let store = Store::new();
        let run = new_run(&store);

        let err = stop_run(&store, run.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));

        start_run(&store, run.id).await.unwrap();
        let finished = stop_run(&store, run.id).await.unwrap();
        assert_eq!(finished.status, RunStatus::Finished);

        // FINISHED is terminal.
        let err = stop_run(&store, run.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
        let err = start_run(&store, run.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn missing_run_is_not_found() {
        let store = Store::new();
        let err = start_run(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn stop_computes_final_metrics() {
        let store = Store::new();
        let run = new_run(&store);
        start_run(&store, run.id).await.unwrap();

        telemetry::append_position(&store, run.id, 55.00, 37.0, ts(0))
            .await
            .unwrap();
        telemetry::append_position(&store, run.id, 55.01, 37.0, ts(120))
            .await
            .unwrap();
        telemetry::append_position(&store, run.id, 55.02, 37.0, ts(240))
            .await
            .unwrap();

        let finished = stop_run(&store, run.id).await.unwrap();
        assert_eq!(finished.run_time_seconds, Some(240));
        let distance = finished.distance.unwrap();
        assert!((distance - 2.22).abs() <= 0.01, "distance {distance}");
        // Mean of [0, ~9.27, ~9.27].
        let avg = finished.average_speed.unwrap();
        assert!((avg - 6.18).abs() < 0.05, "avg {avg}");
    }

    #[tokio::test]
    async fn stop_with_too_few_positions_leaves_time_null() {
        let store = Store::new();
        let run = new_run(&store);
        start_run(&store, run.id).await.unwrap();
        telemetry::append_position(&store, run.id, 55.0, 37.0, ts(0))
            .await
            .unwrap();

        let finished = stop_run(&store, run.id).await.unwrap();
        assert_eq!(finished.run_time_seconds, None);
        assert_eq!(finished.distance, Some(0.0));
        assert_eq!(finished.average_speed, Some(0.0));
    }
}
