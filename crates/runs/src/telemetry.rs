//! Append-only telemetry ledger and finish-time aggregation.
//!
//! Each appended position carries a derived speed (m/s, relative to the
//! previously *stored* point) and a cumulative distance (km). Out-of-order
//! timestamps are accepted; their derived values are still relative to the
//! previous stored point. That is an explicit ingestion policy, so the
//! final metrics are recomputed authoritatively at stop time by walking
//! the timestamp-ordered sequence. For strictly ordered input both paths
//! agree.

use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::{
    errors::AppError,
    geo_math,
    models::{Position, RunStatus},
    store::Store,
};

/// Round to 2 decimals, the stored precision for speeds and kilometers.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Coordinates are stored at 4-decimal precision (~11 m).
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Append one position to an in-progress run.
///
/// Takes the run's critical section, so concurrent appends to the same run
/// serialize and each sees a stable previous point.
pub async fn append_position(
    store: &Store,
    run_id: Uuid,
    latitude: f64,
    longitude: f64,
    timestamp: OffsetDateTime,
) -> Result<Position, AppError> {
    let lock = store.run_lock(run_id);
    let _guard = lock.lock().await;

    let run = store.get_run(run_id).ok_or(AppError::NotFound)?;
    if run.status != RunStatus::InProgress {
        return Err(AppError::RunNotActive);
    }

    let latitude = round4(latitude);
    let longitude = round4(longitude);

    let (speed, distance) = match store.last_position(run_id) {
        None => (0.0, 0.0),
        Some(prev) => {
            let segment_m =
                geo_math::distance_meters((prev.latitude, prev.longitude), (latitude, longitude));
            let elapsed = (timestamp - prev.timestamp).as_seconds_f64();
            let speed = if elapsed == 0.0 {
                // Degenerate interval: a duplicate timestamp would divide by
                // zero. Defined sentinel rather than a failed append.
                warn!(%run_id, "duplicate timestamp on consecutive positions, recording speed 0");
                0.0
            } else {
                round2(segment_m / elapsed)
            };
            (speed, round2(prev.distance + segment_m / 1000.0))
        }
    };

    let position = Position {
        id: Uuid::new_v4(),
        run_id,
        latitude,
        longitude,
        timestamp,
        speed,
        distance,
    };
    store.push_position(position.clone());
    Ok(position)
}

/// Final metrics for a run, computed once at the stop transition.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Kilometers over the timestamp-ordered sequence.
    pub distance_km: f64,
    /// max(timestamp) - min(timestamp); None under two positions.
    pub run_time_seconds: Option<i64>,
    /// Mean of the stored per-point speeds, m/s.
    pub average_speed: f64,
}

pub trait RunMetric {
    type Value;
    fn next_point(&mut self, position: &Position);
    fn finish(&mut self) -> Self::Value;
}

/// Walk the ordered position sequence and produce the authoritative final
/// metrics. Intentionally independent of the incremental per-point values.
pub fn summarize(positions: &[Position]) -> RunSummary {
    let mut distance = TotalDistance::default();
    let mut elapsed = ElapsedTime::default();
    let mut speed = AverageSpeed::default();

    for position in positions {
        distance.next_point(position);
        elapsed.next_point(position);
        speed.next_point(position);
    }

    RunSummary {
        distance_km: distance.finish(),
        run_time_seconds: elapsed.finish(),
        average_speed: speed.finish(),
    }
}

#[derive(Debug, Clone, Default)]
struct TotalDistance {
    meters: f64,
    last: Option<(f64, f64)>,
}

impl RunMetric for TotalDistance {
    type Value = f64;

    fn next_point(&mut self, position: &Position) {
        let here = (position.latitude, position.longitude);
        self.meters += self
            .last
            .map_or(0.0, |prev| geo_math::distance_meters(prev, here));
        self.last = Some(here);
    }

    fn finish(&mut self) -> f64 {
        round2(self.meters / 1000.0)
    }
}

#[derive(Debug, Clone, Default)]
struct ElapsedTime {
    first: Option<OffsetDateTime>,
    last: Option<OffsetDateTime>,
    count: usize,
}

impl RunMetric for ElapsedTime {
    type Value = Option<i64>;

    fn next_point(&mut self, position: &Position) {
        let ts = position.timestamp;
        self.first = Some(self.first.map_or(ts, |f| f.min(ts)));
        self.last = Some(self.last.map_or(ts, |l| l.max(ts)));
        self.count += 1;
    }

    fn finish(&mut self) -> Option<i64> {
        if self.count < 2 {
            return None;
        }
        match (self.first, self.last) {
            (Some(first), Some(last)) => Some((last - first).whole_seconds()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct AverageSpeed {
    sum: f64,
    count: usize,
}

impl RunMetric for AverageSpeed {
    type Value = f64;

    fn next_point(&mut self, position: &Position) {
        self.sum += position.speed;
        self.count += 1;
    }

    fn finish(&mut self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        round2(self.sum / self.count as f64)
    }
}
