//! Per-coach athlete aggregation and coach ratings.
//!
//! Each of the three leaderboard metrics is selected independently over
//! the coach's subscribed athletes. Ties resolve to the lowest athlete id:
//! athletes are visited in id order and a later athlete must strictly beat
//! the current winner.

use uuid::Uuid;

use crate::{models::CoachAnalytics, store::Store, telemetry::round2};

#[derive(Debug, Clone, Copy)]
struct AthleteStats {
    athlete_id: Uuid,
    longest_run: f64,
    total_distance: f64,
    speed_avg: f64,
}

fn athlete_stats(store: &Store, athlete_id: Uuid) -> Option<AthleteStats> {
    let finished = store.finished_runs_of(athlete_id);

    let distances: Vec<f64> = finished.iter().filter_map(|r| r.distance).collect();
    let speeds: Vec<f64> = finished.iter().filter_map(|r| r.average_speed).collect();
    if distances.is_empty() {
        // No finished runs: the athlete contributes to no metric.
        return None;
    }

    let longest_run = distances.iter().cloned().fold(f64::MIN, f64::max);
    let total_distance = distances.iter().sum();
    let speed_avg = if speeds.is_empty() {
        0.0
    } else {
        speeds.iter().sum::<f64>() / speeds.len() as f64
    };

    Some(AthleteStats {
        athlete_id,
        longest_run,
        total_distance,
        speed_avg,
    })
}

/// Leaderboard for a coach's subscribed athletes. None when the coach has
/// no subscribed athletes, or none of them has a finished run — callers
/// surface that as an explicit empty result, not an error.
pub fn coach_analytics(store: &Store, coach_id: Uuid) -> Option<CoachAnalytics> {
    // subscribers_of returns athletes sorted by id, which is the tie-break.
    let stats: Vec<AthleteStats> = store
        .subscribers_of(coach_id)
        .into_iter()
        .filter_map(|athlete_id| athlete_stats(store, athlete_id))
        .collect();

    let longest = max_by(&stats, |s| s.longest_run)?;
    let total = max_by(&stats, |s| s.total_distance)?;
    let speed = max_by(&stats, |s| s.speed_avg)?;

    Some(CoachAnalytics {
        longest_run_user: longest.athlete_id,
        longest_run_value: round2(longest.longest_run),
        total_run_user: total.athlete_id,
        total_run_value: round2(total.total_distance),
        speed_avg_user: speed.athlete_id,
        speed_avg_value: round2(speed.speed_avg),
    })
}

fn max_by(stats: &[AthleteStats], metric: impl Fn(&AthleteStats) -> f64) -> Option<AthleteStats> {
    let mut best: Option<AthleteStats> = None;
    for s in stats {
        match best {
            Some(b) if metric(s) <= metric(&b) => {}
            _ => best = Some(*s),
        }
    }
    best
}

/// Mean of the ratings set on the coach's subscribe links; None when no
/// athlete has rated the coach yet.
pub fn coach_rating(store: &Store, coach_id: Uuid) -> Option<f64> {
    let ratings = store.ratings_of(coach_id);
    if ratings.is_empty() {
        return None;
    }
    Some(round2(ratings.iter().sum::<f64>() / ratings.len() as f64))
}
