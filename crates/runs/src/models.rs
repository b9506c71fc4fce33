use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Athlete,
    Coach,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub date_joined: OffsetDateTime,
}

impl User {
    pub fn new(username: String, first_name: String, last_name: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            first_name,
            last_name,
            role,
            date_joined: OffsetDateTime::now_utc(),
        }
    }
}

/// Goals and weight tracked per athlete. Reads fall back to an empty
/// default when no record exists yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteInfo {
    pub user_id: Uuid,
    pub goals: String,
    pub weight: i32,
}

impl AthleteInfo {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            goals: String::new(),
            weight: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Init,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: Uuid,
    pub athlete_id: Uuid,
    pub status: RunStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub comment: String,
    /// Kilometers, set once at the stop transition.
    pub distance: Option<f64>,
    /// Null until FINISHED, and null for runs with fewer than two positions.
    pub run_time_seconds: Option<i64>,
    /// Meters per second, set once at the stop transition.
    pub average_speed: Option<f64>,
}

impl Run {
    pub fn new(athlete_id: Uuid, comment: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            athlete_id,
            status: RunStatus::Init,
            created_at: OffsetDateTime::now_utc(),
            comment,
            distance: None,
            run_time_seconds: None,
            average_speed: None,
        }
    }
}

/// One GPS sample. Speed and distance-so-far are derived at append time
/// and never rewritten afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: Uuid,
    pub run_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Meters per second relative to the previously stored point.
    pub speed: f64,
    /// Cumulative kilometers from the start of the run.
    pub distance: f64,
}

/// An earned achievement. Grant records are append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: Uuid,
    pub athlete_id: Uuid,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleItem {
    pub id: Uuid,
    pub name: String,
    pub uid: String,
    pub latitude: f64,
    pub longitude: f64,
    pub picture: String,
    pub value: i64,
    /// Athletes who have picked this item up. Grant-only, never revoked.
    pub acquired_by: BTreeSet<Uuid>,
}

/// Coach-athlete link. At most one link per pair is meaningful; rewrites
/// replace the previous link (last write wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscribe {
    pub coach_id: Uuid,
    pub athlete_id: Uuid,
    /// Rating in (0, 5] set by the subscribed athlete.
    pub rating: Option<f64>,
}

/// Role-tagged user view. Coaches expose their roster and rating, athletes
/// expose their coach link and finished-run count.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UserView {
    Coach {
        id: Uuid,
        username: String,
        first_name: String,
        last_name: String,
        #[serde(with = "time::serde::rfc3339")]
        date_joined: OffsetDateTime,
        athletes: Vec<Uuid>,
        rating: Option<f64>,
    },
    Athlete {
        id: Uuid,
        username: String,
        first_name: String,
        last_name: String,
        #[serde(with = "time::serde::rfc3339")]
        date_joined: OffsetDateTime,
        coach: Option<Uuid>,
        runs_finished: i64,
    },
}

/// Flat user row for listings.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub date_joined: OffsetDateTime,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "type")]
    pub role: Role,
    pub runs_finished: i64,
}

/// Per-coach leaderboard: the (athlete, value) winner for each of the
/// three metrics, selected independently.
#[derive(Debug, Clone, Serialize)]
pub struct CoachAnalytics {
    pub longest_run_user: Uuid,
    pub longest_run_value: f64,
    pub total_run_user: Uuid,
    pub total_run_value: f64,
    pub speed_avg_user: Uuid,
    pub speed_avg_value: f64,
}
