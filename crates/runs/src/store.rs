//! In-process record store.
//!
//! The engine treats storage as a collaborator with CRUD, ordered range
//! queries and aggregates. This implementation keeps everything in memory
//! behind a single RwLock; the handle is cheap to clone and share across
//! handlers, mirroring a pooled database handle.
//!
//! Positions are kept in insertion order per run. `positions_by_time`
//! returns a timestamp-ordered copy for the authoritative finish-time
//! recomputation; `last_position` reflects insertion order, which is what
//! incremental speed is defined against.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, RwLock},
};

use uuid::Uuid;

use crate::models::{
    AthleteInfo, Challenge, CollectibleItem, Position, Role, Run, RunStatus, Subscribe, User,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    athlete_info: HashMap<Uuid, AthleteInfo>,
    runs: HashMap<Uuid, Run>,
    positions: HashMap<Uuid, Vec<Position>>,
    challenges: Vec<Challenge>,
    collectibles: HashMap<Uuid, CollectibleItem>,
    subscribes: Vec<Subscribe>,
}

#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Tables>>,
    run_locks: Arc<Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-run critical section. Append and stop on the same run serialize
    /// on this lock; operations on different runs proceed in parallel.
    pub fn run_lock(&self, run_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.run_locks.lock().unwrap();
        locks
            .entry(run_id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    // Users

    pub fn insert_user(&self, user: User) {
        self.inner.write().unwrap().users.insert(user.id, user);
    }

    pub fn get_user(&self, id: Uuid) -> Option<User> {
        self.inner.read().unwrap().users.get(&id).cloned()
    }

    pub fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.inner.read().unwrap().users.values().cloned().collect();
        users.sort_by_key(|u| (u.date_joined, u.id));
        users
    }

    // Athlete info

    pub fn get_athlete_info(&self, user_id: Uuid) -> Option<AthleteInfo> {
        self.inner
            .read()
            .unwrap()
            .athlete_info
            .get(&user_id)
            .cloned()
    }

    pub fn upsert_athlete_info(&self, info: AthleteInfo) -> bool {
        self.inner
            .write()
            .unwrap()
            .athlete_info
            .insert(info.user_id, info)
            .is_none()
    }

    // Runs

    pub fn insert_run(&self, run: Run) {
        self.inner.write().unwrap().runs.insert(run.id, run);
    }

    pub fn get_run(&self, id: Uuid) -> Option<Run> {
        self.inner.read().unwrap().runs.get(&id).cloned()
    }

    pub fn update_run(&self, run: Run) {
        self.inner.write().unwrap().runs.insert(run.id, run);
    }

    pub fn list_runs(&self) -> Vec<Run> {
        let mut runs: Vec<Run> = self.inner.read().unwrap().runs.values().cloned().collect();
        runs.sort_by_key(|r| (r.created_at, r.id));
        runs
    }

    pub fn finished_runs_of(&self, athlete_id: Uuid) -> Vec<Run> {
        self.inner
            .read()
            .unwrap()
            .runs
            .values()
            .filter(|r| r.athlete_id == athlete_id && r.status == RunStatus::Finished)
            .cloned()
            .collect()
    }

    pub fn count_finished_runs(&self, athlete_id: Uuid) -> i64 {
        self.inner
            .read()
            .unwrap()
            .runs
            .values()
            .filter(|r| r.athlete_id == athlete_id && r.status == RunStatus::Finished)
            .count() as i64
    }

    pub fn sum_finished_distance(&self, athlete_id: Uuid) -> f64 {
        self.inner
            .read()
            .unwrap()
            .runs
            .values()
            .filter(|r| r.athlete_id == athlete_id && r.status == RunStatus::Finished)
            .filter_map(|r| r.distance)
            .sum()
    }

    // Positions

    pub fn push_position(&self, position: Position) {
        self.inner
            .write()
            .unwrap()
            .positions
            .entry(position.run_id)
            .or_default()
            .push(position);
    }

    pub fn last_position(&self, run_id: Uuid) -> Option<Position> {
        self.inner
            .read()
            .unwrap()
            .positions
            .get(&run_id)
            .and_then(|v| v.last())
            .cloned()
    }

    /// Positions in insertion order, the order incremental speed and
    /// cumulative distance are defined against.
    pub fn positions_of(&self, run_id: Uuid) -> Vec<Position> {
        self.inner
            .read()
            .unwrap()
            .positions
            .get(&run_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn positions_by_time(&self, run_id: Uuid) -> Vec<Position> {
        let mut positions = self
            .inner
            .read()
            .unwrap()
            .positions
            .get(&run_id)
            .cloned()
            .unwrap_or_default();
        positions.sort_by_key(|p| p.timestamp);
        positions
    }

    // Challenges

    pub fn insert_challenge(&self, athlete_id: Uuid, full_name: &str) {
        self.inner.write().unwrap().challenges.push(Challenge {
            id: Uuid::new_v4(),
            athlete_id,
            full_name: full_name.to_string(),
        });
    }

    /// Conditional insert: grants only if the (athlete, full_name) pair is
    /// not already present. Read and write happen under one write lock, so
    /// concurrent finishes cannot double-grant.
    pub fn insert_challenge_once(&self, athlete_id: Uuid, full_name: &str) -> bool {
        let mut tables = self.inner.write().unwrap();
        let already = tables
            .challenges
            .iter()
            .any(|c| c.athlete_id == athlete_id && c.full_name == full_name);
        if already {
            return false;
        }
        tables.challenges.push(Challenge {
            id: Uuid::new_v4(),
            athlete_id,
            full_name: full_name.to_string(),
        });
        true
    }

    pub fn list_challenges(&self, athlete_id: Option<Uuid>) -> Vec<Challenge> {
        self.inner
            .read()
            .unwrap()
            .challenges
            .iter()
            .filter(|c| athlete_id.is_none_or(|id| c.athlete_id == id))
            .cloned()
            .collect()
    }

    // Collectibles

    pub fn insert_collectible(&self, item: CollectibleItem) {
        self.inner
            .write()
            .unwrap()
            .collectibles
            .insert(item.id, item);
    }

    pub fn list_collectibles(&self) -> Vec<CollectibleItem> {
        let mut items: Vec<CollectibleItem> = self
            .inner
            .read()
            .unwrap()
            .collectibles
            .values()
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        items
    }

    /// Many-to-many add. Returns false when the athlete already owns the
    /// item, which makes repeated pickups a no-op.
    pub fn acquire_collectible(&self, item_id: Uuid, athlete_id: Uuid) -> bool {
        let mut tables = self.inner.write().unwrap();
        match tables.collectibles.get_mut(&item_id) {
            Some(item) => item.acquired_by.insert(athlete_id),
            None => false,
        }
    }

    // Subscriptions

    /// Last write wins: any previous link for the pair is replaced.
    pub fn upsert_subscribe(&self, coach_id: Uuid, athlete_id: Uuid) {
        let mut tables = self.inner.write().unwrap();
        tables
            .subscribes
            .retain(|s| !(s.coach_id == coach_id && s.athlete_id == athlete_id));
        tables.subscribes.push(Subscribe {
            coach_id,
            athlete_id,
            rating: None,
        });
    }

    /// Sets the rating on an existing link. Returns false when the athlete
    /// is not subscribed to the coach.
    pub fn set_rating(&self, coach_id: Uuid, athlete_id: Uuid, rating: f64) -> bool {
        let mut tables = self.inner.write().unwrap();
        for s in tables.subscribes.iter_mut() {
            if s.coach_id == coach_id && s.athlete_id == athlete_id {
                s.rating = Some(rating);
                return true;
            }
        }
        false
    }

    pub fn subscribers_of(&self, coach_id: Uuid) -> Vec<Uuid> {
        let mut athletes: Vec<Uuid> = self
            .inner
            .read()
            .unwrap()
            .subscribes
            .iter()
            .filter(|s| s.coach_id == coach_id)
            .map(|s| s.athlete_id)
            .collect();
        athletes.sort();
        athletes
    }

    pub fn ratings_of(&self, coach_id: Uuid) -> Vec<f64> {
        self.inner
            .read()
            .unwrap()
            .subscribes
            .iter()
            .filter(|s| s.coach_id == coach_id)
            .filter_map(|s| s.rating)
            .collect()
    }

    pub fn coach_of(&self, athlete_id: Uuid) -> Option<Uuid> {
        self.inner
            .read()
            .unwrap()
            .subscribes
            .iter()
            .rev()
            .find(|s| s.athlete_id == athlete_id)
            .map(|s| s.coach_id)
    }

    pub fn users_with_role(&self, role: Role) -> Vec<User> {
        self.list_users()
            .into_iter()
            .filter(|u| u.role == role)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn challenge_once_is_conditional() {
        let store = Store::new();
        let athlete = Uuid::new_v4();
        assert!(store.insert_challenge_once(athlete, "Пробеги 50 километров!"));
        assert!(!store.insert_challenge_once(athlete, "Пробеги 50 километров!"));
        assert_eq!(store.list_challenges(Some(athlete)).len(), 1);
    }

    #[test]
    fn subscribe_last_write_wins() {
        let store = Store::new();
        let coach = Uuid::new_v4();
        let athlete = Uuid::new_v4();
        store.upsert_subscribe(coach, athlete);
        assert!(store.set_rating(coach, athlete, 4.5));
        // Re-subscribing replaces the link and clears the rating.
        store.upsert_subscribe(coach, athlete);
        assert_eq!(store.subscribers_of(coach), vec![athlete]);
        assert!(store.ratings_of(coach).is_empty());
    }

    #[test]
    fn rating_requires_link() {
        let store = Store::new();
        assert!(!store.set_rating(Uuid::new_v4(), Uuid::new_v4(), 3.0));
    }

    #[test]
    fn users_sorted_and_filtered_by_role() {
        let store = Store::new();
        let coach = User::new("c".into(), "C".into(), "C".into(), Role::Coach);
        let athlete = User::new("a".into(), "A".into(), "A".into(), Role::Athlete);
        store.insert_user(coach.clone());
        store.insert_user(athlete.clone());
        assert_eq!(store.list_users().len(), 2);
        let coaches = store.users_with_role(Role::Coach);
        assert_eq!(coaches.len(), 1);
        assert_eq!(coaches[0].id, coach.id);
    }
}
