//! Collectible proximity detection.
//!
//! Runs on every successful position append: a full catalog scan testing
//! great-circle distance against the pickup radius. O(items) per position
//! is fine at catalog sizes in the low thousands; swap in a spatial index
//! behind `check_proximity` if the catalog outgrows that.

use tracing::info;
use uuid::Uuid;

use crate::{geo_math, models::Position, store::Store};

pub const PICKUP_RADIUS_METERS: f64 = 100.0;

/// Ids of all catalog items strictly within the pickup radius of the
/// position.
pub fn check_proximity(store: &Store, position: &Position) -> Vec<Uuid> {
    let here = (position.latitude, position.longitude);
    store
        .list_collectibles()
        .into_iter()
        .filter(|item| geo_math::distance_meters(here, (item.latitude, item.longitude)) < PICKUP_RADIUS_METERS)
        .map(|item| item.id)
        .collect()
}

/// Grant every in-range item to the athlete. Re-granting an owned item is
/// a no-op.
pub fn process_position(store: &Store, athlete_id: Uuid, position: &Position) {
    for item_id in check_proximity(store, position) {
        if store.acquire_collectible(item_id, athlete_id) {
            info!(%athlete_id, %item_id, "collectible picked up");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CollectibleItem;
    use std::collections::BTreeSet;
    use time::OffsetDateTime;

    fn item_at(latitude: f64, longitude: f64) -> CollectibleItem {
        CollectibleItem {
            id: Uuid::new_v4(),
            name: "coin".into(),
            uid: "coin-1".into(),
            latitude,
            longitude,
            picture: String::new(),
            value: 10,
            acquired_by: BTreeSet::new(),
        }
    }

    fn position_at(latitude: f64, longitude: f64) -> Position {
        Position {
            id: Uuid::new_v4(),
            run_id: Uuid::new_v4(),
            latitude,
            longitude,
            timestamp: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
            speed: 0.0,
            distance: 0.0,
        }
    }

    // ~1 degree of latitude is ~111.2 km, so 0.00089 deg is ~99 m.
    const NEAR_OFFSET: f64 = 0.00089;
    const FAR_OFFSET: f64 = 0.00091;

    #[test]
    fn within_radius_is_detected() {
        let store = Store::new();
        let item = item_at(55.0, 37.0);
        store.insert_collectible(item.clone());

        let hits = check_proximity(&store, &position_at(55.0 + NEAR_OFFSET, 37.0));
        assert_eq!(hits, vec![item.id]);
    }

    #[test]
    fn outside_radius_is_not_detected() {
        let store = Store::new();
        store.insert_collectible(item_at(55.0, 37.0));

        let hits = check_proximity(&store, &position_at(55.0 + FAR_OFFSET, 37.0));
        assert!(hits.is_empty());
    }

    #[test]
    fn pickup_is_idempotent() {
        let store = Store::new();
        let item = item_at(55.0, 37.0);
        let athlete_id = Uuid::new_v4();
        store.insert_collectible(item.clone());

        let position = position_at(55.0 + NEAR_OFFSET, 37.0);
        process_position(&store, athlete_id, &position);
        process_position(&store, athlete_id, &position);

        let items = store.list_collectibles();
        assert_eq!(items[0].acquired_by.len(), 1);
        assert!(items[0].acquired_by.contains(&athlete_id));
    }

    #[test]
    fn scan_covers_the_whole_catalog() {
        let store = Store::new();
        let near_a = item_at(55.0, 37.0);
        let near_b = item_at(55.0 + NEAR_OFFSET / 2.0, 37.0);
        store.insert_collectible(near_a.clone());
        store.insert_collectible(near_b.clone());
        store.insert_collectible(item_at(56.0, 37.0));

        let mut hits = check_proximity(&store, &position_at(55.0, 37.0));
        hits.sort();
        let mut expected = vec![near_a.id, near_b.id];
        expected.sort();
        assert_eq!(hits, expected);
    }
}
