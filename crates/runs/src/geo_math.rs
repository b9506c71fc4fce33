//! Great-circle distance over (latitude, longitude) pairs.
//!
//! Pure functions with no validation of their own: coordinate ranges are
//! enforced at the request boundary before any of these are called.

use geo::{Distance as _, Haversine, geometry::Point};

/// A (latitude, longitude) pair in degrees.
pub type Coord = (f64, f64);

/// Great-circle distance in meters (haversine, mean Earth radius).
pub fn distance_meters(a: Coord, b: Coord) -> f64 {
    // geo points are (x, y) = (lon, lat)
    Haversine.distance(Point::new(a.1, a.0), Point::new(b.1, b.0))
}

/// Great-circle distance in kilometers.
pub fn distance_km(a: Coord, b: Coord) -> f64 {
    distance_meters(a, b) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_to_self() {
        let p = (55.7558, 37.6176);
        assert_eq!(distance_meters(p, p), 0.0);
    }

    #[test]
    fn symmetry() {
        let a = (55.7558, 37.6176);
        let b = (59.9343, 30.3351);
        let ab = distance_meters(a, b);
        let ba = distance_meters(b, a);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_latitude() {
        // One degree of latitude is ~111.2 km on a mean-radius sphere.
        let d = distance_km((55.0, 37.0), (56.0, 37.0));
        assert!((d - 111.2).abs() < 0.5, "got {d}");
    }

    #[test]
    fn meters_and_km_agree() {
        let a = (55.0, 37.0);
        let b = (55.01, 37.01);
        assert!((distance_meters(a, b) / 1000.0 - distance_km(a, b)).abs() < 1e-9);
    }
}
