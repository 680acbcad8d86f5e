//! # Spatial Index
//!
//! Keyed in-memory point set answering "which entries lie within `r` meters
//! of this origin". A cheap bounding-box prefilter discards points that are
//! clearly out of range before the exact great-circle test runs; the
//! prefilter is an optimization only and every returned key has passed
//! [`haversine_m`](crate::geo::haversine_m).

use crate::geo::{haversine_m, GeoPoint};
use std::collections::HashMap;
use std::hash::Hash;

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = 111_195.0;

/// Keyed point set with radius queries.
///
/// Inserting an existing key overwrites its point.
#[derive(Debug, Clone)]
pub struct SpatialIndex<K> {
    points: HashMap<K, GeoPoint>,
}

impl<K> SpatialIndex<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: HashMap::new(),
        }
    }

    /// Registers or moves an entry.
    pub fn insert(&mut self, key: K, point: GeoPoint) {
        self.points.insert(key, point);
    }

    /// Removes an entry. Returns its last point if it existed.
    pub fn remove(&mut self, key: &K) -> Option<GeoPoint> {
        self.points.remove(key)
    }

    /// Current point of an entry.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&GeoPoint> {
        self.points.get(key)
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Keys of all entries within `radius_m` meters of `origin` (inclusive).
    #[must_use]
    pub fn nearby(&self, origin: &GeoPoint, radius_m: f64) -> Vec<K> {
        let prefilter = BoundingBox::around(origin, radius_m);
        self.points
            .iter()
            .filter(|(_, point)| prefilter.may_contain(point))
            .filter(|(_, point)| haversine_m(origin, point) <= radius_m)
            .map(|(key, _)| key.clone())
            .collect()
    }
}

impl<K> Default for SpatialIndex<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Conservative degree-space box around an origin.
///
/// Over-approximates near the poles and across the antimeridian (falls back
/// to accepting everything there); never under-approximates, so the exact
/// test downstream stays authoritative.
#[derive(Debug, Clone, Copy)]
struct BoundingBox {
    lat_min: f64,
    lat_max: f64,
    lng_min: f64,
    lng_max: f64,
    /// Set when the box cannot be represented as a simple interval.
    degenerate: bool,
}

impl BoundingBox {
    fn around(origin: &GeoPoint, radius_m: f64) -> Self {
        let lat_delta = radius_m / METERS_PER_DEGREE;
        let cos_lat = origin.lat.to_radians().cos();

        // Longitude degrees shrink with latitude; near the poles the box
        // would wrap the globe, so stop pretending it filters anything.
        if cos_lat < 0.01 {
            return Self {
                lat_min: -90.0,
                lat_max: 90.0,
                lng_min: -180.0,
                lng_max: 180.0,
                degenerate: true,
            };
        }
        let lng_delta = radius_m / (METERS_PER_DEGREE * cos_lat);

        let lng_min = origin.lng - lng_delta;
        let lng_max = origin.lng + lng_delta;
        // Antimeridian crossing: an interval test would wrongly exclude.
        let degenerate = lng_min < -180.0 || lng_max > 180.0;

        Self {
            lat_min: origin.lat - lat_delta,
            lat_max: origin.lat + lat_delta,
            lng_min,
            lng_max,
            degenerate,
        }
    }

    fn may_contain(&self, point: &GeoPoint) -> bool {
        if self.degenerate {
            return true;
        }
        point.lat >= self.lat_min
            && point.lat <= self.lat_max
            && point.lng >= self.lng_min
            && point.lng <= self.lng_max
    }
}
