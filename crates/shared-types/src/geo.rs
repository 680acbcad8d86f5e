//! # Geographic Primitives
//!
//! One shared great-circle distance function backs every radius decision in
//! the system: vote verification, alert effect areas, and proximity fan-out
//! all call [`haversine_m`]. Radii up to 50 km make a planar approximation
//! materially wrong, so the exact spherical formula is mandatory.
//!
//! All radius defaults live here as named constants; call sites never carry
//! their own distance literals.

use crate::errors::GeoError;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Maximum voter-to-report distance for a vote to count.
pub const VOTE_RADIUS_M: f64 = 2_000.0;

/// Fan-out radius for report events (reports carry no area of their own).
pub const REPORT_EFFECT_RADIUS_M: f64 = 10_000.0;

/// Smallest allowed alert effect radius.
pub const MIN_ALERT_RADIUS_M: f64 = 100.0;

/// Largest allowed alert effect radius.
pub const MAX_ALERT_RADIUS_M: f64 = 50_000.0;

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Validates and builds a point.
    ///
    /// # Errors
    /// - `InvalidLatitude` if `lat` is not finite or outside [-90, 90]
    /// - `InvalidLongitude` if `lng` is not finite or outside [-180, 180]
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::InvalidLatitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(GeoError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Great-circle distance to another point in meters.
    #[must_use]
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        haversine_m(self, other)
    }

    /// True if `other` lies within `radius_m` meters (inclusive).
    #[must_use]
    pub fn within_m(&self, other: &GeoPoint, radius_m: f64) -> bool {
        haversine_m(self, other) <= radius_m
    }
}

/// Great-circle distance between two points in meters (haversine formula).
#[must_use]
pub fn haversine_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Validates a caller-supplied radius: finite and strictly positive.
///
/// # Errors
/// `InvalidRadius` otherwise.
pub fn validate_radius_m(radius_m: f64) -> Result<f64, GeoError> {
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(GeoError::InvalidRadius(radius_m));
    }
    Ok(radius_m)
}
