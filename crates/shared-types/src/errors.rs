//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// Errors from geographic validation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("Invalid latitude: {0} (must be finite, within [-90, 90])")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not finite.
    #[error("Invalid longitude: {0} (must be finite, within [-180, 180])")]
    InvalidLongitude(f64),

    /// Radius not finite or not strictly positive.
    #[error("Invalid radius: {0} m (must be finite and positive)")]
    InvalidRadius(f64),
}

/// Errors from a persistence adapter.
///
/// `VersionConflict` signals a lost optimistic-concurrency race; services
/// retry it internally and never surface it to callers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// No entity with the given id.
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// The write raced a concurrent update.
    #[error("Version conflict: expected {expected}, found {found}")]
    VersionConflict { expected: u64, found: u64 },

    /// The backing store failed.
    #[error("Store backend error: {0}")]
    Backend(String),
}
