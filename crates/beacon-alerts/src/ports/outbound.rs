//! Outbound (Driven) ports for the alert subsystem.
//!
//! The only dependency is a persistence adapter; event publication goes
//! through the dispatch crate's `EventSink`.

use async_trait::async_trait;
use shared_types::{Alert, AlertId, StoreError};

/// Persistence interface for alerts.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Stores a new alert.
    async fn insert(&self, alert: Alert) -> Result<(), StoreError>;

    /// Fetches an alert by id.
    ///
    /// # Errors
    /// `NotFound` if no alert has this id.
    async fn get(&self, alert_id: AlertId) -> Result<Alert, StoreError>;

    /// Writes back a modified alert, compare-and-swap on `version`.
    ///
    /// # Errors
    /// - `NotFound` if the alert disappeared
    /// - `VersionConflict` if a concurrent write won the race
    async fn update(&self, alert: Alert) -> Result<Alert, StoreError>;

    /// All stored alerts.
    async fn list(&self) -> Result<Vec<Alert>, StoreError>;
}
