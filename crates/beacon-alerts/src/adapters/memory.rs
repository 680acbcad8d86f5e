//! # In-Memory Alert Store
//!
//! Versioned map adapter for the [`AlertStore`] port, mirroring the report
//! store's optimistic-concurrency contract.

use crate::ports::outbound::AlertStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Alert, AlertId, StoreError};
use std::collections::HashMap;

/// Optimistic-concurrency store over a guarded map.
#[derive(Default)]
pub struct InMemoryAlertStore {
    alerts: RwLock<HashMap<AlertId, Alert>>,
}

impl InMemoryAlertStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored alerts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.read().len()
    }

    /// True if no alerts are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.read().is_empty()
    }
}

#[async_trait]
impl AlertStore for InMemoryAlertStore {
    async fn insert(&self, alert: Alert) -> Result<(), StoreError> {
        let mut alerts = self.alerts.write();
        if alerts.contains_key(&alert.id) {
            return Err(StoreError::Backend(format!(
                "duplicate alert id {}",
                alert.id
            )));
        }
        alerts.insert(alert.id, alert);
        Ok(())
    }

    async fn get(&self, alert_id: AlertId) -> Result<Alert, StoreError> {
        self.alerts
            .read()
            .get(&alert_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(alert_id.to_string()))
    }

    async fn update(&self, mut alert: Alert) -> Result<Alert, StoreError> {
        let mut alerts = self.alerts.write();
        let current = alerts
            .get(&alert.id)
            .ok_or_else(|| StoreError::NotFound(alert.id.to_string()))?;

        if current.version != alert.version {
            return Err(StoreError::VersionConflict {
                expected: alert.version,
                found: current.version,
            });
        }

        alert.version += 1;
        alerts.insert(alert.id, alert.clone());
        Ok(alert)
    }

    async fn list(&self) -> Result<Vec<Alert>, StoreError> {
        Ok(self.alerts.read().values().cloned().collect())
    }
}
