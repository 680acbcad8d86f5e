//! # Inbound Port - AlertsApi
//!
//! Primary driving port for the alert subsystem: creation, lifecycle
//! transitions, the expiry sweep entry point, and proximity queries.

use crate::domain::{AlertAction, AlertError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{Actor, Alert, AlertId, AlertSeverity, AlertSource, Timestamp};

/// Caller-supplied fields for a new alert.
///
/// Coordinates and radius arrive raw; the service validates them and clamps
/// the radius into the allowed band. `source` is [`AlertSource::Manual`] for
/// operator-issued alerts; the escalation path sets the originating report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlertInput {
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub lat: f64,
    pub lng: f64,
    pub radius_m: f64,
    #[serde(default = "default_source")]
    pub source: AlertSource,
    /// When set, the expiry sweep retires the alert past this time.
    pub effective_until: Option<Timestamp>,
}

fn default_source() -> AlertSource {
    AlertSource::Manual
}

/// Primary API for the alert subsystem.
#[async_trait]
pub trait AlertsApi: Send + Sync {
    /// Validates and stores a new active alert, announcing it to nearby
    /// connections.
    ///
    /// # Errors
    /// - `Unauthorized`: caller's role is not privileged
    /// - `Validation`: blank title or an effective window already over
    /// - `InvalidLocation`: bad coordinates or radius
    async fn create_alert(
        &self,
        input: CreateAlertInput,
        actor: Actor,
    ) -> Result<Alert, AlertError>;

    /// Applies a lifecycle action.
    ///
    /// Resolve/Cancel/Expire require the alert to be Active; Reactivate
    /// requires an admin (or the system) and a terminal alert. `reason` is
    /// recorded in the log stream only.
    ///
    /// # Errors
    /// - `NotFound`, `Unauthorized`, `InvalidTransition`
    async fn transition_alert(
        &self,
        alert_id: AlertId,
        action: AlertAction,
        actor: Actor,
        reason: Option<String>,
    ) -> Result<Alert, AlertError>;

    /// Fetches an alert by id.
    async fn get_alert(&self, alert_id: AlertId) -> Result<Alert, AlertError>;

    /// Active alerts whose center lies within `radius_m` meters of the
    /// given point (inclusive).
    async fn active_alerts_near(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
    ) -> Result<Vec<Alert>, AlertError>;

    /// Expires every active alert whose effective window ended before
    /// `now`. Called periodically by the runtime sweep; returns the ids
    /// that were retired.
    async fn expire_due(&self, now: Timestamp) -> Result<Vec<AlertId>, AlertError>;
}
