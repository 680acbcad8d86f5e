//! # Dispatch Events
//!
//! Defines the state-change events that flow through the proximity broker.
//! Every event carries a full entity snapshot plus enough geometry (origin
//! point and effect radius) for the broker to decide who hears about it.

use serde::{Deserialize, Serialize};
use shared_types::geo::REPORT_EFFECT_RADIUS_M;
use shared_types::{Alert, AlertSeverity, GeoPoint, Report};

/// All events that can be published to the proximity broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DispatchEvent {
    /// A community report was submitted.
    NewReport(Report),

    /// A report crossed the confirmation threshold and was verified.
    ReportVerified(Report),

    /// An alert became active (escalated or manually issued).
    NewAlert(Alert),

    /// An alert changed without reaching resolution (expired, reactivated,
    /// severity adjusted).
    AlertUpdated(Alert),

    /// An alert was resolved by a privileged actor.
    AlertResolved(Alert),

    /// An alert was cancelled by a privileged actor.
    AlertCancelled(Alert),
}

impl DispatchEvent {
    /// Discriminant for filtering and logging.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::NewReport(_) => EventKind::NewReport,
            Self::ReportVerified(_) => EventKind::ReportVerified,
            Self::NewAlert(_) => EventKind::NewAlert,
            Self::AlertUpdated(_) => EventKind::AlertUpdated,
            Self::AlertResolved(_) => EventKind::AlertResolved,
            Self::AlertCancelled(_) => EventKind::AlertCancelled,
        }
    }

    /// Geographic origin used for the in-range decision.
    #[must_use]
    pub fn origin(&self) -> GeoPoint {
        match self {
            Self::NewReport(report) | Self::ReportVerified(report) => report.location,
            Self::NewAlert(alert)
            | Self::AlertUpdated(alert)
            | Self::AlertResolved(alert)
            | Self::AlertCancelled(alert) => alert.area.center,
        }
    }

    /// Effect radius in meters.
    ///
    /// Alert events use the alert's own clamped area radius; report events
    /// carry no area and use the shared report fan-out default.
    #[must_use]
    pub fn effect_radius_m(&self) -> f64 {
        match self {
            Self::NewReport(_) | Self::ReportVerified(_) => REPORT_EFFECT_RADIUS_M,
            Self::NewAlert(alert)
            | Self::AlertUpdated(alert)
            | Self::AlertResolved(alert)
            | Self::AlertCancelled(alert) => alert.area.radius_m,
        }
    }

    /// Severity, for alert events.
    #[must_use]
    pub fn severity(&self) -> Option<AlertSeverity> {
        match self {
            Self::NewReport(_) | Self::ReportVerified(_) => None,
            Self::NewAlert(alert)
            | Self::AlertUpdated(alert)
            | Self::AlertResolved(alert)
            | Self::AlertCancelled(alert) => Some(alert.severity),
        }
    }
}

/// Event discriminants, used for filtering and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    NewReport,
    ReportVerified,
    NewAlert,
    AlertUpdated,
    AlertResolved,
    AlertCancelled,
}
