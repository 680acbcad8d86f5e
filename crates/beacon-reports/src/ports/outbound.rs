//! Outbound (Driven) ports for the report subsystem.
//!
//! These traits define what the subsystem needs from the outside world:
//! a durable report store and an alert issuer to call when a report
//! crosses the confirmation threshold.

use async_trait::async_trait;
use shared_types::{Alert, AlertSeverity, Report, ReportId, StoreError};

/// Persistence interface for reports.
///
/// The production adapter is expected to be a database; the in-memory
/// adapter in this crate backs tests and single-process deployments.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Stores a new report.
    async fn insert(&self, report: Report) -> Result<(), StoreError>;

    /// Fetches a report by id.
    ///
    /// # Errors
    /// `NotFound` if no report has this id.
    async fn get(&self, report_id: ReportId) -> Result<Report, StoreError>;

    /// Writes back a modified report, compare-and-swap on `version`.
    ///
    /// The stored version must equal `report.version`; on success the
    /// version is bumped and the updated report returned.
    ///
    /// # Errors
    /// - `NotFound` if the report disappeared
    /// - `VersionConflict` if a concurrent write won the race
    async fn update(&self, report: Report) -> Result<Report, StoreError>;

    /// All stored reports.
    async fn list(&self) -> Result<Vec<Report>, StoreError>;
}

/// Gateway to the alert subsystem, called when a report is verified.
///
/// The runtime wires this to the alert service; the report service never
/// depends on it directly.
#[async_trait]
pub trait AlertIssuer: Send + Sync {
    /// Issues the alert for a community-verified report.
    async fn issue_for_report(
        &self,
        report: &Report,
        severity: AlertSeverity,
    ) -> Result<Alert, StoreError>;
}

/// Mock issuer for testing: counts calls, optionally fails.
#[cfg(test)]
pub struct MockAlertIssuer {
    issued: std::sync::atomic::AtomicUsize,
    fail: bool,
}

#[cfg(test)]
impl MockAlertIssuer {
    pub fn new() -> Self {
        Self {
            issued: std::sync::atomic::AtomicUsize::new(0),
            fail: false,
        }
    }

    /// An issuer whose every call fails, as if the alert store were down.
    pub fn failing() -> Self {
        Self {
            issued: std::sync::atomic::AtomicUsize::new(0),
            fail: true,
        }
    }

    /// How many alerts were requested (including failed attempts).
    pub fn issued(&self) -> usize {
        self.issued.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl AlertIssuer for MockAlertIssuer {
    async fn issue_for_report(
        &self,
        report: &Report,
        severity: AlertSeverity,
    ) -> Result<Alert, StoreError> {
        use shared_types::geo::REPORT_EFFECT_RADIUS_M;
        use shared_types::{AlertId, AlertMetadata, AlertSource, AlertStatus, TargetArea};

        self.issued.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.fail {
            return Err(StoreError::Backend("alert store unavailable".into()));
        }

        Ok(Alert {
            id: AlertId::new(),
            title: "escalated report".into(),
            description: report.description.clone(),
            severity,
            area: TargetArea::new(report.location, REPORT_EFFECT_RADIUS_M),
            status: AlertStatus::Active,
            source: AlertSource::Report {
                report_id: report.id,
            },
            metadata: AlertMetadata {
                community_verified: true,
                admin_verified: false,
            },
            effective_until: None,
            created_at: report.updated_at,
            updated_at: report.updated_at,
            version: 0,
        })
    }
}
