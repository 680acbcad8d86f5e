//! # Escalation Issuer
//!
//! Implements the report subsystem's [`AlertIssuer`] port on top of the
//! alert subsystem's API. Escalated alerts are created by the system actor,
//! centered on the report, with the shared report fan-out radius.

use async_trait::async_trait;
use beacon_alerts::{AlertsApi, CreateAlertInput};
use beacon_reports::AlertIssuer;
use shared_types::geo::REPORT_EFFECT_RADIUS_M;
use shared_types::{Actor, Alert, AlertSeverity, AlertSource, Report, ReportCategory, StoreError};
use std::sync::Arc;

/// Bridges report escalation into the alert subsystem.
pub struct EscalationIssuer<A: AlertsApi> {
    alerts: Arc<A>,
}

impl<A: AlertsApi> EscalationIssuer<A> {
    pub fn new(alerts: Arc<A>) -> Self {
        Self { alerts }
    }
}

#[async_trait]
impl<A: AlertsApi> AlertIssuer for EscalationIssuer<A> {
    async fn issue_for_report(
        &self,
        report: &Report,
        severity: AlertSeverity,
    ) -> Result<Alert, StoreError> {
        let input = CreateAlertInput {
            title: escalation_title(report.category),
            description: report.description.clone(),
            severity,
            lat: report.location.lat,
            lng: report.location.lng,
            radius_m: REPORT_EFFECT_RADIUS_M,
            source: AlertSource::Report {
                report_id: report.id,
            },
            effective_until: None,
        };

        self.alerts
            .create_alert(input, Actor::system())
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

fn escalation_title(category: ReportCategory) -> String {
    let noun = match category {
        ReportCategory::Fire => "fire",
        ReportCategory::Flood => "flooding",
        ReportCategory::Accident => "accident",
        ReportCategory::Crime => "crime",
        ReportCategory::Medical => "medical emergency",
        ReportCategory::Hazard => "hazard",
        ReportCategory::Other => "incident",
    };
    format!("Community-verified {noun}")
}
