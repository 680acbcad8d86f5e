//! # Beacon Node
//!
//! Wires the subsystems together (in-memory stores, proximity broker,
//! services) and exposes the operation surface the transport layer calls.
//! Everything is explicitly constructed with application-managed lifetime;
//! nothing lives in a process-global registry.

use crate::adapters::EscalationIssuer;
use beacon_alerts::{AlertAction, AlertError, AlertService, AlertsApi, CreateAlertInput, InMemoryAlertStore};
use beacon_dispatch::{ConnectionHandle, ProximityBroker};
use beacon_reports::{
    InMemoryReportStore, ModerationAction, ReportError, ReportService, ReportsApi,
    SubmitReportInput, VoteReceipt,
};
use shared_types::{
    Actor, Alert, AlertId, Clock, ConnectionId, GeoError, GeoPoint, Report, ReportId, SystemClock,
    VoteValue,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Concrete alert service as wired by this node.
pub type Alerts = AlertService<InMemoryAlertStore, ProximityBroker>;

/// Concrete report service as wired by this node.
pub type Reports = ReportService<InMemoryReportStore, EscalationIssuer<Alerts>, ProximityBroker>;

/// A fully wired Beacon node.
pub struct BeaconNode {
    broker: Arc<ProximityBroker>,
    reports: Arc<Reports>,
    alerts: Arc<Alerts>,
    clock: Arc<dyn Clock>,
}

impl BeaconNode {
    /// How often the expiry sweep runs unless configured otherwise.
    pub const DEFAULT_SWEEP_PERIOD: Duration = Duration::from_secs(30);

    /// Builds a node on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Builds a node on a caller-supplied clock (deterministic in tests).
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let broker = Arc::new(ProximityBroker::new());

        let alerts = Arc::new(AlertService::new(
            Arc::new(InMemoryAlertStore::new()),
            broker.clone(),
            clock.clone(),
        ));
        let reports = Arc::new(ReportService::new(
            Arc::new(InMemoryReportStore::new()),
            Arc::new(EscalationIssuer::new(alerts.clone())),
            broker.clone(),
            clock.clone(),
        ));

        Self {
            broker,
            reports,
            alerts,
            clock,
        }
    }

    // -------------------------------------------------------------------------
    // Reports
    // -------------------------------------------------------------------------

    /// Submits a new community report.
    pub async fn submit_report(
        &self,
        input: SubmitReportInput,
        reporter: Actor,
    ) -> Result<Report, ReportError> {
        self.reports.submit_report(input, reporter).await
    }

    /// Casts (or replaces) a vote on a report.
    pub async fn vote(
        &self,
        report_id: ReportId,
        voter: Actor,
        value: VoteValue,
        lat: f64,
        lng: f64,
    ) -> Result<VoteReceipt, ReportError> {
        self.reports
            .cast_vote(report_id, voter, value, lat, lng)
            .await
    }

    /// Applies a privileged moderation action to a report.
    pub async fn moderate_report(
        &self,
        report_id: ReportId,
        action: ModerationAction,
        actor: Actor,
    ) -> Result<Report, ReportError> {
        self.reports.moderate(report_id, action, actor).await
    }

    /// Reports within `radius_m` meters of a point.
    pub async fn reports_near(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
    ) -> Result<Vec<Report>, ReportError> {
        self.reports.reports_near(lat, lng, radius_m).await
    }

    // -------------------------------------------------------------------------
    // Alerts
    // -------------------------------------------------------------------------

    /// Creates an alert on behalf of a privileged actor.
    pub async fn create_alert(
        &self,
        input: CreateAlertInput,
        actor: Actor,
    ) -> Result<Alert, AlertError> {
        self.alerts.create_alert(input, actor).await
    }

    /// Applies a lifecycle action to an alert.
    pub async fn transition_alert(
        &self,
        alert_id: AlertId,
        action: AlertAction,
        actor: Actor,
        reason: Option<String>,
    ) -> Result<Alert, AlertError> {
        self.alerts
            .transition_alert(alert_id, action, actor, reason)
            .await
    }

    /// Active alerts within `radius_m` meters of a point.
    pub async fn active_alerts_near(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
    ) -> Result<Vec<Alert>, AlertError> {
        self.alerts.active_alerts_near(lat, lng, radius_m).await
    }

    // -------------------------------------------------------------------------
    // Connections
    // -------------------------------------------------------------------------

    /// Registers a client connection at a point; the transport forwards
    /// whatever the returned handle yields.
    pub fn join(
        &self,
        connection_id: ConnectionId,
        lat: f64,
        lng: f64,
    ) -> Result<ConnectionHandle, GeoError> {
        Ok(self.broker.join(connection_id, GeoPoint::new(lat, lng)?))
    }

    /// Moves a registered connection. Returns false if it is not registered.
    pub fn update_location(
        &self,
        connection_id: ConnectionId,
        lat: f64,
        lng: f64,
    ) -> Result<bool, GeoError> {
        Ok(self
            .broker
            .update_location(connection_id, GeoPoint::new(lat, lng)?))
    }

    /// Deregisters a client connection.
    pub fn leave(&self, connection_id: ConnectionId) {
        self.broker.leave(connection_id);
    }

    // -------------------------------------------------------------------------
    // Maintenance
    // -------------------------------------------------------------------------

    /// Spawns the periodic expiry sweep. Abort the returned handle to stop.
    pub fn spawn_expiry_sweep(&self, period: Duration) -> JoinHandle<()> {
        let alerts = self.alerts.clone();
        let clock = self.clock.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match alerts.expire_due(clock.now()).await {
                    Ok(expired) if !expired.is_empty() => {
                        info!(count = expired.len(), "Expired alerts past their effective window");
                    }
                    Ok(_) => {}
                    Err(e) => error!(error = %e, "Expiry sweep failed"),
                }
            }
        })
    }

    /// The broker, for transports that attach connections directly.
    #[must_use]
    pub fn broker(&self) -> &Arc<ProximityBroker> {
        &self.broker
    }

    /// The report service, for callers that need the full inbound port.
    #[must_use]
    pub fn reports(&self) -> &Arc<Reports> {
        &self.reports
    }

    /// The alert service, for callers that need the full inbound port.
    #[must_use]
    pub fn alerts(&self) -> &Arc<Alerts> {
        &self.alerts
    }
}

impl Default for BeaconNode {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_dispatch::EventKind;
    use shared_types::{ActorRole, ManualClock, ReportCategory, UserId};

    fn citizen() -> Actor {
        Actor::new(UserId::new(), ActorRole::Citizen)
    }

    fn report_input() -> SubmitReportInput {
        SubmitReportInput {
            category: ReportCategory::Hazard,
            lat: 0.0,
            lng: 0.0,
            description: "live wire across the footpath".into(),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_escalation_reaches_nearby_connection() {
        let node = BeaconNode::with_clock(Arc::new(ManualClock::new(1_700_000_000_000)));
        let mut nearby = node.join(ConnectionId::new(), 0.0, 0.01).unwrap();
        let mut faraway = node.join(ConnectionId::new(), 40.0, -70.0).unwrap();

        let report = node.submit_report(report_input(), citizen()).await.unwrap();
        assert_eq!(
            nearby.try_recv().unwrap().unwrap().kind(),
            EventKind::NewReport
        );

        for _ in 0..4 {
            node.vote(report.id, citizen(), VoteValue::Confirm, 0.0, 0.0)
                .await
                .unwrap();
        }

        let kinds: Vec<EventKind> = std::iter::from_fn(|| nearby.try_recv().unwrap())
            .map(|event| event.kind())
            .collect();
        assert_eq!(kinds, vec![EventKind::ReportVerified, EventKind::NewAlert]);

        // Out of every effect radius: hears nothing at all.
        assert!(faraway.try_recv().unwrap().is_none());

        let alerts = node.active_alerts_near(0.0, 0.0, 15_000.0).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(
            alerts[0].source,
            shared_types::AlertSource::Report {
                report_id: report.id
            }
        );
    }

    #[tokio::test]
    async fn test_sweep_task_expires_windowed_alert() {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let node = BeaconNode::with_clock(clock.clone());

        let alert = node
            .create_alert(
                CreateAlertInput {
                    title: "Storm cell".into(),
                    description: String::new(),
                    severity: shared_types::AlertSeverity::Medium,
                    lat: 10.0,
                    lng: 10.0,
                    radius_m: 8_000.0,
                    source: shared_types::AlertSource::Manual,
                    effective_until: Some(clock.now() + 1_000),
                },
                Actor::new(UserId::new(), ActorRole::Responder),
            )
            .await
            .unwrap();

        clock.advance(5_000);
        let sweep = node.spawn_expiry_sweep(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;
        sweep.abort();

        let swept = node.alerts().get_alert(alert.id).await.unwrap();
        assert_eq!(swept.status, shared_types::AlertStatus::Expired);
    }

    #[tokio::test]
    async fn test_join_rejects_bad_coordinates() {
        let node = BeaconNode::new();
        assert!(node.join(ConnectionId::new(), 91.0, 0.0).is_err());
    }
}
