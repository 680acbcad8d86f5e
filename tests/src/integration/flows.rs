//! # Integration Test Flows
//!
//! End-to-end behavior over a fully wired [`BeaconNode`]: a vote enters the
//! ledger, may escalate into an alert, and the resulting state changes reach
//! exactly the connections inside each event's effect radius.
//!
//! ## Flows Tested
//!
//! 1. **Vote → Escalation → Fan-out**: the fourth confirm verifies the
//!    report, issues one alert, and both events reach nearby connections.
//! 2. **Geometry**: verification radius for voters, effect radius for
//!    delivery, both on the shared great-circle distance.
//! 3. **Alert lifecycle**: forward-only transitions over the operation
//!    surface, with the matching events.
//! 4. **Connection gaps**: no backlog or replay for the duration of a
//!    disconnect.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use beacon_alerts::{AlertAction, AlertError, CreateAlertInput};
    use beacon_dispatch::{directive_for, DispatchEvent, EventKind, Urgency};
    use beacon_reports::{ReportError, ReportsApi, SubmitReportInput};
    use beacon_runtime::BeaconNode;
    use shared_types::{
        Actor, ActorRole, AlertSeverity, AlertSource, AlertStatus, ConnectionId, ManualClock,
        ReportCategory, ReportStatus, UserId,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn node() -> BeaconNode {
        BeaconNode::with_clock(Arc::new(ManualClock::new(1_700_000_000_000)))
    }

    fn citizen() -> Actor {
        Actor::new(UserId::new(), ActorRole::Citizen)
    }

    fn responder() -> Actor {
        Actor::new(UserId::new(), ActorRole::Responder)
    }

    fn report_input(lat: f64, lng: f64) -> SubmitReportInput {
        SubmitReportInput {
            category: ReportCategory::Fire,
            lat,
            lng,
            description: "flames visible from the overpass".into(),
        }
    }

    fn alert_input(lat: f64, lng: f64, radius_m: f64) -> CreateAlertInput {
        CreateAlertInput {
            title: "Evacuation notice".into(),
            description: "leave the riverbank area".into(),
            severity: AlertSeverity::High,
            lat,
            lng,
            radius_m,
            source: AlertSource::Manual,
            effective_until: None,
        }
    }

    async fn next_event(
        handle: &mut beacon_dispatch::ConnectionHandle,
    ) -> DispatchEvent {
        timeout(Duration::from_millis(200), handle.recv())
            .await
            .expect("timeout waiting for event")
            .expect("mailbox closed")
    }

    // =============================================================================
    // FLOW: VOTE → ESCALATION → FAN-OUT
    // =============================================================================

    #[tokio::test]
    async fn test_fourth_confirm_escalates_and_fans_out() {
        let node = node();
        let mut nearby = node.join(ConnectionId::new(), 0.0, 0.02).unwrap();

        let report = node
            .submit_report(report_input(0.0, 0.0), citizen())
            .await
            .unwrap();
        assert_eq!(next_event(&mut nearby).await.kind(), EventKind::NewReport);

        for i in 0..3 {
            let receipt = node
                .vote(
                    report.id,
                    citizen(),
                    shared_types::VoteValue::Confirm,
                    0.0,
                    0.0,
                )
                .await
                .unwrap();
            assert_eq!(receipt.confirm, i + 1);
            assert!(!receipt.escalated);
        }

        let receipt = node
            .vote(
                report.id,
                citizen(),
                shared_types::VoteValue::Confirm,
                0.0,
                0.0,
            )
            .await
            .unwrap();
        assert!(receipt.escalated);

        let verified = next_event(&mut nearby).await;
        assert_eq!(verified.kind(), EventKind::ReportVerified);

        let new_alert = next_event(&mut nearby).await;
        assert_eq!(new_alert.kind(), EventKind::NewAlert);
        match new_alert {
            DispatchEvent::NewAlert(alert) => {
                assert_eq!(
                    alert.source,
                    AlertSource::Report {
                        report_id: report.id
                    }
                );
                assert!(alert.metadata.community_verified);
                assert_eq!(alert.severity, AlertSeverity::Medium);
            }
            other => panic!("expected NewAlert, got {other:?}"),
        }

        let stored = node.reports().get_report(report.id).await.unwrap();
        assert_eq!(stored.status, ReportStatus::Verified);
    }

    #[tokio::test]
    async fn test_voter_beyond_verification_radius_is_rejected() {
        let node = node();
        let report = node
            .submit_report(report_input(0.0, 0.0), citizen())
            .await
            .unwrap();

        // ~2.2 km east of the report; the verification radius is 2 km.
        let err = node
            .vote(
                report.id,
                citizen(),
                shared_types::VoteValue::Confirm,
                0.0,
                0.02,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::OutOfRange { .. }));
    }

    // =============================================================================
    // FLOW: EFFECT-RADIUS DELIVERY
    // =============================================================================

    #[tokio::test]
    async fn test_delivery_respects_alert_effect_radius() {
        let node = node();
        // Connection at the origin; alert centered ~5.56 km east.
        let mut handle = node.join(ConnectionId::new(), 0.0, 0.0).unwrap();

        node.create_alert(alert_input(0.0, 0.05, 5_000.0), responder())
            .await
            .unwrap();
        assert!(handle.try_recv().unwrap().is_none(), "5 km must not reach");

        node.create_alert(alert_input(0.0, 0.05, 6_000.0), responder())
            .await
            .unwrap();
        let event = next_event(&mut handle).await;
        assert_eq!(event.kind(), EventKind::NewAlert);
        assert_eq!(event.effect_radius_m(), 6_000.0);
    }

    #[tokio::test]
    async fn test_report_events_use_default_effect_radius() {
        let node = node();
        // ~8 km from the report: inside the 10 km report fan-out default.
        let mut inside = node.join(ConnectionId::new(), 0.0, 0.072).unwrap();
        // ~13 km: outside it.
        let mut outside = node.join(ConnectionId::new(), 0.0, 0.117).unwrap();

        node.submit_report(report_input(0.0, 0.0), citizen())
            .await
            .unwrap();

        assert_eq!(next_event(&mut inside).await.kind(), EventKind::NewReport);
        assert!(outside.try_recv().unwrap().is_none());
    }

    // =============================================================================
    // FLOW: ALERT LIFECYCLE OVER THE SURFACE
    // =============================================================================

    #[tokio::test]
    async fn test_lifecycle_transitions_and_events() {
        let node = node();
        let mut handle = node.join(ConnectionId::new(), 0.0, 0.0).unwrap();

        let alert = node
            .create_alert(alert_input(0.0, 0.0, 5_000.0), responder())
            .await
            .unwrap();
        assert_eq!(next_event(&mut handle).await.kind(), EventKind::NewAlert);

        let resolved = node
            .transition_alert(
                alert.id,
                AlertAction::Resolve,
                responder(),
                Some("fire contained".into()),
            )
            .await
            .unwrap();
        assert_eq!(resolved.status, AlertStatus::Resolved);
        assert_eq!(
            next_event(&mut handle).await.kind(),
            EventKind::AlertResolved
        );

        // Terminal means terminal, for every forward action.
        let again = node
            .transition_alert(alert.id, AlertAction::Resolve, responder(), None)
            .await
            .unwrap_err();
        assert!(matches!(again, AlertError::InvalidTransition { .. }));

        let cancel = node
            .transition_alert(alert.id, AlertAction::Cancel, responder(), None)
            .await
            .unwrap_err();
        assert!(matches!(cancel, AlertError::InvalidTransition { .. }));
    }

    // =============================================================================
    // FLOW: CONNECTION GAPS
    // =============================================================================

    #[tokio::test]
    async fn test_disconnect_gap_has_no_replay() {
        let node = node();
        let connection_id = ConnectionId::new();

        let handle = node.join(connection_id, 0.0, 0.0).unwrap();
        drop(handle);

        // Published during the gap: gone forever.
        node.create_alert(alert_input(0.0, 0.0, 5_000.0), responder())
            .await
            .unwrap();

        let mut rejoined = node.join(connection_id, 0.0, 0.0).unwrap();
        assert!(rejoined.try_recv().unwrap().is_none());

        // Published after the rejoin: delivered.
        node.create_alert(alert_input(0.0, 0.0, 5_000.0), responder())
            .await
            .unwrap();
        assert_eq!(next_event(&mut rejoined).await.kind(), EventKind::NewAlert);
    }

    // =============================================================================
    // FLOW: CLIENT-SIDE PRESENTATION
    // =============================================================================

    #[tokio::test]
    async fn test_delivered_events_map_to_directives() {
        let node = node();
        let mut handle = node.join(ConnectionId::new(), 0.0, 0.0).unwrap();

        node.create_alert(
            CreateAlertInput {
                severity: AlertSeverity::Critical,
                ..alert_input(0.0, 0.0, 5_000.0)
            },
            responder(),
        )
        .await
        .unwrap();

        let event = next_event(&mut handle).await;
        let directive = directive_for(&event);
        assert_eq!(directive.urgency, Urgency::Critical);
        assert!(directive.sound && directive.vibrate && directive.require_interaction);

        node.submit_report(report_input(0.0, 0.0), citizen())
            .await
            .unwrap();
        let event = next_event(&mut handle).await;
        let directive = directive_for(&event);
        assert_eq!(directive.urgency, Urgency::Info);
        assert!(!directive.sound && !directive.vibrate);
    }
}
