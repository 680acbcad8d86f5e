//! # Concurrency Tests
//!
//! The subsystem's central hazard: many users voting on the same report at
//! once, with the threshold crossing observed exactly once. Also covers the
//! non-hazards that must stay non-hazards: votes on different reports share
//! nothing and proceed in parallel, and a single user hammering the vote
//! endpoint still holds one vote.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use beacon_reports::{ReportsApi, SubmitReportInput};
    use beacon_runtime::BeaconNode;
    use rand::seq::SliceRandom;
    use shared_types::{
        Actor, ActorRole, ConnectionId, ManualClock, ReportCategory, ReportStatus, UserId,
        VoteValue,
    };

    fn node() -> Arc<BeaconNode> {
        Arc::new(BeaconNode::with_clock(Arc::new(ManualClock::new(
            1_700_000_000_000,
        ))))
    }

    fn citizen() -> Actor {
        Actor::new(UserId::new(), ActorRole::Citizen)
    }

    fn report_input(lat: f64, lng: f64) -> SubmitReportInput {
        SubmitReportInput {
            category: ReportCategory::Flood,
            lat,
            lng,
            description: "street flooding at the underpass".into(),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_racing_confirms_produce_exactly_one_alert() {
        let node = node();
        let mut watcher = node.join(ConnectionId::new(), 0.0, 0.0).unwrap();

        let report = node
            .submit_report(report_input(0.0, 0.0), citizen())
            .await
            .unwrap();
        assert!(watcher.try_recv().unwrap().is_some()); // NewReport

        // Twelve distinct voters, fired in random order, all at once.
        let mut voters: Vec<Actor> = (0..12).map(|_| citizen()).collect();
        voters.shuffle(&mut rand::thread_rng());

        let mut handles = Vec::new();
        for voter in voters {
            let node = node.clone();
            let report_id = report.id;
            handles.push(tokio::spawn(async move {
                node.vote(report_id, voter, VoteValue::Confirm, 0.0, 0.0)
                    .await
                    .unwrap()
            }));
        }

        let mut escalations = 0;
        for handle in handles {
            if handle.await.unwrap().escalated {
                escalations += 1;
            }
        }
        assert_eq!(escalations, 1, "exactly one voter observes the crossing");

        // Exactly one NewAlert crossed the wire, however the votes interleaved.
        let mut new_alerts = 0;
        while let Some(event) = watcher.try_recv().unwrap() {
            if event.kind() == beacon_dispatch::EventKind::NewAlert {
                new_alerts += 1;
            }
        }
        assert_eq!(new_alerts, 1);

        let stored = node.reports().get_report(report.id).await.unwrap();
        assert_eq!(stored.status, ReportStatus::Verified);
        assert_eq!(stored.tally.confirm, 12);
        assert_eq!(stored.votes.len(), 12);

        let alerts = node.active_alerts_near(0.0, 0.0, 15_000.0).await.unwrap();
        assert_eq!(alerts.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_votes_on_distinct_reports_run_in_parallel() {
        let node = node();

        let mut reports = Vec::new();
        for i in 0..4 {
            // Spread the reports far apart so no voter is in range of two.
            let lat = f64::from(i) * 10.0;
            reports.push(
                node.submit_report(report_input(lat, 0.0), citizen())
                    .await
                    .unwrap(),
            );
        }

        let mut handles = Vec::new();
        for report in &reports {
            for _ in 0..3 {
                let node = node.clone();
                let report_id = report.id;
                let lat = report.location.lat;
                handles.push(tokio::spawn(async move {
                    node.vote(report_id, citizen(), VoteValue::Confirm, lat, 0.0)
                        .await
                        .unwrap()
                }));
            }
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Three confirms each: below threshold, tallies independent.
        for report in &reports {
            let stored = node.reports().get_report(report.id).await.unwrap();
            assert_eq!(stored.tally.confirm, 3);
            assert_eq!(stored.status, ReportStatus::Pending);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_one_user_racing_itself_holds_one_vote() {
        let node = node();
        let report = node
            .submit_report(report_input(0.0, 0.0), citizen())
            .await
            .unwrap();
        let voter = citizen();

        let mut handles = Vec::new();
        for i in 0..20 {
            let node = node.clone();
            let report_id = report.id;
            let value = if i % 2 == 0 {
                VoteValue::Confirm
            } else {
                VoteValue::Deny
            };
            handles.push(tokio::spawn(async move {
                node.vote(report_id, voter, value, 0.0, 0.0).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // However the replacements interleaved, the ledger holds one vote
        // and the tally derives from it.
        let stored = node.reports().get_report(report.id).await.unwrap();
        assert_eq!(stored.votes.len(), 1);
        assert_eq!(stored.tally.total(), 1);
        assert_eq!(stored.status, ReportStatus::Pending);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_broker_churn_during_publish_does_not_wedge() {
        let node = node();

        // Connections joining and leaving while reports publish events.
        let churn = {
            let node = node.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    let id = ConnectionId::new();
                    let handle = node.join(id, 0.0, 0.0).unwrap();
                    tokio::task::yield_now().await;
                    drop(handle);
                }
            })
        };

        for _ in 0..10 {
            node.submit_report(report_input(0.0, 0.0), citizen())
                .await
                .unwrap();
        }
        churn.await.unwrap();

        // Whatever was in range mid-churn got best-effort delivery; the
        // broker itself must end clean.
        assert_eq!(node.broker().connection_count(), 0);
    }
}
