//! # Report Service
//!
//! Drives the vote ledger and escalation engine over the store and alert
//! issuer ports.
//!
//! ## Concurrency
//!
//! The only contended resource is a single report's tally and status. Each
//! report gets its own async mutex out of a keyed lock table; a vote's
//! validation, ledger write, escalation check, and store write all run under
//! that one lock, so the threshold crossing is observed exactly once. Votes
//! on different reports share nothing and proceed in parallel.
//!
//! A store may still reject a write with `VersionConflict` (an external
//! writer raced us); the service retries a bounded number of times and never
//! surfaces the conflict to the caller.

use crate::domain::escalation::EscalationPolicy;
use crate::domain::ledger::record_vote;
use crate::domain::ReportError;
use crate::ports::inbound::{ModerationAction, ReportsApi, SubmitReportInput, VoteReceipt};
use crate::ports::outbound::{AlertIssuer, ReportStore};
use async_trait::async_trait;
use beacon_dispatch::{DispatchEvent, EventSink};
use parking_lot::RwLock;
use shared_types::geo::{validate_radius_m, VOTE_RADIUS_M};
use shared_types::{
    haversine_m, Actor, Clock, GeoPoint, Report, ReportId, ReportStatus, VoteValue,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Version-conflict retries before giving up on a write.
const MAX_CONFLICT_RETRIES: u32 = 3;

/// Report subsystem service.
pub struct ReportService<S, I, E>
where
    S: ReportStore,
    I: AlertIssuer,
    E: EventSink,
{
    store: Arc<S>,
    issuer: Arc<I>,
    events: Arc<E>,
    clock: Arc<dyn Clock>,
    policy: EscalationPolicy,
    /// Per-report critical sections, created on first touch. Entries are a
    /// few words each and live as long as the service.
    locks: RwLock<HashMap<ReportId, Arc<Mutex<()>>>>,
}

impl<S, I, E> ReportService<S, I, E>
where
    S: ReportStore,
    I: AlertIssuer,
    E: EventSink,
{
    /// Creates a service with the default escalation policy.
    pub fn new(store: Arc<S>, issuer: Arc<I>, events: Arc<E>, clock: Arc<dyn Clock>) -> Self {
        Self::with_policy(store, issuer, events, clock, EscalationPolicy::default())
    }

    /// Creates a service with a specific escalation policy.
    pub fn with_policy(
        store: Arc<S>,
        issuer: Arc<I>,
        events: Arc<E>,
        clock: Arc<dyn Clock>,
        policy: EscalationPolicy,
    ) -> Self {
        Self {
            store,
            issuer,
            events,
            clock,
            policy,
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// The mutex serializing all writers of one report.
    fn report_lock(&self, report_id: ReportId) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.read().get(&report_id) {
            return lock.clone();
        }
        self.locks.write().entry(report_id).or_default().clone()
    }

    async fn load(&self, report_id: ReportId) -> Result<Report, ReportError> {
        match self.store.get(report_id).await {
            Ok(report) => Ok(report),
            Err(shared_types::StoreError::NotFound(_)) => {
                Err(ReportError::ReportNotFound(report_id))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl<S, I, E> ReportsApi for ReportService<S, I, E>
where
    S: ReportStore,
    I: AlertIssuer,
    E: EventSink,
{
    async fn submit_report(
        &self,
        input: SubmitReportInput,
        reporter: Actor,
    ) -> Result<Report, ReportError> {
        let location = GeoPoint::new(input.lat, input.lng)?;
        if input.description.trim().is_empty() {
            return Err(ReportError::EmptyDescription);
        }

        let report = Report::new(
            input.category,
            location,
            input.description,
            reporter.user_id,
            self.clock.now(),
        );
        self.store.insert(report.clone()).await?;

        info!(report = %report.id, category = ?report.category, "Report submitted");
        self.events
            .publish(DispatchEvent::NewReport(report.clone()))
            .await;

        Ok(report)
    }

    async fn cast_vote(
        &self,
        report_id: ReportId,
        voter: Actor,
        value: VoteValue,
        lat: f64,
        lng: f64,
    ) -> Result<VoteReceipt, ReportError> {
        let voter_location = GeoPoint::new(lat, lng)?;

        let lock = self.report_lock(report_id);
        let _guard = lock.lock().await;

        let mut attempts = 0u32;
        let (report, escalated) = loop {
            let mut report = self.load(report_id).await?;

            let distance_m = haversine_m(&voter_location, &report.location);
            if distance_m > VOTE_RADIUS_M {
                return Err(ReportError::OutOfRange {
                    distance_m,
                    max_m: VOTE_RADIUS_M,
                });
            }
            if report.status.is_terminal() {
                return Err(ReportError::NotVotable {
                    status: report.status,
                });
            }

            let now = self.clock.now();
            record_vote(&mut report, voter.user_id, value, now);

            // The escalation decision must see the tally it just updated,
            // under the same lock, or two racing votes could both observe
            // the crossing and issue two alerts.
            let escalated = self.policy.should_escalate(report.status, report.tally);
            if escalated {
                report.status = ReportStatus::Verified;
            }
            report.updated_at = now;

            match self.store.update(report).await {
                Ok(updated) => break (updated, escalated),
                Err(shared_types::StoreError::VersionConflict { .. })
                    if attempts < MAX_CONFLICT_RETRIES =>
                {
                    attempts += 1;
                    debug!(report = %report_id, attempts, "Vote write raced an external update, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        };

        if escalated {
            info!(
                report = %report_id,
                confirms = report.tally.confirm,
                "Report verified by community vote"
            );
            self.events
                .publish(DispatchEvent::ReportVerified(report.clone()))
                .await;

            // The report stays verified either way; a lost alert here is an
            // operational incident, not a reason to fail the vote.
            match self
                .issuer
                .issue_for_report(&report, self.policy.default_severity)
                .await
            {
                Ok(alert) => {
                    info!(report = %report_id, alert = %alert.id, "Escalated report to alert");
                }
                Err(e) => {
                    error!(report = %report_id, error = %e, "Alert issue failed for verified report");
                }
            }
        }

        Ok(VoteReceipt {
            confirm: report.tally.confirm,
            deny: report.tally.deny,
            escalated,
        })
    }

    async fn moderate(
        &self,
        report_id: ReportId,
        action: ModerationAction,
        actor: Actor,
    ) -> Result<Report, ReportError> {
        if !actor.role.is_privileged() {
            return Err(ReportError::Unauthorized {
                action: action.verb(),
            });
        }

        let to = match action {
            ModerationAction::Flag => ReportStatus::Flagged,
            ModerationAction::Escalate => ReportStatus::Escalated,
            ModerationAction::Resolve => ReportStatus::Resolved,
            ModerationAction::Reject => ReportStatus::Rejected,
        };

        // Shares the vote lock so moderation never races a tally write.
        let lock = self.report_lock(report_id);
        let _guard = lock.lock().await;

        let mut report = self.load(report_id).await?;
        if report.status.is_terminal() {
            return Err(ReportError::InvalidStatusChange {
                from: report.status,
                to,
            });
        }

        report.status = to;
        report.updated_at = self.clock.now();
        let updated = self.store.update(report).await?;

        info!(report = %report_id, status = %updated.status, moderator = %actor.user_id, "Report moderated");
        Ok(updated)
    }

    async fn get_report(&self, report_id: ReportId) -> Result<Report, ReportError> {
        self.load(report_id).await
    }

    async fn reports_near(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
    ) -> Result<Vec<Report>, ReportError> {
        let origin = GeoPoint::new(lat, lng)?;
        let radius_m = validate_radius_m(radius_m)?;

        let reports = self.store.list().await?;
        Ok(reports
            .into_iter()
            .filter(|report| origin.within_m(&report.location, radius_m))
            .collect())
    }
}
