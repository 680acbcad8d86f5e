//! # Inbound Port - ReportsApi
//!
//! Primary driving port for the report subsystem: submission, voting,
//! moderation, and proximity queries.
//!
//! Callers arrive already authenticated; the [`Actor`] they pass is trusted.

use crate::domain::ReportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{Actor, Report, ReportCategory, ReportId, VoteValue};

/// Caller-supplied fields for a new report.
///
/// Coordinates are raw so that validation happens in exactly one place,
/// inside the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReportInput {
    pub category: ReportCategory,
    pub lat: f64,
    pub lng: f64,
    pub description: String,
}

/// Privileged status changes applied outside the community vote flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    /// Mark the report for review.
    Flag,
    /// Hand the report to authorities outside the community flow.
    Escalate,
    /// The underlying incident is over.
    Resolve,
    /// Dismiss the report.
    Reject,
}

impl ModerationAction {
    /// Verb form for error messages and logs.
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Self::Flag => "flag reports",
            Self::Escalate => "escalate reports",
            Self::Resolve => "resolve reports",
            Self::Reject => "reject reports",
        }
    }
}

/// Outcome of a vote, returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub confirm: u32,
    pub deny: u32,
    /// True when this vote crossed the confirmation threshold.
    pub escalated: bool,
}

/// Primary API for the report subsystem.
#[async_trait]
pub trait ReportsApi: Send + Sync {
    /// Stores a new pending report and announces it to nearby connections.
    ///
    /// # Errors
    /// - `InvalidLocation`: coordinates failed validation
    /// - `EmptyDescription`: description was blank
    async fn submit_report(
        &self,
        input: SubmitReportInput,
        reporter: Actor,
    ) -> Result<Report, ReportError>;

    /// Casts (or replaces) the voter's vote on a report.
    ///
    /// The tally update and the escalation check run inside the same
    /// per-report critical section, so a threshold crossing produces
    /// exactly one alert even under concurrent voting.
    ///
    /// # Errors
    /// - `ReportNotFound`: no such report
    /// - `OutOfRange`: voter farther than the verification radius
    /// - `NotVotable`: report status no longer accepts votes
    /// - `InvalidLocation`: voter coordinates failed validation
    async fn cast_vote(
        &self,
        report_id: ReportId,
        voter: Actor,
        value: VoteValue,
        lat: f64,
        lng: f64,
    ) -> Result<VoteReceipt, ReportError>;

    /// Applies a privileged status change.
    ///
    /// # Errors
    /// - `Unauthorized`: caller's role is not privileged
    /// - `InvalidStatusChange`: the report is already terminal
    async fn moderate(
        &self,
        report_id: ReportId,
        action: ModerationAction,
        actor: Actor,
    ) -> Result<Report, ReportError>;

    /// Fetches a report by id.
    async fn get_report(&self, report_id: ReportId) -> Result<Report, ReportError>;

    /// Reports whose location lies within `radius_m` meters of the given
    /// point (inclusive).
    async fn reports_near(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
    ) -> Result<Vec<Report>, ReportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait must stay object-safe (used as dyn ReportsApi by transports).
    fn _assert_object_safe(_: &dyn ReportsApi) {}

    #[test]
    fn test_moderation_verbs() {
        assert_eq!(ModerationAction::Flag.verb(), "flag reports");
        assert_eq!(ModerationAction::Reject.verb(), "reject reports");
    }

    #[test]
    fn test_receipt_serde_roundtrip() {
        let receipt = VoteReceipt {
            confirm: 4,
            deny: 1,
            escalated: true,
        };
        let json = serde_json::to_string(&receipt).unwrap();
        let back: VoteReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(receipt, back);
    }
}
