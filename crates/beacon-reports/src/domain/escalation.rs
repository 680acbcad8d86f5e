//! # Escalation Engine
//!
//! Pure decision logic promoting a sufficiently-confirmed report to an
//! alert. The decision itself is trivial; what matters is that the caller
//! runs it inside the same per-report critical section as the tally update,
//! so a threshold crossing is observed exactly once.

use shared_types::{AlertSeverity, ReportStatus, VoteTally};

/// Escalation thresholds and defaults.
#[derive(Debug, Clone, Copy)]
pub struct EscalationPolicy {
    /// Confirmations required before a pending report is verified.
    pub confirm_threshold: u32,
    /// Severity assigned to community-escalated alerts; privileged actors
    /// adjust it afterwards through the alert surface.
    pub default_severity: AlertSeverity,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            confirm_threshold: 4,
            default_severity: AlertSeverity::Medium,
        }
    }
}

impl EscalationPolicy {
    /// True iff this tally promotes this status.
    ///
    /// Only `Pending` reports escalate; re-evaluating a report that is
    /// already Verified (or anything else) is a no-op, which makes the
    /// check idempotent under retries.
    #[must_use]
    pub fn should_escalate(&self, status: ReportStatus, tally: VoteTally) -> bool {
        status == ReportStatus::Pending && tally.confirm >= self.confirm_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(confirm: u32, deny: u32) -> VoteTally {
        VoteTally { confirm, deny }
    }

    #[test]
    fn test_escalates_at_threshold() {
        let policy = EscalationPolicy::default();
        assert!(!policy.should_escalate(ReportStatus::Pending, tally(3, 0)));
        assert!(policy.should_escalate(ReportStatus::Pending, tally(4, 0)));
        assert!(policy.should_escalate(ReportStatus::Pending, tally(5, 2)));
    }

    #[test]
    fn test_denies_do_not_block_escalation() {
        let policy = EscalationPolicy::default();
        assert!(policy.should_escalate(ReportStatus::Pending, tally(4, 10)));
    }

    #[test]
    fn test_non_pending_never_escalates() {
        let policy = EscalationPolicy::default();
        for status in [
            ReportStatus::Verified,
            ReportStatus::Rejected,
            ReportStatus::Resolved,
            ReportStatus::Escalated,
            ReportStatus::Flagged,
        ] {
            assert!(
                !policy.should_escalate(status, tally(100, 0)),
                "{status} must not escalate"
            );
        }
    }

    #[test]
    fn test_custom_threshold() {
        let policy = EscalationPolicy {
            confirm_threshold: 2,
            ..Default::default()
        };
        assert!(policy.should_escalate(ReportStatus::Pending, tally(2, 0)));
    }
}
