//! # Vote Ledger
//!
//! Per-report record of one vote per user, with derived confirm/deny
//! tallies.
//!
//! ## Invariants Enforced
//!
//! - INVARIANT-1: `tally.confirm + tally.deny == votes.len()` after every
//!   operation (tallies never drift from the vote map).
//! - INVARIANT-2: one `VoteRecord` per distinct user; re-voting replaces the
//!   value in place, shifting each bucket by exactly ±1.

use shared_types::{Report, Timestamp, UserId, VoteRecord, VoteTally, VoteValue};

/// What a ledger write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteApplied {
    /// First vote from this user on this report.
    Added,
    /// The user had voted the other way; the value was replaced.
    Replaced { previous: VoteValue },
    /// The user re-sent the vote they already had; nothing changed.
    Unchanged,
}

/// Records `user_id`'s vote on the report, keeping the tally derived.
///
/// The map is keyed by the canonical user id, so two representations of the
/// same user can never hold two votes.
pub fn record_vote(
    report: &mut Report,
    user_id: UserId,
    value: VoteValue,
    now: Timestamp,
) -> VoteApplied {
    let record = VoteRecord {
        user_id,
        value,
        voted_at: now,
    };

    let applied = match report.votes.insert(user_id, record) {
        None => {
            bump(&mut report.tally, value, 1);
            VoteApplied::Added
        }
        Some(previous) if previous.value == value => VoteApplied::Unchanged,
        Some(previous) => {
            bump(&mut report.tally, previous.value, -1);
            bump(&mut report.tally, value, 1);
            VoteApplied::Replaced {
                previous: previous.value,
            }
        }
    };

    debug_assert!(tally_consistent(report));
    applied
}

/// INVARIANT-1 check: the tally equals what the vote map derives.
#[must_use]
pub fn tally_consistent(report: &Report) -> bool {
    derive_tally(report) == report.tally
}

/// Recomputes the tally from scratch out of the vote map.
#[must_use]
pub fn derive_tally(report: &Report) -> VoteTally {
    let mut tally = VoteTally::default();
    for record in report.votes.values() {
        bump(&mut tally, record.value, 1);
    }
    tally
}

fn bump(tally: &mut VoteTally, value: VoteValue, delta: i64) {
    let bucket = match value {
        VoteValue::Confirm => &mut tally.confirm,
        VoteValue::Deny => &mut tally.deny,
    };
    *bucket = (*bucket as i64 + delta).max(0) as u32;
}
