//! Inner domain layer: pure vote-ledger and escalation logic.

pub mod errors;
pub mod escalation;
pub mod ledger;

pub use errors::ReportError;
pub use escalation::EscalationPolicy;
pub use ledger::{derive_tally, record_vote, tally_consistent, VoteApplied};
