//! # Beacon Reports - Vote Ledger & Escalation
//!
//! Turns unverified community incident reports into trust-scored, possibly
//! escalated alerts through concurrent community voting.
//!
//! ```text
//! ┌──────────┐  cast_vote   ┌───────────────┐  threshold   ┌──────────────┐
//! │  Caller  │ ───────────→ │  Vote ledger  │ ───────────→ │  Escalation  │
//! └──────────┘              │  (per-report  │              │  (verify +   │
//!                           │   lock)       │              │  issue alert)│
//!                           └───────────────┘              └──────────────┘
//!                                   │ publish ReportVerified / NewReport
//!                                   ▼
//!                            proximity broker
//! ```
//!
//! ## Invariants
//!
//! - A report's tally always equals what its vote map derives.
//! - One vote per distinct user; re-voting replaces, never duplicates.
//! - A threshold crossing verifies the report and issues exactly one alert,
//!   regardless of how many votes race past it.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export main types
pub use adapters::InMemoryReportStore;
pub use domain::{EscalationPolicy, ReportError};
pub use ports::inbound::{ModerationAction, ReportsApi, SubmitReportInput, VoteReceipt};
pub use ports::outbound::{AlertIssuer, ReportStore};
pub use service::ReportService;
