//! Ports layer: driving (inbound) and driven (outbound) interfaces.

pub mod inbound;
pub mod outbound;

pub use inbound::{ModerationAction, ReportsApi, SubmitReportInput, VoteReceipt};
pub use outbound::{AlertIssuer, ReportStore};
