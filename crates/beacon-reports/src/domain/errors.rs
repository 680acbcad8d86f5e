//! Report subsystem error types.
//!
//! Defines all error conditions for votes, submissions, and moderation.

use shared_types::{GeoError, ReportId, ReportStatus, StoreError};

/// Report subsystem error type.
#[derive(Clone, Debug, PartialEq)]
pub enum ReportError {
    /// No report with the given id.
    ReportNotFound(ReportId),

    /// Voter is farther from the report than the verification radius.
    OutOfRange { distance_m: f64, max_m: f64 },

    /// Report status no longer accepts votes.
    NotVotable { status: ReportStatus },

    /// Caller-supplied coordinates failed validation.
    InvalidLocation(GeoError),

    /// Submission carried an empty description.
    EmptyDescription,

    /// Caller's role is not allowed to perform this action.
    Unauthorized { action: &'static str },

    /// Moderation attempted an illegal status change.
    InvalidStatusChange {
        from: ReportStatus,
        to: ReportStatus,
    },

    /// Persistence failed (after internal conflict retries, if any).
    Store(StoreError),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReportNotFound(id) => write!(f, "Report not found: {}", id),
            Self::OutOfRange { distance_m, max_m } => {
                write!(
                    f,
                    "Voter is {:.0} m from the report, beyond the {:.0} m verification radius",
                    distance_m, max_m
                )
            }
            Self::NotVotable { status } => {
                write!(f, "Report is {} and no longer accepts votes", status)
            }
            Self::InvalidLocation(e) => write!(f, "Invalid location: {}", e),
            Self::EmptyDescription => write!(f, "Report description must not be empty"),
            Self::Unauthorized { action } => {
                write!(f, "Caller is not authorized to {}", action)
            }
            Self::InvalidStatusChange { from, to } => {
                write!(f, "Cannot move report from {} to {}", from, to)
            }
            Self::Store(e) => write!(f, "Store error: {}", e),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<GeoError> for ReportError {
    fn from(e: GeoError) -> Self {
        Self::InvalidLocation(e)
    }
}

impl From<StoreError> for ReportError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
