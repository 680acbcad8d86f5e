//! # Alert Lifecycle
//!
//! The transition matrix governing an alert's status, independent of how
//! the alert was created (auto-escalated or manually issued).
//!
//! ```text
//!             resolve ──→ Resolved ──┐
//!            /                       │
//!   Active ── cancel  ──→ Cancelled ─┼── reactivate ──→ Active
//!            \                       │   (admin/system)
//!             expire  ──→ Expired  ──┘
//! ```
//!
//! Forward transitions require the alert to still be Active; reactivation
//! is the single privileged road back.

use crate::domain::errors::AlertError;
use serde::{Deserialize, Serialize};
use shared_types::AlertStatus;

/// Lifecycle actions applicable to an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertAction {
    /// The emergency is over; closed by a privileged actor.
    Resolve,
    /// Withdrawn (issued in error or superseded).
    Cancel,
    /// Past its effective window; applied by the sweep.
    Expire,
    /// Privileged return from any terminal status to Active.
    Reactivate,
}

impl AlertAction {
    /// Verb form for error messages and logs.
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Self::Resolve => "resolve",
            Self::Cancel => "cancel",
            Self::Expire => "expire",
            Self::Reactivate => "reactivate",
        }
    }
}

impl std::fmt::Display for AlertAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.verb())
    }
}

/// Applies an action to a status.
///
/// # Errors
/// `InvalidTransition` if the move is not in the matrix.
pub fn transition(from: AlertStatus, action: AlertAction) -> Result<AlertStatus, AlertError> {
    match (from, action) {
        (AlertStatus::Active, AlertAction::Resolve) => Ok(AlertStatus::Resolved),
        (AlertStatus::Active, AlertAction::Cancel) => Ok(AlertStatus::Cancelled),
        (AlertStatus::Active, AlertAction::Expire) => Ok(AlertStatus::Expired),
        (from, AlertAction::Reactivate) if from.is_terminal() => Ok(AlertStatus::Active),
        (from, action) => Err(AlertError::InvalidTransition { from, action }),
    }
}
