//! Alert subsystem error types.

use crate::domain::lifecycle::AlertAction;
use shared_types::{AlertId, AlertStatus, GeoError, StoreError};
use thiserror::Error;

/// Alert subsystem error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlertError {
    /// No alert with the given id.
    #[error("Alert not found: {0}")]
    NotFound(AlertId),

    /// The requested lifecycle move is not in the transition matrix.
    #[error("Cannot {action} an alert that is {from}")]
    InvalidTransition {
        from: AlertStatus,
        action: AlertAction,
    },

    /// Input failed validation (title, severity window, timing).
    #[error("Invalid alert: {0}")]
    Validation(String),

    /// Caller-supplied geometry failed validation.
    #[error("Invalid location: {0}")]
    InvalidLocation(#[from] GeoError),

    /// Caller's role is not allowed to perform this action.
    #[error("Caller is not authorized to {action} alerts")]
    Unauthorized { action: &'static str },

    /// Persistence failed (after internal conflict retries, if any).
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
