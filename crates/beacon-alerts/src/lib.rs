//! # Beacon Alerts - Lifecycle Subsystem
//!
//! Governs an alert's status from creation through its terminal states,
//! independent of how the alert was created (auto-escalated from a report
//! or manually issued by a privileged actor).
//!
//! ```text
//!   create ──→ Active ──→ { Resolved | Cancelled | Expired }
//!                ↑                      │
//!                └──── reactivate ──────┘
//!                     (admin/system)
//! ```
//!
//! The expiry sweep is a thin periodic caller of [`AlertsApi::expire_due`];
//! its scheduling lives in the runtime crate.

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
pub use adapters::InMemoryAlertStore;
pub use domain::{AlertAction, AlertError};
pub use ports::inbound::{AlertsApi, CreateAlertInput};
pub use ports::outbound::AlertStore;
pub use service::AlertService;
