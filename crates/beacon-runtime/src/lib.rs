//! # Beacon Runtime
//!
//! Wires the report, alert, and dispatch subsystems into a runnable node
//! and exposes the operation surface consumed by the transport layer.
//!
//! ```text
//!                  ┌────────────────────────────────────┐
//!                  │             BeaconNode             │
//!                  │                                    │
//!   vote ────────→ │  ReportService ── EscalationIssuer │
//!   create_alert → │        │                │          │
//!   transition ──→ │        │          AlertService     │
//!                  │        │                │          │
//!                  │        └── publish ─────┘          │
//!                  │                │                   │
//!   join/leave ──→ │         ProximityBroker            │
//!                  └────────────────┼───────────────────┘
//!                                   ▼
//!                       in-range connection mailboxes
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod node;

pub use adapters::EscalationIssuer;
pub use node::{Alerts, BeaconNode, Reports};
