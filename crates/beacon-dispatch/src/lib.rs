//! # Beacon Dispatch - Proximity Fan-Out
//!
//! Delivers report and alert state changes to the client connections that
//! are currently inside each event's geographic effect radius.
//!
//! ```text
//! ┌──────────────┐                        ┌──────────────┐
//! │ Report/Alert │                        │  Transport   │
//! │  services    │      publish()         │ (per client) │
//! │              │ ──────┐                └──────────────┘
//! └──────────────┘       │                       ↑
//!                        ▼                       │ recv()
//!                 ┌───────────────┐              │
//!                 │ Proximity     │ ── in-range ─┘
//!                 │ Broker        │    mailboxes
//!                 └───────────────┘
//!                        │ join(point) / leave()
//!                        ▼
//!                 connection registry
//! ```
//!
//! ## Delivery Guarantees
//!
//! - FIFO per connection; no ordering across connections.
//! - At-most-once, fire-and-forget; no backlog or replay after a gap.
//! - One connection's failure never blocks delivery to the rest.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod broker;
pub mod events;
pub mod policy;
pub mod subscriber;

// Re-export main types
pub use broker::{EventSink, NoOpSink, ProximityBroker, RecordingSink};
pub use events::{DispatchEvent, EventKind};
pub use policy::{directive_for, NotificationDirective, Urgency};
pub use subscriber::{ConnectionHandle, DeliveryError};

/// Events buffered per connection before the broker starts dropping.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 256;
