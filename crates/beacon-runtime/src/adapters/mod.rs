//! Adapters connecting subsystem ports across crate boundaries.

pub mod escalation;

pub use escalation::EscalationIssuer;
