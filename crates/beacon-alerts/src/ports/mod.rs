//! Ports layer: driving (inbound) and driven (outbound) interfaces.

pub mod inbound;
pub mod outbound;

pub use inbound::{AlertsApi, CreateAlertInput};
pub use outbound::AlertStore;
