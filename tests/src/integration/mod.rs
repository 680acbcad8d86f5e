//! Cross-subsystem integration tests over a fully wired node.

pub mod concurrency;
pub mod flows;
