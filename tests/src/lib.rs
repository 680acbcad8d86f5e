//! # Beacon Test Suite
//!
//! Unified test crate covering behavior that crosses subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs        # End-to-end vote → escalation → fan-out flows
//!     └── concurrency.rs  # Racing votes, parallel reports, invariants
//! ```
//!
//! Per-subsystem unit tests live next to their code in each crate's
//! `#[cfg(test)]` modules.
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p beacon-tests
//!
//! # By category
//! cargo test -p beacon-tests integration::flows
//! cargo test -p beacon-tests integration::concurrency
//! ```

#![allow(dead_code)]

pub mod integration;
