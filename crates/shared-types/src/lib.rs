//! # Shared Types Crate
//!
//! This crate contains the domain entities, geographic primitives, spatial
//! index, and clock abstraction shared by all Beacon subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-subsystem types are defined here.
//! - **One Distance Function**: every radius decision (vote verification,
//!   alert effect areas, proximity fan-out) goes through
//!   [`geo::haversine_m`]; call sites never carry their own literals.
//! - **Canonical Identity**: ids are typed UUID newtypes; keyed lookups use
//!   them directly, so mixed representations of the same id cannot diverge.

pub mod clock;
pub mod entities;
pub mod errors;
pub mod geo;
pub mod spatial;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entities::*;
pub use errors::{GeoError, StoreError};
pub use geo::{haversine_m, GeoPoint};
pub use spatial::SpatialIndex;
