//! jf-core: stable foundation for jetflow.
//!
//! Contains:
//! - units (uom SI types + constructors for the lab's measurement units)
//! - numeric (Real + tolerances + display formatting)

pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use numeric::*;
pub use units::*;
