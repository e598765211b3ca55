#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Gravity core: protocol types, ancestor view, and consensus parameters.
//!
//! This crate holds everything the difficulty engine reads but does not own:
//! block index records handed over by the chain index, the capability used
//! to walk ancestors, and the per-network parameter sets.

pub mod chain;
pub mod constants;
pub mod params;
#[cfg(feature = "serde")]
pub mod serialization;
pub mod types;

pub use chain::*;
pub use constants::*;
pub use params::*;
pub use types::*;
