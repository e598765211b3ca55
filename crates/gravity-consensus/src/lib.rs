#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Gravity consensus rules for proof-of-work difficulty.
//!
//! This crate is responsible for:
//! - compact target encoding/decoding (Bitcoin-style `bits`)
//! - the DeltaGravityWave adaptive retarget and the legacy linear retarget
//! - proof-of-work validation against a target
//!
//! It intentionally does **not** include chain storage, networking, mining,
//! or header serialization. Ancestors are read through
//! [`gravity_core::ChainView`].

pub mod compact;
pub mod error;
pub mod legacy;
pub mod observe;
pub mod pow;
pub mod relief;
pub mod retarget;
pub mod window;
pub mod work;

pub use compact::*;
pub use error::*;
pub use legacy::*;
pub use observe::*;
pub use pow::*;
pub use relief::*;
pub use retarget::*;
pub use window::*;
pub use work::*;
