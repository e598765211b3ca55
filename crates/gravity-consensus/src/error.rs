//! Consensus error types.

use thiserror::Error;

/// Errors returned by strict target decoding and proof-of-work helpers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsensusError {
    /// Sign bit set on a non-zero mantissa.
    #[error("compact target is negative")]
    NegativeBits,

    /// Encoded magnitude does not fit in 256 bits.
    #[error("compact target overflows 256 bits")]
    OverflowBits,

    /// Target decoded to zero.
    #[error("difficulty target is zero")]
    InvalidTarget,

    /// Proof-of-work check failed. Deliberately carries no cause.
    #[error("insufficient proof of work")]
    InsufficientPoW,
}
