//! Error types for the threshold signing engine.

use thiserror::Error;

use crate::{Rank, SignerIndex};

/// Errors raised by sharing, ceremony, nonce and signing operations.
///
/// Every variant is a local precondition violation detected at the call that
/// returns it. Nothing is retried internally; callers pick a different signer
/// set or restart a session with fresh nonces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrostError {
    /// Threshold or signer count out of range, a rank at or above the
    /// threshold, or inputs that do not describe a valid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// A partial signature was requested before this participant's nonce
    /// commitment was registered in the session.
    #[error("missing nonce commitment for signer {index}")]
    MissingNonceCommitment { index: SignerIndex },

    /// Partial signatures presented for aggregation carry different group
    /// commitments `R`.
    #[error("partial signatures disagree on the group commitment")]
    InconsistentAggregation,

    /// Fewer participants or partial signatures than the threshold.
    #[error("insufficient signers: {provided} provided, {required} required")]
    InsufficientSigners { required: usize, provided: usize },

    /// A public key, commitment or signature point is the identity or lies
    /// off the curve.
    #[error("invalid point: {point}")]
    InvalidPoint { point: &'static str },

    /// The interpolation matrix for these participants is not invertible.
    #[error("interpolation is singular for participants {participants:?}")]
    SingularInterpolation { participants: Vec<(SignerIndex, Rank)> },

    /// The nonce store has handed out every precomputed pair.
    #[error("nonce store exhausted after {capacity} nonces")]
    NonceExhausted { capacity: usize },

    /// A participant or leaf index outside the valid range.
    #[error("index {index} out of range (bound {bound})")]
    IndexOutOfRange { index: u64, bound: u64 },

    /// A hash was requested before the oracle was initialized.
    #[error("hash oracle used before initialization")]
    UninitializedHashOracle,

    /// `advance` was called on a ceremony that already produced its result.
    #[error("key ceremony already completed")]
    CeremonyCompleted,

    /// A public record could not be encoded or decoded.
    #[error("serialization failed: {reason}")]
    Serialization { reason: String },
}

impl FrostError {
    pub(crate) fn invalid_configuration(reason: impl Into<String>) -> Self {
        FrostError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    pub(crate) fn serialization(reason: impl ToString) -> Self {
        FrostError::Serialization {
            reason: reason.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, FrostError>;
