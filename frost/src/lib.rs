//! FROST threshold Schnorr signatures over Grumpkin, with hierarchical
//! (ranked) sharing through Birkhoff interpolation.
//!
//! This library implements:
//! - Shamir sharing with Lagrange interpolation, generalized to ranked shares
//!   where a signer holds a derivative `f^(k)(i)` of the sharing polynomial
//! - Key ceremonies, either one-shot or staged one share at a time with
//!   Feldman commitments for share verification
//! - Single-use nonce stores
//! - Signing sessions, partial signatures, aggregation and verification
//!
//! Every hash goes through the width-4 Poseidon2 [`hash_oracle`], which has
//! to be initialized once before signing or verifying.
//!
//! # Example
//!
//! ```
//! use curve::BaseField;
//! use frost::{CeremonyConfig, NonceStore, SignerInput, generate_key_package, hash_oracle, sign};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! hash_oracle::init();
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! // Deal a 2-of-3 group key
//! let package = generate_key_package(&mut rng, &CeremonyConfig::new(2, 3)).expect("ceremony");
//!
//! // Each signer precomputes nonces
//! let mut store_1 = NonceStore::precompute(&mut rng, 4);
//! let mut store_3 = NonceStore::precompute(&mut rng, 4);
//!
//! // Sign with signers 1 and 3
//! let message = hash_oracle::hash2(BaseField::from(11), BaseField::from(22)).expect("hash");
//! let signers = vec![
//!     SignerInput::new(package.share(1).expect("share"), store_1.consume_next().expect("nonce")),
//!     SignerInput::new(package.share(3).expect("share"), store_3.consume_next().expect("nonce")),
//! ];
//! let signature = sign(message, signers, &package.group_public_key(), 2).expect("sign");
//!
//! assert!(signature.verify(message, &package.group_public_key()).expect("verify"));
//! ```
//!
//! # Security Considerations
//!
//! - Use a cryptographically secure random number generator
//! - Never reuse a nonce pair; take every nonce from a [`NonceStore`]
//! - Register every participant's commitment before computing any partial
//!   signature for a session

pub mod birkhoff;
mod ceremony;
mod config;
mod constants;
mod errors;
pub mod hash_oracle;
mod keys;
mod nonces;
mod polynomial;
pub mod shamir;
mod signatures;
mod signing;

#[cfg(test)]
mod tests;

/// Evaluation point of a signer's share; nonzero.
pub type SignerIndex = u16;

/// Derivative order of a share; zero for a plain Shamir share.
pub type Rank = u16;

pub use birkhoff::{
    BirkhoffParticipant, RankedShare, birkhoff_coefficient, birkhoff_coefficients,
    birkhoff_reconstruct, birkhoff_split, falling_factorial, gaussian_eliminate, is_poised,
};
pub use ceremony::{
    CeremonyResult, CeremonyShare, CeremonyState, CeremonyStep, KeyCeremony, generate_key_package,
};
pub use config::{CeremonyConfig, PoisednessCheck};
pub use constants::{MAX_SIGNERS, POINT_SIZE, SCALAR_SIZE, SIG_SIZE};
pub use errors::{FrostError, Result};
pub use hash_oracle::HashOracle;
pub use keys::{KeyShare, MasterKeyPackage, PublicCommitments, verify_share_against_commitments};
pub use nonces::{NonceCommitment, NoncePair, NonceStore};
pub use polynomial::Polynomial;
pub use shamir::{Share, lagrange_coefficient, lagrange_coefficients, shamir_reconstruct, shamir_split};
pub use signatures::{FrostSignature, PartialSignature, aggregate, compute_challenge};
pub use signing::{SignerInput, SigningSession, sign};
