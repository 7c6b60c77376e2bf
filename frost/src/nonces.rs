//! Single-use signing nonces.
//!
//! Reusing a nonce pair across two signatures reveals the signer's share, so
//! a [`NonceStore`] hands out each precomputed pair exactly once and wipes
//! its own copy of the secrets at the moment it does.

use core::fmt;

use curve::{Affine, RandomField, ScalarField};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{FrostError, Result};

/// Public half of a nonce pair: `D = [d]G`, `E = [e]G`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonceCommitment {
    pub d: Affine,
    pub e: Affine,
}

/// Ephemeral secrets `(d, e)` with their commitments.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct NoncePair {
    d: ScalarField,
    e: ScalarField,
    #[zeroize(skip)]
    commitment: NonceCommitment,
}

impl NoncePair {
    /// Sample fresh nonzero nonces.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_scalars(ScalarField::random_nonzero(rng), ScalarField::random_nonzero(rng))
    }

    pub fn from_scalars(d: ScalarField, e: ScalarField) -> Self {
        NoncePair {
            d,
            e,
            commitment: NonceCommitment {
                d: Affine::mul_generator(&d),
                e: Affine::mul_generator(&e),
            },
        }
    }

    pub fn hiding(&self) -> &ScalarField {
        &self.d
    }

    pub fn binding(&self) -> &ScalarField {
        &self.e
    }

    pub fn commitment(&self) -> NonceCommitment {
        self.commitment
    }

    pub fn is_zeroed(&self) -> bool {
        self.d.is_zero() && self.e.is_zero()
    }
}

impl fmt::Debug for NoncePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoncePair")
            .field("secrets", &"[redacted]")
            .field("commitment", &self.commitment)
            .finish()
    }
}

/// An ordered batch of precomputed nonce pairs, consumed front to back.
#[derive(Debug, Default)]
pub struct NonceStore {
    pairs: Vec<NoncePair>,
    next: usize,
}

impl NonceStore {
    pub fn new(pairs: Vec<NoncePair>) -> Self {
        NonceStore { pairs, next: 0 }
    }

    /// Precompute `count` nonce pairs.
    pub fn precompute<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Self {
        debug!(count, "precomputing nonce pairs");
        Self::new((0..count).map(|_| NoncePair::random(rng)).collect())
    }

    /// Hand out the next unused pair, wiping the stored copy.
    ///
    /// The returned value is the only remaining copy of the secrets.
    pub fn consume_next(&mut self) -> Result<NoncePair> {
        let Some(slot) = self.pairs.get_mut(self.next) else {
            warn!(capacity = self.pairs.len(), "nonce store exhausted");
            return Err(FrostError::NonceExhausted {
                capacity: self.pairs.len(),
            });
        };
        let pair = slot.clone();
        slot.d.zeroize();
        slot.e.zeroize();
        self.next += 1;
        debug!(position = self.next - 1, remaining = self.remaining(), "consumed nonce pair");
        Ok(pair)
    }

    /// Public commitments of the pairs not yet consumed, in order.
    pub fn pending_commitments(&self) -> impl Iterator<Item = NonceCommitment> + '_ {
        self.pairs[self.next..].iter().map(NoncePair::commitment)
    }

    pub fn remaining(&self) -> usize {
        self.pairs.len() - self.next
    }

    pub fn has_nonces(&self) -> bool {
        self.remaining() > 0
    }

    pub fn capacity(&self) -> usize {
        self.pairs.len()
    }
}
