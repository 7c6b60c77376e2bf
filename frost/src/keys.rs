//! Key shares, key packages and Feldman commitments.

use core::fmt;

use curve::{Affine, Group, ScalarField};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::birkhoff::falling_factorial;
use crate::errors::{FrostError, Result};
use crate::{Rank, SignerIndex};

/// One signer's share of the group secret.
///
/// A rank-0 share holds `f(index)`; a rank-`k` share holds the `k`-th
/// derivative `f^(k)(index)`. The public share is `[secret_share]G`.
/// The secret scalar is wiped when the share is dropped.
///
/// Equality compares `(index, rank, public_share)`; the public share fixes
/// the secret, so the secret scalar never enters a comparison.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyShare {
    #[zeroize(skip)]
    index: SignerIndex,
    #[zeroize(skip)]
    rank: Rank,
    secret_share: ScalarField,
    #[zeroize(skip)]
    public_share: Affine,
}

impl KeyShare {
    /// Wrap a secret share, deriving its public share.
    pub fn new(index: SignerIndex, rank: Rank, secret_share: ScalarField) -> Self {
        KeyShare {
            index,
            rank,
            secret_share,
            public_share: Affine::mul_generator(&secret_share),
        }
    }

    pub fn index(&self) -> SignerIndex {
        self.index
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn secret_share(&self) -> &ScalarField {
        &self.secret_share
    }

    pub fn public_share(&self) -> Affine {
        self.public_share
    }

    /// Whether the secret scalar has been wiped.
    pub fn is_zeroed(&self) -> bool {
        self.secret_share.is_zero()
    }

    /// Shift the shared secret by `delta`.
    ///
    /// Only rank-0 shares move: the derivative of a constant is zero, so
    /// derivative shares of `f + delta` equal those of `f`.
    pub fn shifted(&self, delta: &ScalarField) -> Self {
        if self.rank == 0 {
            KeyShare::new(self.index, self.rank, self.secret_share + *delta)
        } else {
            self.clone()
        }
    }

    /// Feldman check of this share against published coefficient commitments.
    pub fn verify(&self, commitments: &PublicCommitments) -> bool {
        verify_share_against_commitments(self, commitments)
    }
}

impl PartialEq for KeyShare {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
            && self.rank == other.rank
            && self.public_share == other.public_share
    }
}

impl Eq for KeyShare {}

impl fmt::Debug for KeyShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyShare")
            .field("index", &self.index)
            .field("rank", &self.rank)
            .field("secret_share", &"[redacted]")
            .field("public_share", &self.public_share)
            .finish()
    }
}

/// Commitments `C_j = [c_j]G` to each coefficient of the sharing polynomial.
///
/// These are public and may be broadcast so that every recipient can check
/// their share without trusting the dealer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicCommitments {
    points: Vec<Affine>,
}

impl PublicCommitments {
    pub fn new(points: Vec<Affine>) -> Self {
        PublicCommitments { points }
    }

    pub fn points(&self) -> &[Affine] {
        &self.points
    }

    /// Threshold implied by the number of coefficients.
    pub fn threshold(&self) -> usize {
        self.points.len()
    }

    /// The group public key `C_0 = [f(0)]G`.
    pub fn group_public_key(&self) -> Affine {
        self.points.first().copied().unwrap_or(Affine::INFINITY)
    }

    /// Expected public share for `(index, rank)`:
    /// `Σ_{j≥k} ff(j, k) · index^(j-k) · C_j`.
    pub fn expected_public_share(&self, index: SignerIndex, rank: Rank) -> Affine {
        let x = ScalarField::from_canonical_u64(u64::from(index));
        let k = usize::from(rank);
        let mut scalars = Vec::with_capacity(self.points.len().saturating_sub(k));
        let mut power = ScalarField::ONE;
        for j in k..self.points.len() {
            scalars.push(falling_factorial(j as u64, k as u64) * power);
            power *= x;
        }
        let points = self.points.get(k..).unwrap_or_default();
        <Affine as Group>::multi_scalar_mul(points, &scalars)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(FrostError::serialization)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let commitments: Self = bincode::deserialize(bytes).map_err(FrostError::serialization)?;
        if let Some(point) = commitments.points.iter().find(|p| !p.is_on_curve()) {
            return Err(FrostError::serialization(format!(
                "commitment {point:?} is not on the curve"
            )));
        }
        Ok(commitments)
    }
}

/// Feldman VSS: `[secret_share]G == Σ_j index^j · C_j` for rank 0, and the
/// matching derivative combination for ranked shares.
pub fn verify_share_against_commitments(share: &KeyShare, commitments: &PublicCommitments) -> bool {
    let lhs = Affine::mul_generator(&share.secret_share);
    let ok = lhs == commitments.expected_public_share(share.index, share.rank);
    debug!(index = share.index, rank = share.rank, ok, "feldman share check");
    ok
}

/// Output of a one-shot (trusted dealer) ceremony.
#[derive(Clone)]
pub struct MasterKeyPackage {
    pub(crate) threshold: u16,
    pub(crate) total_signers: u16,
    pub(crate) group_public_key: Affine,
    pub(crate) shares: Vec<KeyShare>,
    pub(crate) viewing_secret_key: ScalarField,
    pub(crate) viewing_public_key: Affine,
}

impl MasterKeyPackage {
    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn total_signers(&self) -> u16 {
        self.total_signers
    }

    pub fn group_public_key(&self) -> Affine {
        self.group_public_key
    }

    pub fn shares(&self) -> &[KeyShare] {
        &self.shares
    }

    /// The share held by signer `index`.
    pub fn share(&self, index: SignerIndex) -> Result<&KeyShare> {
        self.shares
            .iter()
            .find(|s| s.index == index)
            .ok_or(FrostError::IndexOutOfRange {
                index: u64::from(index),
                bound: u64::from(self.total_signers),
            })
    }

    pub fn viewing_secret_key(&self) -> &ScalarField {
        &self.viewing_secret_key
    }

    pub fn viewing_public_key(&self) -> Affine {
        self.viewing_public_key
    }

    /// Shift every rank-0 share by `delta`; the group key moves by `[delta]G`.
    pub fn shifted(&self, delta: &ScalarField) -> Self {
        MasterKeyPackage {
            threshold: self.threshold,
            total_signers: self.total_signers,
            group_public_key: self.group_public_key + Affine::mul_generator(delta),
            shares: self.shares.iter().map(|s| s.shifted(delta)).collect(),
            viewing_secret_key: self.viewing_secret_key,
            viewing_public_key: self.viewing_public_key,
        }
    }
}

impl Drop for MasterKeyPackage {
    fn drop(&mut self) {
        self.viewing_secret_key.zeroize();
    }
}

impl fmt::Debug for MasterKeyPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKeyPackage")
            .field("threshold", &self.threshold)
            .field("total_signers", &self.total_signers)
            .field("group_public_key", &self.group_public_key)
            .field("shares", &self.shares)
            .field("viewing_secret_key", &"[redacted]")
            .field("viewing_public_key", &self.viewing_public_key)
            .finish()
    }
}
