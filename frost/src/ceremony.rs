//! Key ceremonies: one-shot trusted dealer and staged share emission.
//!
//! Both shapes sample a random degree-`t - 1` polynomial whose constant term
//! is the group secret, hand signer `i` the value `f^(rank_i)(i)` and derive
//! an independent viewing key pair. The group secret itself never leaves the
//! ceremony and is wiped as soon as the polynomial holds it.

use core::fmt;

use curve::{Affine, RandomField, ScalarField};
use rand::Rng;
use tracing::{debug, instrument};
use zeroize::{Zeroize, Zeroizing};

use crate::config::CeremonyConfig;
use crate::errors::{FrostError, Result};
use crate::keys::{KeyShare, MasterKeyPackage, PublicCommitments};
use crate::polynomial::Polynomial;
use crate::{Rank, SignerIndex};

fn share_for(polynomial: &Polynomial, index: SignerIndex, rank: Rank) -> KeyShare {
    let x = ScalarField::from_canonical_u64(u64::from(index));
    KeyShare::new(index, rank, polynomial.derivative_at(&x, usize::from(rank)))
}

/// Trusted-dealer ceremony producing every share at once.
#[instrument(skip(rng), err(Debug))]
pub fn generate_key_package<R: Rng + ?Sized>(
    rng: &mut R,
    config: &CeremonyConfig,
) -> Result<MasterKeyPackage> {
    config.validate()?;

    let secret = Zeroizing::new(ScalarField::random_nonzero(rng));
    let polynomial = Polynomial::random(rng, &secret, usize::from(config.threshold));
    let group_public_key = Affine::mul_generator(&secret);
    drop(secret);

    let shares = config
        .participants()
        .iter()
        .map(|p| share_for(&polynomial, p.index, p.rank))
        .collect();
    drop(polynomial);

    let viewing_secret_key = ScalarField::random_nonzero(rng);
    let viewing_public_key = Affine::mul_generator(&viewing_secret_key);

    debug!(
        threshold = config.threshold,
        total_signers = config.total_signers,
        ranked = config.is_ranked(),
        "generated key package"
    );

    Ok(MasterKeyPackage {
        threshold: config.threshold,
        total_signers: config.total_signers,
        group_public_key,
        shares,
        viewing_secret_key,
        viewing_public_key,
    })
}

/// The staged analogue of a [`KeyShare`], emitted one at a time.
pub type CeremonyShare = KeyShare;

/// Public outcome of a staged ceremony plus the viewing key pair.
pub struct CeremonyResult {
    threshold: u16,
    total_signers: u16,
    group_public_key: Affine,
    viewing_secret_key: Zeroizing<ScalarField>,
    viewing_public_key: Affine,
    polynomial_commitments: PublicCommitments,
}

impl CeremonyResult {
    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn total_signers(&self) -> u16 {
        self.total_signers
    }

    pub fn group_public_key(&self) -> Affine {
        self.group_public_key
    }

    pub fn viewing_secret_key(&self) -> &ScalarField {
        &self.viewing_secret_key
    }

    pub fn viewing_public_key(&self) -> Affine {
        self.viewing_public_key
    }

    /// Feldman commitments `[c_j]G`, one per polynomial coefficient.
    pub fn polynomial_commitments(&self) -> &PublicCommitments {
        &self.polynomial_commitments
    }
}

impl fmt::Debug for CeremonyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CeremonyResult")
            .field("threshold", &self.threshold)
            .field("total_signers", &self.total_signers)
            .field("group_public_key", &self.group_public_key)
            .field("viewing_secret_key", &"[redacted]")
            .field("viewing_public_key", &self.viewing_public_key)
            .field("polynomial_commitments", &self.polynomial_commitments)
            .finish()
    }
}

/// What one call to [`KeyCeremony::advance`] produced.
#[derive(Debug)]
pub enum CeremonyStep<'a> {
    /// The next signer's share. The borrow ends at the next `advance`, which
    /// also wipes the share.
    Share(&'a CeremonyShare),
    Done(CeremonyResult),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CeremonyState {
    NotStarted,
    /// Share for this signer index was the last one handed out.
    EmittingShare(SignerIndex),
    Completed,
}

/// A dealer that releases shares one at a time.
///
/// Each [`advance`](KeyCeremony::advance) wipes the share returned by the
/// previous call before producing the next, so at most one secret share is
/// live inside the ceremony. The polynomial is wiped as soon as the last
/// share has been derived from it; the commitments are computed up front.
pub struct KeyCeremony {
    config: CeremonyConfig,
    state: CeremonyState,
    polynomial: Option<Polynomial>,
    commitments: PublicCommitments,
    viewing_secret_key: Option<Zeroizing<ScalarField>>,
    viewing_public_key: Affine,
    current: Option<CeremonyShare>,
}

impl KeyCeremony {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, config: CeremonyConfig) -> Result<Self> {
        config.validate()?;

        let secret = Zeroizing::new(ScalarField::random_nonzero(rng));
        let polynomial = Polynomial::random(rng, &secret, usize::from(config.threshold));
        let commitments = PublicCommitments::new(polynomial.commitments());

        let viewing_secret_key = Zeroizing::new(ScalarField::random_nonzero(rng));
        let viewing_public_key = Affine::mul_generator(&viewing_secret_key);

        debug!(
            threshold = config.threshold,
            total_signers = config.total_signers,
            "started staged key ceremony"
        );

        Ok(KeyCeremony {
            config,
            state: CeremonyState::NotStarted,
            polynomial: Some(polynomial),
            commitments,
            viewing_secret_key: Some(viewing_secret_key),
            viewing_public_key,
            current: None,
        })
    }

    pub fn state(&self) -> CeremonyState {
        self.state
    }

    pub fn config(&self) -> &CeremonyConfig {
        &self.config
    }

    /// Commitments may be broadcast before any share is released.
    pub fn commitments(&self) -> &PublicCommitments {
        &self.commitments
    }

    pub fn group_public_key(&self) -> Affine {
        self.commitments.group_public_key()
    }

    /// Whether the polynomial coefficients are still held.
    pub fn holds_polynomial(&self) -> bool {
        self.polynomial.is_some()
    }

    /// Release the next share, or the result after the last one.
    ///
    /// Side effect: the share returned by the previous call is zeroed first.
    /// Calling again after [`CeremonyStep::Done`] fails with
    /// [`FrostError::CeremonyCompleted`].
    pub fn advance(&mut self) -> Result<CeremonyStep<'_>> {
        if let Some(mut previous) = self.current.take() {
            previous.zeroize();
            debug!(index = previous.index(), "wiped previously emitted share");
        }

        let total = self.config.total_signers;
        let next = match self.state {
            CeremonyState::NotStarted => 1,
            CeremonyState::EmittingShare(i) if i < total => i + 1,
            CeremonyState::EmittingShare(_) => {
                self.state = CeremonyState::Completed;
                return Ok(CeremonyStep::Done(self.finish()?));
            }
            CeremonyState::Completed => return Err(FrostError::CeremonyCompleted),
        };

        let share = {
            let polynomial = self.polynomial.as_ref().ok_or(FrostError::CeremonyCompleted)?;
            share_for(polynomial, next, self.config.rank_of(next))
        };
        if next == total {
            // Every share has been derived; drop wipes the coefficients.
            self.polynomial = None;
        }

        self.state = CeremonyState::EmittingShare(next);
        debug!(index = next, total, "emitted ceremony share");
        Ok(CeremonyStep::Share(self.current.insert(share)))
    }

    fn finish(&mut self) -> Result<CeremonyResult> {
        let viewing_secret_key = self
            .viewing_secret_key
            .take()
            .ok_or(FrostError::CeremonyCompleted)?;
        debug!("key ceremony completed");
        Ok(CeremonyResult {
            threshold: self.config.threshold,
            total_signers: self.config.total_signers,
            group_public_key: self.commitments.group_public_key(),
            viewing_secret_key,
            viewing_public_key: self.viewing_public_key,
            polynomial_commitments: self.commitments.clone(),
        })
    }
}

impl fmt::Debug for KeyCeremony {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyCeremony")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("holds_polynomial", &self.polynomial.is_some())
            .finish_non_exhaustive()
    }
}
