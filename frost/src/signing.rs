//! Signing sessions and partial signatures.
//!
//! A session fixes the message, the participant set and the group key. Each
//! participant's public nonce commitment must be registered before anyone
//! signs: the binding factors and the group commitment `R` depend on all of
//! them. Flat sessions weight shares with Lagrange coefficients; ranked
//! sessions use Birkhoff coefficients over the participants' ranks.

use std::collections::BTreeMap;

use curve::{Affine, BaseField, Group, ScalarField};
use tracing::{debug, instrument, warn};
use zeroize::Zeroizing;

use crate::birkhoff::{BirkhoffParticipant, birkhoff_coefficients};
use crate::constants::BINDING_FACTOR_PAD;
use crate::errors::{FrostError, Result};
use crate::hash_oracle;
use crate::keys::KeyShare;
use crate::nonces::{NonceCommitment, NoncePair};
use crate::shamir::lagrange_coefficients;
use crate::signatures::{FrostSignature, PartialSignature, aggregate, compute_challenge, ensure_valid_point};
use crate::{Rank, SignerIndex};

/// State shared by every signer for one message.
#[derive(Clone, Debug)]
pub struct SigningSession {
    message: BaseField,
    participants: Vec<SignerIndex>,
    nonce_commitments: BTreeMap<SignerIndex, NonceCommitment>,
    group_public_key: Affine,
    participant_ranks: Option<BTreeMap<SignerIndex, Rank>>,
}

fn check_participants(participants: &[SignerIndex], threshold: u16) -> Result<Vec<SignerIndex>> {
    if participants.len() < usize::from(threshold) {
        return Err(FrostError::InsufficientSigners {
            required: usize::from(threshold),
            provided: participants.len(),
        });
    }
    if participants.contains(&0) {
        return Err(FrostError::invalid_configuration(
            "participant index 0 is reserved for the secret",
        ));
    }
    let mut sorted = participants.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != participants.len() {
        return Err(FrostError::invalid_configuration("duplicate participant index"));
    }
    Ok(sorted)
}

impl SigningSession {
    /// A flat session over `participants`.
    pub fn new(
        message: BaseField,
        participants: &[SignerIndex],
        group_public_key: Affine,
        threshold: u16,
    ) -> Result<Self> {
        let participants = check_participants(participants, threshold)?;
        ensure_valid_point(&group_public_key, "group public key")?;
        debug!(?participants, "created signing session");
        Ok(SigningSession {
            message,
            participants,
            nonce_commitments: BTreeMap::new(),
            group_public_key,
            participant_ranks: None,
        })
    }

    /// A hierarchical session; every participant carries its share's rank.
    pub fn new_ranked(
        message: BaseField,
        participants: &[BirkhoffParticipant],
        group_public_key: Affine,
        threshold: u16,
    ) -> Result<Self> {
        let indices: Vec<SignerIndex> = participants.iter().map(|p| p.index).collect();
        let mut session = Self::new(message, &indices, group_public_key, threshold)?;
        session.participant_ranks = Some(participants.iter().map(|p| (p.index, p.rank)).collect());
        Ok(session)
    }

    pub fn message(&self) -> BaseField {
        self.message
    }

    /// Participant indices in ascending order.
    pub fn participants(&self) -> &[SignerIndex] {
        &self.participants
    }

    pub fn group_public_key(&self) -> Affine {
        self.group_public_key
    }

    pub fn is_ranked(&self) -> bool {
        self.participant_ranks.is_some()
    }

    /// Rank of a participant; zero in flat sessions.
    pub fn rank_of(&self, index: SignerIndex) -> Rank {
        self.participant_ranks
            .as_ref()
            .and_then(|ranks| ranks.get(&index).copied())
            .unwrap_or(0)
    }

    fn position(&self, index: SignerIndex) -> Result<usize> {
        self.participants
            .binary_search(&index)
            .map_err(|_| FrostError::IndexOutOfRange {
                index: u64::from(index),
                bound: self.participants.len() as u64,
            })
    }

    /// Record a participant's public nonce commitment.
    ///
    /// Both `D` and `E` must be curve points other than the identity.
    pub fn register_nonce_commitment(
        &mut self,
        index: SignerIndex,
        commitment: NonceCommitment,
    ) -> Result<()> {
        self.position(index)?;
        ensure_valid_point(&commitment.d, "hiding commitment D")?;
        ensure_valid_point(&commitment.e, "binding commitment E")?;
        self.nonce_commitments.insert(index, commitment);
        debug!(index, registered = self.nonce_commitments.len(), "registered nonce commitment");
        Ok(())
    }

    /// Whether every participant has registered a commitment.
    pub fn is_complete(&self) -> bool {
        self.participants
            .iter()
            .all(|i| self.nonce_commitments.contains_key(i))
    }

    fn commitment(&self, index: SignerIndex) -> Result<&NonceCommitment> {
        self.nonce_commitments
            .get(&index)
            .ok_or(FrostError::MissingNonceCommitment { index })
    }

    /// `ρ_i = H4(H4(m, D_i.x, D_i.y, E_i.x), E_i.y, i, 0)`.
    pub fn binding_factor(&self, index: SignerIndex) -> Result<ScalarField> {
        let commitment = self.commitment(index)?;
        let (dx, dy) = commitment.d.coordinates();
        let (ex, ey) = commitment.e.coordinates();
        let inner = hash_oracle::hash4(self.message, dx, dy, ex)?;
        let rho = hash_oracle::hash4(
            inner,
            ey,
            BaseField::from_canonical_u64(u64::from(index)),
            BaseField::from_canonical_u64(BINDING_FACTOR_PAD),
        )?;
        Ok(rho.to_scalar_field())
    }

    /// `R = Σ_j (D_j + [ρ_j]E_j)` over every participant.
    pub fn group_commitment(&self) -> Result<Affine> {
        let mut points = Vec::with_capacity(2 * self.participants.len());
        let mut scalars = Vec::with_capacity(2 * self.participants.len());
        for &index in &self.participants {
            let commitment = self.commitment(index)?;
            points.push(commitment.d);
            scalars.push(ScalarField::ONE);
            points.push(commitment.e);
            scalars.push(self.binding_factor(index)?);
        }
        Ok(<Affine as Group>::multi_scalar_mul(&points, &scalars))
    }

    /// Lagrange or Birkhoff weight of a participant over this session's set.
    pub fn interpolation_coefficient(&self, index: SignerIndex) -> Result<ScalarField> {
        let position = self.position(index)?;
        let coefficients = match &self.participant_ranks {
            None => lagrange_coefficients(&self.participants)?,
            Some(ranks) => {
                let participants: Vec<_> = self
                    .participants
                    .iter()
                    .map(|&i| BirkhoffParticipant::new(i, ranks.get(&i).copied().unwrap_or(0)))
                    .collect();
                birkhoff_coefficients(&participants)?
            }
        };
        Ok(coefficients[position])
    }

    /// `z_i = d_i + ρ_i e_i + w_i s_i c`, with `w_i` the interpolation weight.
    #[instrument(skip_all, fields(index = share.index()), err(Debug))]
    pub fn partial_sign(&self, share: &KeyShare, nonce: &NoncePair) -> Result<PartialSignature> {
        let index = share.index();
        self.position(index)?;

        if share.rank() != self.rank_of(index) {
            return Err(FrostError::invalid_configuration(format!(
                "signer {index} holds a rank {} share but the session expects rank {}",
                share.rank(),
                self.rank_of(index)
            )));
        }

        if let Some(missing) = self
            .participants
            .iter()
            .find(|i| !self.nonce_commitments.contains_key(i))
        {
            warn!(missing, "partial signature requested before all commitments were registered");
            return Err(FrostError::MissingNonceCommitment { index: *missing });
        }

        if *self.commitment(index)? != nonce.commitment() {
            return Err(FrostError::invalid_configuration(format!(
                "nonce does not match the commitment registered for signer {index}"
            )));
        }

        let rho = self.binding_factor(index)?;
        let r = self.group_commitment()?;
        let c = compute_challenge(&r, &self.group_public_key, self.message)?;
        let weight = self.interpolation_coefficient(index)?;

        let weighted = Zeroizing::new(weight * *share.secret_share());
        let z = *nonce.hiding() + rho * *nonce.binding() + *weighted * c;

        Ok(PartialSignature {
            signer_index: index,
            z,
            r,
        })
    }
}

/// One signer's inputs to [`sign`]: their key share and a fresh nonce pair.
///
/// The nonce is moved in and wiped when the input is dropped.
#[derive(Debug)]
pub struct SignerInput<'a> {
    pub share: &'a KeyShare,
    pub nonce: NoncePair,
}

impl<'a> SignerInput<'a> {
    pub fn new(share: &'a KeyShare, nonce: NoncePair) -> Self {
        SignerInput { share, nonce }
    }
}

/// Run a whole signing round locally: create the session, register every
/// commitment, compute every partial signature and aggregate.
///
/// A ranked session is used when any signer holds a derivative share.
#[instrument(skip(signers, group_public_key), fields(count = signers.len()), err(Debug))]
pub fn sign(
    message: BaseField,
    signers: Vec<SignerInput<'_>>,
    group_public_key: &Affine,
    threshold: u16,
) -> Result<FrostSignature> {
    let mut session = if signers.iter().any(|s| s.share.rank() > 0) {
        let participants: Vec<_> = signers
            .iter()
            .map(|s| BirkhoffParticipant::new(s.share.index(), s.share.rank()))
            .collect();
        SigningSession::new_ranked(message, &participants, *group_public_key, threshold)?
    } else {
        let indices: Vec<_> = signers.iter().map(|s| s.share.index()).collect();
        SigningSession::new(message, &indices, *group_public_key, threshold)?
    };

    for signer in &signers {
        session.register_nonce_commitment(signer.share.index(), signer.nonce.commitment())?;
    }

    let partials = signers
        .iter()
        .map(|signer| session.partial_sign(signer.share, &signer.nonce))
        .collect::<Result<Vec<_>>>()?;

    aggregate(&partials, threshold)
}
