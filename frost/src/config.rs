//! Ceremony and signing configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::birkhoff::{BirkhoffParticipant, is_poised};
use crate::constants::MAX_SIGNERS;
use crate::errors::{FrostError, Result};
use crate::{Rank, SignerIndex};

/// When ranked configurations are checked for poisedness.
///
/// Ranks below the threshold do not guarantee that every `t`-subset of
/// signers can sign. `Deferred` leaves the check to signing time, where a
/// non-poised set fails with [`FrostError::SingularInterpolation`]. `Eager`
/// enumerates all `C(n, t)` subsets when the ceremony is configured.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoisednessCheck {
    #[default]
    Deferred,
    Eager,
}

/// Parameters of a key ceremony.
///
/// `ranks` may be left empty for a flat `t`-of-`n` ceremony; otherwise it
/// holds one rank per signer, signer `i` being at position `i - 1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeremonyConfig {
    pub threshold: u16,
    pub total_signers: u16,
    #[serde(default)]
    pub ranks: Vec<Rank>,
    #[serde(default)]
    pub poisedness: PoisednessCheck,
}

impl CeremonyConfig {
    /// A flat `threshold`-of-`total_signers` configuration.
    pub fn new(threshold: u16, total_signers: u16) -> Self {
        CeremonyConfig {
            threshold,
            total_signers,
            ranks: Vec::new(),
            poisedness: PoisednessCheck::default(),
        }
    }

    pub fn with_ranks(mut self, ranks: Vec<Rank>) -> Self {
        self.ranks = ranks;
        self
    }

    pub fn with_poisedness(mut self, poisedness: PoisednessCheck) -> Self {
        self.poisedness = poisedness;
        self
    }

    /// Whether any signer holds a derivative share.
    pub fn is_ranked(&self) -> bool {
        self.ranks.iter().any(|&rank| rank > 0)
    }

    /// Rank of signer `index`; zero for flat configurations.
    pub fn rank_of(&self, index: SignerIndex) -> Rank {
        usize::from(index)
            .checked_sub(1)
            .and_then(|i| self.ranks.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Every signer as an interpolation participant, in index order.
    pub fn participants(&self) -> Vec<BirkhoffParticipant> {
        (1..=self.total_signers)
            .map(|index| BirkhoffParticipant::new(index, self.rank_of(index)))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        check_threshold(self.threshold, usize::from(self.total_signers))?;

        if !self.ranks.is_empty() && self.ranks.len() != usize::from(self.total_signers) {
            return Err(FrostError::invalid_configuration(format!(
                "{} ranks given for {} signers",
                self.ranks.len(),
                self.total_signers
            )));
        }

        if let Some((i, rank)) = self
            .ranks
            .iter()
            .enumerate()
            .find(|&(_, &rank)| rank >= self.threshold)
        {
            return Err(FrostError::invalid_configuration(format!(
                "signer {} has rank {} >= threshold {}",
                i + 1,
                rank,
                self.threshold
            )));
        }

        if self.poisedness == PoisednessCheck::Eager && self.is_ranked() {
            self.check_all_subsets_poised()?;
        }

        Ok(())
    }

    fn check_all_subsets_poised(&self) -> Result<()> {
        let participants = self.participants();
        let t = usize::from(self.threshold);
        let mut positions: Vec<usize> = (0..t).collect();
        let mut subset = Vec::with_capacity(t);

        loop {
            subset.clear();
            subset.extend(positions.iter().map(|&p| participants[p]));
            if !is_poised(&subset) {
                let participants: Vec<_> = subset.iter().map(|p| (p.index, p.rank)).collect();
                warn!(?participants, "ranked configuration has a non-poised signing set");
                return Err(FrostError::SingularInterpolation { participants });
            }
            if !next_combination(&mut positions, participants.len()) {
                return Ok(());
            }
        }
    }
}

/// Advance `positions` to the next `k`-combination of `0..n` in lexicographic
/// order. Returns `false` after the last one.
fn next_combination(positions: &mut [usize], n: usize) -> bool {
    let k = positions.len();
    let Some(i) = (0..k).rev().find(|&i| positions[i] < n - k + i) else {
        return false;
    };
    positions[i] += 1;
    for j in i + 1..k {
        positions[j] = positions[j - 1] + 1;
    }
    true
}

/// `1 <= threshold <= total <= MAX_SIGNERS`.
pub(crate) fn check_threshold(threshold: u16, total: usize) -> Result<()> {
    if threshold == 0 {
        return Err(FrostError::invalid_configuration("threshold must be at least 1"));
    }
    if usize::from(threshold) > total {
        return Err(FrostError::invalid_configuration(format!(
            "threshold {threshold} exceeds {total} signers"
        )));
    }
    if total > usize::from(MAX_SIGNERS) {
        return Err(FrostError::invalid_configuration(format!(
            "{total} signers exceeds the maximum of {MAX_SIGNERS}"
        )));
    }
    Ok(())
}
