//! Birkhoff interpolation for ranked (hierarchical) shares.
//!
//! A participant of rank `k` at index `x` holds `f^(k)(x)` instead of `f(x)`.
//! For a signing set of `m` participants the interpolation matrix is `m x m`,
//! row `i` holding `ff(j, k_i) x_i^(j - k_i)` in column `j >= k_i` and zero
//! elsewhere. The set is *poised* when that matrix is invertible; only then
//! is the secret `f(0)` determined by the shares.
//!
//! With every rank at zero the matrix is Vandermonde and the coefficients
//! coincide with the Lagrange coefficients at zero.

use core::fmt;

use curve::ScalarField;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::config::check_threshold;
use crate::errors::{FrostError, Result};
use crate::polynomial::Polynomial;
use crate::{Rank, SignerIndex};

/// One row of the interpolation matrix: an evaluation point and derivative order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BirkhoffParticipant {
    pub index: SignerIndex,
    pub rank: Rank,
}

impl BirkhoffParticipant {
    pub fn new(index: SignerIndex, rank: Rank) -> Self {
        BirkhoffParticipant { index, rank }
    }
}

/// A share `f^(rank)(index)`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RankedShare {
    pub index: SignerIndex,
    pub rank: Rank,
    pub value: ScalarField,
}

impl RankedShare {
    pub fn participant(&self) -> BirkhoffParticipant {
        BirkhoffParticipant::new(self.index, self.rank)
    }
}

impl fmt::Debug for RankedShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankedShare")
            .field("index", &self.index)
            .field("rank", &self.rank)
            .field("value", &"[redacted]")
            .finish()
    }
}

/// `n (n-1) ... (n-k+1)` in the scalar field; `1` for `k = 0`, `0` for `k > n`.
pub fn falling_factorial(n: u64, k: u64) -> ScalarField {
    if k > n {
        return ScalarField::ZERO;
    }
    (0..k)
        .map(|i| ScalarField::from_canonical_u64(n - i))
        .product()
}

/// Build the square interpolation matrix for `participants`.
pub fn birkhoff_matrix(participants: &[BirkhoffParticipant]) -> Vec<Vec<ScalarField>> {
    let size = participants.len();
    participants
        .iter()
        .map(|p| {
            let x = ScalarField::from_canonical_u64(u64::from(p.index));
            let k = usize::from(p.rank);
            let mut powers = Vec::with_capacity(size);
            let mut acc = ScalarField::ONE;
            for _ in 0..size {
                powers.push(acc);
                acc *= x;
            }
            (0..size)
                .map(|j| {
                    if j < k {
                        ScalarField::ZERO
                    } else {
                        falling_factorial(j as u64, k as u64) * powers[j - k]
                    }
                })
                .collect()
        })
        .collect()
}

/// Solve `matrix * y = vector` by Gauss-Jordan elimination.
///
/// The pivot is the first nonzero entry at or below the diagonal; its row is
/// swapped up, normalized to one and eliminated from every other row.
/// Returns `None` when the matrix is singular or the dimensions disagree.
pub fn gaussian_eliminate(
    matrix: &[Vec<ScalarField>],
    vector: &[ScalarField],
) -> Option<Vec<ScalarField>> {
    let n = matrix.len();
    if vector.len() != n || matrix.iter().any(|row| row.len() != n) {
        return None;
    }

    let mut a: Vec<Vec<ScalarField>> = matrix.to_vec();
    let mut b = Zeroizing::new(vector.to_vec());

    for col in 0..n {
        let pivot = (col..n).find(|&row| !a[row][col].is_zero())?;
        a.swap(col, pivot);
        b.swap(col, pivot);

        let inv = a[col][col].inverse();
        for entry in a[col].iter_mut().skip(col) {
            *entry *= inv;
        }
        b[col] *= inv;

        for row in 0..n {
            if row == col || a[row][col].is_zero() {
                continue;
            }
            let factor = a[row][col];
            for j in col..n {
                let delta = factor * a[col][j];
                a[row][j] -= delta;
            }
            let delta = factor * b[col];
            b[row] -= delta;
        }
    }

    Some(b.to_vec())
}

/// Whether the participants' interpolation matrix is invertible.
pub fn is_poised(participants: &[BirkhoffParticipant]) -> bool {
    if participants.is_empty() {
        return false;
    }
    let matrix = birkhoff_matrix(participants);
    gaussian_eliminate(&matrix, &unit_vector(participants.len())).is_some()
}

fn unit_vector(size: usize) -> Vec<ScalarField> {
    let mut e0 = vec![ScalarField::ZERO; size];
    if let Some(first) = e0.first_mut() {
        *first = ScalarField::ONE;
    }
    e0
}

fn transpose(matrix: &[Vec<ScalarField>]) -> Vec<Vec<ScalarField>> {
    let n = matrix.len();
    (0..n)
        .map(|j| matrix.iter().map(|row| row[j]).collect())
        .collect()
}

fn singular(participants: &[BirkhoffParticipant]) -> FrostError {
    let participants: Vec<_> = participants.iter().map(|p| (p.index, p.rank)).collect();
    warn!(?participants, "birkhoff configuration is not poised");
    FrostError::SingularInterpolation { participants }
}

fn check_indices(participants: &[BirkhoffParticipant]) -> Result<()> {
    if participants.is_empty() {
        return Err(FrostError::InsufficientSigners {
            required: 1,
            provided: 0,
        });
    }
    if participants.iter().any(|p| p.index == 0) {
        return Err(FrostError::invalid_configuration(
            "participant index 0 is reserved for the secret",
        ));
    }
    Ok(())
}

/// Coefficients `β` with `secret = Σ β_i value_i`, in participant order.
///
/// This is row zero of the inverse matrix, found by solving `Bᵀ y = e_0`.
pub fn birkhoff_coefficients(participants: &[BirkhoffParticipant]) -> Result<Vec<ScalarField>> {
    check_indices(participants)?;
    let matrix = transpose(&birkhoff_matrix(participants));
    gaussian_eliminate(&matrix, &unit_vector(participants.len()))
        .ok_or_else(|| singular(participants))
}

/// The coefficient of one participant within `participants`.
pub fn birkhoff_coefficient(
    index: SignerIndex,
    rank: Rank,
    participants: &[BirkhoffParticipant],
) -> Result<ScalarField> {
    let position = participants
        .iter()
        .position(|p| p.index == index && p.rank == rank)
        .ok_or(FrostError::IndexOutOfRange {
            index: u64::from(index),
            bound: participants.len() as u64,
        })?;
    Ok(birkhoff_coefficients(participants)?[position])
}

/// Split `secret` into ranked shares `f^(rank)(index)` of a random
/// degree-`threshold - 1` polynomial.
pub fn birkhoff_split<R: Rng + ?Sized>(
    rng: &mut R,
    secret: &ScalarField,
    threshold: u16,
    participants: &[BirkhoffParticipant],
) -> Result<Vec<RankedShare>> {
    check_threshold(threshold, participants.len())?;
    check_indices(participants)?;
    if let Some(p) = participants.iter().find(|p| p.rank >= threshold) {
        return Err(FrostError::invalid_configuration(format!(
            "signer {} has rank {} >= threshold {}",
            p.index, p.rank, threshold
        )));
    }

    let polynomial = Polynomial::random(rng, secret, usize::from(threshold));
    Ok(participants
        .iter()
        .map(|p| RankedShare {
            index: p.index,
            rank: p.rank,
            value: polynomial.derivative_at(
                &ScalarField::from_canonical_u64(u64::from(p.index)),
                usize::from(p.rank),
            ),
        })
        .collect())
}

/// Recover `f(0)` from ranked shares by solving `B a = values`.
pub fn birkhoff_reconstruct(shares: &[RankedShare]) -> Result<ScalarField> {
    let participants: Vec<_> = shares.iter().map(RankedShare::participant).collect();
    check_indices(&participants)?;
    let values = Zeroizing::new(shares.iter().map(|s| s.value).collect::<Vec<_>>());
    let matrix = birkhoff_matrix(&participants);
    let coefficients = gaussian_eliminate(&matrix, &values)
        .map(Zeroizing::new)
        .ok_or_else(|| singular(&participants))?;
    Ok(coefficients[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shamir::lagrange_coefficients;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use test_case::test_case;

    fn s(v: u64) -> ScalarField {
        ScalarField::from_canonical_u64(v)
    }

    fn ranked(pairs: &[(SignerIndex, Rank)]) -> Vec<BirkhoffParticipant> {
        pairs
            .iter()
            .map(|&(index, rank)| BirkhoffParticipant::new(index, rank))
            .collect()
    }

    #[test_case(0, 0, 1 ; "zero choose zero")]
    #[test_case(7, 0, 1 ; "k zero")]
    #[test_case(3, 5, 0 ; "k above n")]
    #[test_case(5, 5, 120 ; "n factorial")]
    #[test_case(6, 2, 30 ; "partial product")]
    fn test_falling_factorial(n: u64, k: u64, expected: u64) {
        assert_eq!(falling_factorial(n, k), s(expected));
    }

    #[test]
    fn test_matrix_shape() {
        let m = birkhoff_matrix(&ranked(&[(2, 0), (3, 1), (5, 2)]));
        assert_eq!(m[0], vec![s(1), s(2), s(4)]);
        assert_eq!(m[1], vec![s(0), s(1), s(6)]);
        assert_eq!(m[2], vec![s(0), s(0), s(2)]);
    }

    #[test]
    fn test_gaussian_eliminate_solves() {
        // x + y = 3, x - y = 1
        let matrix = vec![vec![s(1), s(1)], vec![s(1), -s(1)]];
        let solution = gaussian_eliminate(&matrix, &[s(3), s(1)]).unwrap();
        assert_eq!(solution, vec![s(2), s(1)]);
    }

    #[test]
    fn test_gaussian_eliminate_pivots() {
        // Leading zero forces a row swap.
        let matrix = vec![vec![s(0), s(2)], vec![s(3), s(0)]];
        let solution = gaussian_eliminate(&matrix, &[s(4), s(9)]).unwrap();
        assert_eq!(solution, vec![s(3), s(2)]);
    }

    #[test]
    fn test_gaussian_eliminate_singular_and_malformed() {
        let singular = vec![vec![s(1), s(2)], vec![s(2), s(4)]];
        assert!(gaussian_eliminate(&singular, &[s(1), s(1)]).is_none());
        assert!(gaussian_eliminate(&singular, &[s(1)]).is_none());
    }

    #[test]
    fn test_poisedness() {
        assert!(is_poised(&ranked(&[(1, 0), (2, 0), (3, 1)])));
        assert!(is_poised(&ranked(&[(1, 0), (3, 1), (4, 1)])));
        // Column zero is empty when nobody holds a rank-0 share.
        assert!(!is_poised(&ranked(&[(3, 1), (4, 1), (5, 1)])));
        // Derivatives alone never pin down the constant term.
        assert!(!is_poised(&ranked(&[(1, 1), (2, 1)])));
        assert!(!is_poised(&[]));
    }

    #[test]
    fn test_rank_zero_matches_lagrange() {
        let indices = [1u16, 3, 4, 7];
        let participants: Vec<_> = indices.iter().map(|&i| BirkhoffParticipant::new(i, 0)).collect();
        let beta = birkhoff_coefficients(&participants).unwrap();
        let lambda = lagrange_coefficients(&indices).unwrap();
        assert_eq!(beta, lambda);
        assert_eq!(beta.iter().sum::<ScalarField>(), ScalarField::ONE);
    }

    #[test]
    fn test_single_coefficient_lookup() {
        let participants = ranked(&[(1, 0), (2, 0), (3, 1)]);
        let all = birkhoff_coefficients(&participants).unwrap();
        assert_eq!(birkhoff_coefficient(3, 1, &participants).unwrap(), all[2]);
        assert!(matches!(
            birkhoff_coefficient(9, 0, &participants),
            Err(FrostError::IndexOutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn test_split_and_reconstruct_ranked() {
        let mut rng = StdRng::seed_from_u64(17);
        let secret = s(424242);
        let participants = ranked(&[(1, 0), (2, 0), (3, 1), (4, 1), (5, 2)]);
        let shares = birkhoff_split(&mut rng, &secret, 3, &participants).unwrap();

        let poised = [shares[0].clone(), shares[1].clone(), shares[2].clone()];
        assert_eq!(birkhoff_reconstruct(&poised).unwrap(), secret);

        let mixed = [shares[0].clone(), shares[3].clone(), shares[4].clone()];
        assert_eq!(birkhoff_reconstruct(&mixed).unwrap(), secret);

        // Extra shares still determine the same secret.
        assert_eq!(birkhoff_reconstruct(&shares).unwrap(), secret);
    }

    #[test]
    fn test_coefficients_reconstruct_secret() {
        let mut rng = StdRng::seed_from_u64(5);
        let secret = s(77);
        let participants = ranked(&[(1, 0), (3, 1), (4, 1)]);
        let shares = birkhoff_split(&mut rng, &secret, 3, &participants).unwrap();
        let beta = birkhoff_coefficients(&participants).unwrap();
        let combined: ScalarField = beta.iter().zip(&shares).map(|(b, sh)| *b * sh.value).sum();
        assert_eq!(combined, secret);
    }

    #[test]
    fn test_all_derivative_shares_are_singular() {
        let mut rng = StdRng::seed_from_u64(23);
        let participants = ranked(&[(1, 0), (2, 0), (3, 1), (4, 1), (5, 1)]);
        let shares = birkhoff_split(&mut rng, &s(5), 3, &participants).unwrap();
        let err = birkhoff_reconstruct(&shares[2..]).unwrap_err();
        assert_eq!(
            err,
            FrostError::SingularInterpolation {
                participants: vec![(3, 1), (4, 1), (5, 1)]
            }
        );
        assert!(birkhoff_coefficients(&participants[2..]).is_err());
    }

    #[test]
    fn test_split_rejects_rank_at_threshold() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = birkhoff_split(&mut rng, &s(5), 2, &ranked(&[(1, 0), (2, 2)])).unwrap_err();
        assert!(matches!(err, FrostError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_index_zero_rejected() {
        assert!(matches!(
            birkhoff_coefficients(&ranked(&[(0, 0), (1, 0)])),
            Err(FrostError::InvalidConfiguration { .. })
        ));
    }
}
