//! Shamir secret sharing and Lagrange interpolation at zero.

use core::fmt;

use curve::ScalarField;
use rand::Rng;
use tracing::warn;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::SignerIndex;
use crate::config::check_threshold;
use crate::errors::{FrostError, Result};
use crate::polynomial::Polynomial;

/// A plain share `f(index)`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Share {
    pub index: SignerIndex,
    pub value: ScalarField,
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("index", &self.index)
            .field("value", &"[redacted]")
            .finish()
    }
}

/// Split `secret` into `total` shares at `x = 1..=total`, any `threshold` of
/// which recover it.
pub fn shamir_split<R: Rng + ?Sized>(
    rng: &mut R,
    secret: &ScalarField,
    threshold: u16,
    total: u16,
) -> Result<Vec<Share>> {
    check_threshold(threshold, usize::from(total))?;
    let polynomial = Polynomial::random(rng, secret, usize::from(threshold));
    Ok((1..=total)
        .map(|index| Share {
            index,
            value: polynomial.evaluate(&ScalarField::from_canonical_u64(u64::from(index))),
        })
        .collect())
}

/// Lagrange coefficients `λ_i(0) = Π_{j≠i} x_j / (x_j - x_i)` for every index.
///
/// Denominators are inverted together, so the cost is one inversion per set.
pub fn lagrange_coefficients(indices: &[SignerIndex]) -> Result<Vec<ScalarField>> {
    if indices.is_empty() {
        return Err(FrostError::InsufficientSigners {
            required: 1,
            provided: 0,
        });
    }
    if indices.contains(&0) {
        return Err(FrostError::invalid_configuration(
            "participant index 0 is reserved for the secret",
        ));
    }

    let xs: Vec<ScalarField> = indices
        .iter()
        .map(|&i| ScalarField::from_canonical_u64(u64::from(i)))
        .collect();

    let mut numerators = Vec::with_capacity(xs.len());
    let mut denominators = Vec::with_capacity(xs.len());
    for (i, x_i) in xs.iter().enumerate() {
        let mut num = ScalarField::ONE;
        let mut den = ScalarField::ONE;
        for (j, x_j) in xs.iter().enumerate() {
            if i != j {
                num *= *x_j;
                den *= *x_j - *x_i;
            }
        }
        numerators.push(num);
        denominators.push(den);
    }

    let den_product: ScalarField = denominators.iter().copied().product();
    let Some(mut inv) = den_product.try_inverse() else {
        // A zero denominator means a repeated index.
        let participants = indices.iter().map(|&i| (i, 0)).collect::<Vec<_>>();
        warn!(?participants, "duplicate indices in lagrange interpolation");
        return Err(FrostError::SingularInterpolation { participants });
    };

    // Montgomery's trick over the denominators.
    let mut prefix = Vec::with_capacity(denominators.len());
    let mut acc = ScalarField::ONE;
    for den in &denominators {
        prefix.push(acc);
        acc *= *den;
    }
    let mut coefficients = vec![ScalarField::ZERO; xs.len()];
    for i in (0..xs.len()).rev() {
        coefficients[i] = numerators[i] * inv * prefix[i];
        inv *= denominators[i];
    }

    Ok(coefficients)
}

/// The Lagrange coefficient of `index` within `indices`.
pub fn lagrange_coefficient(index: SignerIndex, indices: &[SignerIndex]) -> Result<ScalarField> {
    let position = indices
        .iter()
        .position(|&i| i == index)
        .ok_or(FrostError::IndexOutOfRange {
            index: u64::from(index),
            bound: indices.len() as u64,
        })?;
    Ok(lagrange_coefficients(indices)?[position])
}

/// Interpolate `f(0)` from the given shares.
///
/// Fewer than `threshold` shares yield an unrelated value rather than an error.
pub fn shamir_reconstruct(shares: &[Share]) -> Result<ScalarField> {
    let indices: Vec<SignerIndex> = shares.iter().map(|s| s.index).collect();
    let coefficients = lagrange_coefficients(&indices)?;
    Ok(coefficients
        .iter()
        .zip(shares)
        .map(|(lambda, share)| *lambda * share.value)
        .sum())
}
