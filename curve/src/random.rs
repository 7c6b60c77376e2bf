use rand::Rng;
use rand::distr::{Distribution, StandardUniform};

use crate::{BaseField, ScalarField};

/// Sampling of uniformly random field elements.
///
/// Draws go through `StandardUniform`, which reduces 64 random bytes.
pub trait RandomField: Sized {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// Uniform over the nonzero elements; nonces and polynomial secrets use this.
    fn random_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl RandomField for BaseField {
    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardUniform.sample(rng)
    }

    fn random_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let value: Self = StandardUniform.sample(rng);
            if !value.is_zero() {
                return value;
            }
        }
    }
}

impl RandomField for ScalarField {
    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardUniform.sample(rng)
    }

    fn random_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let value: Self = StandardUniform.sample(rng);
            if !value.is_zero() {
                return value;
            }
        }
    }
}
