//! Secret polynomials over the scalar field.

use core::fmt;

use curve::{Affine, RandomField, ScalarField};
use rand::Rng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::birkhoff::falling_factorial;

/// `f(x) = c_0 + c_1 x + ... + c_{t-1} x^{t-1}`, wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Polynomial {
    coefficients: Vec<ScalarField>,
}

impl Polynomial {
    /// Sample a polynomial with `threshold` coefficients whose constant term is `secret`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, secret: &ScalarField, threshold: usize) -> Self {
        let mut coefficients = Vec::with_capacity(threshold);
        coefficients.push(*secret);
        for _ in 1..threshold {
            coefficients.push(ScalarField::random(rng));
        }
        Polynomial { coefficients }
    }

    pub fn from_coefficients(coefficients: Vec<ScalarField>) -> Self {
        Polynomial { coefficients }
    }

    /// Number of coefficients, i.e. the threshold it was sampled for.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn constant_term(&self) -> ScalarField {
        self.coefficients.first().copied().unwrap_or(ScalarField::ZERO)
    }

    /// Horner evaluation of `f(x)`.
    pub fn evaluate(&self, x: &ScalarField) -> ScalarField {
        self.coefficients
            .iter()
            .rev()
            .fold(ScalarField::ZERO, |acc, c| acc * *x + *c)
    }

    /// Evaluate the `order`-th derivative: `Σ_{j≥k} ff(j, k) c_j x^{j-k}`.
    pub fn derivative_at(&self, x: &ScalarField, order: usize) -> ScalarField {
        self.coefficients
            .iter()
            .enumerate()
            .skip(order)
            .rev()
            .fold(ScalarField::ZERO, |acc, (j, c)| {
                acc * *x + falling_factorial(j as u64, order as u64) * *c
            })
    }

    /// Feldman commitments `[c_j]G` to every coefficient.
    pub fn commitments(&self) -> Vec<Affine> {
        self.coefficients.iter().map(Affine::mul_generator).collect()
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polynomial")
            .field("degree", &self.coefficients.len().saturating_sub(1))
            .field("coefficients", &"[redacted]")
            .finish()
    }
}
