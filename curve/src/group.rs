use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::ScalarField;

/// Access to the canonical little-endian bits of a scalar.
pub trait ScalarBits {
    fn to_u64_limbs(&self) -> [u64; 4];
}

impl ScalarBits for ScalarField {
    #[inline]
    fn to_u64_limbs(&self) -> [u64; 4] {
        self.to_canonical_limbs()
    }
}

/// Prime-order group operations shared by the affine and Jacobian point types.
///
/// Every multiplication accepts the identity and the zero scalar:
/// `[0]P` and `[k]O` both return the identity.
pub trait Group:
    Sized
    + Copy
    + PartialEq
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + SubAssign
    + Neg<Output = Self>
{
    type Scalar: ScalarBits;

    fn identity() -> Self;
    fn is_identity(&self) -> bool;
    fn generator() -> Self;
    fn mul_generator(scalar: &Self::Scalar) -> Self;
    fn double(&self) -> Self;
    fn negate(&self) -> Self;

    /// Variable-base multiplication with a 4-bit fixed window, most significant
    /// nibble first.
    fn scalar_mul(&self, scalar: &Self::Scalar) -> Self {
        if self.is_identity() {
            return Self::identity();
        }

        let mut table = [Self::identity(); 16];
        table[1] = *self;
        for i in 2..16 {
            table[i] = if i % 2 == 0 {
                table[i / 2].double()
            } else {
                table[i - 1] + table[1]
            };
        }

        let mut result = Self::identity();
        for &limb in scalar.to_u64_limbs().iter().rev() {
            for shift in (0..64).step_by(4).rev() {
                for _ in 0..4 {
                    result = result.double();
                }
                let window = ((limb >> shift) & 0xF) as usize;
                if window != 0 {
                    result += table[window];
                }
            }
        }
        result
    }

    /// `Σ scalars[i] · points[i]`; pairs beyond the shorter slice are ignored.
    fn multi_scalar_mul(points: &[Self], scalars: &[Self::Scalar]) -> Self {
        debug_assert_eq!(points.len(), scalars.len());
        points
            .iter()
            .zip(scalars.iter())
            .fold(Self::identity(), |acc, (point, scalar)| acc + point.scalar_mul(scalar))
    }
}
