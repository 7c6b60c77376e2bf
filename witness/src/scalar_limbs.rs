//! Scalar field elements as base field limbs.
//!
//! The signature response `z` lives in the Grumpkin scalar field, which is
//! larger than the base field the proving backend works in. It is carried as
//! two 128-bit limbs, each of which fits in a base field element.

use curve::{BaseField, ScalarField};
use serde::{Deserialize, Serialize};

/// Number of base field limbs per scalar.
pub const SCALAR_LIMBS: usize = 2;

/// Bits per limb.
pub const LIMB_BITS: u32 = 128;

/// `value = lo + 2^128 * hi`, both limbs `< 2^128`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitScalar {
    pub lo: BaseField,
    pub hi: BaseField,
}

impl SplitScalar {
    pub fn from_scalar_field(scalar: &ScalarField) -> Self {
        let [l0, l1, l2, l3] = scalar.to_canonical_limbs();
        Self {
            lo: BaseField::from_canonical_limbs([l0, l1, 0, 0]),
            hi: BaseField::from_canonical_limbs([l2, l3, 0, 0]),
        }
    }

    /// Recombine the limbs. Limbs wider than 128 bits are truncated.
    pub fn to_scalar_field(&self) -> ScalarField {
        let lo = self.lo.to_canonical_limbs();
        let hi = self.hi.to_canonical_limbs();
        ScalarField::from_canonical_limbs([lo[0], lo[1], hi[0], hi[1]])
    }

    pub fn limbs(&self) -> [BaseField; SCALAR_LIMBS] {
        [self.lo, self.hi]
    }
}
