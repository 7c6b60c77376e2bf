//! Base field of the curve: the BN254 scalar field.
//! p = 0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001
//!
//! This is the native field of the host proof system. Point coordinates,
//! Poseidon2 states and every hash input or output are elements of it.

use crate::field::bn254_field;

bn254_field!(
    /// Element of the BN254 scalar field `Fr`, the coordinate field of Grumpkin.
    BaseField(ark_bn254::Fr)
);

impl BaseField {
    /// Reinterpret the canonical value as a scalar, reducing modulo the group order.
    ///
    /// Since r < n, this is injective on the whole base field.
    #[inline]
    pub fn to_scalar_field(&self) -> crate::ScalarField {
        crate::ScalarField::from_canonical_limbs(self.to_canonical_limbs())
    }
}
