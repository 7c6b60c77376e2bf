//! Scalar field of the curve. n = 0x30644e72e131a029b85045b68181585d97816a916871ca8d3c208c16d87cfd47
//!
//! Grumpkin has prime order n, which equals the BN254 base field modulus.
//! Secret shares, nonces, binding factors and interpolation coefficients all
//! live here. Elements zeroize in place, so secret-holding wrappers can wipe them.

use crate::field::bn254_field;

bn254_field!(
    /// Scalar field element for the curve, backed by the BN254 base field `Fq`.
    ScalarField(ark_bn254::Fq)
);

impl ScalarField {
    /// Reinterpret the canonical value as a base field element, reducing modulo r.
    ///
    /// Values in `[r, n)` wrap; callers hashing scalars only feed small indices
    /// or values that are already hash outputs.
    #[inline]
    pub fn to_base_field(&self) -> crate::BaseField {
        crate::BaseField::from_canonical_limbs(self.to_canonical_limbs())
    }
}
