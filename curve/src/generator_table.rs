use std::sync::OnceLock;

use crate::group::ScalarBits;
use crate::{Affine, Projective, ScalarField};

/// Window width for fixed-base multiplication.
pub(crate) const GENERATOR_WINDOW_BITS: usize = 8;
const TABLE_SIZE: usize = 1 << GENERATOR_WINDOW_BITS;

static GENERATOR_TABLE: OnceLock<Vec<Affine>> = OnceLock::new();

/// `[i]G` for `i` in `0..256`, normalized with a single inversion.
pub(crate) fn affine_table() -> &'static [Affine] {
    GENERATOR_TABLE.get_or_init(|| {
        let g = Projective::generator();
        let mut multiples = Vec::with_capacity(TABLE_SIZE);
        multiples.push(Projective::INFINITY);
        for i in 1..TABLE_SIZE {
            multiples.push(multiples[i - 1] + g);
        }
        Projective::batch_normalize(&multiples)
    })
}

/// Fixed-base multiplication `[scalar]G` with 8-bit windows over the cached table.
pub fn mul_generator_affine(scalar: &ScalarField) -> Affine {
    let table = affine_table();
    let limbs = scalar.to_u64_limbs();
    let mut result = Projective::INFINITY;

    for &limb in limbs.iter().rev() {
        for shift in (0..64).step_by(GENERATOR_WINDOW_BITS).rev() {
            for _ in 0..GENERATOR_WINDOW_BITS {
                result = result.double();
            }

            let window = ((limb >> shift) & (TABLE_SIZE as u64 - 1)) as usize;
            if window != 0 {
                result += Projective::from_affine(&table[window]);
            }
        }
    }

    result.to_affine()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Group;

    #[test]
    fn test_table_entries() {
        let table = affine_table();
        let g = Affine::generator();
        assert_eq!(table.len(), TABLE_SIZE);
        assert!(table[0].is_infinity());
        assert_eq!(table[1], g);
        assert_eq!(table[2], g.double());
        assert_eq!(table[255], g.scalar_mul(&ScalarField::from_canonical_u64(255)));
    }

    #[test]
    fn test_mul_generator_multi_limb() {
        let scalar = ScalarField::from_canonical_limbs([7, 1, 0, 3]);
        let expected = Affine::generator().scalar_mul(&scalar);
        assert_eq!(mul_generator_affine(&scalar), expected);
    }
}
