use crate::group::ScalarBits;
use crate::{Affine, Projective, ScalarField, mul_generator_affine};

const WINDOW_BITS: usize = 4;
const WINDOW_MASK: u64 = (1 << WINDOW_BITS) - 1;

/// Compute `a * G + b * P` where `G` is the fixed generator.
///
/// Both scalars share one doubling chain; the `P` side uses a 4-bit table
/// built per call, and the `G` side falls back to the cached generator table
/// when `b` is zero.
pub fn double_scalar_mul_basepoint_affine(
    a: &ScalarField,
    b: &ScalarField,
    point: &Affine,
) -> Affine {
    if b.is_zero() || point.is_infinity() {
        return mul_generator_affine(a);
    }

    let g = Projective::generator();
    let p = Projective::from_affine(point);
    let mut base_table = [Projective::INFINITY; 1 << WINDOW_BITS];
    let mut point_table = [Projective::INFINITY; 1 << WINDOW_BITS];
    for i in 1..base_table.len() {
        base_table[i] = base_table[i - 1] + g;
        point_table[i] = point_table[i - 1] + p;
    }

    let a_limbs = a.to_u64_limbs();
    let b_limbs = b.to_u64_limbs();
    let mut result = Projective::INFINITY;

    for limb_idx in (0..4).rev() {
        let a_limb = a_limbs[limb_idx];
        let b_limb = b_limbs[limb_idx];
        for shift in (0..64).step_by(WINDOW_BITS).rev() {
            for _ in 0..WINDOW_BITS {
                result = result.double();
            }

            let a_window = ((a_limb >> shift) & WINDOW_MASK) as usize;
            if a_window != 0 {
                result += base_table[a_window];
            }

            let b_window = ((b_limb >> shift) & WINDOW_MASK) as usize;
            if b_window != 0 {
                result += point_table[b_window];
            }
        }
    }

    result.to_affine()
}
