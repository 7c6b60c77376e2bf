//! Grumpkin curve arithmetic for threshold signing.
//!
//! Grumpkin is the cycle partner of BN254: its coordinates live in the BN254
//! scalar field, so points and hashes are native values inside the proof
//! system, while its group order is the BN254 base field. This crate
//! provides both prime fields, affine and Jacobian points, fixed-base and
//! double-base multiplication, and the width-4 Poseidon2 permutation.

mod affine;
mod basefield;
mod field;
mod generator_table;
mod grain;
mod group;
mod msm;
mod poseidon2;
mod projective;
mod random;
mod scalarfield;

pub use affine::Affine;
pub use basefield::BaseField;
pub use generator_table::mul_generator_affine;
pub use group::{Group, ScalarBits};
pub use msm::double_scalar_mul_basepoint_affine;
pub use poseidon2::{Poseidon2, FULL_ROUNDS, PARTIAL_ROUNDS, WIDTH as POSEIDON2_WIDTH};
pub use projective::Projective;
pub use random::RandomField;
pub use scalarfield::ScalarField;
