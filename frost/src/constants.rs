//! Constants used by the threshold signing engine.

/// Size of a serialized scalar in bytes.
pub const SCALAR_SIZE: usize = 32;

/// Size of a serialized base field element in bytes.
pub const FIELD_SIZE: usize = 32;

/// Size of a serialized affine point: `x || y`, identity encoded as `(0, 0)`.
pub const POINT_SIZE: usize = 2 * FIELD_SIZE;

/// Size of a serialized FROST signature: `R.x || R.y || z`.
pub const SIG_SIZE: usize = POINT_SIZE + SCALAR_SIZE;

/// Largest supported number of signers in one ceremony.
///
/// Interpolation solves a dense system per signing set, so sets are kept small.
pub const MAX_SIGNERS: u16 = 1024;

/// Trailing input of the second binding-factor hash stage.
pub(crate) const BINDING_FACTOR_PAD: u64 = 0;
