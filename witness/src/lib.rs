//! # Spend Witness Records
//!
//! Flattens a threshold signature and the note it authorizes into the field
//! elements a spend proof consumes. Nothing here proves anything; the record
//! is handed to an external proving backend.
//!
//! ## Layout
//!
//! ```text
//! R.x, R.y, z.lo, z.hi, PK.x, PK.y, hash2(PK.x, PK.y), amount, blinding,
//! path[0..depth], bits[0..depth], nullifier, commitment, root
//! ```
//!
//! `z` is a Grumpkin scalar and may exceed the base field modulus, so it is
//! split into two 128-bit limbs (see [`SplitScalar`]). The Merkle path is
//! padded with zero siblings to the configured depth.
//!
//! ## Example
//!
//! ```rust,ignore
//! use witness::{NoteOpening, SpendWitness, WitnessConfig};
//!
//! let witness = SpendWitness::new(&signature, &group_key, &note, &WitnessConfig::default())?;
//! assert!(witness.verify_signature()?);
//! let inputs = witness.field_elements();
//! ```
//!
//! See `demos/spend_witness.rs` for a complete run from key ceremony to record.

mod merkle_path;
mod scalar_limbs;
mod spend_witness;

pub use merkle_path::MerklePath;
pub use scalar_limbs::{LIMB_BITS, SCALAR_LIMBS, SplitScalar};
pub use spend_witness::{DEFAULT_TREE_DEPTH, NoteOpening, SpendWitness, WitnessConfig};

pub use curve::{Affine, BaseField, ScalarField};
