//! The flat witness record for a spend proof.

use curve::{Affine, BaseField};
use frost::{FrostError, FrostSignature, Result, hash_oracle};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::merkle_path::MerklePath;
use crate::scalar_limbs::SplitScalar;

/// Depth of the note commitment tree.
pub const DEFAULT_TREE_DEPTH: usize = 20;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessConfig {
    pub tree_depth: usize,
}

impl Default for WitnessConfig {
    fn default() -> Self {
        Self {
            tree_depth: DEFAULT_TREE_DEPTH,
        }
    }
}

/// The note being spent and its position in the commitment tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteOpening {
    pub amount: BaseField,
    pub blinding: BaseField,
    pub nullifier: BaseField,
    pub commitment: BaseField,
    pub leaf_index: u64,
    /// Sibling hashes from the leaf level up. May be shorter than the tree.
    pub siblings: Vec<BaseField>,
}

/// Witness data for the spend circuit.
///
/// The signed message is `hash2(nullifier, commitment)` and the Merkle leaf is
/// the note commitment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendWitness {
    pub signature_r_x: BaseField,
    pub signature_r_y: BaseField,
    pub signature_z: SplitScalar,
    pub group_public_key_x: BaseField,
    pub group_public_key_y: BaseField,
    /// `hash2(PK.x, PK.y)`
    pub spend_key_hash: BaseField,
    pub amount: BaseField,
    pub blinding: BaseField,
    pub merkle_path: MerklePath,
    pub nullifier: BaseField,
    pub commitment: BaseField,
    pub merkle_root: BaseField,
}

impl SpendWitness {
    /// Build the record from a signature, the group key it verifies under and
    /// the opened note.
    #[instrument(skip_all, fields(depth = config.tree_depth, leaf = note.leaf_index), err(Debug))]
    pub fn new(
        signature: &FrostSignature,
        group_public_key: &Affine,
        note: &NoteOpening,
        config: &WitnessConfig,
    ) -> Result<Self> {
        let merkle_path = MerklePath::new(note.leaf_index, &note.siblings, config.tree_depth)?;
        let merkle_root = merkle_path.root(note.commitment)?;
        let (r_x, r_y) = signature.r.coordinates();
        let (pk_x, pk_y) = group_public_key.coordinates();
        let spend_key_hash = hash_oracle::hash2(pk_x, pk_y)?;
        debug!(?merkle_root, "built spend witness");

        Ok(Self {
            signature_r_x: r_x,
            signature_r_y: r_y,
            signature_z: SplitScalar::from_scalar_field(&signature.z),
            group_public_key_x: pk_x,
            group_public_key_y: pk_y,
            spend_key_hash,
            amount: note.amount,
            blinding: note.blinding,
            merkle_path,
            nullifier: note.nullifier,
            commitment: note.commitment,
            merkle_root,
        })
    }

    /// The message the spend signature must cover.
    pub fn message(&self) -> Result<BaseField> {
        hash_oracle::hash2(self.nullifier, self.commitment)
    }

    /// Check the carried signature against the carried key and message.
    ///
    /// Coordinates that do not form a curve point fail with
    /// [`FrostError::InvalidPoint`].
    pub fn verify_signature(&self) -> Result<bool> {
        let r = Affine::new_checked(self.signature_r_x, self.signature_r_y)
            .ok_or(FrostError::InvalidPoint { point: "signature commitment R" })?;
        let pk = Affine::new_checked(self.group_public_key_x, self.group_public_key_y)
            .ok_or(FrostError::InvalidPoint { point: "group public key" })?;
        let signature = FrostSignature {
            r,
            z: self.signature_z.to_scalar_field(),
        };
        signature.verify(self.message()?, &pk)
    }

    /// Every value in the order the circuit reads them:
    /// `R.x, R.y, z.lo, z.hi, PK.x, PK.y, spend_key_hash, amount, blinding,
    /// path[0..depth], bits[0..depth], nullifier, commitment, root`.
    pub fn field_elements(&self) -> Vec<BaseField> {
        let depth = self.merkle_path.depth();
        let mut out = Vec::with_capacity(12 + 2 * depth);
        out.extend([
            self.signature_r_x,
            self.signature_r_y,
            self.signature_z.lo,
            self.signature_z.hi,
            self.group_public_key_x,
            self.group_public_key_y,
            self.spend_key_hash,
            self.amount,
            self.blinding,
        ]);
        out.extend_from_slice(self.merkle_path.siblings());
        out.extend(
            self.merkle_path
                .index_bits()
                .iter()
                .map(|&bit| BaseField::from_canonical_u64(u64::from(bit))),
        );
        out.extend([self.nullifier, self.commitment, self.merkle_root]);
        out
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| FrostError::Serialization {
            reason: e.to_string(),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        postcard::from_bytes(bytes).map_err(|e| FrostError::Serialization {
            reason: e.to_string(),
        })
    }
}
