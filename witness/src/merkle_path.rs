//! Fixed-depth Merkle authentication paths.
//!
//! Nodes combine as `hash2(left, right)`. A path shorter than the tree depth
//! is padded with zero siblings and zero index bits, so every witness has the
//! same shape regardless of how full the tree is.

use curve::BaseField;
use frost::{FrostError, Result, hash_oracle};
use serde::{Deserialize, Serialize};

/// A padded path from a leaf to the root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    siblings: Vec<BaseField>,
    index_bits: Vec<bool>,
}

impl MerklePath {
    /// Pad `siblings` (leaf level first) to `depth` for the leaf at `leaf_index`.
    ///
    /// Fails with `IndexOutOfRange` when `leaf_index >= 2^depth` or when more
    /// siblings than `depth` are given.
    pub fn new(leaf_index: u64, siblings: &[BaseField], depth: usize) -> Result<Self> {
        if siblings.len() > depth {
            return Err(FrostError::IndexOutOfRange {
                index: siblings.len() as u64,
                bound: depth as u64,
            });
        }
        if let Some(capacity) = u32::try_from(depth).ok().and_then(|d| 1u64.checked_shl(d)) {
            if leaf_index >= capacity {
                return Err(FrostError::IndexOutOfRange {
                    index: leaf_index,
                    bound: capacity,
                });
            }
        }

        let mut padded = siblings.to_vec();
        padded.resize(depth, BaseField::ZERO);
        let index_bits = (0..depth)
            .map(|level| level < 64 && (leaf_index >> level) & 1 == 1)
            .collect();

        Ok(Self {
            siblings: padded,
            index_bits,
        })
    }

    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    pub fn siblings(&self) -> &[BaseField] {
        &self.siblings
    }

    /// Direction bits, leaf level first. `true` means the current node is the
    /// right child.
    pub fn index_bits(&self) -> &[bool] {
        &self.index_bits
    }

    /// The leaf position encoded by the direction bits.
    pub fn leaf_index(&self) -> u64 {
        self.index_bits
            .iter()
            .take(64)
            .enumerate()
            .fold(0, |acc, (level, &bit)| acc | (u64::from(bit) << level))
    }

    /// Hash `leaf` up the path.
    pub fn root(&self, leaf: BaseField) -> Result<BaseField> {
        self.siblings
            .iter()
            .zip(&self.index_bits)
            .try_fold(leaf, |node, (&sibling, &is_right)| {
                if is_right {
                    hash_oracle::hash2(sibling, node)
                } else {
                    hash_oracle::hash2(node, sibling)
                }
            })
    }
}
