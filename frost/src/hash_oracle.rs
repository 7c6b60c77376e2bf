//! Width-4 Poseidon2 hash oracle.
//!
//! The oracle must agree bit-for-bit with the proving backend:
//! `hash2(a, b) = permute([a, b, 0, 0])[0]`, `hash3` pads one zero and
//! `hash4` fills the state. Round constants are derived on first
//! initialization; every hash on an uninitialized oracle fails with
//! [`FrostError::UninitializedHashOracle`].

use std::sync::OnceLock;

use curve::{BaseField, POSEIDON2_WIDTH, Poseidon2};
use tracing::debug;

use crate::errors::{FrostError, Result};

static GLOBAL: HashOracle = HashOracle::new();

/// A Poseidon2 permutation behind one-time initialization.
#[derive(Debug, Default)]
pub struct HashOracle {
    permutation: OnceLock<Poseidon2>,
}

impl HashOracle {
    pub const fn new() -> Self {
        HashOracle {
            permutation: OnceLock::new(),
        }
    }

    /// Derive the round constants. Safe to call any number of times from any
    /// thread; only the first call does work.
    pub fn init(&self) {
        self.permutation.get_or_init(|| {
            debug!("deriving poseidon2 round constants");
            Poseidon2::bn254()
        });
    }

    pub fn is_initialized(&self) -> bool {
        self.permutation.get().is_some()
    }

    fn permutation(&self) -> Result<&Poseidon2> {
        self.permutation
            .get()
            .ok_or(FrostError::UninitializedHashOracle)
    }

    pub fn permute(&self, state: [BaseField; POSEIDON2_WIDTH]) -> Result<[BaseField; POSEIDON2_WIDTH]> {
        Ok(self.permutation()?.permute(state))
    }

    pub fn hash2(&self, a: BaseField, b: BaseField) -> Result<BaseField> {
        Ok(self.permute([a, b, BaseField::ZERO, BaseField::ZERO])?[0])
    }

    pub fn hash3(&self, a: BaseField, b: BaseField, c: BaseField) -> Result<BaseField> {
        Ok(self.permute([a, b, c, BaseField::ZERO])?[0])
    }

    pub fn hash4(&self, a: BaseField, b: BaseField, c: BaseField, d: BaseField) -> Result<BaseField> {
        Ok(self.permute([a, b, c, d])?[0])
    }
}

/// The process-wide oracle used by the signing engine.
pub fn global() -> &'static HashOracle {
    &GLOBAL
}

/// Initialize the process-wide oracle.
pub fn init() {
    GLOBAL.init();
}

pub fn hash2(a: BaseField, b: BaseField) -> Result<BaseField> {
    GLOBAL.hash2(a, b)
}

pub fn hash3(a: BaseField, b: BaseField, c: BaseField) -> Result<BaseField> {
    GLOBAL.hash3(a, b, c)
}

pub fn hash4(a: BaseField, b: BaseField, c: BaseField, d: BaseField) -> Result<BaseField> {
    GLOBAL.hash4(a, b, c, d)
}
