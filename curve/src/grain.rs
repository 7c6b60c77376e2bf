//! Grain LFSR used to derive Poseidon2 round constants.
//!
//! The 80-bit register is seeded from the instance parameters (field type,
//! S-box type, field size, width and round counts), clocked 160 times, then
//! read in bit pairs: a pair `(1, b)` yields `b`, a pair `(0, _)` is dropped.
//! Field elements are assembled most significant bit first and rejected when
//! not below the modulus.

use crate::BaseField;

const STATE_BITS: usize = 80;
const WARMUP_CLOCKS: usize = 160;
/// Bit length of the BN254 scalar field.
const FIELD_BITS: usize = 254;
/// Field type tag for prime fields.
const PRIME_FIELD: u64 = 1;
/// S-box tag for `x^alpha`.
const SBOX_POWER: u64 = 0;

pub(crate) struct GrainLfsr {
    state: [bool; STATE_BITS],
    head: usize,
}

impl GrainLfsr {
    pub(crate) fn new(width: usize, full_rounds: usize, partial_rounds: usize) -> Self {
        let mut state = [true; STATE_BITS];
        let fields = [
            (PRIME_FIELD, 2),
            (SBOX_POWER, 4),
            (FIELD_BITS as u64, 12),
            (width as u64, 12),
            (full_rounds as u64, 10),
            (partial_rounds as u64, 10),
        ];

        let mut pos = 0;
        for (value, bits) in fields {
            for i in (0..bits).rev() {
                state[pos] = (value >> i) & 1 == 1;
                pos += 1;
            }
        }
        // Remaining 30 bits stay set.

        let mut lfsr = GrainLfsr { state, head: 0 };
        for _ in 0..WARMUP_CLOCKS {
            lfsr.clock();
        }
        lfsr
    }

    #[inline]
    fn tap(&self, offset: usize) -> bool {
        self.state[(self.head + offset) % STATE_BITS]
    }

    fn clock(&mut self) -> bool {
        let bit = self.tap(62) ^ self.tap(51) ^ self.tap(38) ^ self.tap(23) ^ self.tap(13) ^ self.tap(0);
        // The oldest bit's slot becomes the newest.
        self.state[self.head] = bit;
        self.head = (self.head + 1) % STATE_BITS;
        bit
    }

    fn next_bit(&mut self) -> bool {
        loop {
            let keep = self.clock();
            let bit = self.clock();
            if keep {
                return bit;
            }
        }
    }

    pub(crate) fn next_field_element(&mut self) -> BaseField {
        loop {
            let mut limbs = [0u64; 4];
            for i in 0..FIELD_BITS {
                if self.next_bit() {
                    let pos = FIELD_BITS - 1 - i;
                    limbs[pos / 64] |= 1 << (pos % 64);
                }
            }
            if let Some(value) = BaseField::from_canonical_checked(limbs) {
                return value;
            }
        }
    }

    pub(crate) fn field_elements(&mut self, count: usize) -> Vec<BaseField> {
        (0..count).map(|_| self.next_field_element()).collect()
    }
}
