//! Poseidon2 permutation over the BN254 scalar field, state width 4.
//!
//! Parameters: `x^5` S-box, 8 full rounds split 4/4 around 56 partial rounds.
//! Round constants are derived with the Grain LFSR; the internal diagonal is
//! the published width-4 instance. Outputs are bit-compatible with the
//! Barretenberg Poseidon2 used by the proving backend.

use crate::grain::GrainLfsr;
use crate::BaseField;

/// State width.
pub const WIDTH: usize = 4;
/// Total full rounds (half before, half after the partial rounds).
pub const FULL_ROUNDS: usize = 8;
/// Partial rounds.
pub const PARTIAL_ROUNDS: usize = 56;

const HALF_FULL_ROUNDS: usize = FULL_ROUNDS / 2;

const INTERNAL_DIAGONAL: [[u64; 4]; WIDTH] = [
    [0xb56821fd19d3b6e7, 0x0d03f98929ca1d7f, 0x04b1e03b4bd9490c, 0x10dc6e9c006ea38b],
    [0xa86b38cfb45a740b, 0x99df9756d4dd9b84, 0x0149b3d0a30b3bb5, 0x0c28145b6a44df3e],
    [0x70067d00141cac15, 0xb21f75bb60e35961, 0xb2c7645a50392798, 0x00544b8338791518],
    [0x13bc534433ee428b, 0x52e105a3b8fa8526, 0x2e2e82eb122789e3, 0x222c01175718386f],
];

#[derive(Clone, Debug)]
pub struct Poseidon2 {
    initial_external: Vec<[BaseField; WIDTH]>,
    internal: Vec<BaseField>,
    terminal_external: Vec<[BaseField; WIDTH]>,
    diagonal: [BaseField; WIDTH],
}

impl Poseidon2 {
    /// Build the BN254 width-4 instance, deriving all 88 round constants.
    pub fn bn254() -> Self {
        let mut lfsr = GrainLfsr::new(WIDTH, FULL_ROUNDS, PARTIAL_ROUNDS);
        let next_round = |lfsr: &mut GrainLfsr| {
            let mut rc = [BaseField::ZERO; WIDTH];
            for slot in rc.iter_mut() {
                *slot = lfsr.next_field_element();
            }
            rc
        };

        let initial_external = (0..HALF_FULL_ROUNDS).map(|_| next_round(&mut lfsr)).collect();
        let internal = lfsr.field_elements(PARTIAL_ROUNDS);
        let terminal_external = (0..HALF_FULL_ROUNDS).map(|_| next_round(&mut lfsr)).collect();

        Poseidon2 {
            initial_external,
            internal,
            terminal_external,
            diagonal: INTERNAL_DIAGONAL.map(BaseField::from_canonical_limbs),
        }
    }

    #[inline]
    fn sbox(x: BaseField) -> BaseField {
        let x2 = x.square();
        x2.square() * x
    }

    /// The 4x4 MDS layer `[[5,7,1,3],[4,6,1,1],[1,3,5,7],[1,1,4,6]]`.
    #[inline]
    fn external_linear_layer(state: &mut [BaseField; WIDTH]) {
        let [a, b, c, d] = *state;
        let t0 = a + b;
        let t1 = c + d;
        let t2 = b.double() + t1;
        let t3 = d.double() + t0;
        let t4 = t1.double().double() + t3;
        let t5 = t0.double().double() + t2;
        let t6 = t3 + t5;
        let t7 = t2 + t4;
        *state = [t6, t5, t7, t4];
    }

    #[inline]
    fn internal_linear_layer(&self, state: &mut [BaseField; WIDTH]) {
        let sum: BaseField = state.iter().sum();
        for (x, d) in state.iter_mut().zip(self.diagonal.iter()) {
            *x = *x * *d + sum;
        }
    }

    fn full_round(state: &mut [BaseField; WIDTH], rc: &[BaseField; WIDTH]) {
        for (x, c) in state.iter_mut().zip(rc.iter()) {
            *x = Self::sbox(*x + *c);
        }
        Self::external_linear_layer(state);
    }

    /// Apply the permutation in place.
    pub fn permute_mut(&self, state: &mut [BaseField; WIDTH]) {
        Self::external_linear_layer(state);

        for rc in &self.initial_external {
            Self::full_round(state, rc);
        }

        for rc in &self.internal {
            state[0] = Self::sbox(state[0] + *rc);
            self.internal_linear_layer(state);
        }

        for rc in &self.terminal_external {
            Self::full_round(state, rc);
        }
    }

    pub fn permute(&self, mut state: [BaseField; WIDTH]) -> [BaseField; WIDTH] {
        self.permute_mut(&mut state);
        state
    }

    /// Round constants in derivation order.
    pub fn round_constants(&self) -> impl Iterator<Item = &BaseField> {
        self.initial_external
            .iter()
            .flatten()
            .chain(self.internal.iter())
            .chain(self.terminal_external.iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> BaseField {
        BaseField::from_hex(s).unwrap()
    }

    #[test]
    fn test_round_constant_layout() {
        let p = Poseidon2::bn254();
        let constants: Vec<_> = p.round_constants().copied().collect();
        assert_eq!(constants.len(), FULL_ROUNDS * WIDTH + PARTIAL_ROUNDS);
        assert_eq!(
            constants[0],
            hex("0x19b849f69450b06848da1d39bd5e4a4302bb86744edc26238b0878e269ed23e5")
        );
        assert_eq!(
            constants[constants.len() - 1],
            hex("0x176563472456aaa746b694c60e1823611ef39039b2edc7ff391e6f2293d2c404")
        );
    }

    #[test]
    fn test_permutation_known_answer() {
        let p = Poseidon2::bn254();
        let input = [0u64, 1, 2, 3].map(BaseField::from_canonical_u64);
        let expected = [
            hex("0x01bd538c2ee014ed5141b29e9ae240bf8db3fe5b9a38629a9647cf8d76c01737"),
            hex("0x239b62e7db98aa3a2a8f6a0d2fa1709e7a35959aa6c7034814d9daa90cbac662"),
            hex("0x04cbb44c61d928ed06808456bf758cbf0c18d1e15a7b6dbc8245fa7515d5e3cb"),
            hex("0x2e11c5cff2a22c64d01304b778d78f6998eff1ab73163a35603f54794c30847a"),
        ];
        assert_eq!(p.permute(input), expected);
    }

    #[test]
    fn test_external_layer_matrix() {
        let mut state = [BaseField::ONE, BaseField::ZERO, BaseField::ZERO, BaseField::ZERO];
        Poseidon2::external_linear_layer(&mut state);
        // First column of the matrix.
        assert_eq!(state, [5u64, 4, 1, 1].map(BaseField::from_canonical_u64));
    }

    #[test]
    fn test_permutation_is_not_identity_on_zero() {
        let p = Poseidon2::bn254();
        let out = p.permute([BaseField::ZERO; WIDTH]);
        assert_eq!(
            out[0],
            hex("0x18dfb8dc9b82229cff974efefc8df78b1ce96d9d844236b496785c698bc6732e")
        );
    }
}
