//! Field element wrappers over the arkworks BN254 prime fields.
//!
//! Both fields of the curve (the BN254 scalar field used for coordinates and
//! hashing, and the Grumpkin group order used for scalars) come from
//! `ark-bn254`. The wrappers pin the surface the curve and threshold layers
//! rely on: canonical limb and byte conversions, inversion that maps zero to
//! zero, and a serde encoding that refuses values at or above the modulus.

/// Defines a newtype over an arkworks prime field of 254 bits.
macro_rules! bn254_field {
    (
        $(#[$meta:meta])*
        $name:ident($inner:ty)
    ) => {
        $(#[$meta])*
        #[derive(
            Copy,
            Clone,
            Default,
            Eq,
            PartialEq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
            ::zeroize::Zeroize,
        )]
        #[serde(into = "[u8; 32]", try_from = "[u8; 32]")]
        pub struct $name(pub(crate) $inner);

        impl $name {
            /// Field modulus as little-endian limbs.
            pub const MODULUS: [u64; 4] = <$inner as ::ark_ff::PrimeField>::MODULUS.0;

            pub const ZERO: Self = Self(<$inner as ::ark_ff::AdditiveGroup>::ZERO);

            pub const ONE: Self = Self(<$inner as ::ark_ff::Field>::ONE);

            /// Create a field element from a small integer.
            #[inline]
            pub fn from_canonical_u64(val: u64) -> Self {
                Self(<$inner>::from(val))
            }

            /// Create a field element from little-endian limbs, reducing modulo p.
            ///
            /// Any 256-bit value is accepted.
            pub fn from_canonical_limbs(limbs: [u64; 4]) -> Self {
                let mut bytes = [0u8; 32];
                for (i, limb) in limbs.iter().enumerate() {
                    bytes[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_le_bytes());
                }
                Self(<$inner as ::ark_ff::PrimeField>::from_le_bytes_mod_order(&bytes))
            }

            /// Create a field element from little-endian limbs that must already be < p.
            #[inline]
            pub fn from_canonical_checked(limbs: [u64; 4]) -> Option<Self> {
                <$inner as ::ark_ff::PrimeField>::from_bigint(::ark_ff::BigInt::new(limbs)).map(Self)
            }

            /// Canonical little-endian limbs.
            #[inline]
            pub fn to_canonical_limbs(&self) -> [u64; 4] {
                ::ark_ff::PrimeField::into_bigint(self.0).0
            }

            /// Big-endian 32-byte encoding of the canonical value.
            pub fn to_be_bytes(&self) -> [u8; 32] {
                let canonical = self.to_canonical_limbs();
                let mut out = [0u8; 32];
                for (i, limb) in canonical.iter().rev().enumerate() {
                    out[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_be_bytes());
                }
                out
            }

            /// Decode a big-endian 32-byte value, reducing modulo p.
            pub fn from_be_bytes_mod_order(bytes: &[u8; 32]) -> Self {
                Self(<$inner as ::ark_ff::PrimeField>::from_be_bytes_mod_order(bytes))
            }

            /// Decode a big-endian 32-byte value, rejecting non-canonical encodings.
            pub fn from_be_bytes(bytes: &[u8; 32]) -> Option<Self> {
                let mut limbs = [0u64; 4];
                for (i, chunk) in bytes.chunks_exact(8).enumerate() {
                    let mut word = [0u8; 8];
                    word.copy_from_slice(chunk);
                    limbs[3 - i] = u64::from_be_bytes(word);
                }
                Self::from_canonical_checked(limbs)
            }

            /// Parse a hexadecimal string (optional `0x` prefix). Values >= p are rejected.
            pub fn from_hex(hex: &str) -> Option<Self> {
                let digits = hex.strip_prefix("0x").unwrap_or(hex);
                let value = ::num_bigint::BigUint::parse_bytes(digits.as_bytes(), 16)?;
                if value >= Self::order() {
                    return None;
                }
                Some(Self(<$inner as ::ark_ff::PrimeField>::from_le_bytes_mod_order(
                    &value.to_bytes_le(),
                )))
            }

            /// The field modulus as an arbitrary-precision integer.
            pub fn order() -> ::num_bigint::BigUint {
                let modulus = <$inner as ::ark_ff::PrimeField>::MODULUS;
                ::num_bigint::BigUint::from_bytes_le(&::ark_ff::BigInteger::to_bytes_le(&modulus))
            }

            #[inline]
            pub fn is_zero(&self) -> bool {
                *self == Self::ZERO
            }

            #[inline]
            pub fn square(&self) -> Self {
                Self(::ark_ff::Field::square(&self.0))
            }

            #[inline]
            pub fn double(&self) -> Self {
                Self(::ark_ff::AdditiveGroup::double(&self.0))
            }

            /// Multiplicative inverse. Zero maps to zero.
            pub fn inverse(&self) -> Self {
                self.try_inverse().unwrap_or(Self::ZERO)
            }

            /// Multiplicative inverse, `None` for zero.
            #[inline]
            pub fn try_inverse(&self) -> Option<Self> {
                ::ark_ff::Field::inverse(&self.0).map(Self)
            }

            /// Variable-time exponentiation by a little-endian limb exponent.
            pub fn pow_vartime(&self, exp: [u64; 4]) -> Self {
                Self(::ark_ff::Field::pow(&self.0, exp))
            }
        }

        impl ::core::ops::Add for $name {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl ::core::ops::AddAssign for $name {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl ::core::ops::Sub for $name {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl ::core::ops::SubAssign for $name {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl ::core::ops::Neg for $name {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl ::core::ops::Mul for $name {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self(self.0 * rhs.0)
            }
        }

        impl ::core::ops::MulAssign for $name {
            #[inline]
            fn mul_assign(&mut self, rhs: Self) {
                self.0 *= rhs.0;
            }
        }

        // Division by zero yields zero rather than panicking.
        #[allow(clippy::suspicious_arithmetic_impl)]
        impl ::core::ops::Div for $name {
            type Output = Self;

            #[inline]
            fn div(self, rhs: Self) -> Self {
                self * rhs.inverse()
            }
        }

        impl ::core::ops::DivAssign for $name {
            #[inline]
            fn div_assign(&mut self, rhs: Self) {
                *self = *self / rhs;
            }
        }

        impl ::core::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |acc, x| acc + x)
            }
        }

        impl<'a> ::core::iter::Sum<&'a $name> for $name {
            fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |acc, x| acc + *x)
            }
        }

        impl ::core::iter::Product for $name {
            fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ONE, |acc, x| acc * x)
            }
        }

        impl From<u64> for $name {
            fn from(val: u64) -> Self {
                Self::from_canonical_u64(val)
            }
        }

        impl From<$name> for [u8; 32] {
            fn from(value: $name) -> Self {
                value.to_be_bytes()
            }
        }

        impl TryFrom<[u8; 32]> for $name {
            type Error = &'static str;

            fn try_from(bytes: [u8; 32]) -> Result<Self, Self::Error> {
                Self::from_be_bytes(&bytes)
                    .ok_or(concat!("non-canonical ", stringify!($name), " encoding"))
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                let canonical = self.to_canonical_limbs();
                write!(
                    f,
                    "0x{:016x}{:016x}{:016x}{:016x}",
                    canonical[3], canonical[2], canonical[1], canonical[0]
                )
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        /// Reduces 512 uniform bits, so the bias is below 2^-250.
        impl ::rand::distr::Distribution<$name> for ::rand::distr::StandardUniform {
            fn sample<R: ::rand::Rng + ?Sized>(&self, rng: &mut R) -> $name {
                let mut wide = [0u8; 64];
                rng.fill_bytes(&mut wide);
                $name(<$inner as ::ark_ff::PrimeField>::from_le_bytes_mod_order(&wide))
            }
        }
    };
}

pub(crate) use bn254_field;
