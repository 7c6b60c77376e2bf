//! Signature types, challenge hashing, aggregation and verification.

use curve::{Affine, BaseField, ScalarField};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::SignerIndex;
use crate::constants::{FIELD_SIZE, SCALAR_SIZE, SIG_SIZE};
use crate::errors::{FrostError, Result};
use crate::hash_oracle;

/// One signer's contribution `z_i` together with the group commitment `R`
/// it was computed against.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialSignature {
    pub signer_index: SignerIndex,
    pub z: ScalarField,
    pub r: Affine,
}

/// A Schnorr signature `(R, z)` under the group public key.
///
/// The signature satisfies `[z]G == R + [c]PK` where
/// `c = H2(H4(R.x, R.y, PK.x, PK.y), message)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrostSignature {
    /// The group commitment `R = Σ (D_j + [ρ_j]E_j)`
    pub r: Affine,
    /// The response `z = Σ z_i`
    pub z: ScalarField,
}

/// Computes the Schnorr challenge `c = H2(H4(R.x, R.y, PK.x, PK.y), message)`.
///
/// The identity point is hashed as `(0, 0)`. The hash output lies in the
/// base field, which is smaller than the group order, so it embeds into the
/// scalar field unchanged.
pub fn compute_challenge(r: &Affine, group_public_key: &Affine, message: BaseField) -> Result<ScalarField> {
    let (rx, ry) = r.coordinates();
    let (px, py) = group_public_key.coordinates();
    let inner = hash_oracle::hash4(rx, ry, px, py)?;
    Ok(hash_oracle::hash2(inner, message)?.to_scalar_field())
}

/// Rejects the identity and points off the curve.
pub(crate) fn ensure_valid_point(point: &Affine, name: &'static str) -> Result<()> {
    if point.is_infinity() || !point.is_on_curve() {
        return Err(FrostError::InvalidPoint { point: name });
    }
    Ok(())
}

impl FrostSignature {
    /// Verify against a message and group public key.
    ///
    /// Returns `Ok(false)` for a well-formed but invalid signature.
    /// `Err(FrostError::InvalidPoint)` if `R` or the public key is the identity
    /// or off the curve; `Err` also when the hash oracle is unavailable.
    pub fn verify(&self, message: BaseField, group_public_key: &Affine) -> Result<bool> {
        ensure_valid_point(group_public_key, "group public key")?;
        ensure_valid_point(&self.r, "signature commitment R")?;
        let c = compute_challenge(&self.r, group_public_key, message)?;
        // [z]G - [c]PK == R
        let lhs = Affine::double_scalar_mul_basepoint(&self.z, &-c, group_public_key);
        let valid = lhs == self.r;
        debug!(valid, "verified frost signature");
        Ok(valid)
    }

    /// Fixed-size encoding `R.x || R.y || z`, each 32 bytes big-endian.
    pub fn to_bytes(&self) -> [u8; SIG_SIZE] {
        let (x, y) = self.r.coordinates();
        let mut out = [0u8; SIG_SIZE];
        out[..FIELD_SIZE].copy_from_slice(&x.to_be_bytes());
        out[FIELD_SIZE..2 * FIELD_SIZE].copy_from_slice(&y.to_be_bytes());
        out[2 * FIELD_SIZE..].copy_from_slice(&self.z.to_be_bytes());
        out
    }

    /// Decode [`FrostSignature::to_bytes`], rejecting non-canonical field
    /// elements and points off the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; SIG_SIZE] = bytes.try_into().map_err(|_| {
            FrostError::serialization(format!(
                "signature must be {SIG_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;

        let field = |offset: usize| -> Result<BaseField> {
            let mut chunk = [0u8; FIELD_SIZE];
            chunk.copy_from_slice(&bytes[offset..offset + FIELD_SIZE]);
            BaseField::from_be_bytes(&chunk)
                .ok_or_else(|| FrostError::serialization("coordinate is not canonical"))
        };
        let x = field(0)?;
        let y = field(FIELD_SIZE)?;

        let r = if x.is_zero() && y.is_zero() {
            Affine::INFINITY
        } else {
            Affine::new_checked(x, y)
                .ok_or_else(|| FrostError::serialization("R is not on the curve"))?
        };

        let mut chunk = [0u8; SCALAR_SIZE];
        chunk.copy_from_slice(&bytes[2 * FIELD_SIZE..]);
        let z = ScalarField::from_be_bytes(&chunk)
            .ok_or_else(|| FrostError::serialization("z is not canonical"))?;

        Ok(FrostSignature { r, z })
    }
}

/// Combine at least `threshold` partial signatures into a [`FrostSignature`].
///
/// Every partial must carry the same `R`; partials from a signer that
/// registered late, or from a different session, fail with
/// [`FrostError::InconsistentAggregation`].
#[instrument(skip(partials), fields(count = partials.len()), err(Debug))]
pub fn aggregate(partials: &[PartialSignature], threshold: u16) -> Result<FrostSignature> {
    if partials.len() < usize::from(threshold) {
        return Err(FrostError::InsufficientSigners {
            required: usize::from(threshold),
            provided: partials.len(),
        });
    }
    let Some(first) = partials.first() else {
        return Err(FrostError::InsufficientSigners {
            required: 1,
            provided: 0,
        });
    };

    if partials.iter().any(|p| p.r != first.r) {
        warn!("partial signatures carry different group commitments");
        return Err(FrostError::InconsistentAggregation);
    }

    let mut signers: Vec<SignerIndex> = partials.iter().map(|p| p.signer_index).collect();
    signers.sort_unstable();
    if let Some(pair) = signers.windows(2).find(|w| w[0] == w[1]) {
        return Err(FrostError::invalid_configuration(format!(
            "signer {} contributed more than one partial signature",
            pair[0]
        )));
    }

    let z = partials.iter().map(|p| p.z).sum();
    debug!(?signers, "aggregated partial signatures");
    Ok(FrostSignature { r: first.r, z })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: u64) -> ScalarField {
        ScalarField::from_canonical_u64(v)
    }

    /// Single-party Schnorr signature built directly from the equations.
    fn single_signer(sk: ScalarField, k: ScalarField, message: BaseField) -> (FrostSignature, Affine) {
        hash_oracle::init();
        let pk = Affine::mul_generator(&sk);
        let r = Affine::mul_generator(&k);
        let c = compute_challenge(&r, &pk, message).unwrap();
        (FrostSignature { r, z: k + c * sk }, pk)
    }

    #[test]
    fn test_verify_equation() {
        let message = BaseField::from_canonical_u64(1234);
        let (sig, pk) = single_signer(s(77), s(88), message);
        assert!(sig.verify(message, &pk).unwrap());
        assert!(!sig.verify(message + BaseField::ONE, &pk).unwrap());
        assert!(!sig.verify(message, &Affine::mul_generator(&s(78))).unwrap());
    }

    #[test]
    fn test_verify_rejects_identity_and_off_curve_points() {
        hash_oracle::init();
        let message = BaseField::from_canonical_u64(9);
        let forged = FrostSignature {
            r: Affine::mul_generator(&s(42)),
            z: s(42),
        };
        assert_eq!(
            forged.verify(message, &Affine::INFINITY),
            Err(FrostError::InvalidPoint { point: "group public key" })
        );

        let (sig, pk) = single_signer(s(5), s(6), message);
        let identity_r = FrostSignature { r: Affine::INFINITY, ..sig };
        assert!(matches!(
            identity_r.verify(message, &pk),
            Err(FrostError::InvalidPoint { .. })
        ));

        let off_curve_pk = Affine::new(pk.x, pk.y + BaseField::ONE);
        assert!(matches!(
            sig.verify(message, &off_curve_pk),
            Err(FrostError::InvalidPoint { .. })
        ));
        let off_curve_r = FrostSignature { r: Affine::new(sig.r.x + BaseField::ONE, sig.r.y), ..sig };
        assert!(matches!(
            off_curve_r.verify(message, &pk),
            Err(FrostError::InvalidPoint { .. })
        ));
    }

    #[test]
    fn test_partial_signature_rejects_non_canonical_z() {
        let partial = PartialSignature {
            signer_index: 3,
            z: s(7),
            r: Affine::generator(),
        };
        let encoded = bincode::serialize(&partial).unwrap();
        let decoded: PartialSignature = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded, partial);

        // z follows the two-byte index; overwrite it with the group order.
        let mut tampered = encoded.clone();
        let mut order = [0u8; SCALAR_SIZE];
        for (i, limb) in ScalarField::MODULUS.iter().rev().enumerate() {
            order[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_be_bytes());
        }
        tampered[2..2 + SCALAR_SIZE].copy_from_slice(&order);
        assert!(bincode::deserialize::<PartialSignature>(&tampered).is_err());
    }

    #[test]
    fn test_bytes_roundtrip_and_rejections() {
        let message = BaseField::from_canonical_u64(5);
        let (sig, _) = single_signer(s(3), s(4), message);
        let bytes = sig.to_bytes();
        assert_eq!(FrostSignature::from_bytes(&bytes).unwrap(), sig);

        assert!(FrostSignature::from_bytes(&bytes[1..]).is_err());

        let mut off_curve = bytes;
        off_curve[FIELD_SIZE - 1] ^= 1;
        assert!(matches!(
            FrostSignature::from_bytes(&off_curve),
            Err(FrostError::Serialization { .. })
        ));

        let mut overflow = bytes;
        overflow[2 * FIELD_SIZE..].fill(0xff);
        assert!(FrostSignature::from_bytes(&overflow).is_err());
    }

    #[test]
    fn test_identity_r_encodes_as_zero() {
        let sig = FrostSignature {
            r: Affine::INFINITY,
            z: s(1),
        };
        let bytes = sig.to_bytes();
        assert!(bytes[..2 * FIELD_SIZE].iter().all(|&b| b == 0));
        assert_eq!(FrostSignature::from_bytes(&bytes).unwrap(), sig);
    }

    #[test]
    fn test_aggregate_sums_and_checks() {
        let r = Affine::generator();
        let partials = [
            PartialSignature { signer_index: 1, z: s(10), r },
            PartialSignature { signer_index: 2, z: s(32), r },
        ];
        assert_eq!(aggregate(&partials, 2).unwrap(), FrostSignature { r, z: s(42) });

        assert_eq!(
            aggregate(&partials[..1], 2),
            Err(FrostError::InsufficientSigners { required: 2, provided: 1 })
        );

        let mismatched = [partials[0], PartialSignature { r: r.double(), ..partials[1] }];
        assert_eq!(aggregate(&mismatched, 2), Err(FrostError::InconsistentAggregation));

        let duplicated = [partials[0], partials[0]];
        assert!(matches!(
            aggregate(&duplicated, 2),
            Err(FrostError::InvalidConfiguration { .. })
        ));
    }
}
