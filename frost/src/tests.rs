use super::*;
use curve::{Affine, BaseField, RandomField, ScalarField};
use rand::SeedableRng;
use rand::rngs::StdRng;
use test_case::test_case;

fn dealer(seed: u64, config: &CeremonyConfig) -> (StdRng, MasterKeyPackage) {
    hash_oracle::init();
    let mut rng = StdRng::seed_from_u64(seed);
    let package = generate_key_package(&mut rng, config).expect("ceremony");
    (rng, package)
}

fn sign_with(
    rng: &mut StdRng,
    package: &MasterKeyPackage,
    indices: &[SignerIndex],
    message: BaseField,
) -> Result<FrostSignature> {
    let signers = indices
        .iter()
        .map(|&i| Ok(SignerInput::new(package.share(i)?, NoncePair::random(rng))))
        .collect::<Result<Vec<_>>>()?;
    sign(message, signers, &package.group_public_key(), package.threshold())
}

fn flip_base(value: BaseField, bit: usize) -> BaseField {
    let mut limbs = value.to_canonical_limbs();
    limbs[bit / 64] ^= 1 << (bit % 64);
    BaseField::from_canonical_limbs(limbs)
}

fn flip_scalar(value: ScalarField, bit: usize) -> ScalarField {
    let mut limbs = value.to_canonical_limbs();
    limbs[bit / 64] ^= 1 << (bit % 64);
    ScalarField::from_canonical_limbs(limbs)
}

#[test_case(2, 3, &[1, 2] ; "2 of 3 signers 1 2")]
#[test_case(2, 3, &[1, 3] ; "2 of 3 signers 1 3")]
#[test_case(2, 3, &[2, 3] ; "2 of 3 signers 2 3")]
#[test_case(2, 3, &[1, 2, 3] ; "2 of 3 all signers")]
#[test_case(3, 5, &[2, 4, 5] ; "3 of 5")]
#[test_case(1, 1, &[1] ; "1 of 1")]
#[test_case(4, 4, &[4, 3, 2, 1] ; "4 of 4 unordered")]
fn test_threshold_subsets_verify(t: u16, n: u16, subset: &[SignerIndex]) {
    let (mut rng, package) = dealer(u64::from(t) << 8 | u64::from(n), &CeremonyConfig::new(t, n));
    let message = BaseField::random(&mut rng);
    let signature = sign_with(&mut rng, &package, subset, message).expect("sign");
    assert!(signature.verify(message, &package.group_public_key()).unwrap());
}

#[test]
fn test_every_pair_recovers_group_secret() {
    let (_, package) = dealer(12, &CeremonyConfig::new(2, 3));
    let secrets: Vec<ScalarField> = [[1, 2], [1, 3], [2, 3]]
        .iter()
        .map(|pair| {
            let shares: Vec<Share> = pair
                .iter()
                .map(|&i| {
                    let share = package.share(i).unwrap();
                    Share {
                        index: share.index(),
                        value: *share.secret_share(),
                    }
                })
                .collect();
            shamir_reconstruct(&shares).unwrap()
        })
        .collect();

    assert!(secrets.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(Affine::mul_generator(&secrets[0]), package.group_public_key());
}

#[test]
fn test_too_few_signers() {
    let (mut rng, package) = dealer(1, &CeremonyConfig::new(3, 5));
    let message = BaseField::from(9);
    assert_eq!(
        sign_with(&mut rng, &package, &[1, 2], message).unwrap_err(),
        FrostError::InsufficientSigners {
            required: 3,
            provided: 2
        }
    );
}

#[test]
fn test_single_bit_flips_break_verification() {
    let (mut rng, package) = dealer(2, &CeremonyConfig::new(2, 3));
    let pk = package.group_public_key();
    let message = BaseField::random(&mut rng);
    let signature = sign_with(&mut rng, &package, &[1, 3], message).unwrap();
    assert!(signature.verify(message, &pk).unwrap());

    for bit in [0, 1, 7, 63, 64, 128, 200, 253] {
        let z = FrostSignature {
            z: flip_scalar(signature.z, bit),
            ..signature
        };
        assert!(!z.verify(message, &pk).unwrap(), "z bit {bit}");

        let rx = FrostSignature {
            r: Affine::new(flip_base(signature.r.x, bit), signature.r.y),
            ..signature
        };
        assert_eq!(
            rx.verify(message, &pk),
            Err(FrostError::InvalidPoint { point: "signature commitment R" }),
            "R.x bit {bit}"
        );

        let ry = FrostSignature {
            r: Affine::new(signature.r.x, flip_base(signature.r.y, bit)),
            ..signature
        };
        assert_eq!(
            ry.verify(message, &pk),
            Err(FrostError::InvalidPoint { point: "signature commitment R" }),
            "R.y bit {bit}"
        );

        assert!(
            !signature.verify(flip_base(message, bit), &pk).unwrap(),
            "message bit {bit}"
        );

        let bad_pk = Affine::new(flip_base(pk.x, bit), pk.y);
        assert_eq!(
            signature.verify(message, &bad_pk),
            Err(FrostError::InvalidPoint { point: "group public key" }),
            "PK bit {bit}"
        );
    }
}

#[test]
fn test_nullifier_commitment_scenario() {
    let (mut rng, package) = dealer(3, &CeremonyConfig::new(2, 3));
    let nullifier =
        BaseField::from_hex("0x1b2c3d4e5f60718293a4b5c6d7e8f90112233445566778899aabbccddeeff001")
            .unwrap();
    let commitment =
        BaseField::from_hex("0x0a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20212223242526272829")
            .unwrap();
    let message = hash_oracle::hash2(nullifier, commitment).unwrap();

    let mut store_1 = NonceStore::precompute(&mut rng, 2);
    let mut store_2 = NonceStore::precompute(&mut rng, 2);
    let signers = vec![
        SignerInput::new(package.share(1).unwrap(), store_1.consume_next().unwrap()),
        SignerInput::new(package.share(2).unwrap(), store_2.consume_next().unwrap()),
    ];
    let signature = sign(message, signers, &package.group_public_key(), 2).unwrap();
    assert!(signature.verify(message, &package.group_public_key()).unwrap());
    assert_eq!(store_1.remaining(), 1);

    let unrelated = Affine::mul_generator(&ScalarField::random_nonzero(&mut rng));
    assert!(!signature.verify(message, &unrelated).unwrap());

    let decoded = FrostSignature::from_bytes(&signature.to_bytes()).unwrap();
    assert!(decoded.verify(message, &package.group_public_key()).unwrap());
}

#[test]
fn test_ranked_ceremony_signs() {
    let config = CeremonyConfig::new(3, 3).with_ranks(vec![0, 0, 1]);
    let (mut rng, package) = dealer(4, &config);
    assert_eq!(package.share(3).unwrap().rank(), 1);
    let message = BaseField::random(&mut rng);
    let signature = sign_with(&mut rng, &package, &[1, 2, 3], message).unwrap();
    assert!(signature.verify(message, &package.group_public_key()).unwrap());
}

#[test_case(&[1, 2, 3] ; "two value shares and one derivative")]
#[test_case(&[1, 2, 4] ; "other derivative holder")]
#[test_case(&[1, 3, 4] ; "one value share")]
#[test_case(&[2, 3, 4] ; "other value share")]
fn test_ranked_poised_subsets(subset: &[SignerIndex]) {
    let config = CeremonyConfig::new(3, 4).with_ranks(vec![0, 0, 1, 1]);
    let (mut rng, package) = dealer(5, &config);
    let message = BaseField::random(&mut rng);
    let signature = sign_with(&mut rng, &package, subset, message).unwrap();
    assert!(signature.verify(message, &package.group_public_key()).unwrap());
}

#[test]
fn test_ranked_derivative_only_subset_rejected() {
    let config = CeremonyConfig::new(3, 5).with_ranks(vec![0, 0, 1, 1, 1]);
    let (mut rng, package) = dealer(6, &config);
    let message = BaseField::from(1);
    assert_eq!(
        sign_with(&mut rng, &package, &[3, 4, 5], message).unwrap_err(),
        FrostError::SingularInterpolation {
            participants: vec![(3, 1), (4, 1), (5, 1)]
        }
    );
    // The same key still signs with a poised set.
    let signature = sign_with(&mut rng, &package, &[1, 4, 5], message).unwrap();
    assert!(signature.verify(message, &package.group_public_key()).unwrap());
}

#[test]
fn test_birkhoff_rank_zero_equals_shamir() {
    let mut rng = StdRng::seed_from_u64(7);
    let secret = ScalarField::random(&mut rng);
    let shares = shamir_split(&mut rng, &secret, 3, 5).unwrap();
    let subset = [&shares[0], &shares[2], &shares[4]];

    let flat: Vec<Share> = subset.iter().map(|s| (*s).clone()).collect();
    let ranked: Vec<RankedShare> = subset
        .iter()
        .map(|s| RankedShare {
            index: s.index,
            rank: 0,
            value: s.value,
        })
        .collect();

    assert_eq!(shamir_reconstruct(&flat).unwrap(), secret);
    assert_eq!(birkhoff_reconstruct(&ranked).unwrap(), secret);

    let indices = [1, 3, 5];
    let participants: Vec<_> = indices.iter().map(|&i| BirkhoffParticipant::new(i, 0)).collect();
    for &index in &indices {
        assert_eq!(
            birkhoff_coefficient(index, 0, &participants).unwrap(),
            lagrange_coefficient(index, &indices).unwrap()
        );
    }
}

#[test]
fn test_staged_ceremony_feldman_tamper() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut ceremony = KeyCeremony::new(&mut rng, CeremonyConfig::new(2, 3)).unwrap();
    let commitments = ceremony.commitments().clone();

    let CeremonyStep::Share(share) = ceremony.advance().unwrap() else {
        panic!("expected a share");
    };
    let honest = share.clone();
    let tampered = KeyShare::new(honest.index(), honest.rank(), *honest.secret_share() + ScalarField::ONE);

    assert!(verify_share_against_commitments(&honest, &commitments));
    assert!(!verify_share_against_commitments(&tampered, &commitments));

    // Published commitments survive a broadcast encoding.
    let broadcast = PublicCommitments::from_bytes(&commitments.to_bytes().unwrap()).unwrap();
    assert!(honest.verify(&broadcast));
}

#[test]
fn test_staged_ceremony_shares_sign() {
    hash_oracle::init();
    let mut rng = StdRng::seed_from_u64(9);
    let mut ceremony = KeyCeremony::new(&mut rng, CeremonyConfig::new(2, 3)).unwrap();
    let mut shares = Vec::new();
    let result = loop {
        match ceremony.advance().unwrap() {
            CeremonyStep::Share(share) => shares.push(share.clone()),
            CeremonyStep::Done(result) => break result,
        }
    };

    let message = BaseField::from(77);
    let signers = vec![
        SignerInput::new(&shares[0], NoncePair::random(&mut rng)),
        SignerInput::new(&shares[2], NoncePair::random(&mut rng)),
    ];
    let signature = sign(message, signers, &result.group_public_key(), 2).unwrap();
    assert!(signature.verify(message, &result.group_public_key()).unwrap());
}

#[test_case(&[] ; "flat")]
#[test_case(&[0, 0, 1] ; "ranked")]
fn test_shift_moves_signing_key(ranks: &[Rank]) {
    let config = CeremonyConfig::new(3, 3).with_ranks(ranks.to_vec());
    let (mut rng, package) = dealer(10, &config);
    let delta = ScalarField::random(&mut rng);
    let shifted = package.shifted(&delta);

    assert_eq!(
        shifted.group_public_key(),
        package.group_public_key() + Affine::mul_generator(&delta)
    );

    let message = BaseField::random(&mut rng);
    let signature = sign_with(&mut rng, &shifted, &[1, 2, 3], message).unwrap();
    assert!(signature.verify(message, &shifted.group_public_key()).unwrap());
    assert!(!signature.verify(message, &package.group_public_key()).unwrap());
}

#[test]
fn test_distributed_round_with_late_signer_fails_aggregation() {
    let (mut rng, package) = dealer(11, &CeremonyConfig::new(2, 3));
    let pk = package.group_public_key();
    let message = BaseField::from(5);
    let nonces: Vec<NoncePair> = (0..3).map(|_| NoncePair::random(&mut rng)).collect();

    // Signers 1 and 2 agree on a session; signer 3 saw a different one.
    let mut session = SigningSession::new(message, &[1, 2, 3], pk, 2).unwrap();
    for (index, nonce) in [1, 2, 3].into_iter().zip(&nonces) {
        session.register_nonce_commitment(index, nonce.commitment()).unwrap();
    }
    let mut stale = session.clone();
    stale
        .register_nonce_commitment(1, NoncePair::random(&mut rng).commitment())
        .unwrap();

    let partials = vec![
        session.partial_sign(package.share(1).unwrap(), &nonces[0]).unwrap(),
        session.partial_sign(package.share(2).unwrap(), &nonces[1]).unwrap(),
        stale.partial_sign(package.share(3).unwrap(), &nonces[2]).unwrap(),
    ];
    assert_eq!(aggregate(&partials, 2), Err(FrostError::InconsistentAggregation));

    // The consistent partials still aggregate and verify: all three were
    // weighted over the same three-signer set.
    let good = [
        partials[0],
        partials[1],
        session.partial_sign(package.share(3).unwrap(), &nonces[2]).unwrap(),
    ];
    let signature = aggregate(&good, 2).unwrap();
    assert!(signature.verify(message, &pk).unwrap());
}
