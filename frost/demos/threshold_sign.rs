use curve::BaseField;
use frost::{
    CeremonyConfig, CeremonyStep, FrostSignature, KeyCeremony, KeyShare, NonceStore,
    PublicCommitments, SignerInput, hash_oracle, sign,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() {
    hash_oracle::init();
    let mut rng = StdRng::seed_from_u64(42);

    // 2-of-3 where signer 3 holds a first-derivative share.
    let config = CeremonyConfig::new(2, 3).with_ranks(vec![0, 0, 1]);
    let mut ceremony = KeyCeremony::new(&mut rng, config).expect("ceremony");
    let commitments_bytes = ceremony.commitments().to_bytes().expect("serialize commitments");

    let mut shares: Vec<KeyShare> = Vec::new();
    let result = loop {
        match ceremony.advance().expect("advance") {
            CeremonyStep::Share(share) => shares.push(share.clone()),
            CeremonyStep::Done(result) => break result,
        }
    };

    let commitments = PublicCommitments::from_bytes(&commitments_bytes).expect("deserialize commitments");
    assert!(shares.iter().all(|share| share.verify(&commitments)));

    let nullifier = BaseField::from(0x1234);
    let note_commitment = BaseField::from(0x5678);
    let message = hash_oracle::hash2(nullifier, note_commitment).expect("hash");

    let mut stores: Vec<NonceStore> = (0..2).map(|_| NonceStore::precompute(&mut rng, 4)).collect();
    let signers = vec![
        SignerInput::new(&shares[0], stores[0].consume_next().expect("nonce")),
        SignerInput::new(&shares[2], stores[1].consume_next().expect("nonce")),
    ];
    let pk = result.group_public_key();
    let sig = sign(message, signers, &pk, 2).expect("sign");

    let sig_bytes = bincode::serialize(&sig).expect("serialize sig");
    let sig2: FrostSignature = bincode::deserialize(&sig_bytes).expect("deserialize sig");
    assert_eq!(FrostSignature::from_bytes(&sig.to_bytes()).expect("decode"), sig2);

    let ok = sig2.verify(message, &pk).expect("verify");
    assert!(ok);
    println!("signature verified; {} nonces left for signer 1", stores[0].remaining());
}
