use curve::BaseField;
use frost::{CeremonyConfig, NoncePair, SignerInput, generate_key_package, hash_oracle, sign};
use rand::SeedableRng;
use rand::rngs::StdRng;
use witness::{NoteOpening, SpendWitness, WitnessConfig};

fn main() {
    hash_oracle::init();
    let mut rng = StdRng::seed_from_u64(42);
    let package = generate_key_package(&mut rng, &CeremonyConfig::new(2, 3)).expect("ceremony");
    let pk = package.group_public_key();

    let note = NoteOpening {
        amount: BaseField::from(250),
        blinding: BaseField::from(0xb11d),
        nullifier: BaseField::from(0x1234),
        commitment: BaseField::from(0x5678),
        leaf_index: 3,
        siblings: vec![BaseField::from(1), BaseField::from(2)],
    };
    let message = hash_oracle::hash2(note.nullifier, note.commitment).expect("hash");

    let signers = vec![
        SignerInput::new(package.share(2).expect("share"), NoncePair::random(&mut rng)),
        SignerInput::new(package.share(3).expect("share"), NoncePair::random(&mut rng)),
    ];
    let signature = sign(message, signers, &pk, 2).expect("sign");

    let witness =
        SpendWitness::new(&signature, &pk, &note, &WitnessConfig::default()).expect("witness");
    assert!(witness.verify_signature().expect("verify"));

    let bytes = witness.to_bytes().expect("serialize witness");
    let decoded = SpendWitness::from_bytes(&bytes).expect("deserialize witness");
    assert_eq!(decoded, witness);

    println!(
        "{} field elements, {} bytes, root {:?}",
        witness.field_elements().len(),
        bytes.len(),
        witness.merkle_root
    );
}
