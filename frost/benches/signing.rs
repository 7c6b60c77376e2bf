use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use curve::BaseField;
use frost::{
    BirkhoffParticipant, CeremonyConfig, NoncePair, SignerInput, birkhoff_coefficients,
    generate_key_package, hash_oracle, lagrange_coefficients, sign,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bench_sign(c: &mut Criterion) {
    hash_oracle::init();
    let mut rng = StdRng::seed_from_u64(42);
    let package = generate_key_package(&mut rng, &CeremonyConfig::new(2, 3)).expect("ceremony");
    let pk = package.group_public_key();
    let message = BaseField::from(3);

    c.bench_function("frost_sign_2_of_3", |bencher| {
        bencher.iter(|| {
            let signers = vec![
                SignerInput::new(package.share(1).expect("share"), NoncePair::random(&mut rng)),
                SignerInput::new(package.share(2).expect("share"), NoncePair::random(&mut rng)),
            ];
            let sig = sign(black_box(message), signers, &pk, 2).expect("sign");
            black_box(sig);
        })
    });

    let signers = vec![
        SignerInput::new(package.share(1).expect("share"), NoncePair::random(&mut rng)),
        SignerInput::new(package.share(3).expect("share"), NoncePair::random(&mut rng)),
    ];
    let sig = sign(message, signers, &pk, 2).expect("sign");
    c.bench_function("frost_verify", |bencher| {
        bencher.iter(|| {
            let ok = sig.verify(black_box(message), black_box(&pk)).expect("verify");
            black_box(ok);
        })
    });
}

fn bench_interpolation(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolation");
    for size in [3u16, 8, 16] {
        let indices: Vec<u16> = (1..=size).collect();
        let participants: Vec<_> = indices
            .iter()
            .map(|&i| BirkhoffParticipant::new(i, u16::from(i == size)))
            .collect();

        group.bench_with_input(BenchmarkId::new("lagrange", size), &indices, |b, indices| {
            b.iter(|| black_box(lagrange_coefficients(black_box(indices)).expect("lagrange")))
        });
        group.bench_with_input(
            BenchmarkId::new("birkhoff", size),
            &participants,
            |b, participants| {
                b.iter(|| {
                    black_box(birkhoff_coefficients(black_box(participants)).expect("birkhoff"))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_sign, bench_interpolation);
criterion_main!(benches);
