use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rref_core::reduce::{OpSummary, Recorder};
use rref_core::{RationalMatrix, ReductionConfig};

fn bench_reduction(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let square = RationalMatrix::random(8, 8, &mut rng).unwrap();
    let augmented = RationalMatrix::random(8, 9, &mut rng).unwrap();

    c.bench_function("rref_8x8_max_magnitude", |b| {
        b.iter(|| {
            let mut m = square.clone();
            ReductionConfig::gauss_jordan().run(&mut m, OpSummary::default())
        })
    });

    c.bench_function("ref_8x8_max_magnitude", |b| {
        b.iter(|| {
            let mut m = square.clone();
            ReductionConfig::forward_only().run(&mut m, ())
        })
    });

    c.bench_function("rref_8x9_sweep_augmented", |b| {
        b.iter(|| {
            let mut m = augmented.clone();
            ReductionConfig::sweep(true).run(&mut m, ())
        })
    });

    c.bench_function("rref_8x8_recorded", |b| {
        b.iter(|| {
            let mut m = square.clone();
            let mut recorder = Recorder::new();
            ReductionConfig::gauss_jordan().run(&mut m, &mut recorder);
            recorder.steps.len()
        })
    });
}

criterion_group!(benches, bench_reduction);
criterion_main!(benches);
