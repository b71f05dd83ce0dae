use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kettle_state::{Sampler, SamplingStrategy, Statevector};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn create_random_state(num_qubits: usize, seed: u64) -> Statevector {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut amplitudes: Vec<Complex64> = (0..1usize << num_qubits)
        .map(|_| Complex64::new(rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5))
        .collect();

    let norm = amplitudes.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
    for amp in &mut amplitudes {
        *amp /= norm;
    }
    Statevector::from_amplitudes(amplitudes).unwrap()
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling_strategy");
    let shots = 10_000;

    for num_qubits in [5, 10, 15, 20] {
        let probabilities = create_random_state(num_qubits, 42).probabilities();
        group.throughput(Throughput::Elements(shots as u64));

        for (name, strategy) in [
            ("inverse_transform", SamplingStrategy::InverseTransform),
            ("alias", SamplingStrategy::Alias),
        ] {
            let sampler = Sampler::new().with_strategy(strategy).with_parallel(false);
            group.bench_with_input(
                BenchmarkId::new(name, format!("{}_qubits", num_qubits)),
                &probabilities,
                |b, probabilities| {
                    b.iter(|| sampler.sample(black_box(probabilities), shots, 7).unwrap())
                },
            );
        }
    }

    group.finish();
}

fn bench_shot_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("shot_scaling");
    let probabilities = create_random_state(12, 42).probabilities();

    for shots in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(shots as u64));

        for (name, parallel) in [("sequential", false), ("parallel", true)] {
            let sampler = Sampler::new().with_parallel(parallel);
            group.bench_with_input(BenchmarkId::new(name, shots), &shots, |b, &shots| {
                b.iter(|| sampler.sample(black_box(&probabilities), shots, 7).unwrap())
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_strategies, bench_shot_scaling);
criterion_main!(benches);
