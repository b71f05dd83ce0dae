use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kettle_sim::{factories, Circuit, CircuitBuilder, NormalizationCheck, Simulator, SimulatorConfig};

fn create_layered_circuit(num_qubits: usize, depth: usize) -> Circuit {
    let mut builder =
        CircuitBuilder::with_capacity(num_qubits, 0, num_qubits * depth * 2).unwrap();

    for d in 0..depth {
        // Single qubit gates layer
        for i in 0..num_qubits {
            if (i + d) % 2 == 0 {
                builder.h(i).unwrap();
            } else {
                builder.ry(0.5, i).unwrap();
            }
        }

        // Entangling layer
        for i in 0..(num_qubits - 1) {
            if (i + d) % 2 == 0 {
                builder.cx(i, i + 1).unwrap();
            } else {
                builder.cz(i, i + 1).unwrap();
            }
        }
    }

    builder.build()
}

fn bench_full_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_simulation");
    group.sample_size(20);

    let simulator = Simulator::default();

    for num_qubits in [10, 15, 20] {
        let depth = 20;
        let circuit = create_layered_circuit(num_qubits, depth);

        group.bench_with_input(
            BenchmarkId::new("layered_circuit", format!("{}q_d{}", num_qubits, depth)),
            &circuit,
            |b, circuit| b.iter(|| simulator.run(black_box(circuit)).unwrap()),
        );
    }

    for num_qubits in [10, 15, 20, 22] {
        let circuit = factories::ghz_state(num_qubits).unwrap();

        group.bench_with_input(
            BenchmarkId::new("ghz_prep", format!("{}q", num_qubits)),
            &circuit,
            |b, circuit| b.iter(|| simulator.run(black_box(circuit)).unwrap()),
        );
    }

    group.finish();
}

fn bench_normalization_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalization_policy");
    group.sample_size(20);

    let circuit = create_layered_circuit(18, 10);
    for (name, check) in [
        ("every_gate", NormalizationCheck::EveryGate),
        ("batched_16", NormalizationCheck::Batched(16)),
        ("final", NormalizationCheck::Final),
    ] {
        let config = SimulatorConfig::default().with_normalization_check(check);
        let simulator = Simulator::new(config).unwrap();
        group.bench_function(name, |b| b.iter(|| simulator.run(black_box(&circuit)).unwrap()));
    }

    group.finish();
}

fn bench_parallel_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_threshold");
    group.sample_size(20);

    let circuit = create_layered_circuit(20, 5);
    for (name, threshold) in [("sequential", usize::MAX), ("parallel", 0)] {
        let config = SimulatorConfig::default()
            .with_parallel_threshold(threshold)
            .with_normalization_check(NormalizationCheck::Final);
        let simulator = Simulator::new(config).unwrap();
        group.bench_function(name, |b| b.iter(|| simulator.run(black_box(&circuit)).unwrap()));
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_full_simulation,
    bench_normalization_policy,
    bench_parallel_threshold
);
criterion_main!(benches);
