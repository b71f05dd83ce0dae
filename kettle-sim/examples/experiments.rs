//! Measurement, entanglement and interference experiments
//!
//! Builds small circuits, runs them on the statevector simulator and prints
//! counts and amplitudes as text.
//!
//! Run with: cargo run --example experiments
//! Set `RUST_LOG=kettle_sim=debug` to see the simulator's own logging.

use kettle_sim::{factories, BellState, Circuit, CircuitBuilder, Counts, Simulator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SEED: u64 = 42;

fn print_counts(counts: &Counts) {
    let rendered: Vec<String> = counts
        .sorted()
        .into_iter()
        .map(|(bitstring, count)| format!("'{}': {}", bitstring, count))
        .collect();
    println!("Counts: {{{}}}", rendered.join(", "));
}

fn run_and_print(
    simulator: &Simulator,
    circuit: &Circuit,
    shots: usize,
    show_statevector: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = if shots > 0 {
        simulator.execute(circuit, shots, SEED)?
    } else {
        simulator.run(circuit)?
    };

    if let Some(counts) = &result.measurements {
        print_counts(counts);
    }

    if show_statevector {
        println!("Statevector amplitudes (bitstring -> amplitude):");
        for entry in simulator.amplitudes(&result.state, 1e-10) {
            let amp = result.state.amplitudes()[entry.index];
            println!("  {} -> {:+.4}{:+.4}i", entry.bitstring, amp.re, amp.im);
        }
    }
    Ok(())
}

fn basic_hadamard_measurement(simulator: &Simulator) -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Basic Hadamard Measurement ---");
    let mut builder = CircuitBuilder::new(1, 1)?;
    builder.h(0)?.add_measurement(&[(0, 0)])?;
    run_and_print(simulator, &builder.build(), 1000, false)
}

fn two_qubit_measurement(simulator: &Simulator) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n--- Two-qubit Hadamard Measurement ---");
    let mut builder = CircuitBuilder::new(2, 2)?;
    builder.h(0)?.h(1)?.add_measurement(&[(0, 0), (1, 1)])?;
    run_and_print(simulator, &builder.build(), 1000, false)
}

fn hadamard_twice(simulator: &Simulator) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n--- Single qubit H H measurement (Identity) ---");
    println!("Expected: |0> with 100% probability");
    let mut builder = CircuitBuilder::new(1, 1)?;
    builder.h(0)?.h(0)?.add_measurement(&[(0, 0)])?;
    run_and_print(simulator, &builder.build(), 1000, true)
}

fn bell_circuit(simulator: &Simulator) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n--- Bell State Circuit ---");
    let mut builder = CircuitBuilder::from_circuit(factories::bell_state(BellState::PhiPlus)?);
    builder.measure_all()?;
    let circuit = builder.build();
    print!("{}", circuit);
    println!("Expected: equal counts for |00> and |11>");
    run_and_print(simulator, &circuit, 1000, false)
}

fn ghz_experiments(simulator: &Simulator) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n--- GHZ experiments ---");

    println!("=== GHZ measured in computational (Z) basis ===");
    let mut z_basis = CircuitBuilder::from_circuit(factories::ghz_state(3)?);
    z_basis.measure_all()?;
    run_and_print(simulator, &z_basis.build(), 2048, false)?;

    println!("\n=== GHZ statevector ===");
    run_and_print(simulator, &factories::ghz_state(3)?, 0, true)?;

    println!("\n=== GHZ measured in X basis ===");
    let mut x_basis = CircuitBuilder::from_circuit(factories::ghz_state(3)?);
    x_basis.h_all()?.measure_all()?;
    run_and_print(simulator, &x_basis.build(), 2048, false)?;

    println!("\n=== GHZ with Z on qubit 0, measured in X basis (reveals phase) ===");
    let mut phase = CircuitBuilder::from_circuit(factories::ghz_state(3)?);
    phase.z(0)?.h_all()?.measure_all()?;
    run_and_print(simulator, &phase.build(), 2048, false)
}

fn interference_experiments(simulator: &Simulator) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n--- Interference experiments ---");

    println!("\nBaseline H H on both qubits (expected: '00')");
    let mut base = CircuitBuilder::new(2, 2)?;
    base.h_all()?.h_all()?.measure_all()?;
    run_and_print(simulator, &base.build(), 2048, true)?;

    println!("\nWith per-qubit Z phase (expected: '11')");
    let mut z_phase = CircuitBuilder::new(2, 2)?;
    z_phase.h_all()?.z(0)?.z(1)?.h_all()?.measure_all()?;
    run_and_print(simulator, &z_phase.build(), 2048, true)?;

    println!("\nWith CZ phase flip on |11> (expected: all four outcomes)");
    let mut cz = CircuitBuilder::new(2, 2)?;
    cz.h_all()?.cz(0, 1)?.h_all()?.measure_all()?;
    run_and_print(simulator, &cz.build(), 2048, true)
}

fn cnot_demonstration(simulator: &Simulator) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n--- CNOT gate demonstration ---");
    println!("Circuit: CNOT(0,1), X(0), CNOT(0,1); expected: '11'");
    let mut builder = CircuitBuilder::new(2, 2)?;
    builder.cx(0, 1)?.x(0)?.cx(0, 1)?.measure_all()?;
    run_and_print(simulator, &builder.build(), 1024, false)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("{}", "=".repeat(60));
    println!("   QUANTUM CIRCUIT EXPERIMENTS");
    println!("{}", "=".repeat(60));

    let simulator = Simulator::default();

    basic_hadamard_measurement(&simulator)?;
    two_qubit_measurement(&simulator)?;
    hadamard_twice(&simulator)?;
    bell_circuit(&simulator)?;
    ghz_experiments(&simulator)?;
    interference_experiments(&simulator)?;
    cnot_demonstration(&simulator)?;

    println!("\n{}", "=".repeat(60));
    println!("   ALL EXPERIMENTS COMPLETED");
    println!("{}", "=".repeat(60));
    Ok(())
}
