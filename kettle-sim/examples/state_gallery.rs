//! Gallery of prepared states
//!
//! Prints the amplitudes of the four Bell states, equal superpositions and
//! W states, plus a few Pauli expectation values.
//!
//! Run with: cargo run --example state_gallery

use kettle_sim::{factories, BellState, Circuit, PauliString, Simulator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn show(simulator: &Simulator, title: &str, circuit: &Circuit) -> Result<(), Box<dyn std::error::Error>> {
    let result = simulator.run(circuit)?;
    println!("\n{}", title);
    for entry in simulator.significant_amplitudes(&result.state) {
        println!(
            "  |{}>  magnitude {:.4}  phase {:+.4}",
            entry.bitstring, entry.magnitude, entry.phase
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let simulator = Simulator::default();

    println!("Bell states");
    println!("===========");
    for variant in BellState::ALL {
        show(&simulator, variant.name(), &factories::bell_state(variant)?)?;
    }

    println!("\nEqual superpositions");
    println!("====================");
    for n in 1..=3 {
        show(
            &simulator,
            &format!("{} qubit(s)", n),
            &factories::superposition_state(n)?,
        )?;
    }

    println!("\nW states");
    println!("========");
    for n in 2..=4 {
        show(&simulator, &format!("W({})", n), &factories::w_state(n)?)?;
    }

    println!("\nGHZ(3) correlations");
    println!("===================");
    let ghz = simulator.run(&factories::ghz_state(3)?)?.state;
    for label in ["ZZI", "IZZ", "XXX", "ZII"] {
        let pauli: PauliString = label.parse()?;
        println!("  <{}> = {:+.4}", pauli, pauli.expectation_value(&ghz)?);
    }

    Ok(())
}
