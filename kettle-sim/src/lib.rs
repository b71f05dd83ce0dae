//! Statevector quantum circuit simulator
//!
//! This crate ties the Kettle pieces together: circuits from `kettle-core`,
//! gate rules from `kettle-gates` and the state vector, kernels and sampler
//! from `kettle-state`.
//!
//! # Features
//!
//! - **In-place gate kernels**: no 2ⁿ×2ⁿ matrices, rayon above a size threshold
//! - **Normalization policy**: checked per gate, per batch or once at the end
//! - **Reproducible sampling**: explicit seeds, identical counts with or
//!   without parallel sampling
//! - **Statistics**: optional timings, gate counts and norm drift
//!
//! # Example
//!
//! ```
//! use kettle_sim::{factories, BellState, Simulator};
//!
//! let simulator = Simulator::default();
//! let circuit = factories::bell_state(BellState::PhiPlus).unwrap();
//!
//! let result = simulator.run(&circuit).unwrap();
//! for entry in simulator.amplitudes(&result.state, 1e-10) {
//!     assert!(entry.bitstring == "00" || entry.bitstring == "11");
//! }
//!
//! let counts = simulator.sample_measured(&result.state, &circuit, 1000, 42).unwrap();
//! assert_eq!(counts.shots(), 1000);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod result;
pub mod simulator;
pub mod statistics;

pub use config::{NormalizationCheck, SimulatorConfig};
pub use engine::StatevectorEngine;
pub use error::{Result, SimulatorError};
pub use result::SimulationResult;
pub use simulator::Simulator;
pub use statistics::ExecutionStatistics;

pub use kettle_core::{
    factories, BellState, Circuit, CircuitBuilder, ClbitId, GateKind, GateOp, Measurement,
    QuantumError, QubitId,
};
pub use kettle_state::{
    AmplitudeEntry, ClassicalMapping, Counts, Pauli, PauliString, Sampler, SamplingStrategy,
    StateError, Statevector,
};
