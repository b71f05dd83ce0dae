//! Error types for the simulator

use kettle_core::QuantumError;
use kettle_state::StateError;
use thiserror::Error;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;

/// Errors that can occur during simulation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulatorError {
    /// Circuit construction or validation failed
    #[error("Invalid circuit: {0}")]
    Circuit(#[from] QuantumError),

    /// State vector operation or sampling failed
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Norm drifted beyond tolerance
    ///
    /// `gate_index` is the last gate applied before the failing check, or
    /// `None` for a check on a state that has seen no gates.
    #[error(
        "Normalization lost{}: norm = {}, tolerance {}",
        after_gate(.gate_index),
        .norm,
        .tolerance
    )]
    Normalization {
        gate_index: Option<usize>,
        norm: f64,
        tolerance: f64,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Too many qubits for the configured limit
    #[error("Too many qubits: circuit has {num_qubits}, max supported is {max_qubits}")]
    TooManyQubits { num_qubits: usize, max_qubits: usize },

    /// Sampling a circuit that measures nothing
    #[error("Circuit has no measurements to sample")]
    NoMeasurements,
}

fn after_gate(gate_index: &Option<usize>) -> String {
    gate_index
        .map(|i| format!(" after gate {}", i))
        .unwrap_or_default()
}
