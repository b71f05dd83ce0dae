//! Core types for the Kettle quantum circuit simulator
//!
//! This crate provides the fundamental types for describing quantum circuits:
//! - [`QubitId`] / [`ClbitId`]: Type-safe qubit and classical bit addressing
//! - [`GateKind`] / [`GateOp`]: The closed gate set and its applications
//! - [`Circuit`]: Ordered gate sequence with an end-of-circuit measurement map
//! - [`CircuitBuilder`]: Validating, chainable circuit construction
//! - [`factories`]: Bell, GHZ, W and uniform superposition circuits
//!
//! Qubit 0 is the least-significant bit of a basis-state index.
//!
//! # Example
//! ```
//! use kettle_core::CircuitBuilder;
//!
//! let mut builder = CircuitBuilder::new(2, 2).unwrap();
//! builder.h(0).unwrap().cx(0, 1).unwrap().measure_all().unwrap();
//! let circuit = builder.build();
//! assert_eq!(circuit.len(), 2);
//! ```

pub mod circuit;
pub mod circuit_builder;
pub mod error;
pub mod factories;
pub mod gate;
pub mod qubit;

// Re-exports for convenience
pub use circuit::{Circuit, Measurement, MAX_QUBITS};
pub use circuit_builder::CircuitBuilder;
pub use error::QuantumError;
pub use factories::BellState;
pub use gate::{GateKind, GateOp};
pub use qubit::{ClbitId, QubitId};

/// Type alias for results in Kettle
pub type Result<T> = std::result::Result<T, QuantumError>;
