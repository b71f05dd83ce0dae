//! Dense quantum state vectors, gate kernels and shot sampling
//!
//! This crate holds the numeric half of the Kettle simulator and knows
//! nothing about circuits: gates arrive as 2×2 matrices plus qubit indices.
//!
//! - [`Statevector`]: `2ⁿ` amplitudes with qubit 0 as the least-significant
//!   index bit
//! - [`kernels`]: in-place pair updates, on rayon above a size threshold
//! - [`Sampler`]: seeded, reproducible Born-rule sampling into [`Counts`]
//! - [`PauliString`]: expectation values of Pauli observables
//!
//! # Example
//!
//! ```
//! use kettle_state::{Sampler, Statevector};
//! use num_complex::Complex64;
//!
//! let h = std::f64::consts::FRAC_1_SQRT_2;
//! let hadamard = [
//!     [Complex64::new(h, 0.0), Complex64::new(h, 0.0)],
//!     [Complex64::new(h, 0.0), Complex64::new(-h, 0.0)],
//! ];
//! let x = [
//!     [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
//!     [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
//! ];
//!
//! let mut state = Statevector::new(2).unwrap();
//! state.apply_single_qubit_gate(&hadamard, 0).unwrap();
//! state.apply_controlled_gate(&x, 0, 1).unwrap();
//!
//! let counts = Sampler::new().sample_statevector(&state, 1000, 42).unwrap();
//! assert_eq!(counts.get("00") + counts.get("11"), 1000);
//! ```

pub mod error;
pub mod kernels;
pub mod measurement;
pub mod observable;
pub mod statevector;

pub use error::{Result, StateError};
pub use measurement::{ClassicalMapping, Counts, Sampler, SamplingStrategy};
pub use observable::{Pauli, PauliString};
pub use statevector::{format_bitstring, AmplitudeEntry, Statevector};
