//! Gate library for the Kettle simulator
//!
//! Maps every [`GateKind`](kettle_core::GateKind) to its unitary and to the
//! kernel action the state-vector engine executes.
//!
//! # Example
//!
//! ```
//! use kettle_core::{GateKind, GateOp, QubitId};
//! use kettle_gates::{action, matrices, GateAction};
//!
//! let op = GateOp::new(GateKind::CX, &[QubitId::new(0), QubitId::new(1)], None).unwrap();
//! assert_eq!(
//!     action(&op).unwrap(),
//!     GateAction::Controlled {
//!         matrix: matrices::PAULI_X,
//!         control: QubitId::new(0),
//!         target: QubitId::new(1),
//!     }
//! );
//! ```

pub mod matrices;
pub mod standard;

// Re-export commonly used items
pub use matrices::{Matrix2, Matrix4};
pub use standard::{action, base_matrix, unitary, GateAction, Unitary};
