//! Error types for circuit construction

use crate::QubitId;
use thiserror::Error;

/// Errors that can occur while building circuits
///
/// Every variant is raised at construction time: the builder validates
/// gate kinds, qubit indices and parameters before an operation is recorded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantumError {
    /// Gate name that does not map to a supported gate kind
    #[error("Unrecognized gate kind '{0}'")]
    InvalidGate(String),

    /// Qubit index outside the register
    #[error("Invalid qubit index {index}: circuit has only {num_qubits} qubits")]
    InvalidQubitIndex { index: usize, num_qubits: usize },

    /// Classical bit index outside the classical register
    #[error("Invalid classical bit index {index}: circuit has only {num_clbits} classical bits")]
    InvalidClbitIndex { index: usize, num_clbits: usize },

    /// Gate applied to wrong number of qubits
    #[error("Gate '{gate}' requires {expected} qubits, but {actual} were provided")]
    InvalidQubitCount {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Duplicate qubit in gate operation
    #[error("Duplicate qubit {0} in gate operation")]
    DuplicateQubit(QubitId),

    /// Malformed or out-of-range parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl QuantumError {
    /// Create an invalid qubit error
    pub fn invalid_qubit(index: usize, num_qubits: usize) -> Self {
        Self::InvalidQubitIndex { index, num_qubits }
    }

    /// Create an invalid qubit count error
    pub fn invalid_qubit_count(gate: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::InvalidQubitCount {
            gate: gate.into(),
            expected,
            actual,
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_qubit_error() {
        let err = QuantumError::invalid_qubit(5, 3);
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_invalid_qubit_count_error() {
        let err = QuantumError::invalid_qubit_count("CX", 2, 1);
        let msg = err.to_string();
        assert!(msg.contains("CX"));
        assert!(msg.contains('2'));
        assert!(msg.contains('1'));
    }

    #[test]
    fn test_invalid_gate_error() {
        let err = QuantumError::InvalidGate("toffoli".to_string());
        assert!(err.to_string().contains("toffoli"));
    }

    #[test]
    fn test_duplicate_qubit_error() {
        let err = QuantumError::DuplicateQubit(QubitId::new(2));
        assert!(err.to_string().contains("q2"));
    }
}
