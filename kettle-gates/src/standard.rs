//! Application rules for the standard gate set
//!
//! [`action`] turns a [`GateOp`] into the minimal description a state-vector
//! kernel needs: a 2×2 matrix plus the qubits it touches. Controlled gates
//! are expressed as their single-qubit base applied where the control is
//! set; CZ is symmetric and becomes a phase flip.

use crate::matrices::{self, Matrix2, Matrix4};
use kettle_core::{GateKind, GateOp, QuantumError, QubitId, Result};

/// How a gate acts on a state vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateAction {
    /// Apply `matrix` to `target`
    Single { matrix: Matrix2, target: QubitId },
    /// Apply `matrix` to `target` on the subspace where `control` is 1
    Controlled {
        matrix: Matrix2,
        control: QubitId,
        target: QubitId,
    },
    /// Negate amplitudes where both qubits are 1
    PhaseFlip { a: QubitId, b: QubitId },
}

impl GateAction {
    /// Qubits touched by this action
    pub fn qubits(&self) -> [Option<QubitId>; 2] {
        match *self {
            GateAction::Single { target, .. } => [Some(target), None],
            GateAction::Controlled {
                control, target, ..
            } => [Some(control), Some(target)],
            GateAction::PhaseFlip { a, b } => [Some(a), Some(b)],
        }
    }
}

/// Single-qubit base matrix of a gate kind
///
/// For controlled kinds this is the matrix applied to the target. CZ's base
/// is Z.
pub fn base_matrix(kind: GateKind, angle: Option<f64>) -> Result<Matrix2> {
    let matrix = match kind {
        GateKind::H | GateKind::CH => matrices::HADAMARD,
        GateKind::X | GateKind::CX => matrices::PAULI_X,
        GateKind::Z | GateKind::CZ => matrices::PAULI_Z,
        GateKind::RY | GateKind::CRY => matrices::rotation_y(require_angle(kind, angle)?),
    };
    Ok(matrix)
}

/// Resolve a gate operation to its kernel action
pub fn action(op: &GateOp) -> Result<GateAction> {
    let kind = op.kind();
    let qubits = op.qubits();

    if qubits.len() != kind.num_qubits() {
        return Err(QuantumError::invalid_qubit_count(
            kind.name(),
            kind.num_qubits(),
            qubits.len(),
        ));
    }

    let action = match kind {
        GateKind::H | GateKind::X | GateKind::Z | GateKind::RY => GateAction::Single {
            matrix: base_matrix(kind, op.angle())?,
            target: qubits[0],
        },
        GateKind::CZ => GateAction::PhaseFlip {
            a: qubits[0],
            b: qubits[1],
        },
        GateKind::CX | GateKind::CH | GateKind::CRY => GateAction::Controlled {
            matrix: base_matrix(kind, op.angle())?,
            control: qubits[0],
            target: qubits[1],
        },
    };
    Ok(action)
}

/// Local unitary of a gate kind
///
/// Single-qubit kinds yield a 2×2 matrix, controlled kinds a 4×4 matrix in
/// the ordering described in [`matrices`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unitary {
    /// One-qubit unitary
    One(Matrix2),
    /// Two-qubit unitary
    Two(Matrix4),
}

/// Full local unitary of a gate kind
pub fn unitary(kind: GateKind, angle: Option<f64>) -> Result<Unitary> {
    let base = base_matrix(kind, angle)?;
    Ok(if kind.is_controlled() {
        Unitary::Two(matrices::controlled(&base))
    } else {
        Unitary::One(base)
    })
}

fn require_angle(kind: GateKind, angle: Option<f64>) -> Result<f64> {
    match angle {
        Some(theta) if theta.is_finite() => Ok(theta),
        Some(theta) => Err(QuantumError::invalid_parameter(format!(
            "gate {} angle must be finite, got {}",
            kind, theta
        ))),
        None => Err(QuantumError::invalid_parameter(format!(
            "gate {} requires a rotation angle",
            kind
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn q(i: usize) -> QubitId {
        QubitId::new(i)
    }

    #[test]
    fn test_single_action() {
        let op = GateOp::new(GateKind::H, &[q(3)], None).unwrap();
        match action(&op).unwrap() {
            GateAction::Single { matrix, target } => {
                assert_eq!(target, q(3));
                assert_eq!(matrix, matrices::HADAMARD);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_controlled_action_keeps_order() {
        let op = GateOp::new(GateKind::CRY, &[q(2), q(0)], Some(0.8)).unwrap();
        match action(&op).unwrap() {
            GateAction::Controlled {
                matrix,
                control,
                target,
            } => {
                assert_eq!(control, q(2));
                assert_eq!(target, q(0));
                assert_relative_eq!(matrix[0][0].re, 0.4f64.cos(), epsilon = 1e-12);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_cz_is_phase_flip() {
        let op = GateOp::new(GateKind::CZ, &[q(1), q(0)], None).unwrap();
        assert_eq!(
            action(&op).unwrap(),
            GateAction::PhaseFlip { a: q(1), b: q(0) }
        );
    }

    #[test]
    fn test_unitary_shapes() {
        for kind in GateKind::ALL {
            let angle = kind.is_parameterized().then_some(0.5);
            match unitary(kind, angle).unwrap() {
                Unitary::One(m) => {
                    assert_eq!(kind.num_qubits(), 1);
                    assert!(matrices::is_unitary(&m, 1e-12));
                }
                Unitary::Two(m) => {
                    assert_eq!(kind.num_qubits(), 2);
                    assert!(matrices::is_unitary(&m, 1e-12));
                }
            }
        }
        assert_eq!(unitary(GateKind::CX, None).unwrap(), Unitary::Two(matrices::CNOT));
    }

    #[test]
    fn test_missing_angle() {
        assert!(matches!(
            base_matrix(GateKind::RY, None),
            Err(QuantumError::InvalidParameter(_))
        ));
        assert!(base_matrix(GateKind::X, None).is_ok());
    }
}
