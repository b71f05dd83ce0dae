//! Gate kinds and gate operations
//!
//! Gates form a closed set described by [`GateKind`]. A [`GateOp`] pairs a
//! kind with the qubits it acts on and, for rotations, its angle. For
//! controlled kinds the qubit order is `[control, target]`.

use crate::{QuantumError, QubitId, Result};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Supported gate kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GateKind {
    /// Hadamard
    H,
    /// Pauli-X (NOT)
    X,
    /// Pauli-Z (phase flip)
    Z,
    /// Controlled-X (CNOT)
    CX,
    /// Controlled-Z
    CZ,
    /// Controlled-Hadamard
    CH,
    /// Y-axis rotation by an angle
    RY,
    /// Controlled Y-axis rotation by an angle
    CRY,
}

impl GateKind {
    /// All gate kinds, in declaration order
    pub const ALL: [GateKind; 8] = [
        GateKind::H,
        GateKind::X,
        GateKind::Z,
        GateKind::CX,
        GateKind::CZ,
        GateKind::CH,
        GateKind::RY,
        GateKind::CRY,
    ];

    /// Canonical upper-case name
    pub const fn name(self) -> &'static str {
        match self {
            GateKind::H => "H",
            GateKind::X => "X",
            GateKind::Z => "Z",
            GateKind::CX => "CX",
            GateKind::CZ => "CZ",
            GateKind::CH => "CH",
            GateKind::RY => "RY",
            GateKind::CRY => "CRY",
        }
    }

    /// Number of qubits this kind acts on
    pub const fn num_qubits(self) -> usize {
        match self {
            GateKind::H | GateKind::X | GateKind::Z | GateKind::RY => 1,
            GateKind::CX | GateKind::CZ | GateKind::CH | GateKind::CRY => 2,
        }
    }

    /// Whether this kind takes a rotation angle
    pub const fn is_parameterized(self) -> bool {
        matches!(self, GateKind::RY | GateKind::CRY)
    }

    /// Whether this kind is a controlled gate
    pub const fn is_controlled(self) -> bool {
        matches!(
            self,
            GateKind::CX | GateKind::CZ | GateKind::CH | GateKind::CRY
        )
    }

    /// Whether this kind is its own inverse
    pub const fn is_hermitian(self) -> bool {
        !self.is_parameterized()
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateKind {
    type Err = QuantumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "hadamard" => Ok(GateKind::H),
            "x" | "not" => Ok(GateKind::X),
            "z" => Ok(GateKind::Z),
            "cx" | "cnot" => Ok(GateKind::CX),
            "cz" => Ok(GateKind::CZ),
            "ch" => Ok(GateKind::CH),
            "ry" => Ok(GateKind::RY),
            "cry" => Ok(GateKind::CRY),
            _ => Err(QuantumError::InvalidGate(s.to_string())),
        }
    }
}

/// A gate applied to specific qubits
///
/// Immutable once created. Construction validates arity, duplicate qubits
/// and the angle payload; range checks against a register happen in the
/// circuit builder, which knows the register size.
///
/// # Example
/// ```
/// use kettle_core::{GateKind, GateOp, QubitId};
///
/// let op = GateOp::new(GateKind::CX, &[QubitId::new(0), QubitId::new(1)], None).unwrap();
/// assert_eq!(op.controls(), &[QubitId::new(0)]);
/// assert_eq!(op.targets(), &[QubitId::new(1)]);
/// ```
#[derive(Clone, PartialEq)]
pub struct GateOp {
    kind: GateKind,
    qubits: SmallVec<[QubitId; 2]>,
    angle: Option<f64>,
}

impl GateOp {
    /// Create a new gate operation
    ///
    /// # Errors
    /// Returns error if:
    /// - Qubit count doesn't match the gate kind
    /// - Duplicate qubits specified
    /// - A rotation has no angle, a non-finite angle, or a fixed gate has one
    pub fn new(kind: GateKind, qubits: &[QubitId], angle: Option<f64>) -> Result<Self> {
        if qubits.len() != kind.num_qubits() {
            return Err(QuantumError::invalid_qubit_count(
                kind.name(),
                kind.num_qubits(),
                qubits.len(),
            ));
        }

        for i in 0..qubits.len() {
            for j in (i + 1)..qubits.len() {
                if qubits[i] == qubits[j] {
                    return Err(QuantumError::DuplicateQubit(qubits[i]));
                }
            }
        }

        match (kind.is_parameterized(), angle) {
            (true, None) => {
                return Err(QuantumError::invalid_parameter(format!(
                    "gate {} requires a rotation angle",
                    kind
                )))
            }
            (true, Some(theta)) if !theta.is_finite() => {
                return Err(QuantumError::invalid_parameter(format!(
                    "gate {} angle must be finite, got {}",
                    kind, theta
                )))
            }
            (false, Some(_)) => {
                return Err(QuantumError::invalid_parameter(format!(
                    "gate {} does not take an angle",
                    kind
                )))
            }
            _ => {}
        }

        Ok(Self {
            kind,
            qubits: SmallVec::from_slice(qubits),
            angle,
        })
    }

    /// Gate kind
    #[inline]
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// All qubits, in `[control, target]` order for controlled kinds
    #[inline]
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Rotation angle, present exactly for parameterized kinds
    #[inline]
    pub fn angle(&self) -> Option<f64> {
        self.angle
    }

    /// Control qubits (empty for uncontrolled kinds)
    #[inline]
    pub fn controls(&self) -> &[QubitId] {
        if self.kind.is_controlled() {
            &self.qubits[..1]
        } else {
            &[]
        }
    }

    /// Target qubits
    #[inline]
    pub fn targets(&self) -> &[QubitId] {
        if self.kind.is_controlled() {
            &self.qubits[1..]
        } else {
            &self.qubits
        }
    }

    /// Number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Highest qubit index touched by this operation
    pub fn max_qubit(&self) -> usize {
        self.qubits.iter().map(QubitId::index).max().unwrap_or(0)
    }
}

impl fmt::Debug for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(theta) = self.angle {
            write!(f, "({:.4})", theta)?;
        }
        write!(f, " ")?;
        for (i, q) in self.qubits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", q)?;
        }
        Ok(())
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
