//! Ready-made circuits for common entangled states
//!
//! Factories only build circuits; they never touch a state vector. Feed the
//! result to a simulator to inspect amplitudes or sample counts.

use crate::{Circuit, CircuitBuilder, QuantumError, Result};
use std::fmt;
use std::str::FromStr;

/// The four maximally entangled two-qubit Bell states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BellState {
    /// (|00⟩ + |11⟩)/√2
    PhiPlus,
    /// (|00⟩ − |11⟩)/√2
    PhiMinus,
    /// (|01⟩ + |10⟩)/√2
    PsiPlus,
    /// (|01⟩ − |10⟩)/√2
    PsiMinus,
}

impl BellState {
    /// All variants
    pub const ALL: [BellState; 4] = [
        BellState::PhiPlus,
        BellState::PhiMinus,
        BellState::PsiPlus,
        BellState::PsiMinus,
    ];

    /// Snake-case name accepted by [`FromStr`]
    pub const fn name(self) -> &'static str {
        match self {
            BellState::PhiPlus => "phi_plus",
            BellState::PhiMinus => "phi_minus",
            BellState::PsiPlus => "psi_plus",
            BellState::PsiMinus => "psi_minus",
        }
    }
}

impl fmt::Display for BellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BellState {
    type Err = QuantumError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "phi_plus" => Ok(BellState::PhiPlus),
            "phi_minus" => Ok(BellState::PhiMinus),
            "psi_plus" => Ok(BellState::PsiPlus),
            "psi_minus" => Ok(BellState::PsiMinus),
            other => Err(QuantumError::invalid_parameter(format!(
                "unknown Bell state '{}', expected one of phi_plus, phi_minus, psi_plus, psi_minus",
                other
            ))),
        }
    }
}

/// Circuit preparing a Bell state on 2 qubits with 2 classical bits
///
/// # Example
/// ```
/// use kettle_core::factories::{bell_state, BellState};
///
/// let circuit = bell_state(BellState::PsiMinus).unwrap();
/// assert_eq!(circuit.num_qubits(), 2);
/// assert_eq!(circuit.num_clbits(), 2);
/// assert_eq!(circuit.len(), 4);
/// ```
pub fn bell_state(variant: BellState) -> Result<Circuit> {
    let mut builder = CircuitBuilder::new(2, 2)?;
    builder.h(0)?;
    if matches!(variant, BellState::PhiMinus | BellState::PsiMinus) {
        builder.z(0)?;
    }
    builder.cx(0, 1)?;
    if matches!(variant, BellState::PsiPlus | BellState::PsiMinus) {
        builder.x(1)?;
    }
    Ok(builder.build())
}

/// Bell state circuit looked up by name (`"phi_plus"`, ...)
pub fn bell_state_named(name: &str) -> Result<Circuit> {
    bell_state(name.parse()?)
}

/// Circuit preparing the `n`-qubit GHZ state (|0…0⟩ + |1…1⟩)/√2
pub fn ghz_state(num_qubits: usize) -> Result<Circuit> {
    if num_qubits < 2 {
        return Err(QuantumError::invalid_parameter(format!(
            "GHZ state needs at least 2 qubits, got {}",
            num_qubits
        )));
    }

    let mut builder = CircuitBuilder::with_capacity(num_qubits, num_qubits, num_qubits)?;
    builder.h(0)?;
    for target in 1..num_qubits {
        builder.cx(0, target)?;
    }
    Ok(builder.build())
}

/// Circuit preparing the `n`-qubit W state
///
/// Every basis state with exactly one qubit set gets amplitude 1/√n.
///
/// A rotation chain first spreads amplitude 1/√n over the states
/// |0…0⟩, |0…01⟩, |0…011⟩, … (qubits `0..k` set, `k = 0..n`). A CNOT
/// ladder followed by X on qubit 0 then maps the state with `k` low qubits
/// set onto the state with only qubit `k` set.
///
/// # Example
/// ```
/// use kettle_core::factories::w_state;
///
/// assert!(w_state(1).is_err());
/// let circuit = w_state(4).unwrap();
/// assert_eq!(circuit.num_qubits(), 4);
/// ```
pub fn w_state(num_qubits: usize) -> Result<Circuit> {
    if num_qubits < 2 {
        return Err(QuantumError::invalid_parameter(format!(
            "W state needs at least 2 qubits, got {}",
            num_qubits
        )));
    }

    let n = num_qubits;
    let mut builder = CircuitBuilder::with_capacity(n, n, 2 * n + 1)?;

    builder.ry(split_angle(n), 0)?;
    for i in 1..n {
        builder.cry(split_angle(n - i), i - 1, i)?;
    }

    for j in (1..n).rev() {
        builder.cx(j - 1, j)?;
    }
    builder.x(0)?;

    Ok(builder.build())
}

/// Rotation leaving amplitude √(1/remaining) on |0⟩
fn split_angle(remaining: usize) -> f64 {
    2.0 * (1.0 / remaining as f64).sqrt().acos()
}

/// Circuit putting every qubit in |+⟩, an equal superposition of all 2ⁿ
/// basis states
pub fn superposition_state(num_qubits: usize) -> Result<Circuit> {
    let mut builder = CircuitBuilder::with_capacity(num_qubits, num_qubits, num_qubits)?;
    builder.h_all()?;
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GateKind;

    fn kinds(circuit: &Circuit) -> Vec<GateKind> {
        circuit.operations().map(|op| op.kind()).collect()
    }

    #[test]
    fn test_bell_sequences() {
        use GateKind::*;
        assert_eq!(kinds(&bell_state(BellState::PhiPlus).unwrap()), vec![H, CX]);
        assert_eq!(kinds(&bell_state(BellState::PhiMinus).unwrap()), vec![H, Z, CX]);
        assert_eq!(kinds(&bell_state(BellState::PsiPlus).unwrap()), vec![H, CX, X]);
        assert_eq!(
            kinds(&bell_state(BellState::PsiMinus).unwrap()),
            vec![H, Z, CX, X]
        );
    }

    #[test]
    fn test_bell_parse() {
        for variant in BellState::ALL {
            assert_eq!(variant.name().parse::<BellState>().unwrap(), variant);
        }
        assert!(matches!(
            bell_state_named("phi_zero"),
            Err(QuantumError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_ghz_structure() {
        let circuit = ghz_state(4).unwrap();
        assert_eq!(circuit.len(), 4);
        assert_eq!(circuit.gate_counts().get(&GateKind::CX), Some(&3));
        assert!(ghz_state(1).is_err());
    }

    #[test]
    fn test_w_state_structure() {
        let circuit = w_state(3).unwrap();
        // RY, 2 CRY, 2 CX, X
        assert_eq!(circuit.len(), 6);
        assert_eq!(circuit.get_operation(0).unwrap().kind(), GateKind::RY);
        assert!(matches!(w_state(1), Err(QuantumError::InvalidParameter(_))));
        assert!(matches!(w_state(0), Err(QuantumError::InvalidParameter(_))));
    }

    #[test]
    fn test_split_angle() {
        assert!(split_angle(1).abs() < 1e-12);
        // RY(pi/2) splits evenly
        assert!((split_angle(2) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_superposition() {
        let circuit = superposition_state(5).unwrap();
        assert_eq!(circuit.len(), 5);
        assert_eq!(circuit.depth(), 1);
        assert!(superposition_state(0).is_err());
    }
}
