//! Pauli-string expectation values
//!
//! A Pauli string is a tensor product of single-qubit Paulis. Labels follow
//! the bitstring convention: the rightmost character acts on qubit 0, so
//! `"ZI"` is Z on qubit 1.
//!
//! Internally a string is stored as an X mask and a Z mask with Y = i·X·Z,
//! which lets ⟨ψ|P|ψ⟩ be evaluated in one pass without building P|ψ⟩.

use crate::error::{Result, StateError};
use crate::statevector::{Statevector, MAX_STATE_QUBITS};
use num_complex::Complex64;
use std::fmt;
use std::str::FromStr;

/// Single-qubit Pauli operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pauli {
    /// Identity
    I,
    /// Bit flip
    X,
    /// Bit and phase flip
    Y,
    /// Phase flip
    Z,
}

impl Pauli {
    /// Parse a Pauli operator from a character
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'I' => Ok(Pauli::I),
            'X' => Ok(Pauli::X),
            'Y' => Ok(Pauli::Y),
            'Z' => Ok(Pauli::Z),
            other => Err(StateError::invalid_parameter(format!(
                "'{}' is not a Pauli operator",
                other
            ))),
        }
    }

    /// Convert to character representation
    pub fn to_char(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    /// (flips bit, applies phase) in the X/Z decomposition
    fn xz(self) -> (bool, bool) {
        match self {
            Pauli::I => (false, false),
            Pauli::X => (true, false),
            Pauli::Y => (true, true),
            Pauli::Z => (false, true),
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Weighted tensor product of Pauli operators
///
/// # Example
/// ```
/// use kettle_state::{PauliString, Statevector};
///
/// let zz: PauliString = "ZZ".parse().unwrap();
/// let state = Statevector::new(2).unwrap();
/// assert!((zz.expectation_value(&state).unwrap() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PauliString {
    num_qubits: usize,
    x_mask: usize,
    z_mask: usize,
    coeff: f64,
}

impl PauliString {
    /// Identity on `num_qubits` qubits
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            x_mask: 0,
            z_mask: 0,
            coeff: 1.0,
        }
    }

    /// `pauli` on one qubit, identity elsewhere
    pub fn single(num_qubits: usize, qubit: usize, pauli: Pauli) -> Result<Self> {
        Self::identity(num_qubits).with_pauli(qubit, pauli)
    }

    /// Z on every qubit
    pub fn all_z(num_qubits: usize) -> Self {
        Self {
            z_mask: low_mask(num_qubits),
            ..Self::identity(num_qubits)
        }
    }

    /// Replace the operator on `qubit`
    pub fn with_pauli(mut self, qubit: usize, pauli: Pauli) -> Result<Self> {
        if qubit >= self.num_qubits {
            return Err(StateError::InvalidQubitIndex {
                index: qubit,
                num_qubits: self.num_qubits,
            });
        }
        let bit = mask_bit(qubit).ok_or_else(|| {
            StateError::invalid_parameter(format!("qubit {} exceeds the mask width", qubit))
        })?;
        let (x, z) = pauli.xz();
        self.x_mask = if x { self.x_mask | bit } else { self.x_mask & !bit };
        self.z_mask = if z { self.z_mask | bit } else { self.z_mask & !bit };
        Ok(self)
    }

    /// Scale by a real coefficient
    pub fn with_coeff(mut self, coeff: f64) -> Self {
        self.coeff = coeff;
        self
    }

    /// Get the number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Real coefficient
    pub fn coeff(&self) -> f64 {
        self.coeff
    }

    /// Operator acting on `qubit`
    pub fn get(&self, qubit: usize) -> Option<Pauli> {
        if qubit >= self.num_qubits {
            return None;
        }
        let bit = mask_bit(qubit).unwrap_or(0);
        let x = self.x_mask & bit != 0;
        let z = self.z_mask & bit != 0;
        Some(match (x, z) {
            (false, false) => Pauli::I,
            (true, false) => Pauli::X,
            (true, true) => Pauli::Y,
            (false, true) => Pauli::Z,
        })
    }

    /// Whether the string is diagonal in the computational basis (only I and Z)
    pub fn is_diagonal(&self) -> bool {
        self.x_mask == 0
    }

    /// Number of qubits acted on non-trivially
    pub fn weight(&self) -> usize {
        (self.x_mask | self.z_mask).count_ones() as usize
    }

    /// Compute ⟨ψ|P|ψ⟩
    ///
    /// # Errors
    /// `DimensionMismatch` if the string and state have different widths.
    pub fn expectation_value(&self, state: &Statevector) -> Result<f64> {
        if self.num_qubits != state.num_qubits() {
            return Err(StateError::DimensionMismatch {
                expected: self.num_qubits,
                actual: state.num_qubits(),
            });
        }

        let amplitudes = state.amplitudes();

        if self.is_diagonal() {
            let value: f64 = amplitudes
                .iter()
                .enumerate()
                .map(|(i, amp)| parity_sign(i & self.z_mask) * amp.norm_sqr())
                .sum();
            return Ok(self.coeff * value);
        }

        // P|i⟩ = i^{#Y} · (−1)^{|i ∧ z|} · |i ⊕ x⟩
        let y_phase = match (self.x_mask & self.z_mask).count_ones() % 4 {
            0 => Complex64::new(1.0, 0.0),
            1 => Complex64::new(0.0, 1.0),
            2 => Complex64::new(-1.0, 0.0),
            _ => Complex64::new(0.0, -1.0),
        };

        let sum: Complex64 = amplitudes
            .iter()
            .enumerate()
            .map(|(i, amp)| amplitudes[i ^ self.x_mask].conj() * amp * parity_sign(i & self.z_mask))
            .sum();

        Ok(self.coeff * (y_phase * sum).re)
    }
}

impl FromStr for PauliString {
    type Err = StateError;

    /// Parse a label such as `"XZI"`; the last character acts on qubit 0
    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim();
        if label.is_empty() {
            return Err(StateError::invalid_parameter("empty Pauli label"));
        }
        let width = label.chars().count();
        if width > MAX_STATE_QUBITS {
            return Err(StateError::invalid_parameter(format!(
                "Pauli label has {} operators, at most {} are supported",
                width, MAX_STATE_QUBITS
            )));
        }

        let mut pauli = Self::identity(width);
        for (qubit, c) in label.chars().rev().enumerate() {
            pauli = pauli.with_pauli(qubit, Pauli::from_char(c)?)?;
        }
        Ok(pauli)
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coeff != 1.0 {
            write!(f, "{}·", self.coeff)?;
        }
        for qubit in (0..self.num_qubits).rev() {
            if let Some(p) = self.get(qubit) {
                write!(f, "{}", p)?;
            }
        }
        Ok(())
    }
}

#[inline]
fn parity_sign(bits: usize) -> f64 {
    if bits.count_ones() % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

#[inline]
fn low_mask(n: usize) -> usize {
    if n >= usize::BITS as usize {
        usize::MAX
    } else {
        (1usize << n) - 1
    }
}

/// Single-bit mask for `qubit`, `None` past the word width
#[inline]
fn mask_bit(qubit: usize) -> Option<usize> {
    u32::try_from(qubit)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
}
