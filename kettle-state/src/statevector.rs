//! Dense state vector over `n` qubits

use crate::error::{Result, StateError};
use crate::kernels;
use num_complex::Complex64;
use std::fmt;

/// Default number of qubits at which kernels switch to rayon
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 16;

/// Largest register a state vector will allocate
pub const MAX_STATE_QUBITS: usize = 30;

/// One significant amplitude, as reported by [`Statevector::amplitudes_above`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmplitudeEntry {
    /// Basis-state index
    pub index: usize,
    /// Index rendered MSB-first, qubit 0 rightmost
    pub bitstring: String,
    /// |amplitude|
    pub magnitude: f64,
    /// arg(amplitude) in (−π, π]
    pub phase: f64,
}

/// Quantum state as `2ⁿ` complex amplitudes
///
/// Qubit `q` corresponds to bit `q` of the amplitude index. Gate methods
/// modify the vector in place; the engine guarantees each gate sees the
/// result of the previous one.
///
/// # Example
///
/// ```
/// use kettle_state::Statevector;
/// use num_complex::Complex64;
///
/// let h = std::f64::consts::FRAC_1_SQRT_2;
/// let hadamard = [
///     [Complex64::new(h, 0.0), Complex64::new(h, 0.0)],
///     [Complex64::new(h, 0.0), Complex64::new(-h, 0.0)],
/// ];
///
/// let mut state = Statevector::new(2).unwrap();
/// state.apply_single_qubit_gate(&hadamard, 0).unwrap();
/// assert!(state.is_normalized(1e-10));
/// assert!((state.probability(1).unwrap() - 0.5).abs() < 1e-12);
/// ```
#[derive(Clone)]
pub struct Statevector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
    parallel_threshold: usize,
}

impl Statevector {
    /// Create a state initialized to |0…0⟩
    ///
    /// # Errors
    /// `InvalidDimension` if `num_qubits` is 0 or above [`MAX_STATE_QUBITS`].
    pub fn new(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 || num_qubits > MAX_STATE_QUBITS {
            return Err(StateError::InvalidDimension {
                dimension: 1usize.checked_shl(num_qubits as u32).unwrap_or(0),
            });
        }

        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);

        Ok(Self {
            num_qubits,
            amplitudes,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Create a state from raw amplitudes
    ///
    /// The length must be a power of two of at least 2. Normalization is
    /// not enforced; use [`check_normalization`](Self::check_normalization).
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> Result<Self> {
        let dimension = amplitudes.len();
        if dimension < 2 || !dimension.is_power_of_two() {
            return Err(StateError::InvalidDimension { dimension });
        }
        let num_qubits = dimension.trailing_zeros() as usize;
        if num_qubits > MAX_STATE_QUBITS {
            return Err(StateError::InvalidDimension { dimension });
        }

        Ok(Self {
            num_qubits,
            amplitudes,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Set the register size at which kernels run on rayon
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Change the parallel threshold in place
    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    /// Get the number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the state dimension (2^num_qubits)
    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Get a reference to the state amplitudes
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume the state, returning its amplitudes
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Whether kernels on this state use rayon
    #[inline]
    pub fn is_parallel(&self) -> bool {
        self.num_qubits >= self.parallel_threshold && rayon::current_num_threads() > 1
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(StateError::InvalidQubitIndex {
                index: qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    fn check_pair(&self, a: usize, b: usize) -> Result<()> {
        self.check_qubit(a)?;
        self.check_qubit(b)?;
        if a == b {
            return Err(StateError::invalid_parameter(format!(
                "two-qubit gate needs distinct qubits, got {} twice",
                a
            )));
        }
        Ok(())
    }

    /// Apply a single-qubit gate
    ///
    /// # Arguments
    /// * `matrix` - 2×2 gate matrix in row-major order
    /// * `qubit` - Index of the qubit to apply the gate to (0-indexed)
    ///
    /// # Errors
    /// Returns error if qubit index is invalid
    pub fn apply_single_qubit_gate(
        &mut self,
        matrix: &[[Complex64; 2]; 2],
        qubit: usize,
    ) -> Result<()> {
        self.check_qubit(qubit)?;
        let parallel = self.is_parallel();
        kernels::apply_single_qubit(&mut self.amplitudes, matrix, qubit, parallel);
        Ok(())
    }

    /// Apply `matrix` to `target` where `control` is 1
    ///
    /// # Errors
    /// Returns error if either index is invalid or they are equal
    pub fn apply_controlled_gate(
        &mut self,
        matrix: &[[Complex64; 2]; 2],
        control: usize,
        target: usize,
    ) -> Result<()> {
        self.check_pair(control, target)?;
        let parallel = self.is_parallel();
        kernels::apply_controlled(&mut self.amplitudes, matrix, control, target, parallel);
        Ok(())
    }

    /// Apply a CZ gate: phase −1 where both qubits are 1
    pub fn apply_cz(&mut self, qubit1: usize, qubit2: usize) -> Result<()> {
        self.check_pair(qubit1, qubit2)?;
        let parallel = self.is_parallel();
        kernels::apply_phase_flip(&mut self.amplitudes, qubit1, qubit2, parallel);
        Ok(())
    }

    /// Compute the norm of the state
    pub fn norm(&self) -> f64 {
        kernels::norm_sqr(&self.amplitudes, self.is_parallel()).sqrt()
    }

    /// Check if the state is normalized
    ///
    /// True if |Σ|aᵢ|² − 1| ≤ epsilon
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        let total = kernels::norm_sqr(&self.amplitudes, self.is_parallel());
        (total - 1.0).abs() <= epsilon
    }

    /// Fail with `NotNormalized` unless the state is normalized within `epsilon`
    pub fn check_normalization(&self, epsilon: f64) -> Result<()> {
        if self.is_normalized(epsilon) {
            Ok(())
        } else {
            Err(StateError::NotNormalized { norm: self.norm() })
        }
    }

    /// Get the probability of one basis state
    ///
    /// # Errors
    /// `InvalidDimension` if `basis_state` is out of range
    pub fn probability(&self, basis_state: usize) -> Result<f64> {
        self.amplitudes
            .get(basis_state)
            .map(|amp| amp.norm_sqr())
            .ok_or(StateError::InvalidDimension {
                dimension: basis_state,
            })
    }

    /// Probabilities for all computational basis states
    pub fn probabilities(&self) -> Vec<f64> {
        kernels::probabilities(&self.amplitudes, self.is_parallel())
    }

    /// Probability that `qubit` reads 1
    pub fn qubit_probability(&self, qubit: usize) -> Result<f64> {
        self.check_qubit(qubit)?;
        let mask = 1usize << qubit;
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(idx, _)| idx & mask != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum())
    }

    /// Amplitudes with magnitude strictly above `threshold`, in index order
    pub fn amplitudes_above(&self, threshold: f64) -> Vec<AmplitudeEntry> {
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(_, amp)| amp.norm() > threshold)
            .map(|(index, amp)| AmplitudeEntry {
                index,
                bitstring: format_bitstring(index, self.num_qubits),
                magnitude: amp.norm(),
                phase: amp.arg(),
            })
            .collect()
    }

    /// Compute the inner product with another state: ⟨self|other⟩
    ///
    /// # Errors
    /// Returns error if states have different dimensions
    pub fn inner_product(&self, other: &Statevector) -> Result<Complex64> {
        if self.dimension() != other.dimension() {
            return Err(StateError::DimensionMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }

        Ok(self
            .amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// |⟨self|other⟩|, between 0 and 1 for normalized states
    pub fn overlap(&self, other: &Statevector) -> Result<f64> {
        Ok(self.inner_product(other)?.norm())
    }

    /// Compute the fidelity with another state: |⟨self|other⟩|²
    pub fn fidelity(&self, other: &Statevector) -> Result<f64> {
        Ok(self.inner_product(other)?.norm_sqr())
    }

    /// Whether the states differ only by a global phase, within `epsilon`
    pub fn equivalent_up_to_global_phase(&self, other: &Statevector, epsilon: f64) -> Result<bool> {
        let overlap = self.overlap(other)?;
        let norms = self.norm() * other.norm();
        Ok((overlap - norms).abs() <= epsilon)
    }

    /// Reset the state to |0…0⟩
    pub fn reset(&mut self) {
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[0] = Complex64::new(1.0, 0.0);
    }
}

/// Equality over the quantum state only; the execution threshold is ignored
impl PartialEq for Statevector {
    fn eq(&self, other: &Self) -> bool {
        self.num_qubits == other.num_qubits && self.amplitudes == other.amplitudes
    }
}

impl fmt::Debug for Statevector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statevector")
            .field("num_qubits", &self.num_qubits)
            .field("dimension", &self.dimension())
            .field("norm", &self.norm())
            .finish()
    }
}

impl fmt::Display for Statevector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Statevector({} qubits)", self.num_qubits)?;
        for entry in self.amplitudes_above(1e-10) {
            writeln!(
                f,
                "  |{}⟩: {:.6} ∠ {:.4}",
                entry.bitstring, entry.magnitude, entry.phase
            )?;
        }
        Ok(())
    }
}

/// Render `index` as a `width`-character bitstring, most significant bit first
///
/// Bit 0 is the rightmost character.
///
/// ```
/// assert_eq!(kettle_state::format_bitstring(0b011, 3), "011");
/// assert_eq!(kettle_state::format_bitstring(1, 4), "0001");
/// ```
pub fn format_bitstring(index: usize, width: usize) -> String {
    format!("{:0width$b}", index, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

    fn hadamard() -> [[Complex64; 2]; 2] {
        let h = Complex64::new(INV_SQRT2, 0.0);
        [[h, h], [h, -h]]
    }

    fn pauli_x() -> [[Complex64; 2]; 2] {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        [[zero, one], [one, zero]]
    }

    fn bell() -> Statevector {
        let mut state = Statevector::new(2).unwrap();
        state.apply_single_qubit_gate(&hadamard(), 0).unwrap();
        state.apply_controlled_gate(&pauli_x(), 0, 1).unwrap();
        state
    }

    #[test]
    fn test_initial_state() {
        let state = Statevector::new(3).unwrap();
        assert_eq!(state.dimension(), 8);
        assert_eq!(state.amplitudes()[0], Complex64::new(1.0, 0.0));
        assert!(state.is_normalized(1e-12));
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(matches!(
            Statevector::new(0),
            Err(StateError::InvalidDimension { dimension: 1 })
        ));
        assert!(Statevector::new(MAX_STATE_QUBITS + 1).is_err());
        assert!(matches!(
            Statevector::from_amplitudes(vec![Complex64::new(1.0, 0.0); 3]),
            Err(StateError::InvalidDimension { dimension: 3 })
        ));
        assert!(Statevector::from_amplitudes(Vec::new()).is_err());
    }

    #[test]
    fn test_bell_amplitudes() {
        let state = bell();
        let entries = state.amplitudes_above(1e-10);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].bitstring, "00");
        assert_eq!(entries[1].bitstring, "11");
        for entry in &entries {
            assert_relative_eq!(entry.magnitude, INV_SQRT2, epsilon = 1e-10);
            assert_relative_eq!(entry.phase, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_cz_phase() {
        let mut state = Statevector::new(2).unwrap();
        state.apply_single_qubit_gate(&hadamard(), 0).unwrap();
        state.apply_single_qubit_gate(&hadamard(), 1).unwrap();
        state.apply_cz(0, 1).unwrap();

        assert_relative_eq!(state.amplitudes()[3].re, -0.5, epsilon = 1e-12);
        let entry = &state.amplitudes_above(1e-10)[3];
        assert_relative_eq!(entry.phase.abs(), std::f64::consts::PI, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_qubits() {
        let mut state = Statevector::new(2).unwrap();
        assert!(matches!(
            state.apply_single_qubit_gate(&hadamard(), 2),
            Err(StateError::InvalidQubitIndex { index: 2, num_qubits: 2 })
        ));
        assert!(matches!(
            state.apply_controlled_gate(&pauli_x(), 1, 1),
            Err(StateError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_normalization_check() {
        let state = Statevector::from_amplitudes(vec![
            Complex64::new(1.0, 0.0),
            Complex64::new(1.0, 0.0),
        ])
        .unwrap();
        assert!(!state.is_normalized(1e-6));
        assert!(matches!(
            state.check_normalization(1e-6),
            Err(StateError::NotNormalized { .. })
        ));
    }

    #[test]
    fn test_qubit_probability() {
        let state = bell();
        assert_relative_eq!(state.qubit_probability(0).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(state.qubit_probability(1).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_fidelity_and_global_phase() {
        let a = bell();
        let rotated = Statevector::from_amplitudes(
            a.amplitudes()
                .iter()
                .map(|amp| amp * Complex64::new(0.0, 1.0))
                .collect(),
        )
        .unwrap();

        assert_relative_eq!(a.fidelity(&rotated).unwrap(), 1.0, epsilon = 1e-12);
        assert!(a.equivalent_up_to_global_phase(&rotated, 1e-10).unwrap());

        let zero = Statevector::new(2).unwrap();
        assert_relative_eq!(a.fidelity(&zero).unwrap(), 0.5, epsilon = 1e-12);
        assert!(!a.equivalent_up_to_global_phase(&zero, 1e-10).unwrap());

        let small = Statevector::new(1).unwrap();
        assert!(matches!(
            a.inner_product(&small),
            Err(StateError::DimensionMismatch { expected: 4, actual: 2 })
        ));
    }

    #[test]
    fn test_reset() {
        let mut state = bell();
        state.reset();
        assert_eq!(state, Statevector::new(2).unwrap());
    }

    #[test]
    fn test_forced_parallel_matches() {
        let mut seq = Statevector::new(4).unwrap();
        let mut par = Statevector::new(4).unwrap().with_parallel_threshold(0);
        for s in [&mut seq, &mut par] {
            s.apply_single_qubit_gate(&hadamard(), 3).unwrap();
            s.apply_controlled_gate(&pauli_x(), 3, 0).unwrap();
            s.apply_cz(0, 2).unwrap();
        }
        assert_eq!(seq.amplitudes(), par.amplitudes());
        assert_eq!(seq, par);
    }

    #[test]
    fn test_equality_ignores_parallel_threshold() {
        let a = bell();
        let b = bell().with_parallel_threshold(0);
        let c = bell().with_parallel_threshold(usize::MAX);
        assert_eq!(a, b);
        assert_eq!(b, c);

        let mut flipped = bell().with_parallel_threshold(0);
        flipped.apply_single_qubit_gate(&pauli_x(), 0).unwrap();
        assert_ne!(a, flipped);
        assert_ne!(Statevector::new(1).unwrap(), Statevector::new(2).unwrap());
    }

    #[test]
    fn test_format_bitstring() {
        assert_eq!(format_bitstring(5, 3), "101");
        assert_eq!(format_bitstring(1, 3), "001");
        assert_eq!(format_bitstring(0, 2), "00");
    }
}
