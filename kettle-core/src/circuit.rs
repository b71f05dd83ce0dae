//! Quantum circuit representation

use crate::{ClbitId, GateKind, GateOp, QuantumError, QubitId, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Largest register the workspace will simulate (2^30 amplitudes, 16 GiB)
pub const MAX_QUBITS: usize = 30;

/// End-of-circuit measurement of one qubit into one classical bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    /// Measured qubit
    pub qubit: QubitId,
    /// Classical bit receiving the outcome
    pub clbit: ClbitId,
}

/// A quantum circuit
///
/// An ordered sequence of gate operations over `num_qubits` qubits followed
/// by an optional measurement map into `num_clbits` classical bits.
/// Measurements always happen after the last gate; there is no mid-circuit
/// collapse. Circuits are produced by
/// [`CircuitBuilder`](crate::CircuitBuilder) and are read-only afterwards.
///
/// # Example
/// ```
/// use kettle_core::CircuitBuilder;
///
/// let mut builder = CircuitBuilder::new(2, 2).unwrap();
/// builder.h(0).unwrap().cx(0, 1).unwrap().measure_all().unwrap();
/// let circuit = builder.build();
///
/// assert_eq!(circuit.num_qubits(), 2);
/// assert_eq!(circuit.len(), 2);
/// assert!(circuit.has_measurements());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    num_clbits: usize,
    operations: Vec<GateOp>,
    measurements: Vec<Measurement>,
}

impl Circuit {
    pub(crate) fn with_capacity(num_qubits: usize, num_clbits: usize, capacity: usize) -> Self {
        Self {
            num_qubits,
            num_clbits,
            operations: Vec::with_capacity(capacity),
            measurements: Vec::new(),
        }
    }

    /// Number of qubits
    #[inline]
    pub const fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of classical bits
    #[inline]
    pub const fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Number of gate operations
    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the circuit has no gate operations
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Iterate over the gate operations in application order
    pub fn operations(&self) -> impl Iterator<Item = &GateOp> {
        self.operations.iter()
    }

    /// Gate operations as a slice
    #[inline]
    pub fn as_slice(&self) -> &[GateOp] {
        &self.operations
    }

    /// Get a specific operation by index
    pub fn get_operation(&self, index: usize) -> Option<&GateOp> {
        self.operations.get(index)
    }

    /// End-of-circuit measurement map
    #[inline]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Whether any qubit is measured
    #[inline]
    pub fn has_measurements(&self) -> bool {
        !self.measurements.is_empty()
    }

    /// Copy of this circuit with the measurement map removed
    pub fn without_measurements(&self) -> Self {
        Self {
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            operations: self.operations.clone(),
            measurements: Vec::new(),
        }
    }

    /// Circuit depth: the number of layers when every gate is scheduled
    /// as early as the gates before it on the same qubits allow
    pub fn depth(&self) -> usize {
        let mut layer = vec![0usize; self.num_qubits];
        let mut depth = 0;

        for op in &self.operations {
            let start = op
                .qubits()
                .iter()
                .map(|q| layer[q.index()])
                .max()
                .unwrap_or(0);
            for q in op.qubits() {
                layer[q.index()] = start + 1;
            }
            depth = depth.max(start + 1);
        }

        depth
    }

    /// Number of operations of each gate kind
    pub fn gate_counts(&self) -> BTreeMap<GateKind, usize> {
        let mut counts = BTreeMap::new();
        for op in &self.operations {
            *counts.entry(op.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Validate the circuit
    ///
    /// Checks that all operations and measurements are in range. Circuits
    /// produced by the builder always pass.
    pub fn validate(&self) -> Result<()> {
        for op in &self.operations {
            for &qubit in op.qubits() {
                if qubit.index() >= self.num_qubits {
                    return Err(QuantumError::invalid_qubit(qubit.index(), self.num_qubits));
                }
            }
        }
        for m in &self.measurements {
            if m.qubit.index() >= self.num_qubits {
                return Err(QuantumError::invalid_qubit(m.qubit.index(), self.num_qubits));
            }
            if m.clbit.index() >= self.num_clbits {
                return Err(QuantumError::InvalidClbitIndex {
                    index: m.clbit.index(),
                    num_clbits: self.num_clbits,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn push_operation(&mut self, op: GateOp) {
        self.operations.push(op);
    }

    pub(crate) fn set_num_clbits(&mut self, num_clbits: usize) {
        self.num_clbits = num_clbits;
    }

    /// Record a measurement, replacing any earlier one into the same clbit
    pub(crate) fn push_measurement(&mut self, measurement: Measurement) {
        self.measurements.retain(|m| m.clbit != measurement.clbit);
        self.measurements.push(measurement);
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit({} qubits, {} clbits, {} operations)",
            self.num_qubits,
            self.num_clbits,
            self.len()
        )?;
        for (i, op) in self.operations.iter().enumerate() {
            writeln!(f, "  {}: {}", i, op)?;
        }
        for m in &self.measurements {
            writeln!(f, "  measure {} -> {}", m.qubit, m.clbit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::CircuitBuilder;

    #[test]
    fn test_empty_circuit() {
        let circuit = CircuitBuilder::new(3, 0).unwrap().build();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 0);
        assert!(circuit.is_empty());
        assert_eq!(circuit.depth(), 0);
        assert!(circuit.validate().is_ok());
    }

    #[test]
    fn test_depth_layers_parallel_gates() {
        let mut builder = CircuitBuilder::new(3, 0).unwrap();
        builder.h(0).unwrap().h(1).unwrap().h(2).unwrap();
        assert_eq!(builder.build().depth(), 1);

        let mut builder = CircuitBuilder::new(3, 0).unwrap();
        builder.h(0).unwrap().cx(0, 1).unwrap().cx(0, 2).unwrap().h(1).unwrap();
        // h(1) can run alongside cx(0, 2)
        assert_eq!(builder.build().depth(), 3);
    }

    #[test]
    fn test_gate_counts() {
        let mut builder = CircuitBuilder::new(2, 0).unwrap();
        builder.h(0).unwrap().h(1).unwrap().cz(0, 1).unwrap();
        let counts = builder.build().gate_counts();

        assert_eq!(counts.get(&crate::GateKind::H), Some(&2));
        assert_eq!(counts.get(&crate::GateKind::CZ), Some(&1));
        assert_eq!(counts.get(&crate::GateKind::X), None);
    }

    #[test]
    fn test_without_measurements() {
        let mut builder = CircuitBuilder::new(2, 2).unwrap();
        builder.h(0).unwrap().measure_all().unwrap();
        let circuit = builder.build();
        assert!(circuit.has_measurements());

        let stripped = circuit.without_measurements();
        assert!(!stripped.has_measurements());
        assert_eq!(stripped.len(), circuit.len());
        assert_eq!(stripped.num_clbits(), 2);
    }

    #[test]
    fn test_display() {
        let mut builder = CircuitBuilder::new(2, 2).unwrap();
        builder.h(0).unwrap().add_measurement(&[(0, 1)]).unwrap();
        let display = builder.build().to_string();

        assert!(display.contains("2 qubits"));
        assert!(display.contains("1 operations"));
        assert!(display.contains("H q0"));
        assert!(display.contains("measure q0 -> c1"));
    }
}
