//! Circuit builder with construction-time validation

use crate::circuit::{Measurement, MAX_QUBITS};
use crate::{Circuit, ClbitId, GateKind, GateOp, QuantumError, QubitId, Result};
use smallvec::SmallVec;

/// Builder for quantum circuits with runtime-determined register sizes
///
/// Every call validates its arguments immediately, so an invalid qubit
/// index or gate name fails here rather than at simulation time.
///
/// # Measurement
///
/// Measurement is defined only at the end of the instruction sequence.
/// Once [`add_measurement`](Self::add_measurement) or
/// [`measure_all`](Self::measure_all) has been called, further gates are
/// rejected: mid-circuit collapse and classically conditioned gates are
/// not supported.
///
/// # Example
/// ```
/// use kettle_core::{CircuitBuilder, GateKind};
///
/// let mut builder = CircuitBuilder::new(3, 3).unwrap();
/// builder
///     .add_gate(GateKind::H, &[0], None).unwrap()
///     .add_gate(GateKind::CX, &[0, 1], None).unwrap()
///     .add_gate(GateKind::CX, &[0, 2], None).unwrap()
///     .add_measurement(&[(0, 0), (1, 1), (2, 2)]).unwrap();
///
/// let circuit = builder.build();
/// assert_eq!(circuit.len(), 3);
/// assert_eq!(circuit.measurements().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Create a builder for `num_qubits` qubits and `num_clbits` classical bits
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `num_qubits` is 0 or exceeds [`MAX_QUBITS`].
    pub fn new(num_qubits: usize, num_clbits: usize) -> Result<Self> {
        Self::with_capacity(num_qubits, num_clbits, 0)
    }

    /// Create a builder with pre-allocated capacity for operations
    pub fn with_capacity(num_qubits: usize, num_clbits: usize, capacity: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(QuantumError::invalid_parameter(
                "circuit must have at least one qubit",
            ));
        }
        if num_qubits > MAX_QUBITS {
            return Err(QuantumError::invalid_parameter(format!(
                "circuit has {} qubits, at most {} are supported",
                num_qubits, MAX_QUBITS
            )));
        }
        Ok(Self {
            circuit: Circuit::with_capacity(num_qubits, num_clbits, capacity),
        })
    }

    /// Resume building from an existing circuit
    ///
    /// The circuit's measurement map is kept, so a measured circuit still
    /// rejects further gates.
    pub fn from_circuit(circuit: Circuit) -> Self {
        Self { circuit }
    }

    /// Number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }

    /// Number of classical bits
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.circuit.num_clbits()
    }

    /// Number of gate operations recorded so far
    #[inline]
    pub fn num_operations(&self) -> usize {
        self.circuit.len()
    }

    /// Check if no gate has been recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.circuit.is_empty()
    }

    /// Append a gate
    ///
    /// # Errors
    /// - `InvalidParameter` if the circuit has already been measured, or the
    ///   angle is missing, superfluous or not finite
    /// - `InvalidQubitIndex` if any qubit is outside the register
    /// - `InvalidQubitCount` / `DuplicateQubit` for malformed qubit lists
    pub fn add_gate(
        &mut self,
        kind: GateKind,
        qubits: &[usize],
        angle: Option<f64>,
    ) -> Result<&mut Self> {
        if self.circuit.has_measurements() {
            return Err(QuantumError::invalid_parameter(format!(
                "cannot add {} after measurement: mid-circuit measurement is not supported",
                kind
            )));
        }

        let num_qubits = self.num_qubits();
        if let Some(&bad) = qubits.iter().find(|&&q| q >= num_qubits) {
            return Err(QuantumError::invalid_qubit(bad, num_qubits));
        }

        let qubit_ids: SmallVec<[QubitId; 2]> = qubits.iter().map(|&q| QubitId::new(q)).collect();
        let op = GateOp::new(kind, &qubit_ids, angle)?;
        self.circuit.push_operation(op);
        Ok(self)
    }

    /// Append a gate by name (`"h"`, `"cx"`, `"cnot"`, `"cry"`, ...)
    ///
    /// # Errors
    /// `InvalidGate` for unknown names, otherwise as [`add_gate`](Self::add_gate).
    pub fn add_gate_named(
        &mut self,
        name: &str,
        qubits: &[usize],
        angle: Option<f64>,
    ) -> Result<&mut Self> {
        let kind: GateKind = name.parse()?;
        self.add_gate(kind, qubits, angle)
    }

    /// Append an existing gate operation
    pub fn add_op(&mut self, op: &GateOp) -> Result<&mut Self> {
        let qubits: SmallVec<[usize; 2]> = op.qubits().iter().map(QubitId::index).collect();
        self.add_gate(op.kind(), &qubits, op.angle())
    }

    /// Append every gate of another circuit
    ///
    /// The other circuit's measurements are ignored.
    pub fn append(&mut self, other: &Circuit) -> Result<&mut Self> {
        for op in other.operations() {
            self.add_op(op)?;
        }
        Ok(self)
    }

    /// Hadamard on `qubit`
    pub fn h(&mut self, qubit: usize) -> Result<&mut Self> {
        self.add_gate(GateKind::H, &[qubit], None)
    }

    /// Hadamard on every qubit in `qubits`
    pub fn h_on(&mut self, qubits: &[usize]) -> Result<&mut Self> {
        for &q in qubits {
            self.h(q)?;
        }
        Ok(self)
    }

    /// Hadamard on every qubit of the register
    pub fn h_all(&mut self) -> Result<&mut Self> {
        for q in 0..self.num_qubits() {
            self.h(q)?;
        }
        Ok(self)
    }

    /// Pauli-X on `qubit`
    pub fn x(&mut self, qubit: usize) -> Result<&mut Self> {
        self.add_gate(GateKind::X, &[qubit], None)
    }

    /// Pauli-Z on `qubit`
    pub fn z(&mut self, qubit: usize) -> Result<&mut Self> {
        self.add_gate(GateKind::Z, &[qubit], None)
    }

    /// CNOT with `control` and `target`
    pub fn cx(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.add_gate(GateKind::CX, &[control, target], None)
    }

    /// Controlled-Z between `a` and `b`
    pub fn cz(&mut self, a: usize, b: usize) -> Result<&mut Self> {
        self.add_gate(GateKind::CZ, &[a, b], None)
    }

    /// Controlled-Hadamard with `control` and `target`
    pub fn ch(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.add_gate(GateKind::CH, &[control, target], None)
    }

    /// RY(theta) on `qubit`
    pub fn ry(&mut self, theta: f64, qubit: usize) -> Result<&mut Self> {
        self.add_gate(GateKind::RY, &[qubit], Some(theta))
    }

    /// Controlled RY(theta) with `control` and `target`
    pub fn cry(&mut self, theta: f64, control: usize, target: usize) -> Result<&mut Self> {
        self.add_gate(GateKind::CRY, &[control, target], Some(theta))
    }

    /// Measure qubits into classical bits at the end of the circuit
    ///
    /// Each pair is `(qubit, clbit)`. Measuring into a classical bit that
    /// already holds a measurement replaces it.
    ///
    /// # Errors
    /// `InvalidQubitIndex` / `InvalidClbitIndex` for out-of-range indices.
    /// Nothing is recorded if any pair is invalid.
    pub fn add_measurement(&mut self, qubit_to_clbit: &[(usize, usize)]) -> Result<&mut Self> {
        let num_qubits = self.num_qubits();
        let num_clbits = self.num_clbits();

        for &(qubit, clbit) in qubit_to_clbit {
            if qubit >= num_qubits {
                return Err(QuantumError::invalid_qubit(qubit, num_qubits));
            }
            if clbit >= num_clbits {
                return Err(QuantumError::InvalidClbitIndex {
                    index: clbit,
                    num_clbits,
                });
            }
        }

        for &(qubit, clbit) in qubit_to_clbit {
            self.circuit.push_measurement(Measurement {
                qubit: QubitId::new(qubit),
                clbit: ClbitId::new(clbit),
            });
        }
        Ok(self)
    }

    /// Measure qubit `i` into classical bit `i` for every qubit
    ///
    /// A circuit without classical bits gets a register of `num_qubits` bits.
    ///
    /// # Errors
    /// `InvalidParameter` if a non-empty classical register is smaller than
    /// the quantum register.
    pub fn measure_all(&mut self) -> Result<&mut Self> {
        let num_qubits = self.num_qubits();
        if self.num_clbits() == 0 {
            self.circuit.set_num_clbits(num_qubits);
        } else if self.num_clbits() < num_qubits {
            return Err(QuantumError::invalid_parameter(format!(
                "measure_all needs {} classical bits, circuit has {}",
                num_qubits,
                self.num_clbits()
            )));
        }

        let pairs: Vec<(usize, usize)> = (0..num_qubits).map(|q| (q, q)).collect();
        self.add_measurement(&pairs)
    }

    /// Validate the circuit built so far
    #[inline]
    pub fn validate(&self) -> Result<()> {
        self.circuit.validate()
    }

    /// Build the final circuit, consuming the builder
    #[inline]
    pub fn build(self) -> Circuit {
        self.circuit
    }
}
