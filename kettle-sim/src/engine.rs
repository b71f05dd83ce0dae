//! Gate-by-gate statevector execution
//!
//! The engine owns one [`Statevector`] and replays gate operations against
//! it in circuit order. Each gate is resolved through
//! [`kettle_gates::action`] and handed to the in-place kernels; nothing
//! larger than a 2×2 matrix is ever built. Normalization is verified
//! according to the configured [`NormalizationCheck`] policy.

use kettle_core::{Circuit, GateOp};
use kettle_gates::GateAction;
use kettle_state::{AmplitudeEntry, StateError, Statevector};
use num_complex::Complex64;
use tracing::{trace, warn};

use crate::config::{NormalizationCheck, SimulatorConfig};
use crate::error::{Result, SimulatorError};

/// Statevector execution engine
#[derive(Debug, Clone)]
pub struct StatevectorEngine {
    state: Statevector,
    tolerance: f64,
    check: NormalizationCheck,
    max_qubits: usize,
    parallel_threshold: usize,
    gates_applied: usize,
    last_checked: Option<usize>,
    normalization_checks: usize,
    max_norm_deviation: f64,
}

impl StatevectorEngine {
    /// Create an engine holding |0…0⟩ on `num_qubits` qubits
    ///
    /// # Errors
    /// `TooManyQubits` above `config.max_qubits`, `InvalidDimension` for an
    /// empty register.
    pub fn new(num_qubits: usize, config: &SimulatorConfig) -> Result<Self> {
        let state = Self::allocate(num_qubits, config.max_qubits, config.parallel_threshold)?;
        Ok(Self::with_state(state, config))
    }

    /// Create an engine that continues from an existing state
    pub fn from_statevector(state: Statevector, config: &SimulatorConfig) -> Result<Self> {
        if state.num_qubits() > config.max_qubits {
            return Err(SimulatorError::TooManyQubits {
                num_qubits: state.num_qubits(),
                max_qubits: config.max_qubits,
            });
        }
        let state = state.with_parallel_threshold(config.parallel_threshold);
        Ok(Self::with_state(state, config))
    }

    fn with_state(state: Statevector, config: &SimulatorConfig) -> Self {
        Self {
            state,
            tolerance: config.normalization_tolerance,
            check: config.normalization_check,
            max_qubits: config.max_qubits,
            parallel_threshold: config.parallel_threshold,
            gates_applied: 0,
            last_checked: None,
            normalization_checks: 0,
            max_norm_deviation: 0.0,
        }
    }

    fn allocate(num_qubits: usize, max_qubits: usize, parallel_threshold: usize) -> Result<Statevector> {
        if num_qubits > max_qubits {
            return Err(SimulatorError::TooManyQubits {
                num_qubits,
                max_qubits,
            });
        }
        Ok(Statevector::new(num_qubits)?.with_parallel_threshold(parallel_threshold))
    }

    /// Replace the state with |0…0⟩ on `num_qubits` qubits and clear counters
    pub fn initialize(&mut self, num_qubits: usize) -> Result<()> {
        if num_qubits == self.state.num_qubits() {
            self.state.reset();
        } else {
            self.state = Self::allocate(num_qubits, self.max_qubits, self.parallel_threshold)?;
        }
        self.clear_counters();
        Ok(())
    }

    /// Reset to |0…0⟩ keeping the register width
    pub fn reset(&mut self) {
        self.state.reset();
        self.clear_counters();
    }

    fn clear_counters(&mut self) {
        self.gates_applied = 0;
        self.last_checked = None;
        self.normalization_checks = 0;
        self.max_norm_deviation = 0.0;
    }

    /// Get the number of qubits
    pub fn num_qubits(&self) -> usize {
        self.state.num_qubits()
    }

    /// Apply one gate operation in place
    ///
    /// # Errors
    /// - `State(InvalidQubitIndex)` if the gate touches a qubit outside the
    ///   register
    /// - `Circuit(_)` if the operation cannot be resolved to a kernel
    /// - `Normalization` if a scheduled check finds drift beyond tolerance
    pub fn apply(&mut self, op: &GateOp) -> Result<()> {
        let num_qubits = self.state.num_qubits();
        if let Some(q) = op.qubits().iter().find(|q| q.index() >= num_qubits) {
            return Err(StateError::InvalidQubitIndex {
                index: q.index(),
                num_qubits,
            }
            .into());
        }

        trace!(gate = self.gates_applied, op = %op, "applying gate");

        match kettle_gates::action(op)? {
            GateAction::Single { matrix, target } => {
                self.state.apply_single_qubit_gate(&matrix, target.index())?
            }
            GateAction::Controlled {
                matrix,
                control,
                target,
            } => self
                .state
                .apply_controlled_gate(&matrix, control.index(), target.index())?,
            GateAction::PhaseFlip { a, b } => self.state.apply_cz(a.index(), b.index())?,
        }
        self.gates_applied += 1;

        let due = match self.check {
            NormalizationCheck::EveryGate => true,
            NormalizationCheck::Batched(k) => k > 0 && self.gates_applied % k == 0,
            NormalizationCheck::Final => false,
        };
        if due {
            self.check_normalization()?;
        }
        Ok(())
    }

    /// Apply every gate of `circuit` in order, then run the closing check
    ///
    /// The first failing gate aborts the run; gates before it stay applied.
    pub fn apply_all(&mut self, circuit: &Circuit) -> Result<()> {
        for op in circuit.operations() {
            self.apply(op)?;
        }
        if self.last_checked != Some(self.gates_applied) {
            self.check_normalization()?;
        }
        Ok(())
    }

    /// Verify |Σ|aᵢ|² − 1| against the tolerance
    pub fn check_normalization(&mut self) -> Result<()> {
        let norm = self.state.norm();
        let deviation = (norm * norm - 1.0).abs();

        self.normalization_checks += 1;
        self.last_checked = Some(self.gates_applied);
        if deviation > self.max_norm_deviation {
            self.max_norm_deviation = deviation;
        }

        let gate_index = self.gates_applied.checked_sub(1);
        if deviation > self.tolerance {
            return Err(SimulatorError::Normalization {
                gate_index,
                norm,
                tolerance: self.tolerance,
            });
        }
        if deviation > self.tolerance / 2.0 {
            warn!(
                ?gate_index,
                deviation,
                tolerance = self.tolerance,
                "normalization drift approaching tolerance"
            );
        }
        Ok(())
    }

    /// Probabilities for every basis state
    pub fn probabilities(&self) -> Vec<f64> {
        self.state.probabilities()
    }

    /// Amplitudes with magnitude strictly above `threshold`
    pub fn amplitudes(&self, threshold: f64) -> Vec<AmplitudeEntry> {
        self.state.amplitudes_above(threshold)
    }

    /// Borrow the current state
    pub fn statevector(&self) -> &Statevector {
        &self.state
    }

    /// Take the final state
    pub fn into_statevector(self) -> Statevector {
        self.state
    }

    /// Gates applied since the last initialization
    pub fn gates_applied(&self) -> usize {
        self.gates_applied
    }

    /// Normalization checks performed since the last initialization
    pub fn normalization_checks(&self) -> usize {
        self.normalization_checks
    }

    /// Largest deviation seen by any check
    pub fn max_norm_deviation(&self) -> f64 {
        self.max_norm_deviation
    }

    /// Bytes held by the amplitude vector
    pub fn memory_bytes(&self) -> usize {
        self.state.dimension() * std::mem::size_of::<Complex64>()
    }
}
