//! Simulation result types

use kettle_state::{AmplitudeEntry, Counts, Statevector};

use crate::statistics::ExecutionStatistics;

/// Result of a quantum circuit simulation
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Final quantum state after all gates have been applied
    pub state: Statevector,

    /// Measurement counts (if the circuit was sampled)
    pub measurements: Option<Counts>,

    /// Execution statistics (if statistics collection was enabled)
    pub statistics: Option<ExecutionStatistics>,
}

impl SimulationResult {
    /// Create a new simulation result
    pub fn new(state: Statevector) -> Self {
        Self {
            state,
            measurements: None,
            statistics: None,
        }
    }

    /// Add measurement counts to the result
    pub fn with_measurements(mut self, counts: Counts) -> Self {
        self.measurements = Some(counts);
        self
    }

    /// Add execution statistics to the result
    pub fn with_statistics(mut self, stats: ExecutionStatistics) -> Self {
        self.statistics = Some(stats);
        self
    }

    /// Get the number of qubits in the final state
    pub fn num_qubits(&self) -> usize {
        self.state.num_qubits()
    }

    /// Get the total number of measurement shots (if the circuit was sampled)
    pub fn total_shots(&self) -> Option<usize> {
        self.measurements.as_ref().map(|m| m.shots())
    }

    /// Final probabilities for every basis state
    pub fn probabilities(&self) -> Vec<f64> {
        self.state.probabilities()
    }

    /// Final amplitudes with magnitude above `threshold`
    pub fn amplitudes(&self, threshold: f64) -> Vec<AmplitudeEntry> {
        self.state.amplitudes_above(threshold)
    }
}
