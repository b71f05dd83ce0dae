//! Core simulator implementation

use kettle_core::Circuit;
use kettle_state::{AmplitudeEntry, ClassicalMapping, Counts, Sampler, Statevector};
use std::time::Instant;
use tracing::debug;

use crate::{
    config::SimulatorConfig,
    engine::StatevectorEngine,
    error::{Result, SimulatorError},
    result::SimulationResult,
    statistics::ExecutionStatistics,
};

/// Statevector quantum circuit simulator
///
/// Runs a circuit against |0…0⟩, samples the final state and reports
/// amplitudes. Results are plain data; nothing is printed.
///
/// # Example
///
/// ```
/// use kettle_sim::{factories, CircuitBuilder, Simulator};
///
/// let simulator = Simulator::default();
/// let mut builder = CircuitBuilder::from_circuit(factories::ghz_state(3).unwrap());
/// builder.measure_all().unwrap();
/// let circuit = builder.build();
///
/// let result = simulator.execute(&circuit, 1000, 42).unwrap();
/// let counts = result.measurements.unwrap();
/// assert_eq!(counts.get("000") + counts.get("111"), 1000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a new simulator with the given configuration
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration fails validation.
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate().map_err(SimulatorError::InvalidConfig)?;
        Ok(Self { config })
    }

    /// Get the simulator configuration
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run a quantum circuit simulation
    ///
    /// Initializes |0…0⟩, applies every gate in order and returns the final
    /// state. Measurements in the circuit are not sampled here; see
    /// [`execute`](Self::execute).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The circuit is invalid
    /// - The register exceeds `max_qubits`
    /// - A gate fails or normalization is lost
    pub fn run(&self, circuit: &Circuit) -> Result<SimulationResult> {
        let total_start = Instant::now();
        circuit.validate()?;

        let num_qubits = circuit.num_qubits();
        debug!(num_qubits, gates = circuit.len(), "starting simulation");

        let init_start = Instant::now();
        let mut engine = StatevectorEngine::new(num_qubits, &self.config)?;
        let init_time = init_start.elapsed();

        let gate_start = Instant::now();
        engine.apply_all(circuit)?;
        let gate_time = gate_start.elapsed();

        let stats = if self.config.collect_statistics {
            Some(ExecutionStatistics {
                initialization_time: init_time,
                gate_application_time: gate_time,
                gates_executed: engine.gates_applied(),
                normalization_checks: engine.normalization_checks(),
                max_norm_deviation: engine.max_norm_deviation(),
                memory_bytes: engine.memory_bytes(),
                total_time: total_start.elapsed(),
            })
        } else {
            None
        };

        debug!(
            gates = engine.gates_applied(),
            elapsed = ?total_start.elapsed(),
            "simulation finished"
        );

        let mut result = SimulationResult::new(engine.into_statevector());
        if let Some(s) = stats {
            result = result.with_statistics(s);
        }
        Ok(result)
    }

    fn sampler(&self) -> Sampler {
        Sampler::new()
            .with_strategy(self.config.sampling_strategy)
            .with_parallel(self.config.parallel_sampling)
            .with_chunk_size(self.config.sampling_chunk_size)
    }

    /// Sample every qubit of `state`, keyed by the full-register bitstring
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for zero shots, `NotNormalized` for a state whose
    /// probabilities do not sum to 1.
    pub fn sample(&self, state: &Statevector, shots: usize, seed: u64) -> Result<Counts> {
        debug!(shots, seed, "sampling full register");
        Ok(self.sampler().sample_statevector(state, shots, seed)?)
    }

    /// Sample `state` through the measurement map of `circuit`
    ///
    /// Keys are the circuit's classical register, MSB first. Classical bits
    /// no measurement writes to read `0`.
    pub fn sample_measured(
        &self,
        state: &Statevector,
        circuit: &Circuit,
        shots: usize,
        seed: u64,
    ) -> Result<Counts> {
        let pairs = circuit
            .measurements()
            .iter()
            .map(|m| (m.qubit.index(), m.clbit.index()))
            .collect();
        let mapping = ClassicalMapping::new(circuit.num_clbits(), pairs)?;

        debug!(shots, seed, clbits = mapping.num_clbits(), "sampling measured qubits");
        Ok(self
            .sampler()
            .sample_mapped(&state.probabilities(), shots, seed, &mapping)?)
    }

    /// Run `circuit` and sample its measurement map
    ///
    /// # Errors
    ///
    /// `NoMeasurements` if the circuit measures nothing, otherwise any error
    /// from [`run`](Self::run) or [`sample_measured`](Self::sample_measured).
    pub fn execute(&self, circuit: &Circuit, shots: usize, seed: u64) -> Result<SimulationResult> {
        if !circuit.has_measurements() {
            return Err(SimulatorError::NoMeasurements);
        }
        let result = self.run(circuit)?;
        let counts = self.sample_measured(&result.state, circuit, shots, seed)?;
        Ok(result.with_measurements(counts))
    }

    /// Amplitudes of `state` with magnitude strictly above `threshold`
    pub fn amplitudes(&self, state: &Statevector, threshold: f64) -> Vec<AmplitudeEntry> {
        state.amplitudes_above(threshold)
    }

    /// Amplitudes above the configured reporting threshold
    pub fn significant_amplitudes(&self, state: &Statevector) -> Vec<AmplitudeEntry> {
        self.amplitudes(state, self.config.amplitude_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kettle_core::CircuitBuilder;

    #[test]
    fn test_default_simulator_uses_default_config() {
        let simulator = Simulator::default();
        let defaults = SimulatorConfig::default();
        let config = simulator.config();
        assert_eq!(config.normalization_check, defaults.normalization_check);
        assert_eq!(config.parallel_threshold, defaults.parallel_threshold);
        assert_eq!(config.max_qubits, defaults.max_qubits);
        assert_eq!(config.sampling_strategy, defaults.sampling_strategy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulatorConfig::default().with_sampling_chunk_size(0);
        assert!(matches!(
            Simulator::new(config),
            Err(SimulatorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_without_statistics() {
        let mut builder = CircuitBuilder::new(1, 0).unwrap();
        builder.x(0).unwrap();
        let result = Simulator::default().run(&builder.build()).unwrap();
        assert!(result.statistics.is_none());
        assert_eq!(result.probabilities(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_run_with_statistics() {
        let simulator = Simulator::new(SimulatorConfig::default().with_statistics(true)).unwrap();
        let mut builder = CircuitBuilder::new(3, 0).unwrap();
        builder.h_all().unwrap().cx(0, 1).unwrap();
        let result = simulator.run(&builder.build()).unwrap();

        let stats = result.statistics.unwrap();
        assert_eq!(stats.gates_executed, 4);
        assert_eq!(stats.normalization_checks, 4);
        assert_eq!(stats.memory_bytes, 8 * 16);
    }

    #[test]
    fn test_execute_requires_measurements() {
        let mut builder = CircuitBuilder::new(2, 0).unwrap();
        builder.h(0).unwrap();
        assert!(matches!(
            Simulator::default().execute(&builder.build(), 10, 1),
            Err(SimulatorError::NoMeasurements)
        ));
    }

    #[test]
    fn test_sample_measured_subset() {
        // measure only qubit 1 into a one-bit register
        let mut builder = CircuitBuilder::new(2, 1).unwrap();
        builder.x(1).unwrap().add_measurement(&[(1, 0)]).unwrap();
        let circuit = builder.build();

        let result = Simulator::default().execute(&circuit, 100, 3).unwrap();
        let counts = result.measurements.unwrap();
        assert_eq!(counts.get("1"), 100);
        assert_eq!(counts.num_outcomes(), 1);
    }

    #[test]
    fn test_significant_amplitudes() {
        let simulator = Simulator::default();
        let state = Statevector::new(2).unwrap();
        let entries = simulator.significant_amplitudes(&state);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].bitstring, "00");
    }
}
