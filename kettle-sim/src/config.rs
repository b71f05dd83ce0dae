//! Simulator configuration

use kettle_core::MAX_QUBITS;
use kettle_state::measurement::DEFAULT_CHUNK_SIZE;
use kettle_state::statevector::DEFAULT_PARALLEL_THRESHOLD;
use kettle_state::SamplingStrategy;

/// When the engine verifies that the state is still normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizationCheck {
    /// After every gate
    #[default]
    EveryGate,
    /// After every `k` gates and once at the end
    Batched(usize),
    /// Once, after the last gate
    Final,
}

/// Configuration for the quantum simulator
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Minimum number of qubits to enable parallel kernels
    ///
    /// Smaller registers run single-threaded to avoid synchronization
    /// overhead.
    ///
    /// Default: 16
    pub parallel_threshold: usize,

    /// Maximum accepted |Σ|aᵢ|² − 1|
    ///
    /// Default: 1e-6
    pub normalization_tolerance: f64,

    /// How often normalization is verified
    ///
    /// Default: every gate
    pub normalization_check: NormalizationCheck,

    /// Magnitude below which amplitudes are omitted from reports
    ///
    /// Default: 1e-10
    pub amplitude_threshold: f64,

    /// Algorithm used when sampling shots
    ///
    /// Default: inverse transform
    pub sampling_strategy: SamplingStrategy,

    /// Sample shot chunks on rayon workers
    ///
    /// Counts are identical either way for a given seed.
    ///
    /// Default: true
    pub parallel_sampling: bool,

    /// Shots drawn from each random stream
    ///
    /// Default: 4096
    pub sampling_chunk_size: usize,

    /// Largest register the simulator accepts
    ///
    /// Default: 30 (16 GiB of amplitudes)
    pub max_qubits: usize,

    /// Enable execution statistics collection
    ///
    /// Default: false
    pub collect_statistics: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            normalization_tolerance: 1e-6,
            normalization_check: NormalizationCheck::EveryGate,
            amplitude_threshold: 1e-10,
            sampling_strategy: SamplingStrategy::InverseTransform,
            parallel_sampling: true,
            sampling_chunk_size: DEFAULT_CHUNK_SIZE,
            max_qubits: MAX_QUBITS,
            collect_statistics: false,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration optimized for speed
    ///
    /// - Normalization checked once at the end
    /// - Alias sampling
    /// - Lower parallel threshold
    pub fn fast() -> Self {
        Self {
            normalization_check: NormalizationCheck::Final,
            sampling_strategy: SamplingStrategy::Alias,
            parallel_threshold: 12,
            ..Default::default()
        }
    }

    /// Create a configuration optimized for accuracy
    ///
    /// - Normalization checked after every gate with a tight tolerance
    /// - Statistics collection enabled
    pub fn accurate() -> Self {
        Self {
            normalization_check: NormalizationCheck::EveryGate,
            normalization_tolerance: 1e-10,
            collect_statistics: true,
            ..Default::default()
        }
    }

    /// Create a configuration for debugging
    ///
    /// - Single-threaded kernels and sampling
    /// - Normalization checked after every gate
    /// - Statistics collection
    pub fn debug() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            parallel_sampling: false,
            normalization_check: NormalizationCheck::EveryGate,
            collect_statistics: true,
            ..Default::default()
        }
    }

    /// Set the parallel kernel threshold
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Set the normalization tolerance
    pub fn with_normalization_tolerance(mut self, tolerance: f64) -> Self {
        self.normalization_tolerance = tolerance;
        self
    }

    /// Set the normalization check policy
    pub fn with_normalization_check(mut self, check: NormalizationCheck) -> Self {
        self.normalization_check = check;
        self
    }

    /// Set the amplitude reporting threshold
    pub fn with_amplitude_threshold(mut self, threshold: f64) -> Self {
        self.amplitude_threshold = threshold;
        self
    }

    /// Set the sampling strategy
    pub fn with_sampling_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.sampling_strategy = strategy;
        self
    }

    /// Enable or disable parallel sampling
    pub fn with_parallel_sampling(mut self, enabled: bool) -> Self {
        self.parallel_sampling = enabled;
        self
    }

    /// Set the number of shots per random stream
    pub fn with_sampling_chunk_size(mut self, chunk_size: usize) -> Self {
        self.sampling_chunk_size = chunk_size;
        self
    }

    /// Set the largest accepted register
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Enable statistics collection
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.collect_statistics = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.normalization_tolerance.is_finite() && self.normalization_tolerance > 0.0) {
            return Err(format!(
                "normalization_tolerance must be a positive number, got {}",
                self.normalization_tolerance
            ));
        }

        if !(self.amplitude_threshold.is_finite() && self.amplitude_threshold >= 0.0) {
            return Err(format!(
                "amplitude_threshold must be non-negative, got {}",
                self.amplitude_threshold
            ));
        }

        if let NormalizationCheck::Batched(0) = self.normalization_check {
            return Err("batched normalization interval must be > 0".to_string());
        }

        if self.sampling_chunk_size == 0 {
            return Err("sampling_chunk_size must be > 0".to_string());
        }

        if self.max_qubits == 0 || self.max_qubits > MAX_QUBITS {
            return Err(format!(
                "max_qubits must be in 1..={}, got {}",
                MAX_QUBITS, self.max_qubits
            ));
        }

        Ok(())
    }
}
