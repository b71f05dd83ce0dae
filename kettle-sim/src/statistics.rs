//! Execution statistics tracking

use std::time::Duration;

/// Execution statistics for a simulation run
#[derive(Debug, Clone, Default)]
pub struct ExecutionStatistics {
    /// Total execution time
    pub total_time: Duration,

    /// Time spent allocating and initializing the state
    pub initialization_time: Duration,

    /// Time spent applying gates, including normalization checks
    pub gate_application_time: Duration,

    /// Number of gates executed
    pub gates_executed: usize,

    /// Number of normalization checks performed
    pub normalization_checks: usize,

    /// Largest |Σ|aᵢ|² − 1| seen by any check
    pub max_norm_deviation: f64,

    /// Amplitude storage (estimated, in bytes)
    pub memory_bytes: usize,
}

impl ExecutionStatistics {
    /// Create a new statistics object
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the gate execution rate (gates per second)
    pub fn gates_per_second(&self) -> f64 {
        let secs = self.gate_application_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.gates_executed as f64 / secs
        }
    }

    /// Get the initialization overhead as a percentage of total time
    pub fn initialization_overhead_percent(&self) -> f64 {
        let total_secs = self.total_time.as_secs_f64();
        if total_secs == 0.0 {
            0.0
        } else {
            100.0 * self.initialization_time.as_secs_f64() / total_secs
        }
    }

    /// Get memory usage in MB
    pub fn memory_mb(&self) -> f64 {
        self.memory_bytes as f64 / 1_000_000.0
    }
}

impl std::fmt::Display for ExecutionStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Execution Statistics:")?;
        writeln!(f, "  Total time: {:?}", self.total_time)?;
        writeln!(
            f,
            "    Initialization: {:?} ({:.1}%)",
            self.initialization_time,
            self.initialization_overhead_percent()
        )?;
        writeln!(f, "    Gate application: {:?}", self.gate_application_time)?;

        writeln!(f, "\n  Gates:")?;
        writeln!(f, "    Executed: {}", self.gates_executed)?;
        writeln!(f, "    Execution rate: {:.0} gates/sec", self.gates_per_second())?;

        writeln!(f, "\n  Normalization:")?;
        writeln!(f, "    Checks: {}", self.normalization_checks)?;
        writeln!(f, "    Max deviation: {:.3e}", self.max_norm_deviation)?;

        writeln!(f, "\n  Memory:")?;
        writeln!(f, "    Amplitudes: {:.2} MB", self.memory_mb())?;

        Ok(())
    }
}
