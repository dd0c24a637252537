// src/simulation/config.rs

/// Options controlling a [`Simulator`](super::Simulator) run.
///
/// ```
/// # use remote_ops::SimulatorConfig;
/// let config = SimulatorConfig::default().with_seed(7).with_step_validation(true);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Seed for measurement sampling. `None` derives one from the circuit
    /// contents, so the same circuit always yields the same outcomes.
    pub seed: Option<u64>,
    /// Allowed deviation of the squared norm from 1.0.
    pub norm_tolerance: f64,
    /// Squared amplitudes below this are treated as zero.
    pub amplitude_tolerance: f64,
    /// Check normalization after every primitive operation.
    pub validate_each_step: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            norm_tolerance: 1e-9,
            amplitude_tolerance: 1e-12,
            validate_each_step: false,
        }
    }
}

impl SimulatorConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_norm_tolerance(mut self, tolerance: f64) -> Self {
        self.norm_tolerance = tolerance;
        self
    }

    pub fn with_amplitude_tolerance(mut self, tolerance: f64) -> Self {
        self.amplitude_tolerance = tolerance;
        self
    }

    pub fn with_step_validation(mut self, enabled: bool) -> Self {
        self.validate_each_step = enabled;
        self
    }
}
