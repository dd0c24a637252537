// src/simulation/mod.rs

//! State-vector simulation of [`Circuit`]s, including mid-circuit measurement
//! and classically conditioned gates.
//!
//! Composite EPR instructions are expanded on the fly with the same builders
//! [`decompose`](crate::remote::decompose) uses, so a circuit simulates the
//! same way before and after decomposition.

mod config;
mod results;
pub(crate) mod engine;

pub use config::SimulatorConfig;
pub use results::{MeasurementRecord, SimulationResult};

use crate::circuits::Circuit;
use crate::core::Result;
use crate::operations::Operation;
use crate::remote::expand_remote;
use crate::validation::check_normalization;
use engine::SimulationEngine;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::{debug, info};

/// The main simulator orchestrating the execution of circuits.
#[derive(Debug, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Creates a new Simulator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Runs `circuit` from `|0...0>` and returns the classical outcomes and final state.
    ///
    /// # Errors
    /// Propagates malformed composite instructions, and reports `Incoherence`
    /// if step validation is enabled and the norm drifts beyond tolerance.
    pub fn run(&self, circuit: &Circuit) -> Result<SimulationResult> {
        let result = SimulationResult::new(circuit.cregs().to_vec());
        let qubits = circuit.qubits();
        if qubits.is_empty() {
            return Ok(result);
        }

        let seed = self.config.seed.unwrap_or_else(|| derive_seed(circuit));
        info!(qubits = qubits.len(), operations = circuit.len(), seed, "simulation start");
        let mut engine = SimulationEngine::init(&qubits, seed, self.config.amplitude_tolerance)?;

        for op in circuit.operations() {
            match op {
                Operation::Remote(instr) => {
                    let mut chunk = circuit.empty_like();
                    expand_remote(&mut chunk, instr)?;
                    debug!(
                        instruction = %instr.kind,
                        steps = chunk.len(),
                        "expanding composite instruction"
                    );
                    for sub_op in chunk.operations() {
                        self.step(&mut engine, sub_op)?;
                    }
                }
                _ => self.step(&mut engine, op)?,
            }
        }

        let (state, clbits, measurements) = engine.into_parts();
        info!(measurements = measurements.len(), "simulation end");
        Ok(result.with_engine_output(state, qubits, clbits, measurements))
    }

    fn step(&self, engine: &mut SimulationEngine, op: &Operation) -> Result<()> {
        engine.apply_operation(op)?;
        if self.config.validate_each_step {
            check_normalization(engine.state(), Some(self.config.norm_tolerance))?;
        }
        Ok(())
    }
}

/// Seed derived from the circuit contents, so unseeded runs are reproducible.
fn derive_seed(circuit: &Circuit) -> u64 {
    let mut hasher = DefaultHasher::new();
    circuit.num_qubits().hash(&mut hasher);
    for op in circuit.operations() {
        format!("{:?}", op).hash(&mut hasher);
    }
    hasher.finish()
}
