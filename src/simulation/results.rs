// src/simulation/results.rs
use crate::core::{ClbitId, QubitId, StateVector};
use crate::registers::ClassicalRegister;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// One mid-circuit or final measurement, in execution order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRecord {
    pub qubit: QubitId,
    pub clbit: ClbitId,
    pub outcome: bool,
    /// Probability the sampled outcome had at the time of measurement.
    pub probability: f64,
}

/// Holds the results of a circuit simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Last value written to each classical bit. Bits never written are absent.
    clbits: BTreeMap<ClbitId, bool>,
    cregs: Vec<ClassicalRegister>,
    measurements: Vec<MeasurementRecord>,
    /// `None` for circuits without qubits.
    final_state: Option<StateVector>,
    /// Order of qubits in `final_state`, most significant first.
    qubit_order: Vec<QubitId>,
}

impl SimulationResult {
    pub(crate) fn new(cregs: Vec<ClassicalRegister>) -> Self {
        Self {
            clbits: BTreeMap::new(),
            cregs,
            measurements: Vec::new(),
            final_state: None,
            qubit_order: Vec::new(),
        }
    }

    pub(crate) fn with_engine_output(
        mut self,
        state: StateVector,
        qubit_order: Vec<QubitId>,
        clbits: HashMap<ClbitId, bool>,
        measurements: Vec<MeasurementRecord>,
    ) -> Self {
        self.final_state = Some(state);
        self.qubit_order = qubit_order;
        self.clbits = clbits.into_iter().collect();
        self.measurements = measurements;
        self
    }

    /// Value of a classical bit, if it was ever written.
    pub fn clbit(&self, clbit: ClbitId) -> Option<bool> {
        self.clbits.get(&clbit).copied()
    }

    /// Integer value of a classical register (bit 0 least significant, unwritten bits read 0).
    /// Returns `None` for an unknown register name.
    pub fn register_value(&self, name: &str) -> Option<u64> {
        let reg = self.cregs.iter().find(|r| r.name() == name)?;
        let value = reg
            .clbits()
            .iter()
            .enumerate()
            .filter(|(_, c)| self.clbit(**c).unwrap_or(false))
            .fold(0u64, |acc, (i, _)| acc | (1 << i));
        Some(value)
    }

    pub fn all_clbits(&self) -> &BTreeMap<ClbitId, bool> {
        &self.clbits
    }

    pub fn measurements(&self) -> &[MeasurementRecord] {
        &self.measurements
    }

    pub fn final_state(&self) -> Option<&StateVector> {
        self.final_state.as_ref()
    }

    pub fn qubit_order(&self) -> &[QubitId] {
        &self.qubit_order
    }

    /// Probability of finding `qubit` in `|1>` in the final state.
    pub fn probability_of_one(&self, qubit: QubitId) -> Option<f64> {
        let state = self.final_state.as_ref()?;
        let idx = self.qubit_order.iter().position(|q| *q == qubit)?;
        let mask = 1usize << (self.qubit_order.len() - 1 - idx);
        Some(
            state
                .vector()
                .iter()
                .enumerate()
                .filter(|(i, _)| i & mask != 0)
                .map(|(_, c)| c.norm_sqr())
                .sum(),
        )
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Results:")?;
        if self.measurements.is_empty() {
            writeln!(f, "  No qubits were measured.")?;
        } else {
            writeln!(f, "  Measurements:")?;
            for m in &self.measurements {
                writeln!(
                    f,
                    "    {} -> {} = {} (p = {:.4})",
                    m.qubit,
                    m.clbit,
                    u8::from(m.outcome),
                    m.probability
                )?;
            }
        }
        if !self.cregs.is_empty() {
            writeln!(f, "  Registers:")?;
            for reg in &self.cregs {
                let value = self.register_value(reg.name()).unwrap_or(0);
                writeln!(f, "    {} = {:0width$b}", reg.name(), value, width = reg.len())?;
            }
        }
        if let Some(state) = &self.final_state {
            writeln!(f, "  Final {}", state)?;
        }
        Ok(())
    }
}
