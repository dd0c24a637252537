// src/simulation/engine.rs
use crate::core::{ClbitId, QubitId, RemoteOpsError, Result, StateVector};
use crate::operations::Operation;
use crate::simulation::results::MeasurementRecord;
use num_complex::Complex;
use num_traits::Zero;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::f64::consts::FRAC_1_SQRT_2;
use tracing::trace;

type Matrix2 = [[Complex<f64>; 2]; 2];
type Matrix4 = [[Complex<f64>; 4]; 4];

/// Dense state-vector engine with a classical bit store.
/// (Internal visibility)
#[derive(Debug)]
pub(crate) struct SimulationEngine {
    /// Maps qubit ids to their index (0..N-1); index 0 is the most significant bit.
    qubit_indices: HashMap<QubitId, usize>,
    state: StateVector,
    num_qubits: usize,
    classical: HashMap<ClbitId, bool>,
    measurements: Vec<MeasurementRecord>,
    rng: StdRng,
    amplitude_tolerance: f64,
}

impl SimulationEngine {
    /// Initializes `|0...0>` over `qubits`, in the given order.
    pub(crate) fn init(qubits: &[QubitId], seed: u64, amplitude_tolerance: f64) -> Result<Self> {
        if qubits.is_empty() {
            return Err(RemoteOpsError::InvalidOperation {
                message: "Cannot initialize simulation engine with zero qubits".to_string(),
            });
        }
        let num_qubits = qubits.len();
        if num_qubits >= usize::BITS as usize {
            return Err(RemoteOpsError::Simulation {
                message: "Number of qubits too large, state vector dimension overflows usize."
                    .to_string(),
            });
        }

        let qubit_indices = qubits.iter().enumerate().map(|(i, q)| (*q, i)).collect();

        Ok(Self {
            qubit_indices,
            state: StateVector::basis(num_qubits, 0),
            num_qubits,
            classical: HashMap::new(),
            measurements: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            amplitude_tolerance,
        })
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: StateVector) -> Result<()> {
        if state.dim() != self.state.dim() {
            Err(RemoteOpsError::Simulation {
                message: format!(
                    "Cannot set state: provided dimension {} does not match engine dimension {}",
                    state.dim(),
                    self.state.dim()
                ),
            })
        } else {
            self.state = state;
            Ok(())
        }
    }

    pub(crate) fn state(&self) -> &StateVector {
        &self.state
    }

    pub(crate) fn into_parts(
        self,
    ) -> (StateVector, HashMap<ClbitId, bool>, Vec<MeasurementRecord>) {
        (self.state, self.classical, self.measurements)
    }

    /// Unset bits read as 0.
    pub(crate) fn read_clbit(&self, clbit: ClbitId) -> bool {
        self.classical.get(&clbit).copied().unwrap_or(false)
    }

    /// Applies a single primitive (possibly conditioned) operation.
    pub(crate) fn apply_operation(&mut self, op: &Operation) -> Result<()> {
        match op {
            Operation::Hadamard { target } => {
                let idx = self.qubit_index(target)?;
                self.apply_single_qubit_gate(idx, &hadamard_matrix())?;
            }
            Operation::PauliX { target } => {
                let idx = self.qubit_index(target)?;
                self.apply_single_qubit_gate(idx, &pauli_x_matrix())?;
            }
            Operation::PauliZ { target } => {
                let idx = self.qubit_index(target)?;
                self.apply_single_qubit_gate(idx, &pauli_z_matrix())?;
            }
            Operation::Rz { target, phi } => {
                let idx = self.qubit_index(target)?;
                self.apply_single_qubit_gate(idx, &rz_matrix(*phi))?;
            }
            Operation::Cnot { control, target } => {
                let (c, t) = (self.qubit_index(control)?, self.qubit_index(target)?);
                self.apply_two_qubit_gate(c, t, &cnot_matrix())?;
            }
            Operation::Swap { qubit1, qubit2 } => {
                let (a, b) = (self.qubit_index(qubit1)?, self.qubit_index(qubit2)?);
                self.apply_two_qubit_gate(a, b, &swap_matrix())?;
            }
            Operation::Rzz { qubit1, qubit2, phi } => {
                let (a, b) = (self.qubit_index(qubit1)?, self.qubit_index(qubit2)?);
                self.apply_two_qubit_gate(a, b, &rzz_matrix(*phi))?;
            }
            Operation::CPhase { control, target, phi } => {
                let (c, t) = (self.qubit_index(control)?, self.qubit_index(target)?);
                self.apply_two_qubit_gate(c, t, &cphase_matrix(*phi))?;
            }
            Operation::Measure { qubit, clbit } => {
                self.measure(*qubit, *clbit)?;
            }
            Operation::Conditional { condition, op } => {
                let bit = self.read_clbit(condition.clbit);
                trace!(
                    clbit = %condition.clbit,
                    bit,
                    expected = condition.value,
                    op = %op,
                    "conditional"
                );
                if bit == condition.value {
                    self.apply_operation(op)?;
                }
            }
            Operation::Remote(instr) => {
                return Err(RemoteOpsError::InvalidOperation {
                    message: format!(
                        "{} must be expanded before it reaches the engine",
                        instr.kind
                    ),
                });
            }
        }
        Ok(())
    }

    /// Projective Z measurement: samples by the Born rule, collapses, renormalizes
    /// and stores the outcome in `clbit`.
    pub(crate) fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> Result<bool> {
        let idx = self.qubit_index(&qubit)?;
        let mask = 1usize << (self.num_qubits - 1 - idx);

        let p_one: f64 = self
            .state
            .vector()
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, c)| c.norm_sqr())
            .sum();
        let total = self.state.norm_sqr();
        if total < self.amplitude_tolerance {
            return Err(RemoteOpsError::Simulation {
                message: "Cannot measure a state with vanishing norm".to_string(),
            });
        }
        // Snap numerical noise so deterministic outcomes stay deterministic
        let p_one = match (p_one / total).clamp(0.0, 1.0) {
            p if p < self.amplitude_tolerance => 0.0,
            p if p > 1.0 - self.amplitude_tolerance => 1.0,
            p => p,
        };

        let sample: f64 = self.rng.random::<f64>();
        let outcome = sample < p_one;
        let p_outcome = if outcome { p_one } else { 1.0 - p_one };
        if p_outcome < self.amplitude_tolerance {
            return Err(RemoteOpsError::Simulation {
                message: format!(
                    "Sampled outcome {} of {} has negligible probability {:.3e}",
                    u8::from(outcome),
                    qubit,
                    p_outcome
                ),
            });
        }

        let scale = 1.0 / (p_outcome * total).sqrt();
        for (i, amp) in self.state.vector_mut().iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                *amp *= scale;
            } else {
                *amp = Complex::zero();
            }
        }

        trace!(qubit = %qubit, clbit = %clbit, outcome, p_one, "measured");
        self.classical.insert(clbit, outcome);
        self.measurements.push(MeasurementRecord {
            qubit,
            clbit,
            outcome,
            probability: p_outcome,
        });
        Ok(outcome)
    }

    fn qubit_index(&self, qubit: &QubitId) -> Result<usize> {
        self.qubit_indices.get(qubit).copied().ok_or_else(|| RemoteOpsError::UnknownQubit {
            qubit: *qubit,
            message: "not found in simulation context".to_string(),
        })
    }

    /// Applies a 2x2 matrix to the qubit at `target_idx`.
    fn apply_single_qubit_gate(&mut self, target_idx: usize, matrix: &Matrix2) -> Result<()> {
        let k = self.num_qubits - 1 - target_idx; // Bit position (from right, 0-based)
        let k_mask = 1 << k;
        let lower_mask = k_mask - 1;

        let dim = self.state.dim();
        let vector = self.state.vector_mut();

        // Pairs of basis states differing only at the target position
        for i in 0..dim / 2 {
            // Insert a zero at bit `k`: bits above `k` shift up, bits below stay
            let i0 = ((i >> k) << (k + 1)) | (i & lower_mask);
            let i1 = i0 | k_mask;
            if i1 >= dim {
                return Err(RemoteOpsError::Simulation {
                    message: format!(
                        "Single qubit gate index out of bounds: i0={}, i1={}, dim={}",
                        i0, i1, dim
                    ),
                });
            }

            let psi_0 = vector[i0];
            let psi_1 = vector[i1];
            vector[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            vector[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
        Ok(())
    }

    /// Applies a 4x4 matrix in the `|b1 b2>` basis, where `b1` is the qubit at
    /// `idx1` and `b2` the qubit at `idx2`.
    fn apply_two_qubit_gate(&mut self, idx1: usize, idx2: usize, matrix: &Matrix4) -> Result<()> {
        if idx1 == idx2 {
            return Err(RemoteOpsError::InvalidOperation {
                message: "Target indices for a two-qubit gate cannot be the same".to_string(),
            });
        }

        let mask1 = 1usize << (self.num_qubits - 1 - idx1);
        let mask2 = 1usize << (self.num_qubits - 1 - idx2);
        let dim = self.state.dim();
        let vector = self.state.vector_mut();

        for base in (0..dim).filter(|i| i & (mask1 | mask2) == 0) {
            let indices = [base, base | mask2, base | mask1, base | mask1 | mask2];
            let psi = indices.map(|i| vector[i]);

            for (row, &index) in indices.iter().enumerate() {
                let mut acc = Complex::zero();
                for (col, amp) in psi.iter().enumerate() {
                    acc += matrix[row][col] * amp;
                }
                vector[index] = acc;
            }
        }
        Ok(())
    }
}

fn one() -> Complex<f64> {
    Complex::new(1.0, 0.0)
}

fn phase(theta: f64) -> Complex<f64> {
    Complex::from_polar(1.0, theta)
}

fn hadamard_matrix() -> Matrix2 {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

fn pauli_x_matrix() -> Matrix2 {
    [[Complex::zero(), one()], [one(), Complex::zero()]]
}

fn pauli_z_matrix() -> Matrix2 {
    [[one(), Complex::zero()], [Complex::zero(), -one()]]
}

/// `diag(e^{-i phi/2}, e^{i phi/2})`
fn rz_matrix(phi: f64) -> Matrix2 {
    [[phase(-phi / 2.0), Complex::zero()], [Complex::zero(), phase(phi / 2.0)]]
}

fn diagonal(d: [Complex<f64>; 4]) -> Matrix4 {
    let mut m = [[Complex::zero(); 4]; 4];
    for (i, value) in d.into_iter().enumerate() {
        m[i][i] = value;
    }
    m
}

fn permutation(p: [usize; 4]) -> Matrix4 {
    let mut m = [[Complex::zero(); 4]; 4];
    for (row, col) in p.into_iter().enumerate() {
        m[row][col] = one();
    }
    m
}

fn cnot_matrix() -> Matrix4 {
    // |10> <-> |11>
    permutation([0, 1, 3, 2])
}

fn swap_matrix() -> Matrix4 {
    permutation([0, 2, 1, 3])
}

/// `exp(-i phi/2 Z⊗Z)`
fn rzz_matrix(phi: f64) -> Matrix4 {
    let even = phase(-phi / 2.0);
    let odd = phase(phi / 2.0);
    diagonal([even, odd, odd, even])
}

fn cphase_matrix(phi: f64) -> Matrix4 {
    diagonal([one(), one(), one(), phase(phi)])
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn qid(id: u64) -> QubitId {
        QubitId(id)
    }

    fn assert_complex_vec_approx_equal(
        actual: &[Complex<f64>],
        expected: &[Complex<f64>],
        context: &str,
    ) {
        assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
        for i in 0..actual.len() {
            let dist_sq = (actual[i] - expected[i]).norm_sqr();
            assert!(
                dist_sq < TEST_TOLERANCE * TEST_TOLERANCE,
                "Vector mismatch at index {} - Actual: {}, Expected: {}, Context: {}",
                i, actual[i], expected[i], context
            );
        }
    }

    #[test]
    fn test_hadamard_then_cnot_gives_epr_pair() -> Result<()> {
        let (q0, q1) = (qid(0), qid(1));
        let mut engine = SimulationEngine::init(&[q0, q1], 1, 1e-12)?;
        engine.apply_operation(&Operation::Hadamard { target: q0 })?;
        engine.apply_operation(&Operation::Cnot { control: q0, target: q1 })?;

        let s = Complex::new(FRAC_1_SQRT_2, 0.0);
        assert_complex_vec_approx_equal(
            engine.state().vector(),
            &[s, Complex::zero(), Complex::zero(), s],
            "H(q0), CX(q0, q1) on |00>",
        );
        Ok(())
    }

    #[test]
    fn test_pauli_x_on_every_qubit_gives_all_ones() -> Result<()> {
        let qs = [qid(0), qid(1), qid(2)];
        let mut engine = SimulationEngine::init(&qs, 1, 1e-12)?;
        for q in qs {
            engine.apply_operation(&Operation::PauliX { target: q })?;
        }
        assert_complex_vec_approx_equal(
            engine.state().vector(),
            StateVector::basis(3, 0b111).vector(),
            "X on q0, q1, q2",
        );
        Ok(())
    }

    #[test]
    fn test_single_qubit_gate_touches_only_its_bit() -> Result<()> {
        let qs = [qid(0), qid(1), qid(2)];
        for (idx, q) in qs.iter().enumerate() {
            let bit = 1usize << (2 - idx);
            for start in 0..8usize {
                let mut engine = SimulationEngine::init(&qs, 1, 1e-12)?;
                engine.set_state(StateVector::basis(3, start))?;
                engine.apply_operation(&Operation::PauliX { target: *q })?;
                assert_complex_vec_approx_equal(
                    engine.state().vector(),
                    StateVector::basis(3, start ^ bit).vector(),
                    &format!("X on {} from |{:03b}>", q, start),
                );
            }
        }

        // H on the middle qubit of |101> splits only that bit
        let mut engine = SimulationEngine::init(&qs, 1, 1e-12)?;
        engine.set_state(StateVector::basis(3, 0b101))?;
        engine.apply_operation(&Operation::Hadamard { target: qs[1] })?;
        let s = Complex::new(FRAC_1_SQRT_2, 0.0);
        let mut expected = vec![Complex::zero(); 8];
        expected[0b101] = s;
        expected[0b111] = s;
        assert_complex_vec_approx_equal(engine.state().vector(), &expected, "H(q1) on |101>");
        Ok(())
    }

    #[test]
    fn test_cnot_respects_argument_order() -> Result<()> {
        // |01>: q1 set, q0 clear. CX(q1 -> q0) gives |11>.
        let (q0, q1) = (qid(0), qid(1));
        let mut engine = SimulationEngine::init(&[q0, q1], 1, 1e-12)?;
        engine.set_state(StateVector::basis(2, 0b01))?;
        engine.apply_operation(&Operation::Cnot { control: q1, target: q0 })?;
        assert!((engine.state().probability(0b11) - 1.0).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_swap_in_three_qubit_context() -> Result<()> {
        let qs = [qid(0), qid(1), qid(2)];
        let mut engine = SimulationEngine::init(&qs, 1, 1e-12)?;
        engine.set_state(StateVector::basis(3, 0b100))?;
        engine.apply_operation(&Operation::Swap { qubit1: qs[0], qubit2: qs[2] })?;
        assert!((engine.state().probability(0b001) - 1.0).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_measure_collapses_entangled_pair() -> Result<()> {
        let (q0, q1) = (qid(0), qid(1));
        let mut engine = SimulationEngine::init(&[q0, q1], 42, 1e-12)?;
        engine.apply_operation(&Operation::Hadamard { target: q0 })?;
        engine.apply_operation(&Operation::Cnot { control: q0, target: q1 })?;

        let first = engine.measure(q0, ClbitId(0))?;
        let second = engine.measure(q1, ClbitId(1))?;
        assert_eq!(first, second, "Bell pair outcomes must agree");
        let expected = if first { 0b11 } else { 0b00 };
        assert!((engine.state().probability(expected) - 1.0).abs() < TEST_TOLERANCE);
        assert_eq!(engine.read_clbit(ClbitId(0)), first);
        Ok(())
    }

    #[test]
    fn test_measure_is_seed_deterministic() -> Result<()> {
        let q0 = qid(0);
        let run = |seed| -> Result<bool> {
            let mut engine = SimulationEngine::init(&[q0], seed, 1e-12)?;
            engine.apply_operation(&Operation::Hadamard { target: q0 })?;
            engine.measure(q0, ClbitId(0))
        };
        assert_eq!(run(9)?, run(9)?);
        Ok(())
    }

    #[test]
    fn test_conditional_reads_classical_bit() -> Result<()> {
        let q0 = qid(0);
        let c0 = ClbitId(0);
        let mut engine = SimulationEngine::init(&[q0], 3, 1e-12)?;
        let flip = Operation::PauliX { target: q0 }.c_if(c0, true);

        engine.apply_operation(&flip)?; // bit unset reads 0: no flip
        assert!((engine.state().probability(0) - 1.0).abs() < TEST_TOLERANCE);

        engine.apply_operation(&Operation::PauliX { target: q0 })?;
        engine.measure(q0, c0)?; // deterministic 1
        engine.apply_operation(&flip)?;
        assert!((engine.state().probability(0) - 1.0).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_rzz_phases() -> Result<()> {
        let (q0, q1) = (qid(0), qid(1));
        let phi = 0.7;
        let mut engine = SimulationEngine::init(&[q0, q1], 1, 1e-12)?;
        engine.set_state(StateVector::basis(2, 0b01))?;
        engine.apply_operation(&Operation::Rzz { qubit1: q0, qubit2: q1, phi })?;
        assert_complex_vec_approx_equal(
            engine.state().vector(),
            &[Complex::zero(), phase(phi / 2.0), Complex::zero(), Complex::zero()],
            "Rzz on |01>",
        );
        Ok(())
    }

    #[test]
    fn test_remote_instruction_rejected() -> Result<()> {
        let q = [qid(0), qid(1)];
        let mut engine = SimulationEngine::init(&q, 1, 1e-12)?;
        let op = Operation::Remote(crate::operations::RemoteInstruction {
            kind: crate::operations::RemoteKind::GenEpr,
            params: Vec::new(),
            qargs: q.to_vec(),
            cargs: Vec::new(),
        });
        assert!(matches!(
            engine.apply_operation(&op),
            Err(RemoteOpsError::InvalidOperation { .. })
        ));
        Ok(())
    }
}
