// src/operations/mod.rs

//! Defines the operations a [`Circuit`](crate::Circuit) is made of.
//!
//! There are three layers:
//! - primitive gates and measurement, which the simulator applies directly;
//! - [`Operation::Conditional`], a primitive guarded by a classical bit
//!   (the classical-communication half of every EPR protocol);
//! - [`Operation::Remote`], an opaque named composite instruction that stands
//!   for a whole EPR-mediated protocol until it is decomposed.

use crate::core::{ClbitId, QubitId, RemoteOpsError};
use std::fmt;
use std::str::FromStr;

/// Guard for a classically conditioned operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Condition {
    /// The bit that is read.
    pub clbit: ClbitId,
    /// The operation fires only when the bit holds this value.
    pub value: bool,
}

/// The composite instructions provided by the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RemoteKind {
    /// Prepares the EPR pair `(|00> + |11>)/sqrt(2)` on the two EPR qubits.
    GenEpr,
    /// CNOT between two qubits that only talk to their own half of the pair.
    RemoteCx,
    /// `exp(-i phi/2 Z⊗Z)` between two separated qubits.
    RemoteRzz,
    /// Controlled phase `diag(1, 1, 1, e^{i phi})`, up to a global phase.
    RemoteCrz,
    /// Moves the state of one qubit onto another through the pair.
    Teleport,
}

impl RemoteKind {
    /// All kinds, in the order `decompose` handles them by default.
    pub const ALL: [RemoteKind; 5] = [
        RemoteKind::RemoteCx,
        RemoteKind::RemoteRzz,
        RemoteKind::RemoteCrz,
        RemoteKind::Teleport,
        RemoteKind::GenEpr,
    ];

    /// Instruction name as it appears in diagrams and name-based filters.
    pub fn name(&self) -> &'static str {
        match self {
            RemoteKind::GenEpr => "GenEPR",
            RemoteKind::RemoteCx => "RemoteCX",
            RemoteKind::RemoteRzz => "RemoteRZZ",
            RemoteKind::RemoteCrz => "RemoteCRZ",
            RemoteKind::Teleport => "Teleport",
        }
    }

    /// Number of data qubits the instruction acts on besides the EPR pair.
    pub fn num_data_qubits(&self) -> usize {
        match self {
            RemoteKind::GenEpr => 0,
            _ => 2,
        }
    }

    /// Number of classical bits the instruction writes.
    pub fn num_clbits(&self) -> usize {
        match self {
            RemoteKind::GenEpr => 0,
            _ => 2,
        }
    }

    /// Number of real parameters (`phi` for the rotations).
    pub fn num_params(&self) -> usize {
        match self {
            RemoteKind::RemoteRzz | RemoteKind::RemoteCrz => 1,
            _ => 0,
        }
    }
}

impl FromStr for RemoteKind {
    type Err = RemoteOpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RemoteKind::ALL
            .iter()
            .find(|kind| kind.name() == s)
            .copied()
            .ok_or_else(|| RemoteOpsError::UnknownInstruction { name: s.to_string() })
    }
}

impl fmt::Display for RemoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A composite instruction instance placed in a circuit.
///
/// Argument layout follows the library convention: `qargs = [qb1, qb2, epr0, epr1]`
/// (just `[epr0, epr1]` for [`RemoteKind::GenEpr`]) and `cargs = [c0, c1]`.
/// `qb1` talks directly to `epr0`, `qb2` to `epr1`.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteInstruction {
    pub kind: RemoteKind,
    pub params: Vec<f64>,
    pub qargs: Vec<QubitId>,
    pub cargs: Vec<ClbitId>,
}

impl RemoteInstruction {
    /// Checks argument counts against the kind's signature.
    pub fn validate(&self) -> Result<(), RemoteOpsError> {
        let expected_q = self.kind.num_data_qubits() + 2;
        if self.qargs.len() != expected_q {
            return Err(RemoteOpsError::InvalidOperation {
                message: format!(
                    "{} takes {} qubits, got {}",
                    self.kind,
                    expected_q,
                    self.qargs.len()
                ),
            });
        }
        if self.cargs.len() != self.kind.num_clbits() {
            return Err(RemoteOpsError::InvalidOperation {
                message: format!(
                    "{} takes {} classical bits, got {}",
                    self.kind,
                    self.kind.num_clbits(),
                    self.cargs.len()
                ),
            });
        }
        if self.params.len() != self.kind.num_params() {
            return Err(RemoteOpsError::InvalidOperation {
                message: format!(
                    "{} takes {} parameter(s), got {}",
                    self.kind,
                    self.kind.num_params(),
                    self.params.len()
                ),
            });
        }
        Ok(())
    }
}

/// A single step of a circuit.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Hadamard.
    Hadamard { target: QubitId },
    /// Pauli X (bit flip).
    PauliX { target: QubitId },
    /// Pauli Z (phase flip).
    PauliZ { target: QubitId },
    /// `Rz(phi) = diag(e^{-i phi/2}, e^{i phi/2})`.
    Rz { target: QubitId, phi: f64 },
    /// Controlled NOT.
    Cnot { control: QubitId, target: QubitId },
    /// Exchange two qubits.
    Swap { qubit1: QubitId, qubit2: QubitId },
    /// `exp(-i phi/2 Z⊗Z)`.
    Rzz { qubit1: QubitId, qubit2: QubitId, phi: f64 },
    /// Controlled phase `diag(1, 1, 1, e^{i phi})`.
    CPhase { control: QubitId, target: QubitId, phi: f64 },
    /// Projective measurement in the computational basis, result stored in `clbit`.
    Measure { qubit: QubitId, clbit: ClbitId },
    /// `op` is applied only when `condition` holds at run time.
    Conditional { condition: Condition, op: Box<Operation> },
    /// Unexpanded EPR-mediated instruction.
    Remote(RemoteInstruction),
}

impl Operation {
    /// Wraps `self` so it only fires when `clbit` reads as `value`.
    ///
    /// ```
    /// # use remote_ops::{Operation, QubitId, ClbitId};
    /// let op = Operation::PauliX { target: QubitId(1) }.c_if(ClbitId(0), true);
    /// assert_eq!(op.name(), "x");
    /// ```
    pub fn c_if(self, clbit: ClbitId, value: bool) -> Operation {
        Operation::Conditional {
            condition: Condition { clbit, value },
            op: Box::new(self),
        }
    }

    /// Lowercase gate name for primitives, instruction name for composites.
    /// A conditional reports the name of the operation it guards.
    pub fn name(&self) -> &str {
        match self {
            Operation::Hadamard { .. } => "h",
            Operation::PauliX { .. } => "x",
            Operation::PauliZ { .. } => "z",
            Operation::Rz { .. } => "rz",
            Operation::Cnot { .. } => "cx",
            Operation::Swap { .. } => "swap",
            Operation::Rzz { .. } => "rzz",
            Operation::CPhase { .. } => "cp",
            Operation::Measure { .. } => "measure",
            Operation::Conditional { op, .. } => op.name(),
            Operation::Remote(instr) => instr.kind.name(),
        }
    }

    /// Qubits named in the operation's arguments, in argument order.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        match self {
            Operation::Hadamard { target }
            | Operation::PauliX { target }
            | Operation::PauliZ { target }
            | Operation::Rz { target, .. } => vec![*target],
            Operation::Cnot { control, target } | Operation::CPhase { control, target, .. } => {
                vec![*control, *target]
            }
            Operation::Swap { qubit1, qubit2 } | Operation::Rzz { qubit1, qubit2, .. } => {
                vec![*qubit1, *qubit2]
            }
            Operation::Measure { qubit, .. } => vec![*qubit],
            Operation::Conditional { op, .. } => op.involved_qubits(),
            Operation::Remote(instr) => instr.qargs.clone(),
        }
    }

    /// Classical bits read or written by the operation.
    pub fn involved_clbits(&self) -> Vec<ClbitId> {
        match self {
            Operation::Measure { clbit, .. } => vec![*clbit],
            Operation::Conditional { condition, op } => {
                let mut bits = vec![condition.clbit];
                bits.extend(op.involved_clbits());
                bits
            }
            Operation::Remote(instr) => instr.cargs.clone(),
            _ => Vec::new(),
        }
    }

    /// `true` for unconditioned gates acting on exactly two qubits.
    pub fn is_two_qubit_gate(&self) -> bool {
        matches!(
            self,
            Operation::Cnot { .. }
                | Operation::Swap { .. }
                | Operation::Rzz { .. }
                | Operation::CPhase { .. }
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Rz { target, phi } => write!(f, "rz({:.4}) {}", phi, target),
            Operation::Rzz { qubit1, qubit2, phi } => {
                write!(f, "rzz({:.4}) {}, {}", phi, qubit1, qubit2)
            }
            Operation::CPhase { control, target, phi } => {
                write!(f, "cp({:.4}) {}, {}", phi, control, target)
            }
            Operation::Measure { qubit, clbit } => write!(f, "measure {} -> {}", qubit, clbit),
            Operation::Conditional { condition, op } => {
                write!(f, "{} if {}=={}", op, condition.clbit, u8::from(condition.value))
            }
            Operation::Remote(instr) => {
                write!(f, "{}", instr.kind)?;
                if !instr.params.is_empty() {
                    let params: Vec<String> =
                        instr.params.iter().map(|p| format!("{:.4}", p)).collect();
                    write!(f, "({})", params.join(", "))?;
                }
                let qargs: Vec<String> = instr.qargs.iter().map(ToString::to_string).collect();
                write!(f, " {}", qargs.join(", "))?;
                if !instr.cargs.is_empty() {
                    let cargs: Vec<String> = instr.cargs.iter().map(ToString::to_string).collect();
                    write!(f, " -> {}", cargs.join(", "))?;
                }
                Ok(())
            }
            other => {
                let qargs: Vec<String> =
                    other.involved_qubits().iter().map(ToString::to_string).collect();
                write!(f, "{} {}", other.name(), qargs.join(", "))
            }
        }
    }
}
