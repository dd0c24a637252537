//! Error handling logic

use std::fmt;
use thiserror::Error;

/// Identifier of a single qubit inside a [`Circuit`](crate::Circuit).
///
/// Ids are handed out by the circuit when a quantum register is added, so they
/// are unique within that circuit and ordered by allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub u64);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q({})", self.0)
    }
}

/// Identifier of a single classical bit inside a [`Circuit`](crate::Circuit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClbitId(pub u64);

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c({})", self.0)
    }
}

/// Failures raised while building, rewriting or simulating circuits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteOpsError {
    /// A qubit id is not part of the circuit or simulation context.
    #[error("Unknown qubit {qubit}: {message}")]
    UnknownQubit {
        /// The offending qubit
        qubit: QubitId,
        /// UnknownQubit failure message
        message: String,
    },

    /// A classical bit id is not part of the circuit.
    #[error("Unknown classical bit {clbit}: {message}")]
    UnknownClbit {
        /// The offending bit
        clbit: ClbitId,
        /// UnknownClbit failure message
        message: String,
    },

    /// A register with the same name already exists in the circuit.
    #[error("Duplicate register '{name}'")]
    DuplicateRegister {
        /// Name of the clashing register
        name: String,
    },

    /// A register is too small to host an EPR pair or its measurement bits.
    #[error("Register '{name}' has {size} element(s), at least {required} required")]
    RegisterTooSmall {
        /// Register name
        name: String,
        /// Actual number of qubits/bits
        size: usize,
        /// Required number of qubits/bits
        required: usize,
    },

    /// A composite instruction name that the library does not define.
    #[error("Undefined instruction '{name}'")]
    UnknownInstruction {
        /// The requested instruction name
        name: String,
    },

    /// An operation is malformed or inconsistent with the circuit it is applied to.
    #[error("Invalid Operation: {message}")]
    InvalidOperation {
        /// InvalidOperation failure message
        message: String,
    },

    /// General error encountered during the simulation process itself.
    #[error("Simulation Process Error: {message}")]
    Simulation {
        /// Simulation failure message
        message: String,
    },

    /// The state vector lost normalization beyond the configured tolerance.
    #[error("Incoherence Violation: {message}")]
    Incoherence {
        /// Incoherence failure message
        message: String,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RemoteOpsError>;
