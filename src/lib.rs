// src/lib.rs

//! `remote_ops` - EPR-mediated remote two-qubit operations
//!
//! Two parties that share an EPR pair `(|00> + |11>)/sqrt(2)` can apply a
//! two-qubit gate across their qubits without the qubits ever interacting:
//! local entangling gates with each half of the pair, measurement, and
//! classically conditioned Pauli corrections do the rest.
//!
//! This crate provides a small circuit model with named registers, the
//! EPR-mediated instruction library ([`remote`]), and a state-vector
//! [`Simulator`] with mid-circuit measurement to check the protocols.

pub mod core;
pub mod registers;
pub mod operations;
pub mod circuits;
pub mod remote;
pub mod simulation;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use crate::core::{ClbitId, QubitId, RemoteOpsError, Result, StateVector};
pub use registers::{ClassicalRegister, QuantumRegister, RegisterRef};
pub use operations::{Condition, Operation, RemoteInstruction, RemoteKind};
pub use circuits::{Circuit, CircuitBuilder};
pub use remote::{add_instr, autosubstitute, decompose, get_cregs, get_qregs};
pub use crate::core::DEFAULT_SUBSTITUTED_GATES;
pub use simulation::{MeasurementRecord, SimulationResult, Simulator, SimulatorConfig};
pub use validation::{check_normalization, fidelity, states_equivalent};

// Example 1: Remote CNOT
// Alice holds the control in |1>, Bob the target in |0>. The CNOT is mediated
// by a fresh EPR pair; Bob's qubit ends in |1> whatever the measurement record.
/// ```
/// use remote_ops::{add_instr, decompose, Circuit, RemoteKind, Simulator, RemoteOpsError};
///
/// # fn main() -> Result<(), RemoteOpsError> {
/// let mut circ = Circuit::new();
/// let alice = circ.add_qreg("alice", 1)?;
/// let bob = circ.add_qreg("bob", 1)?;
/// let bob_out = circ.add_creg("out", 1)?;
///
/// circ.x(alice[0])?;
/// add_instr(&mut circ, "RemoteCX", Some(alice[0]), Some(bob[0]), &[], None, None)?;
/// decompose(&mut circ, &RemoteKind::ALL)?;
/// circ.measure(bob[0], bob_out[0])?;
///
/// println!("{}", circ);
/// let result = Simulator::new().run(&circ)?;
/// assert_eq!(result.register_value("out"), Some(1));
/// // Both EPR qubits are returned to |0>
/// let epr = circ.qreg("q_epr").unwrap();
/// assert!(result.probability_of_one(epr[0]).unwrap() < 1e-9);
/// assert!(result.probability_of_one(epr[1]).unwrap() < 1e-9);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = ();

// Example 2: Automatic substitution
// Any CNOT straddling the two parties' registers is rewritten into its
// EPR-mediated counterpart; gates inside one register are left alone.
/// ```
/// use remote_ops::{autosubstitute, Circuit, RemoteOpsError};
///
/// # fn main() -> Result<(), RemoteOpsError> {
/// let mut circ = Circuit::new();
/// let alice = circ.add_qreg("alice", 2)?;
/// let bob = circ.add_qreg("bob", 1)?;
/// circ.h(alice[0])?.cx(alice[0], alice[1])?.cx(alice[1], bob[0])?;
///
/// let substituted = autosubstitute(&mut circ, (&alice, &bob), &["cx"], None, None)?;
/// assert_eq!(substituted, 1);
/// assert_eq!(circ.count_ops().get("RemoteCX"), Some(&1));
/// assert_eq!(circ.count_ops().get("cx"), Some(&1));
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = ();
