// src/registers/mod.rs

//! Named quantum and classical registers.
//!
//! A register is a named, ordered group of qubit or bit ids owned by a
//! [`Circuit`](crate::Circuit). The EPR helpers accept registers either by
//! value or by name, which is what [`RegisterRef`] expresses.

use crate::core::{ClbitId, QubitId};
use std::fmt;
use std::ops::Index;

/// A named, ordered group of qubits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuantumRegister {
    name: String,
    qubits: Vec<QubitId>,
}

impl QuantumRegister {
    pub(crate) fn new(name: impl Into<String>, qubits: Vec<QubitId>) -> Self {
        Self { name: name.into(), qubits }
    }

    /// Register name, unique among the quantum registers of a circuit.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qubits in register order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Qubit at `index`, if the register is large enough.
    pub fn get(&self, index: usize) -> Option<QubitId> {
        self.qubits.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Returns `true` if `qubit` belongs to this register.
    pub fn contains(&self, qubit: QubitId) -> bool {
        self.qubits.contains(&qubit)
    }
}

impl Index<usize> for QuantumRegister {
    type Output = QubitId;

    fn index(&self, index: usize) -> &QubitId {
        &self.qubits[index]
    }
}

impl fmt::Display for QuantumRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuantumRegister({}, '{}')", self.qubits.len(), self.name)
    }
}

/// A named, ordered group of classical bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassicalRegister {
    name: String,
    clbits: Vec<ClbitId>,
}

impl ClassicalRegister {
    pub(crate) fn new(name: impl Into<String>, clbits: Vec<ClbitId>) -> Self {
        Self { name: name.into(), clbits }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bits in register order; bit 0 is the least significant when read as an integer.
    pub fn clbits(&self) -> &[ClbitId] {
        &self.clbits
    }

    pub fn get(&self, index: usize) -> Option<ClbitId> {
        self.clbits.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.clbits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clbits.is_empty()
    }

    pub fn contains(&self, clbit: ClbitId) -> bool {
        self.clbits.contains(&clbit)
    }
}

impl Index<usize> for ClassicalRegister {
    type Output = ClbitId;

    fn index(&self, index: usize) -> &ClbitId {
        &self.clbits[index]
    }
}

impl fmt::Display for ClassicalRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassicalRegister({}, '{}')", self.clbits.len(), self.name)
    }
}

/// Selects a register either by name or by an existing register value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterRef<R> {
    /// Look the register up by name; created under this name if absent.
    Name(String),
    /// Use this register; appended to the circuit if it is not already there.
    Register(R),
}

impl<R> From<&str> for RegisterRef<R> {
    fn from(name: &str) -> Self {
        RegisterRef::Name(name.to_string())
    }
}

impl<R> From<String> for RegisterRef<R> {
    fn from(name: String) -> Self {
        RegisterRef::Name(name)
    }
}

impl From<QuantumRegister> for RegisterRef<QuantumRegister> {
    fn from(reg: QuantumRegister) -> Self {
        RegisterRef::Register(reg)
    }
}

impl From<ClassicalRegister> for RegisterRef<ClassicalRegister> {
    fn from(reg: ClassicalRegister) -> Self {
        RegisterRef::Register(reg)
    }
}
