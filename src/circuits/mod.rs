// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! [`Operation`]s over named registers.
//!
//! A [`Circuit`] owns its quantum and classical registers and hands out the
//! qubit/bit ids they contain. Every operation added to it is checked against
//! those registers, so a circuit never refers to a qubit it does not own.

use crate::core::{ClbitId, QubitId, RemoteOpsError, Result};
use crate::operations::{Operation, RemoteKind};
use crate::registers::{ClassicalRegister, QuantumRegister};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use tracing::trace;

/// An ordered sequence of operations applied to registers of qubits and bits.
///
/// Analogy: similar to `qiskit.QuantumCircuit`, reduced to what the EPR
/// helpers need: registers, gates, mid-circuit measurement, classical
/// conditions and opaque composite instructions.
#[derive(Clone, PartialEq)]
pub struct Circuit {
    qregs: Vec<QuantumRegister>,
    cregs: Vec<ClassicalRegister>,
    /// The order is the execution order.
    operations: Vec<Operation>,
    next_qubit: u64,
    next_clbit: u64,
}

impl Circuit {
    /// Creates a new, empty circuit with no registers.
    pub fn new() -> Self {
        Self {
            qregs: Vec::new(),
            cregs: Vec::new(),
            operations: Vec::new(),
            next_qubit: 0,
            next_clbit: 0,
        }
    }

    /// Allocates a fresh quantum register of `size` qubits.
    ///
    /// # Errors
    /// `DuplicateRegister` if a quantum register with that name exists.
    pub fn add_qreg(&mut self, name: &str, size: usize) -> Result<QuantumRegister> {
        if self.qreg(name).is_some() {
            return Err(RemoteOpsError::DuplicateRegister { name: name.to_string() });
        }
        let qubits = (0..size as u64).map(|i| QubitId(self.next_qubit + i)).collect();
        self.next_qubit += size as u64;
        let reg = QuantumRegister::new(name, qubits);
        trace!(register = %reg, "added quantum register");
        self.qregs.push(reg.clone());
        Ok(reg)
    }

    /// Allocates a fresh classical register of `size` bits.
    pub fn add_creg(&mut self, name: &str, size: usize) -> Result<ClassicalRegister> {
        if self.creg(name).is_some() {
            return Err(RemoteOpsError::DuplicateRegister { name: name.to_string() });
        }
        let clbits = (0..size as u64).map(|i| ClbitId(self.next_clbit + i)).collect();
        self.next_clbit += size as u64;
        let reg = ClassicalRegister::new(name, clbits);
        trace!(register = %reg, "added classical register");
        self.cregs.push(reg.clone());
        Ok(reg)
    }

    /// Appends an existing register value as is, keeping its qubit ids.
    ///
    /// # Errors
    /// `DuplicateRegister` on a name clash, `InvalidOperation` if any of its
    /// qubits already belongs to another register of this circuit.
    pub fn append_qreg(&mut self, reg: QuantumRegister) -> Result<()> {
        if self.qreg(reg.name()).is_some() {
            return Err(RemoteOpsError::DuplicateRegister { name: reg.name().to_string() });
        }
        if let Some(q) = reg.qubits().iter().find(|q| self.contains_qubit(**q)) {
            return Err(RemoteOpsError::InvalidOperation {
                message: format!("qubit {} of register '{}' is already allocated", q, reg.name()),
            });
        }
        if let Some(max) = reg.qubits().iter().map(|q| q.0).max() {
            self.next_qubit = self.next_qubit.max(max + 1);
        }
        trace!(register = %reg, "appended quantum register");
        self.qregs.push(reg);
        Ok(())
    }

    /// Classical counterpart of [`Circuit::append_qreg`].
    pub fn append_creg(&mut self, reg: ClassicalRegister) -> Result<()> {
        if self.creg(reg.name()).is_some() {
            return Err(RemoteOpsError::DuplicateRegister { name: reg.name().to_string() });
        }
        if let Some(c) = reg.clbits().iter().find(|c| self.contains_clbit(**c)) {
            return Err(RemoteOpsError::InvalidOperation {
                message: format!("bit {} of register '{}' is already allocated", c, reg.name()),
            });
        }
        if let Some(max) = reg.clbits().iter().map(|c| c.0).max() {
            self.next_clbit = self.next_clbit.max(max + 1);
        }
        trace!(register = %reg, "appended classical register");
        self.cregs.push(reg);
        Ok(())
    }

    /// Returns `true` if this exact register (name and qubits) is part of the circuit.
    pub fn has_qreg(&self, reg: &QuantumRegister) -> bool {
        self.qregs.iter().any(|r| r == reg)
    }

    /// Returns `true` if this exact register (name and bits) is part of the circuit.
    pub fn has_creg(&self, reg: &ClassicalRegister) -> bool {
        self.cregs.iter().any(|r| r == reg)
    }

    /// Quantum register lookup by name.
    pub fn qreg(&self, name: &str) -> Option<&QuantumRegister> {
        self.qregs.iter().find(|r| r.name() == name)
    }

    /// Classical register lookup by name.
    pub fn creg(&self, name: &str) -> Option<&ClassicalRegister> {
        self.cregs.iter().find(|r| r.name() == name)
    }

    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// All qubits, in register order.
    pub fn qubits(&self) -> Vec<QubitId> {
        self.qregs.iter().flat_map(|r| r.qubits().iter().copied()).collect()
    }

    /// All classical bits, in register order.
    pub fn clbits(&self) -> Vec<ClbitId> {
        self.cregs.iter().flat_map(|r| r.clbits().iter().copied()).collect()
    }

    pub fn num_qubits(&self) -> usize {
        self.qregs.iter().map(QuantumRegister::len).sum()
    }

    pub fn num_clbits(&self) -> usize {
        self.cregs.iter().map(ClassicalRegister::len).sum()
    }

    pub fn contains_qubit(&self, qubit: QubitId) -> bool {
        self.qregs.iter().any(|r| r.contains(qubit))
    }

    pub fn contains_clbit(&self, clbit: ClbitId) -> bool {
        self.cregs.iter().any(|r| r.contains(clbit))
    }

    /// Register name and index of `qubit`, used for labels.
    pub fn locate_qubit(&self, qubit: QubitId) -> Option<(&str, usize)> {
        self.qregs.iter().find_map(|r| {
            r.qubits().iter().position(|q| *q == qubit).map(|i| (r.name(), i))
        })
    }

    /// Adds a single operation to the end of the circuit's sequence.
    ///
    /// # Errors
    /// Fails if the operation refers to a qubit or bit the circuit does not own,
    /// repeats a qubit, or is a malformed composite instruction.
    pub fn add_operation(&mut self, op: Operation) -> Result<&mut Self> {
        self.check_operation(&op)?;
        self.operations.push(op);
        Ok(self)
    }

    /// Adds multiple operations from an iterator, stopping at the first invalid one.
    pub fn add_operations<I>(&mut self, ops: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self.add_operation(op)?;
        }
        Ok(self)
    }

    /// Replaces the entire operation list, keeping the registers.
    pub fn set_operations(&mut self, ops: Vec<Operation>) -> Result<()> {
        for op in &ops {
            self.check_operation(op)?;
        }
        self.operations = ops;
        Ok(())
    }

    /// Removes and returns the operation list.
    pub(crate) fn take_operations(&mut self) -> Vec<Operation> {
        std::mem::take(&mut self.operations)
    }

    /// A circuit with the same registers and no operations.
    pub fn empty_like(&self) -> Circuit {
        Circuit {
            qregs: self.qregs.clone(),
            cregs: self.cregs.clone(),
            operations: Vec::new(),
            next_qubit: self.next_qubit,
            next_clbit: self.next_clbit,
        }
    }

    /// Returns a slice containing the ordered sequence of operations in this circuit.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the total number of operations defined in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of operations per name (conditionals counted under the guarded gate).
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for op in &self.operations {
            *counts.entry(op.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Appends a Hadamard.
    pub fn h(&mut self, target: QubitId) -> Result<&mut Self> {
        self.add_operation(Operation::Hadamard { target })
    }

    /// Appends a Pauli X.
    pub fn x(&mut self, target: QubitId) -> Result<&mut Self> {
        self.add_operation(Operation::PauliX { target })
    }

    /// Appends a Pauli Z.
    pub fn z(&mut self, target: QubitId) -> Result<&mut Self> {
        self.add_operation(Operation::PauliZ { target })
    }

    /// Appends `Rz(phi)`.
    pub fn rz(&mut self, phi: f64, target: QubitId) -> Result<&mut Self> {
        self.add_operation(Operation::Rz { target, phi })
    }

    /// Appends a CNOT.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> Result<&mut Self> {
        self.add_operation(Operation::Cnot { control, target })
    }

    pub fn swap(&mut self, qubit1: QubitId, qubit2: QubitId) -> Result<&mut Self> {
        self.add_operation(Operation::Swap { qubit1, qubit2 })
    }

    /// Appends `exp(-i phi/2 Z⊗Z)`.
    pub fn rzz(&mut self, phi: f64, qubit1: QubitId, qubit2: QubitId) -> Result<&mut Self> {
        self.add_operation(Operation::Rzz { qubit1, qubit2, phi })
    }

    /// Appends the controlled phase `diag(1, 1, 1, e^{i phi})`.
    pub fn cp(&mut self, phi: f64, control: QubitId, target: QubitId) -> Result<&mut Self> {
        self.add_operation(Operation::CPhase { control, target, phi })
    }

    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> Result<&mut Self> {
        self.add_operation(Operation::Measure { qubit, clbit })
    }

    /// Appends X on `target` conditioned on `clbit == 1`.
    pub fn x_if(&mut self, target: QubitId, clbit: ClbitId) -> Result<&mut Self> {
        self.add_operation(Operation::PauliX { target }.c_if(clbit, true))
    }

    /// Appends Z on `target` conditioned on `clbit == 1`.
    pub fn z_if(&mut self, target: QubitId, clbit: ClbitId) -> Result<&mut Self> {
        self.add_operation(Operation::PauliZ { target }.c_if(clbit, true))
    }

    fn check_operation(&self, op: &Operation) -> Result<()> {
        let qubits = op.involved_qubits();
        for q in &qubits {
            if !self.contains_qubit(*q) {
                return Err(RemoteOpsError::UnknownQubit {
                    qubit: *q,
                    message: format!(
                        "'{}' refers to a qubit outside the circuit's registers",
                        op.name()
                    ),
                });
            }
        }
        let unique: HashSet<&QubitId> = qubits.iter().collect();
        if unique.len() != qubits.len() {
            return Err(RemoteOpsError::InvalidOperation {
                message: format!("'{}' uses the same qubit more than once", op.name()),
            });
        }
        for c in op.involved_clbits() {
            if !self.contains_clbit(c) {
                return Err(RemoteOpsError::UnknownClbit {
                    clbit: c,
                    message: format!(
                        "'{}' refers to a bit outside the circuit's registers",
                        op.name()
                    ),
                });
            }
        }
        match op {
            Operation::Remote(instr) => instr.validate(),
            Operation::Conditional { op: inner, .. } => match inner.as_ref() {
                Operation::Conditional { .. } | Operation::Remote(_) => {
                    Err(RemoteOpsError::InvalidOperation {
                        message: "only primitive gates can be classically conditioned".to_string(),
                    })
                }
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Fluent construction of a [`Circuit`].
///
/// Registers are declared first; their qubits can be looked up with
/// [`CircuitBuilder::qubit`] / [`CircuitBuilder::clbit`] before chaining
/// operations. The first error encountered is reported by [`CircuitBuilder::build`].
///
/// ```
/// # use remote_ops::CircuitBuilder;
/// let builder = CircuitBuilder::new().with_qreg("alice", 1).with_qreg("bob", 1);
/// let (a, b) = (builder.qubit("alice", 0).unwrap(), builder.qubit("bob", 0).unwrap());
/// let circuit = builder
///     .add_op(remote_ops::Operation::Hadamard { target: a })
///     .add_op(remote_ops::Operation::Cnot { control: a, target: b })
///     .build()
///     .unwrap();
/// assert_eq!(circuit.len(), 2);
/// ```
pub struct CircuitBuilder {
    circuit: Circuit,
    error: Option<RemoteOpsError>,
}

impl CircuitBuilder {
    /// Creates a new, empty CircuitBuilder.
    pub fn new() -> Self {
        Self { circuit: Circuit::new(), error: None }
    }

    /// Declares a quantum register.
    pub fn with_qreg(mut self, name: &str, size: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.circuit.add_qreg(name, size) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Declares a classical register.
    pub fn with_creg(mut self, name: &str, size: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.circuit.add_creg(name, size) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Qubit `index` of the register `name`, if both exist.
    pub fn qubit(&self, name: &str, index: usize) -> Option<QubitId> {
        self.circuit.qreg(name).and_then(|r| r.get(index))
    }

    /// Bit `index` of the classical register `name`, if both exist.
    pub fn clbit(&self, name: &str, index: usize) -> Option<ClbitId> {
        self.circuit.creg(name).and_then(|r| r.get(index))
    }

    /// Adds a single operation to the circuit being built.
    pub fn add_op(mut self, op: Operation) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.circuit.add_operation(op) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self = self.add_op(op);
        }
        self
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Result<Circuit> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.circuit),
        }
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num_qubits = self.num_qubits();
        if self.operations.is_empty() {
            return writeln!(f, "Circuit[0 operations on {} qubits]", num_qubits);
        }

        let ops = &self.operations;
        let num_ops = ops.len();

        let qubits = self.qubits();
        let qubit_to_row: HashMap<QubitId, usize> =
            qubits.iter().enumerate().map(|(i, q)| (*q, i)).collect();
        let labels: Vec<String> = qubits
            .iter()
            .map(|q| match self.locate_qubit(*q) {
                Some((name, idx)) => format!("{}[{}]", name, idx),
                None => q.to_string(),
            })
            .collect();
        let max_label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let label_padding = " ".repeat(max_label_width + 2);

        const GATE_WIDTH: usize = 7;
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; num_qubits];
        // v_connect[row][t] is the connector drawn below `row` at time `t`
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_ops]; num_qubits];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!(
                    "{}{}{}",
                    H_WIRE.to_string().repeat(pre_dashes),
                    symbol,
                    H_WIRE.to_string().repeat(post_dashes)
                )
            }
        }

        fn symbols(op: &Operation) -> Vec<String> {
            match op {
                Operation::Hadamard { .. } => vec!["H".into()],
                Operation::PauliX { .. } => vec!["X".into()],
                Operation::PauliZ { .. } => vec!["Z".into()],
                Operation::Rz { .. } => vec!["Rz".into()],
                Operation::Cnot { .. } => vec!["@".into(), "X".into()],
                Operation::Swap { .. } => vec!["×".into(), "×".into()],
                Operation::Rzz { .. } => vec!["ZZ".into(), "ZZ".into()],
                Operation::CPhase { .. } => vec!["@".into(), "P".into()],
                Operation::Measure { .. } => vec!["M".into()],
                Operation::Conditional { op, .. } => {
                    symbols(op).into_iter().map(|s| format!("{}?", s)).collect()
                }
                Operation::Remote(instr) => {
                    let short = match instr.kind {
                        RemoteKind::GenEpr => "EPR",
                        RemoteKind::RemoteCx => "RCX",
                        RemoteKind::RemoteRzz => "RZZ",
                        RemoteKind::RemoteCrz => "RCZ",
                        RemoteKind::Teleport => "TP",
                    };
                    vec![short.to_string(); instr.qargs.len()]
                }
            }
        }

        for (t, op) in ops.iter().enumerate() {
            let rows: Vec<usize> = op
                .involved_qubits()
                .iter()
                .filter_map(|q| qubit_to_row.get(q).copied())
                .collect();
            for (row, symbol) in rows.iter().zip(symbols(op)) {
                op_grid[*row][t] = format_gate(&symbol);
            }
            if rows.len() > 1 {
                let r_min = rows.iter().copied().min().unwrap_or(0);
                let r_max = rows.iter().copied().max().unwrap_or(0);
                for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                    row_vec[t] = V_WIRE;
                }
            }
        }

        writeln!(f, "Circuit[{} operations on {} qubits]", num_ops, num_qubits)?;
        for r in 0..num_qubits {
            let label = format!("{}: ", labels[r]);
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_qubits - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_ops {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
