// src/remote/mod.rs

//! EPR-mediated remote two-qubit operations.
//!
//! Two parties each hold some qubits plus one half of a shared EPR pair. A
//! two-qubit gate between their qubits is carried out without any direct
//! interaction: each party entangles its qubit with its half of the pair,
//! measures, and the other party applies Pauli corrections conditioned on the
//! communicated bits.
//!
//! The workflow mirrors a circuit SDK:
//! 1. [`add_instr`] places opaque, named instructions (`GenEPR`, `RemoteCX`,
//!    `RemoteRZZ`, `RemoteCRZ`, `Teleport`) into a circuit, creating the EPR
//!    registers on demand;
//! 2. [`autosubstitute`] rewrites ordinary gates that straddle two registers
//!    into those instructions;
//! 3. [`decompose`] expands the instructions into primitive gates,
//!    measurements and classically conditioned corrections.

mod protocols;

pub use protocols::{
    build_remote_crz, build_remote_cx, build_remote_zz, build_teleportation, set_ancilla,
};

use crate::circuits::Circuit;
use crate::core::{EPR_CREG_NAME, EPR_QREG_NAME, EPR_REG_SIZE, QubitId, RemoteOpsError, Result};
use crate::operations::{Operation, RemoteInstruction, RemoteKind};
use crate::registers::{ClassicalRegister, QuantumRegister, RegisterRef};
use tracing::{debug, trace};

fn check_pair_capacity(name: &str, size: usize) -> Result<()> {
    if size < EPR_REG_SIZE {
        return Err(RemoteOpsError::RegisterTooSmall {
            name: name.to_string(),
            size,
            required: EPR_REG_SIZE,
        });
    }
    Ok(())
}

/// Returns the classical register EPR operations should write to, adding one
/// to `circ` when needed.
///
/// - `None`: the circuit's `c_epr` register, created if absent.
/// - `Some(Name(n))`: register `n`, created with 2 bits if absent.
/// - `Some(Register(r))`: `r`, appended to the circuit if it is not part of it.
///
/// The boolean is `true` when a register was added.
///
/// # Errors
/// `RegisterTooSmall` if the selected register has fewer than 2 bits. The
/// circuit is not modified in that case.
pub fn get_cregs(
    circ: &mut Circuit,
    creg: Option<RegisterRef<ClassicalRegister>>,
) -> Result<(ClassicalRegister, bool)> {
    let (reg, added) = match creg {
        Some(RegisterRef::Register(reg)) => {
            check_pair_capacity(reg.name(), reg.len())?;
            if circ.has_creg(&reg) {
                (reg, false)
            } else {
                circ.append_creg(reg.clone())?;
                (reg, true)
            }
        }
        other => {
            let name = match other {
                Some(RegisterRef::Name(name)) => name,
                _ => EPR_CREG_NAME.to_string(),
            };
            match circ.creg(&name) {
                Some(reg) => {
                    check_pair_capacity(reg.name(), reg.len())?;
                    (reg.clone(), false)
                }
                None => (circ.add_creg(&name, EPR_REG_SIZE)?, true),
            }
        }
    };
    if added {
        debug!(register = %reg, "added classical register for EPR operations");
    }
    Ok((reg, added))
}

/// Quantum counterpart of [`get_cregs`]; the default register is `q_epr`.
pub fn get_qregs(
    circ: &mut Circuit,
    qreg: Option<RegisterRef<QuantumRegister>>,
) -> Result<(QuantumRegister, bool)> {
    let (reg, added) = match qreg {
        Some(RegisterRef::Register(reg)) => {
            check_pair_capacity(reg.name(), reg.len())?;
            if circ.has_qreg(&reg) {
                (reg, false)
            } else {
                circ.append_qreg(reg.clone())?;
                (reg, true)
            }
        }
        other => {
            let name = match other {
                Some(RegisterRef::Name(name)) => name,
                _ => EPR_QREG_NAME.to_string(),
            };
            match circ.qreg(&name) {
                Some(reg) => {
                    check_pair_capacity(reg.name(), reg.len())?;
                    (reg.clone(), false)
                }
                None => (circ.add_qreg(&name, EPR_REG_SIZE)?, true),
            }
        }
    };
    if added {
        debug!(register = %reg, "added quantum register for EPR operations");
    }
    Ok((reg, added))
}

/// Appends a named EPR-mediated instruction to `circ`.
///
/// A `GenEPR` on the EPR register is always appended first; unless `name` is
/// `"GenEPR"` itself, the named instruction follows with qargs
/// `[qb1, qb2, epr[0], epr[1]]` and cargs `[creg[0], creg[1]]`. Missing EPR
/// registers are created as described in [`get_cregs`] / [`get_qregs`].
///
/// # Errors
/// - `UnknownInstruction` for a name outside `GenEPR`, `RemoteCX`,
///   `RemoteRZZ`, `RemoteCRZ`, `Teleport`;
/// - `InvalidOperation` when a data qubit is missing or the parameter count
///   does not match (`RemoteRZZ`/`RemoteCRZ` take `phi`, the rest nothing);
/// - whatever [`Circuit::add_operation`] reports for the qubits involved,
///   e.g. a data qubit repeated or shared with the EPR register.
///
/// On error `circ` is left exactly as it was.
pub fn add_instr(
    circ: &mut Circuit,
    name: &str,
    qb1: Option<QubitId>,
    qb2: Option<QubitId>,
    params: &[f64],
    epr_creg: Option<RegisterRef<ClassicalRegister>>,
    epr_qreg: Option<RegisterRef<QuantumRegister>>,
) -> Result<()> {
    let kind: RemoteKind = name.parse()?;
    let qargs = match (kind, qb1, qb2) {
        (RemoteKind::GenEpr, _, _) => Vec::new(),
        (_, Some(q1), Some(q2)) => vec![q1, q2],
        _ => {
            return Err(RemoteOpsError::InvalidOperation {
                message: format!("{} needs two data qubits", kind),
            });
        }
    };
    if params.len() != kind.num_params() {
        return Err(RemoteOpsError::InvalidOperation {
            message: format!(
                "{} takes {} parameter(s), got {}",
                kind,
                kind.num_params(),
                params.len()
            ),
        });
    }

    // Registers and operations land in `staged` and are committed together
    let mut staged = circ.clone();
    let (creg, _) = get_cregs(&mut staged, epr_creg)?;
    let (qreg, _) = get_qregs(&mut staged, epr_qreg)?;
    let (epr0, epr1) = (qreg[0], qreg[1]);

    staged.add_operation(Operation::Remote(RemoteInstruction {
        kind: RemoteKind::GenEpr,
        params: Vec::new(),
        qargs: vec![epr0, epr1],
        cargs: Vec::new(),
    }))?;

    if kind != RemoteKind::GenEpr {
        let mut qargs = qargs;
        qargs.extend([epr0, epr1]);
        staged.add_operation(Operation::Remote(RemoteInstruction {
            kind,
            params: params.to_vec(),
            qargs,
            cargs: vec![creg[0], creg[1]],
        }))?;
    }
    *circ = staged;
    trace!(instruction = %kind, "appended EPR-mediated instruction");
    Ok(())
}

/// Appends the primitive expansion of `instr` to `circ`.
pub fn expand_remote(circ: &mut Circuit, instr: &RemoteInstruction) -> Result<()> {
    instr.validate()?;
    let q = &instr.qargs;
    let c = &instr.cargs;
    match instr.kind {
        RemoteKind::GenEpr => set_ancilla(circ, q[0], q[1]),
        RemoteKind::RemoteCx => build_remote_cx(circ, q[0], q[1], q[2], q[3], c),
        RemoteKind::RemoteRzz => build_remote_zz(circ, instr.params[0], q[0], q[1], q[2], q[3], c),
        RemoteKind::RemoteCrz => build_remote_crz(circ, instr.params[0], q[0], q[1], q[2], q[3], c),
        RemoteKind::Teleport => build_teleportation(circ, q[0], q[1], q[2], q[3], c),
    }
}

/// Replaces every composite instruction whose kind is in `gates` with its
/// primitive expansion, keeping all other operations in place.
///
/// Pass [`RemoteKind::ALL`] to expand everything. Returns the number of
/// instructions expanded. On error the circuit is left unchanged.
pub fn decompose(circ: &mut Circuit, gates: &[RemoteKind]) -> Result<usize> {
    let mut expanded = 0;
    let mut new_ops = Vec::with_capacity(circ.len());
    for op in circ.operations() {
        match op {
            Operation::Remote(instr) if gates.contains(&instr.kind) => {
                let mut chunk = circ.empty_like();
                expand_remote(&mut chunk, instr)?;
                new_ops.extend(chunk.take_operations());
                expanded += 1;
            }
            other => new_ops.push(other.clone()),
        }
    }
    circ.set_operations(new_ops)?;
    debug!(expanded, total = circ.len(), "decomposed EPR-mediated instructions");
    Ok(expanded)
}

/// The remote instruction standing in for a local two-qubit gate name.
fn remote_counterpart(gate: &str) -> Option<RemoteKind> {
    match gate {
        "cx" => Some(RemoteKind::RemoteCx),
        "rzz" => Some(RemoteKind::RemoteRzz),
        "cp" => Some(RemoteKind::RemoteCrz),
        _ => None,
    }
}

/// Rewrites two-qubit gates that straddle two registers into EPR-mediated
/// instructions.
///
/// A gate is substituted when its name is listed in `gates` and one of its
/// qubits lies in `reglist.0` and the other in `reglist.1` (either order).
/// Supported names are `cx` → `RemoteCX`, `rzz` → `RemoteRZZ` and
/// `cp` → `RemoteCRZ`. Each substitution emits `GenEPR` followed by the
/// composite instruction, exactly like [`add_instr`]. The EPR registers are
/// resolved once, up front, so they exist even when nothing is substituted.
///
/// [`DEFAULT_SUBSTITUTED_GATES`](crate::core::DEFAULT_SUBSTITUTED_GATES) (`["cx"]`) is the
/// usual choice for `gates`.
/// Returns the number of substituted gates.
///
/// # Errors
/// `UnknownInstruction` if `gates` names a gate without a remote counterpart.
/// Register and substitution failures leave `circ` unchanged.
pub fn autosubstitute(
    circ: &mut Circuit,
    reglist: (&QuantumRegister, &QuantumRegister),
    gates: &[&str],
    epr_qreg: Option<RegisterRef<QuantumRegister>>,
    epr_creg: Option<RegisterRef<ClassicalRegister>>,
) -> Result<usize> {
    if let Some(unsupported) = gates.iter().find(|g| remote_counterpart(g).is_none()) {
        return Err(RemoteOpsError::UnknownInstruction { name: unsupported.to_string() });
    }

    let mut staged = circ.clone();
    let (creg, _) = get_cregs(&mut staged, epr_creg)?;
    let (qreg, _) = get_qregs(&mut staged, epr_qreg)?;
    let (reg_a, reg_b) = reglist;

    let mut substituted = 0;
    let mut new_ops = Vec::with_capacity(circ.len());
    for op in circ.operations() {
        let kind = remote_counterpart(op.name())
            .filter(|_| op.is_two_qubit_gate() && gates.contains(&op.name()));
        let qubits = op.involved_qubits();
        let straddles = qubits.len() == 2
            && ((reg_a.contains(qubits[0]) && reg_b.contains(qubits[1]))
                || (reg_a.contains(qubits[1]) && reg_b.contains(qubits[0])));

        match kind {
            Some(kind) if straddles => {
                let params: Vec<f64> = match op {
                    Operation::Rzz { phi, .. } | Operation::CPhase { phi, .. } => vec![*phi],
                    _ => Vec::new(),
                };
                let mut chunk = staged.empty_like();
                add_instr(
                    &mut chunk,
                    kind.name(),
                    Some(qubits[0]),
                    Some(qubits[1]),
                    &params,
                    Some(RegisterRef::Register(creg.clone())),
                    Some(RegisterRef::Register(qreg.clone())),
                )?;
                new_ops.extend(chunk.take_operations());
                substituted += 1;
            }
            _ => new_ops.push(op.clone()),
        }
    }
    staged.set_operations(new_ops)?;
    *circ = staged;
    debug!(substituted, "substituted register-straddling gates with EPR-mediated instructions");
    Ok(substituted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEFAULT_SUBSTITUTED_GATES;

    #[test]
    fn test_get_cregs_adds_default_once() -> Result<()> {
        let mut circ = Circuit::new();
        let (reg, added) = get_cregs(&mut circ, None)?;
        assert!(added);
        assert_eq!(reg.name(), EPR_CREG_NAME);
        assert_eq!(reg.len(), 2);

        let (again, added_again) = get_cregs(&mut circ, None)?;
        assert!(!added_again);
        assert_eq!(again, reg);
        assert_eq!(circ.cregs().len(), 1);
        Ok(())
    }

    #[test]
    fn test_get_qregs_by_name() -> Result<()> {
        let mut circ = Circuit::new();
        circ.add_qreg("data", 3)?;
        let (reg, added) = get_qregs(&mut circ, Some("bus".into()))?;
        assert!(added);
        assert_eq!(reg.name(), "bus");
        assert_eq!(reg.qubits(), &[QubitId(3), QubitId(4)]);

        let (existing, added) = get_qregs(&mut circ, Some("bus".into()))?;
        assert!(!added);
        assert_eq!(existing, reg);
        Ok(())
    }

    #[test]
    fn test_get_qregs_rejects_small_register() -> Result<()> {
        let mut circ = Circuit::new();
        circ.add_qreg("tiny", 1)?;
        let err = get_qregs(&mut circ, Some("tiny".into())).unwrap_err();
        assert_eq!(
            err,
            RemoteOpsError::RegisterTooSmall { name: "tiny".to_string(), size: 1, required: 2 }
        );
        Ok(())
    }

    #[test]
    fn test_get_cregs_appends_foreign_register() -> Result<()> {
        let mut other = Circuit::new();
        let foreign = other.add_creg("m", 2)?;
        let mut circ = Circuit::new();
        let (reg, added) = get_cregs(&mut circ, Some(foreign.clone().into()))?;
        assert!(added);
        assert!(circ.has_creg(&foreign));
        assert_eq!(reg, foreign);
        Ok(())
    }

    #[test]
    fn test_add_instr_genepr_only() -> Result<()> {
        let mut circ = Circuit::new();
        add_instr(&mut circ, "GenEPR", None, None, &[], None, None)?;
        assert_eq!(circ.len(), 1);
        assert_eq!(circ.operations()[0].name(), "GenEPR");
        assert!(circ.qreg(EPR_QREG_NAME).is_some());
        Ok(())
    }

    #[test]
    fn test_add_instr_unknown_name() {
        let mut circ = Circuit::new();
        let err = add_instr(&mut circ, "RemoteSWAP", None, None, &[], None, None).unwrap_err();
        assert_eq!(err, RemoteOpsError::UnknownInstruction { name: "RemoteSWAP".to_string() });
    }

    #[test]
    fn test_add_instr_requires_phi() -> Result<()> {
        let mut circ = Circuit::new();
        let a = circ.add_qreg("a", 1)?;
        let b = circ.add_qreg("b", 1)?;
        let err =
            add_instr(&mut circ, "RemoteRZZ", Some(a[0]), Some(b[0]), &[], None, None).unwrap_err();
        assert!(matches!(err, RemoteOpsError::InvalidOperation { .. }));
        Ok(())
    }

    #[test]
    fn test_decompose_selected_kinds_only() -> Result<()> {
        let mut circ = Circuit::new();
        let a = circ.add_qreg("a", 1)?;
        let b = circ.add_qreg("b", 1)?;
        add_instr(&mut circ, "RemoteCX", Some(a[0]), Some(b[0]), &[], None, None)?;
        assert_eq!(circ.len(), 2);

        let expanded = decompose(&mut circ, &[RemoteKind::GenEpr])?;
        assert_eq!(expanded, 1);
        let names: Vec<&str> = circ.operations().iter().map(Operation::name).collect();
        assert_eq!(names, vec!["h", "cx", "RemoteCX"]);

        decompose(&mut circ, &RemoteKind::ALL)?;
        assert!(circ.operations().iter().all(|op| !matches!(op, Operation::Remote(_))));
        Ok(())
    }

    #[test]
    fn test_autosubstitute_only_straddling_gates() -> Result<()> {
        let mut circ = Circuit::new();
        let a = circ.add_qreg("a", 2)?;
        let b = circ.add_qreg("b", 1)?;
        circ.cx(a[0], a[1])?.cx(b[0], a[1])?.h(a[0])?;

        let n = autosubstitute(&mut circ, (&a, &b), DEFAULT_SUBSTITUTED_GATES, None, None)?;
        assert_eq!(n, 1);
        let names: Vec<&str> = circ.operations().iter().map(Operation::name).collect();
        assert_eq!(names, vec!["cx", "GenEPR", "RemoteCX", "h"]);
        match &circ.operations()[2] {
            Operation::Remote(instr) => assert_eq!(&instr.qargs[..2], &[b[0], a[1]]),
            other => panic!("expected RemoteCX, got {}", other),
        }
        Ok(())
    }

    #[test]
    fn test_autosubstitute_rejects_unsupported_gate() -> Result<()> {
        let mut circ = Circuit::new();
        let a = circ.add_qreg("a", 1)?;
        let b = circ.add_qreg("b", 1)?;
        let err = autosubstitute(&mut circ, (&a, &b), &["swap"], None, None).unwrap_err();
        assert_eq!(err, RemoteOpsError::UnknownInstruction { name: "swap".to_string() });
        assert!(circ.qreg(EPR_QREG_NAME).is_none());
        Ok(())
    }
}
