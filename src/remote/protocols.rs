// src/remote/protocols.rs

//! Primitive expansions of the EPR-mediated instructions.
//!
//! Every builder assumes `epr0`/`epr1` hold the pair `(|00> + |11>)/sqrt(2)`
//! (see [`set_ancilla`]) and writes its two measurement results to
//! `creg[0]`/`creg[1]`. On return both EPR qubits are back in `|0>`, except for
//! [`build_teleportation`], where `epr1` receives the prior state of `targ`.
//! The data qubits only ever interact with their own half of the pair; all
//! coupling between them flows through measurement and classically
//! conditioned Pauli corrections.

use crate::circuits::Circuit;
use crate::core::{ClbitId, QubitId, RemoteOpsError, Result};

fn epr_bits(creg: &[ClbitId]) -> Result<(ClbitId, ClbitId)> {
    match creg {
        [c0, c1, ..] => Ok((*c0, *c1)),
        _ => Err(RemoteOpsError::InvalidOperation {
            message: format!("EPR-mediated operations need 2 classical bits, got {}", creg.len()),
        }),
    }
}

/// Prepares the EPR pair on `epr0`, `epr1` from `|00>`.
pub fn set_ancilla(circ: &mut Circuit, epr0: QubitId, epr1: QubitId) -> Result<()> {
    circ.h(epr0)?.cx(epr0, epr1)?;
    Ok(())
}

/// Remote controlled phase `diag(1, 1, 1, e^{i phi})` on (`ctrl`, `targ`).
///
/// After the `Rz(phi/2)` pre-rotations, `epr1` is turned into a copy of `ctrl`
/// and then of the parity `ctrl ⊕ targ`, and `Rz(-phi/2)` on that parity
/// supplies the cross term. Exact up to the global phase `e^{-i phi/4}`.
pub fn build_remote_crz(
    circ: &mut Circuit,
    phi: f64,
    ctrl: QubitId,
    targ: QubitId,
    epr0: QubitId,
    epr1: QubitId,
    creg: &[ClbitId],
) -> Result<()> {
    let (c0, c1) = epr_bits(creg)?;
    circ.rz(phi / 2.0, ctrl)?.rz(phi / 2.0, targ)?;

    circ.cx(ctrl, epr0)?.measure(epr0, c0)?.x_if(epr1, c0)?;

    circ.cx(targ, epr1)?.rz(-phi / 2.0, epr1)?;

    circ.h(epr1)?.measure(epr1, c1)?;

    circ.z_if(ctrl, c1)?.z_if(targ, c1)?;

    circ.x_if(epr0, c0)?.x_if(epr1, c1)?;
    Ok(())
}

/// Remote `exp(-i phi/2 Z⊗Z)` on (`qb1`, `qb2`).
pub fn build_remote_zz(
    circ: &mut Circuit,
    phi: f64,
    qb1: QubitId,
    qb2: QubitId,
    epr0: QubitId,
    epr1: QubitId,
    creg: &[ClbitId],
) -> Result<()> {
    let (c0, c1) = epr_bits(creg)?;
    circ.cx(qb1, epr0)?.cx(qb2, epr1)?;

    // epr1 now holds the parity qb1 ⊕ qb2 once corrected by the epr0 outcome
    circ.measure(epr0, c0)?.x_if(epr1, c0)?;

    circ.rz(phi, epr1)?.h(epr1)?.measure(epr1, c1)?;

    circ.z_if(qb1, c1)?.z_if(qb2, c1)?;

    circ.x_if(epr0, c0)?.x_if(epr1, c1)?;
    Ok(())
}

/// Remote CNOT with `ctrl` next to `epr0` and `targ` next to `epr1`.
pub fn build_remote_cx(
    circ: &mut Circuit,
    ctrl: QubitId,
    targ: QubitId,
    epr0: QubitId,
    epr1: QubitId,
    creg: &[ClbitId],
) -> Result<()> {
    let (c0, c1) = epr_bits(creg)?;
    circ.cx(ctrl, epr0)?.cx(epr1, targ)?;

    // The epr1 correction is applied after cx(epr1, targ), so targ needs it too.
    circ.measure(epr0, c0)?.x_if(epr1, c0)?.x_if(targ, c0)?;
    circ.h(epr1)?.measure(epr1, c1)?;
    circ.z_if(ctrl, c1)?;

    circ.x_if(epr0, c0)?.x_if(epr1, c1)?;
    Ok(())
}

/// Teleports the state of `source` onto `targ`.
///
/// `source` and `epr0` end in `|0>`; `epr1` ends holding what `targ` held before.
pub fn build_teleportation(
    circ: &mut Circuit,
    source: QubitId,
    targ: QubitId,
    epr0: QubitId,
    epr1: QubitId,
    creg: &[ClbitId],
) -> Result<()> {
    let (c0, c1) = epr_bits(creg)?;
    circ.cx(source, epr0)?.h(source)?;

    circ.measure(source, c0)?.measure(epr0, c1)?;
    circ.x_if(epr1, c1)?.z_if(epr1, c0)?;

    circ.x_if(source, c0)?.x_if(epr0, c1)?;

    circ.swap(epr1, targ)?;
    Ok(())
}
