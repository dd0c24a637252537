//! Remote CNOT between two parties, compared against the local gate

use anyhow::Result;
use remote_ops::{add_instr, decompose, states_equivalent, Circuit, RemoteKind, Simulator, SimulatorConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Alice's control in |+>, Bob's target in |0>: the CNOT entangles them
    let mut remote = Circuit::new();
    let alice = remote.add_qreg("alice", 1)?;
    let bob = remote.add_qreg("bob", 1)?;
    remote.h(alice[0])?;
    add_instr(&mut remote, "RemoteCX", Some(alice[0]), Some(bob[0]), &[], None, None)?;
    decompose(&mut remote, &RemoteKind::ALL)?;
    println!("Remote CNOT:\n{}", remote);

    // Same registers, plain CNOT, EPR qubits idle
    let mut local = Circuit::new();
    let a = local.add_qreg("alice", 1)?;
    let b = local.add_qreg("bob", 1)?;
    local.add_creg("c_epr", 2)?;
    local.add_qreg("q_epr", 2)?;
    local.h(a[0])?.cx(a[0], b[0])?;
    let expected = Simulator::new().run(&local)?;

    for seed in 0..4 {
        let result = Simulator::with_config(SimulatorConfig::default().with_seed(seed)).run(&remote)?;
        let c_epr = result.register_value("c_epr").unwrap_or_default();
        let matches = match (result.final_state(), expected.final_state()) {
            (Some(r), Some(l)) => states_equivalent(r, l, None)?,
            _ => false,
        };
        println!("seed {}: c_epr = {:02b}, matches local CNOT: {}", seed, c_epr, matches);
    }
    Ok(())
}
