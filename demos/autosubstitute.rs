//! Splitting a circuit across two parties with automatic substitution

use anyhow::Result;
use remote_ops::{autosubstitute, decompose, Circuit, RemoteKind, Simulator};
use std::f64::consts::FRAC_PI_2;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let mut circuit = Circuit::new();
    let alice = circuit.add_qreg("alice", 2)?;
    let bob = circuit.add_qreg("bob", 2)?;
    let out = circuit.add_creg("out", 4)?;

    // A GHZ-style chain that crosses the party boundary once, plus cross-party phases
    circuit
        .h(alice[0])?
        .cx(alice[0], alice[1])?
        .cx(alice[1], bob[0])?
        .cx(bob[0], bob[1])?
        .rzz(FRAC_PI_2, alice[0], bob[1])?
        .cp(FRAC_PI_2, bob[0], alice[1])?;
    println!("Original circuit:\n{}", circuit);

    let substituted = autosubstitute(&mut circuit, (&alice, &bob), &["cx", "rzz", "cp"], None, None)?;
    println!("Substituted {} gate(s):\n{}", substituted, circuit);
    println!("Operation counts: {:?}", circuit.count_ops());

    let expanded = decompose(&mut circuit, &RemoteKind::ALL)?;
    println!("Expanded {} instruction(s) into {} operations", expanded, circuit.len());

    for (i, q) in alice.qubits().iter().chain(bob.qubits()).enumerate() {
        circuit.measure(*q, out[i])?;
    }
    let result = Simulator::new().run(&circuit)?;
    println!("{}", result);
    Ok(())
}
