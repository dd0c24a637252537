//! Teleporting a qubit from Alice to Bob through a shared EPR pair

use anyhow::Result;
use remote_ops::{add_instr, decompose, fidelity, Circuit, RemoteKind, Simulator, SimulatorConfig, StateVector};
use num_complex::Complex;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // --- Build Circuit ---
    let mut circuit = Circuit::new();
    let alice = circuit.add_qreg("alice", 1)?;
    let bob = circuit.add_qreg("bob", 1)?;
    let readout = circuit.add_creg("readout", 1)?;
    println!("Registers: {} and {}", alice, bob);

    // 1. Prepare the message: Ry-like rotation H Rz(theta) H gives cos(theta/2)|0> + ...|1>
    let theta = 1.2_f64;
    circuit.h(alice[0])?.rz(theta, alice[0])?.h(alice[0])?;
    println!("  Step 1: Prepared the message on {} with theta = {}", alice[0], theta);

    // 2. Teleport: EPR pair generation plus the Bell-measurement protocol
    add_instr(&mut circuit, "Teleport", Some(alice[0]), Some(bob[0]), &[], None, None)?;
    println!("  Step 2: Added GenEPR + Teleport ({} operations)", circuit.len());
    println!("\nComposite circuit:\n{}", circuit);

    // 3. Expand into gates, measurements and conditioned corrections
    decompose(&mut circuit, &RemoteKind::ALL)?;
    println!("Decomposed circuit:\n{}", circuit);

    // --- Run Simulation ---
    let simulator = Simulator::with_config(SimulatorConfig::default().with_seed(2024).with_step_validation(true));
    let result = simulator.run(&circuit)?;
    println!("{}", result);

    // --- Analysis ---
    // Bob's qubit should now carry the message, Alice's and the EPR qubits |0>
    let c = Complex::new((theta / 2.0).cos(), 0.0);
    let s = Complex::new(0.0, -(theta / 2.0).sin());
    let message = StateVector::new(vec![c, s]);
    let expected = StateVector::basis(1, 0).tensor(&message).tensor(&StateVector::basis(2, 0));
    if let Some(state) = result.final_state() {
        println!("Fidelity with the ideal outcome: {:.12}", fidelity(state, &expected)?);
    }
    println!("P(bob = 1) = {:.6} (expected {:.6})", result.probability_of_one(bob[0]).unwrap_or(f64::NAN), (theta / 2.0).sin().powi(2));

    // Reading Bob's qubit gives the message statistics
    circuit.measure(bob[0], readout[0])?;
    let ones = (0..200u64)
        .map(|seed| Simulator::with_config(SimulatorConfig::default().with_seed(seed)).run(&circuit))
        .collect::<Result<Vec<_>, _>>()?
        .iter()
        .filter(|r| r.register_value("readout") == Some(1))
        .count();
    println!("Bob read 1 in {}/200 shots", ones);
    Ok(())
}
