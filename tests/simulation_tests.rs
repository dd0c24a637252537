// tests/simulation_tests.rs

use remote_ops::{
    Circuit, CircuitBuilder, ClbitId, Operation, QubitId, RemoteOpsError, SimulationResult, Simulator,
    SimulatorConfig,
};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

const TEST_TOLERANCE: f64 = 1e-9;

fn seeded(seed: u64) -> Simulator {
    Simulator::with_config(SimulatorConfig::default().with_seed(seed))
}

// Helper function to check a measured bit in the result
fn check_clbit(result: &SimulationResult, clbit: ClbitId, expected: bool) {
    match result.clbit(clbit) {
        Some(value) => assert_eq!(value, expected, "Mismatch for {}", clbit),
        None => panic!("{} was never written", clbit),
    }
}

#[test]
fn test_empty_circuit() -> Result<(), RemoteOpsError> {
    let circuit = Circuit::new();
    let result = Simulator::new().run(&circuit)?;

    assert!(result.all_clbits().is_empty(), "Empty circuit should yield empty results");
    assert!(result.final_state().is_none());
    assert!(result.measurements().is_empty());
    Ok(())
}

#[test]
fn test_initial_state_measurement() -> Result<(), RemoteOpsError> {
    let mut circuit = Circuit::new();
    let q = circuit.add_qreg("q", 2)?;
    let c = circuit.add_creg("c", 2)?;
    circuit.measure(q[0], c[0])?.measure(q[1], c[1])?;

    let result = Simulator::new().run(&circuit)?;
    check_clbit(&result, c[0], false);
    check_clbit(&result, c[1], false);
    assert_eq!(result.register_value("c"), Some(0));
    assert!(result.measurements().iter().all(|m| (m.probability - 1.0).abs() < TEST_TOLERANCE));
    Ok(())
}

#[test]
fn test_pauli_x_then_measure() -> Result<(), RemoteOpsError> {
    let circuit = CircuitBuilder::new()
        .with_qreg("q", 1)
        .with_creg("c", 1)
        .add_op(Operation::PauliX { target: QubitId(0) })
        .add_op(Operation::Measure { qubit: QubitId(0), clbit: ClbitId(0) })
        .build()?;

    let result = Simulator::new().run(&circuit)?;
    check_clbit(&result, ClbitId(0), true);
    Ok(())
}

#[test]
fn test_builder_reports_unknown_qubit() {
    let built = CircuitBuilder::new()
        .with_qreg("q", 1)
        .add_op(Operation::Hadamard { target: QubitId(5) })
        .build();
    assert!(matches!(built, Err(RemoteOpsError::UnknownQubit { qubit: QubitId(5), .. })));
}

#[test]
fn test_bell_state_outcomes_are_correlated() -> Result<(), RemoteOpsError> {
    let mut circuit = Circuit::new();
    let q = circuit.add_qreg("q", 2)?;
    let c = circuit.add_creg("c", 2)?;
    circuit.h(q[0])?.cx(q[0], q[1])?.measure(q[0], c[0])?.measure(q[1], c[1])?;

    let mut seen = [false; 2];
    for seed in 0..32 {
        let result = seeded(seed).run(&circuit)?;
        let value = result.register_value("c").unwrap_or(99);
        assert!(value == 0b00 || value == 0b11, "uncorrelated outcome {:02b}", value);
        seen[usize::from(value == 0b11)] = true;

        let first = result.measurements()[0];
        assert!((first.probability - 0.5).abs() < TEST_TOLERANCE);
        let second = result.measurements()[1];
        assert!((second.probability - 1.0).abs() < TEST_TOLERANCE);
    }
    assert!(seen[0] && seen[1], "both outcomes should appear over 32 seeds");
    Ok(())
}

#[test]
fn test_same_seed_same_outcomes() -> Result<(), RemoteOpsError> {
    let mut circuit = Circuit::new();
    let q = circuit.add_qreg("q", 4)?;
    let c = circuit.add_creg("c", 4)?;
    for i in 0..4 {
        circuit.h(q[i])?.measure(q[i], c[i])?;
    }
    let first = seeded(7).run(&circuit)?;
    let second = seeded(7).run(&circuit)?;
    assert_eq!(first.all_clbits(), second.all_clbits());
    assert_eq!(first.measurements(), second.measurements());
    Ok(())
}

#[test]
fn test_mid_circuit_measurement_drives_correction() -> Result<(), RemoteOpsError> {
    // Measure a |+> qubit, copy the outcome onto a second qubit with a
    // conditioned X, then undo the first qubit: both end in |0> only if the
    // correction saw the right bit.
    let mut circuit = Circuit::new();
    let q = circuit.add_qreg("q", 2)?;
    let c = circuit.add_creg("c", 1)?;
    circuit.h(q[0])?.measure(q[0], c[0])?.x_if(q[1], c[0])?.cx(q[0], q[1])?.x_if(q[0], c[0])?;

    for seed in 0..16 {
        let result = seeded(seed).run(&circuit)?;
        let state = result.final_state().expect("two qubits");
        assert!((state.probability(0b00) - 1.0).abs() < TEST_TOLERANCE, "seed {}: {}", seed, state);
    }
    Ok(())
}

#[test]
fn test_conditional_on_false_value() -> Result<(), RemoteOpsError> {
    let mut circuit = Circuit::new();
    let q = circuit.add_qreg("q", 2)?;
    let c = circuit.add_creg("c", 1)?;
    circuit.measure(q[0], c[0])?;
    circuit.add_operation(Operation::PauliX { target: q[1] }.c_if(c[0], false))?;

    let result = Simulator::new().run(&circuit)?;
    assert!((result.probability_of_one(q[1]).unwrap_or(0.0) - 1.0).abs() < TEST_TOLERANCE);
    Ok(())
}

#[test]
fn test_unwritten_condition_bit_reads_zero() -> Result<(), RemoteOpsError> {
    let mut circuit = Circuit::new();
    let q = circuit.add_qreg("q", 1)?;
    let c = circuit.add_creg("c", 1)?;
    circuit.x_if(q[0], c[0])?;

    let result = Simulator::new().run(&circuit)?;
    assert!(result.probability_of_one(q[0]).unwrap_or(1.0) < TEST_TOLERANCE);
    assert_eq!(result.clbit(c[0]), None);
    assert_eq!(result.register_value("c"), Some(0));
    Ok(())
}

#[test]
fn test_phase_gates_on_plus_state() -> Result<(), RemoteOpsError> {
    // Rz(pi) on |+> gives |-> up to phase; H maps that to |1>
    let mut circuit = Circuit::new();
    let q = circuit.add_qreg("q", 2)?;
    circuit.h(q[0])?.rz(PI, q[0])?.h(q[0])?;
    // CP(pi) on |11> is -|11>; Z on the target undoes it
    circuit.x(q[1])?.cp(PI, q[0], q[1])?.z(q[1])?;

    let result = Simulator::new().run(&circuit)?;
    let state = result.final_state().expect("two qubits");
    assert!((state.probability(0b11) - 1.0).abs() < TEST_TOLERANCE, "{}", state);
    Ok(())
}

#[test]
fn test_swap_and_final_state_order() -> Result<(), RemoteOpsError> {
    let mut circuit = Circuit::new();
    let a = circuit.add_qreg("a", 1)?;
    let b = circuit.add_qreg("b", 1)?;
    circuit.h(a[0])?.swap(a[0], b[0])?;

    let result = Simulator::new().run(&circuit)?;
    assert_eq!(result.qubit_order(), &[a[0], b[0]]);
    let state = result.final_state().expect("two qubits");
    assert!((state.vector()[0b00].re - FRAC_1_SQRT_2).abs() < TEST_TOLERANCE);
    assert!((state.vector()[0b01].re - FRAC_1_SQRT_2).abs() < TEST_TOLERANCE);
    assert!(result.probability_of_one(a[0]).unwrap_or(1.0) < TEST_TOLERANCE);
    Ok(())
}

#[test]
fn test_result_display_lists_registers() -> Result<(), RemoteOpsError> {
    let mut circuit = Circuit::new();
    let q = circuit.add_qreg("q", 1)?;
    let c = circuit.add_creg("out", 1)?;
    circuit.x(q[0])?.measure(q[0], c[0])?;

    let text = Simulator::new().run(&circuit)?.to_string();
    assert!(text.contains("Measurements:"), "{}", text);
    assert!(text.contains("out = 1"), "{}", text);
    Ok(())
}

#[test]
fn test_circuit_display_labels_registers() -> Result<(), RemoteOpsError> {
    let mut circuit = Circuit::new();
    let alice = circuit.add_qreg("alice", 1)?;
    let bob = circuit.add_qreg("bob", 1)?;
    circuit.h(alice[0])?.cx(alice[0], bob[0])?;

    let text = circuit.to_string();
    assert!(text.starts_with("Circuit[2 operations on 2 qubits]"), "{}", text);
    assert!(text.contains("alice[0]: "), "{}", text);
    assert!(text.contains("bob[0]: "), "{}", text);
    assert!(text.contains('│'), "{}", text);
    Ok(())
}

#[test]
fn test_pauli_x_on_each_qubit_of_register() -> Result<(), RemoteOpsError> {
    let mut circuit = Circuit::new();
    let q = circuit.add_qreg("q", 3)?;
    let c = circuit.add_creg("c", 3)?;
    for i in 0..3 {
        circuit.x(q[i])?;
    }
    for i in 0..3 {
        circuit.measure(q[i], c[i])?;
    }

    let result = Simulator::new().run(&circuit)?;
    assert_eq!(result.register_value("c"), Some(0b111));
    let state = result.final_state().expect("three qubits");
    assert!((state.probability(0b111) - 1.0).abs() < TEST_TOLERANCE, "{}", state);
    Ok(())
}

#[test]
fn test_gate_on_last_qubit_leaves_others() -> Result<(), RemoteOpsError> {
    let mut circuit = Circuit::new();
    let q = circuit.add_qreg("q", 3)?;
    circuit.x(q[0])?.h(q[2])?;

    let result = Simulator::new().run(&circuit)?;
    assert!((result.probability_of_one(q[0]).unwrap_or(0.0) - 1.0).abs() < TEST_TOLERANCE);
    assert!(result.probability_of_one(q[1]).unwrap_or(1.0) < TEST_TOLERANCE);
    assert!((result.probability_of_one(q[2]).unwrap_or(0.0) - 0.5).abs() < TEST_TOLERANCE);
    Ok(())
}
