//! Constants shared by the EPR-mediated operation builders.

/// Register naming and sizing used when a circuit has no EPR registers yet.
pub mod epr {
    /// Name of the quantum register holding the shared EPR pair.
    pub const EPR_QREG_NAME: &str = "q_epr";
    /// Name of the companion classical register receiving the two measurement bits.
    pub const EPR_CREG_NAME: &str = "c_epr";
    /// Every EPR register carries exactly one pair: two qubits / two bits.
    pub const EPR_REG_SIZE: usize = 2;
    /// Gate names `autosubstitute` rewrites when the caller has no preference.
    pub const DEFAULT_SUBSTITUTED_GATES: &[&str] = &["cx"];
}
