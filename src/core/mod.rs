// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod state;
pub mod constants;

// Re-export public types for convenient access via `remote_ops::core::TypeName`
pub use error::{ClbitId, QubitId, RemoteOpsError, Result};
pub use state::StateVector;
pub use constants::epr::{DEFAULT_SUBSTITUTED_GATES, EPR_CREG_NAME, EPR_QREG_NAME, EPR_REG_SIZE};
