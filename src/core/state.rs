// src/core/state.rs

use num_complex::Complex;
use num_traits::Zero;
use std::fmt;

/// Dense amplitude vector over `N` qubits (dimension `2^N`).
///
/// Basis index bits follow the simulator's qubit order: the first qubit of the
/// circuit is the most significant bit, so `|q0 q1 ... q(N-1)>` maps to the
/// integer with `q0` in the highest position.
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct StateVector {
    amplitudes: Vec<Complex<f64>>,
}

impl StateVector {
    /// Creates a state from raw amplitudes. The length should be a power of two;
    /// normalization is not enforced here.
    pub fn new(amplitudes: Vec<Complex<f64>>) -> Self {
        Self { amplitudes }
    }

    /// The computational basis state `|index>` in a space of `num_qubits` qubits.
    pub fn basis(num_qubits: usize, index: usize) -> Self {
        let dim = 1usize << num_qubits;
        let mut amplitudes = vec![Complex::zero(); dim];
        if index < dim {
            amplitudes[index] = Complex::new(1.0, 0.0);
        }
        Self { amplitudes }
    }

    /// Kronecker product `self ⊗ other`; `self` occupies the high-order bits.
    pub fn tensor(&self, other: &StateVector) -> StateVector {
        let mut amplitudes = Vec::with_capacity(self.dim() * other.dim());
        for a in &self.amplitudes {
            for b in &other.amplitudes {
                amplitudes.push(a * b);
            }
        }
        StateVector { amplitudes }
    }

    /// Provides read-only access to the amplitudes.
    pub fn vector(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    pub(crate) fn vector_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.amplitudes
    }

    /// Number of basis states.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Number of qubits described, i.e. `log2(dim)`.
    pub fn num_qubits(&self) -> usize {
        self.amplitudes.len().trailing_zeros() as usize
    }

    /// Sum of squared amplitude magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Probability of basis state `index`.
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes.get(index).map(|c| c.norm_sqr()).unwrap_or(0.0)
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}
