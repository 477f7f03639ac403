//! Quantum register: a row of independently measured qubits.
//!
//! Each tick every qubit is re-measured with a fair coin flip. There is no
//! memory of the previous outcome; the register models repeated measurement
//! rather than continuous evolution.

use serde::Serialize;

use crate::random::RandomSource;

/// Number of qubits in the register.
pub const QUBIT_COUNT: usize = 5;

/// Probability threshold: a qubit reads 1 when the draw exceeds it.
const MEASUREMENT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuantumRegister {
    bits: [bool; QUBIT_COUNT],
}

impl QuantumRegister {
    /// All qubits start in |0⟩.
    pub fn new() -> Self {
        Self {
            bits: [false; QUBIT_COUNT],
        }
    }

    /// Re-measure every qubit, one draw per qubit in index order.
    pub fn update<R: RandomSource + ?Sized>(&mut self, src: &mut R) {
        for bit in self.bits.iter_mut() {
            *bit = src.uniform() > MEASUREMENT_THRESHOLD;
        }
    }

    pub fn reset(&mut self) {
        self.bits = [false; QUBIT_COUNT];
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Gate value for an arbitrary index, wrapping around the register.
    pub fn gate(&self, index: usize) -> bool {
        self.bits[index % QUBIT_COUNT]
    }

    pub fn active_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

impl Default for QuantumRegister {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedSource, SequenceSource};

    #[test]
    fn starts_all_false() {
        let reg = QuantumRegister::new();
        assert_eq!(reg.bits(), &[false; QUBIT_COUNT]);
        assert_eq!(reg.active_count(), 0);
    }

    #[test]
    fn measurement_is_strictly_greater_than_half() {
        let mut reg = QuantumRegister::new();
        reg.update(&mut SequenceSource::new(vec![0.6, 0.5, 0.49, 0.99, 0.0]));
        assert_eq!(reg.bits(), &[true, false, false, true, false]);
    }

    #[test]
    fn no_memory_between_ticks() {
        let mut reg = QuantumRegister::new();
        reg.update(&mut FixedSource::new(0.9));
        assert_eq!(reg.active_count(), QUBIT_COUNT);
        reg.update(&mut FixedSource::new(0.1));
        assert_eq!(reg.active_count(), 0);
    }

    #[test]
    fn gate_wraps_index() {
        let mut reg = QuantumRegister::new();
        reg.update(&mut SequenceSource::new(vec![0.9, 0.1, 0.1, 0.1, 0.1]));
        assert!(reg.gate(0));
        assert!(reg.gate(5));
        assert!(!reg.gate(6));
    }

    #[test]
    fn reset_clears_bits() {
        let mut reg = QuantumRegister::new();
        reg.update(&mut FixedSource::new(0.9));
        reg.reset();
        assert_eq!(reg, QuantumRegister::new());
    }
}
