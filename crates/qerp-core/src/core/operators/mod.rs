//! Second-quantized operators and their qubit images.

pub mod fermionic;
pub mod pauli;
pub mod qubit;
