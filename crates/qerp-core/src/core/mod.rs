//! # Core Module
//!
//! Fundamental, stateless building blocks of the fragment pipeline.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Elements, validated geometries and molecules
//! - **File I/O** ([`io`]) - Reading and writing XYZ geometry files
//! - **Basis Sets** ([`basis`]) - Contracted Cartesian Gaussian basis sets loaded from TOML
//! - **Molecular Integrals** ([`integrals`]) - Overlap, kinetic, nuclear attraction and
//!   electron repulsion integrals over Gaussian functions
//! - **Operators** ([`operators`]) - Second-quantized fermionic operators, Pauli strings and
//!   qubit operators
//!
//! ## Scientific Foundation
//!
//! - **Gaussian-type orbitals** with McMurchie-Davidson Hermite expansions
//! - **Second quantization** over spin-orbital registers (alpha block first, then beta)
//! - **Fermion-to-qubit encodings** built from Pauli algebra

pub mod basis;
pub mod integrals;
pub mod io;
pub mod models;
pub mod operators;
