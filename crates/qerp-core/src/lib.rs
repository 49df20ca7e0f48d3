//! # QERP Core Library
//!
//! Builds the per-fragment inputs of a density matrix embedding (DMET) study: a restricted
//! Hartree-Fock reference energy, an active-space electronic Hamiltonian in second
//! quantization, and the same Hamiltonian encoded as a sum of Pauli strings for a
//! qubit-based eigensolver.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Geometry`, `Molecule`), the
//!   Gaussian basis library, molecular integrals, fermionic and qubit operators, and XYZ I/O.
//!
//! - **[`engine`]: The Numerical Stages.** Configuration, error types, progress reporting and
//!   the individual pipeline stages: the restricted Hartree-Fock reference solver, the
//!   full-space electronic problem, active-space selection and qubit encoding.
//!
//! - **[`workflows`]: The Public API.** Ties the stages together into a single fragment
//!   build that either returns a complete, immutable [`workflows::fragment::DMETFragment`]
//!   or the first error encountered.

pub mod core;
pub mod engine;
pub mod workflows;
