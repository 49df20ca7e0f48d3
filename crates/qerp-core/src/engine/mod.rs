//! # Engine Module
//!
//! The numerical stages of the fragment pipeline and the configuration, error and progress
//! types they share.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Fragment options, builder and active-space defaults
//! - **Error Handling** ([`error`]) - Format, configuration and solver errors
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Reference State** ([`scf`]) - Restricted (open-shell capable) Hartree-Fock with DIIS
//! - **Electronic Problem** ([`problem`]) - Molecular-orbital integrals and particle counts
//! - **Active Space** ([`active_space`]) - Frozen-core reduction to an active window
//! - **Qubit Encoding** ([`encoding`]) - Jordan-Wigner and parity mappings with two-qubit
//!   reduction
//!
//! Every stage is a pure function of its inputs; the solver and driver are reached through
//! the [`scf::ReferenceStateSolver`] and [`problem::ElectronicStructureDriver`] traits so
//! that other backends can be substituted.

pub mod active_space;
pub mod config;
pub mod encoding;
pub mod error;
pub mod problem;
pub mod progress;
pub mod scf;
