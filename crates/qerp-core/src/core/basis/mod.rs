//! Gaussian basis sets: the TOML-described basis library and the contracted
//! Cartesian functions placed on a molecule's nuclei.

pub mod library;
pub mod shell;
