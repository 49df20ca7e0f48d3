pub mod build;
pub mod h2;

use crate::config::AppConfig;
use crate::error::Result;
use qerp::core::basis::library::BasisLibrary;
use qerp::engine::error::{ConfigurationError, PipelineError};
use qerp::engine::scf::{HartreeFockSolver, ScfOptions};
use qerp::workflows::fragment::HartreeFockAssembler;
use std::sync::Arc;
use tracing::info;

/// Creates the Hartree-Fock backed assembler, with any user basis sets registered.
pub fn assembler_for(app: &AppConfig) -> Result<HartreeFockAssembler> {
    let mut solver = HartreeFockSolver::new(ScfOptions::default());
    if let Some(path) = &app.basis_file {
        info!("Loading basis sets from {:?}", path);
        let mut library = BasisLibrary::default();
        library
            .add_file(path)
            .map_err(|e| PipelineError::from(ConfigurationError::from(e)))?;
        solver = solver.with_basis_library(Arc::new(library));
    }
    Ok(HartreeFockAssembler::new(solver.clone(), solver))
}
