use crate::core::integrals::two_electron::TwoElectronIntegrals;
use crate::core::models::geometry::Geometry;
use crate::core::models::molecule::Molecule;
use crate::engine::config::FragmentConfig;
use crate::engine::error::PipelineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::scf::{HartreeFockSolver, ReferenceState};
use nalgebra::{DMatrix, DVector};
use tracing::info;

/// Electron and orbital counts of a problem, known before any integrals are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemDimensions {
    pub num_alpha: usize,
    pub num_beta: usize,
    pub num_orbitals: usize,
}

impl ProblemDimensions {
    pub fn num_electrons(&self) -> usize {
        self.num_alpha + self.num_beta
    }
}

/// The full-space electronic structure problem in the molecular-orbital basis.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectronicProblem {
    pub num_alpha: usize,
    pub num_beta: usize,
    /// One-body integrals `h_pq`; the restricted reference shares them between spins.
    pub one_body: DMatrix<f64>,
    /// Two-body integrals `(pq|rs)` in chemists' notation.
    pub two_body: TwoElectronIntegrals,
    pub orbital_energies: DVector<f64>,
    pub nuclear_repulsion: f64,
    pub reference_energy: f64,
}

impl ElectronicProblem {
    pub fn num_orbitals(&self) -> usize {
        self.one_body.nrows()
    }

    pub fn num_electrons(&self) -> usize {
        self.num_alpha + self.num_beta
    }

    pub fn num_particles(&self) -> (usize, usize) {
        (self.num_alpha, self.num_beta)
    }

    pub fn dimensions(&self) -> ProblemDimensions {
        ProblemDimensions {
            num_alpha: self.num_alpha,
            num_beta: self.num_beta,
            num_orbitals: self.num_orbitals(),
        }
    }
}

impl From<&ReferenceState> for ElectronicProblem {
    fn from(state: &ReferenceState) -> Self {
        let c = &state.coefficients;
        Self {
            num_alpha: state.molecule.num_alpha(),
            num_beta: state.molecule.num_beta(),
            one_body: c.transpose() * &state.core_hamiltonian * c,
            two_body: state.repulsion.transform(c),
            orbital_energies: state.orbital_energies.clone(),
            nuclear_repulsion: state.nuclear_repulsion,
            reference_energy: state.total_energy(),
        }
    }
}

/// Produces the full electronic problem for a geometry.
pub trait ElectronicStructureDriver {
    fn build_problem(
        &self,
        geometry: &Geometry,
        config: &FragmentConfig,
        reporter: &ProgressReporter,
    ) -> Result<ElectronicProblem, PipelineError>;

    /// Size of the problem [`Self::build_problem`] would return, if it can be known
    /// without solving anything. Lets callers reject impossible active spaces early.
    fn dimensions(
        &self,
        _geometry: &Geometry,
        _config: &FragmentConfig,
    ) -> Result<Option<ProblemDimensions>, PipelineError> {
        Ok(None)
    }
}

impl ElectronicStructureDriver for HartreeFockSolver {
    fn build_problem(
        &self,
        geometry: &Geometry,
        config: &FragmentConfig,
        reporter: &ProgressReporter,
    ) -> Result<ElectronicProblem, PipelineError> {
        let state = self.run(geometry, config, reporter)?;
        let problem = ElectronicProblem::from(&state);
        info!(
            orbitals = problem.num_orbitals(),
            alpha = problem.num_alpha,
            beta = problem.num_beta,
            "Transformed integrals to the molecular-orbital basis."
        );
        Ok(problem)
    }

    fn dimensions(
        &self,
        geometry: &Geometry,
        config: &FragmentConfig,
    ) -> Result<Option<ProblemDimensions>, PipelineError> {
        let molecule = Molecule::new(geometry, config.distance_unit, config.charge, config.spin)?;
        Ok(Some(ProblemDimensions {
            num_alpha: molecule.num_alpha(),
            num_beta: molecule.num_beta(),
            num_orbitals: self.basis_size(&molecule, &config.basis)?,
        }))
    }
}
