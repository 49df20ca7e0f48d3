use crate::core::basis::library::{self, BasisLibrary};
use crate::core::basis::shell::BasisSet;
use crate::core::integrals::one_electron::{core_hamiltonian, overlap_matrix};
use crate::core::integrals::two_electron::TwoElectronIntegrals;
use crate::core::models::geometry::Geometry;
use crate::core::models::molecule::Molecule;
use crate::engine::config::FragmentConfig;
use crate::engine::error::{ConfigurationError, PipelineError, SolverError};
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::{DMatrix, DVector};
use std::sync::Arc;
use tracing::{debug, info, warn};

const STAGE: &str = "scf";

/// Convergence settings for the restricted Hartree-Fock loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ScfOptions {
    pub max_iterations: usize,
    /// Largest accepted change of the electronic energy between iterations (Hartree).
    pub energy_tolerance: f64,
    /// Largest accepted RMS change of the density matrix between iterations.
    pub density_tolerance: f64,
    /// Number of Fock/error pairs kept for DIIS extrapolation; 0 disables DIIS.
    pub diis_subspace: usize,
    /// Overlap eigenvalues below this are treated as linear dependence.
    pub linear_dependence_threshold: f64,
}

impl Default for ScfOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            energy_tolerance: 1e-10,
            density_tolerance: 1e-8,
            diis_subspace: 8,
            linear_dependence_threshold: 1e-8,
        }
    }
}

/// A converged restricted mean-field solution together with the AO quantities it was
/// computed from.
///
/// Open-shell states share one set of spatial orbitals between both spins: the lowest
/// `num_beta` orbitals are doubly occupied and the next `num_alpha - num_beta` hold one
/// alpha electron each.
#[derive(Debug, Clone)]
pub struct ReferenceState {
    pub molecule: Molecule,
    pub basis: BasisSet,
    pub core_hamiltonian: DMatrix<f64>,
    pub repulsion: TwoElectronIntegrals,
    /// Orbital energies in ascending order.
    pub orbital_energies: DVector<f64>,
    /// MO coefficients, one orbital per column, in the order of `orbital_energies`.
    pub coefficients: DMatrix<f64>,
    /// Alpha-spin density `C_α C_αᵀ` over the lowest `num_alpha` orbitals.
    pub alpha_density: DMatrix<f64>,
    /// Beta-spin density over the lowest `num_beta` orbitals.
    pub beta_density: DMatrix<f64>,
    pub electronic_energy: f64,
    pub nuclear_repulsion: f64,
    pub iterations: usize,
}

impl ReferenceState {
    pub fn total_energy(&self) -> f64 {
        self.electronic_energy + self.nuclear_repulsion
    }

    pub fn num_alpha(&self) -> usize {
        self.molecule.num_alpha()
    }

    pub fn num_beta(&self) -> usize {
        self.molecule.num_beta()
    }
}

/// Computes the mean-field reference energy of a geometry.
pub trait ReferenceStateSolver {
    /// Returns the converged total energy (electronic plus nuclear repulsion) in Hartree.
    fn solve(
        &self,
        geometry: &Geometry,
        config: &FragmentConfig,
        reporter: &ProgressReporter,
    ) -> Result<f64, PipelineError>;
}

/// Restricted (closed- or open-shell) Hartree-Fock over contracted Gaussian basis sets.
#[derive(Debug, Clone, Default)]
pub struct HartreeFockSolver {
    options: ScfOptions,
    basis_library: Option<Arc<BasisLibrary>>,
}

impl HartreeFockSolver {
    pub fn new(options: ScfOptions) -> Self {
        Self {
            options,
            basis_library: None,
        }
    }

    /// Makes the basis sets in `library` available in addition to the built-in ones.
    pub fn with_basis_library(mut self, library: Arc<BasisLibrary>) -> Self {
        self.basis_library = Some(library);
        self
    }

    pub fn options(&self) -> &ScfOptions {
        &self.options
    }

    /// Runs SCF to convergence and returns the full reference state.
    pub fn run(
        &self,
        geometry: &Geometry,
        config: &FragmentConfig,
        reporter: &ProgressReporter,
    ) -> Result<ReferenceState, PipelineError> {
        let molecule = Molecule::new(geometry, config.distance_unit, config.charge, config.spin)?;
        let basis = self.basis_for(&molecule, &config.basis)?;
        let (num_alpha, num_beta) = (molecule.num_alpha(), molecule.num_beta());
        if num_alpha > basis.len() {
            return Err(ConfigurationError::InsufficientBasis {
                occupied: num_alpha,
                orbitals: basis.len(),
            }
            .into());
        }

        info!(
            basis = basis.name(),
            functions = basis.len(),
            electrons = molecule.num_electrons(),
            spin = molecule.spin(),
            "Computing atomic-orbital integrals."
        );
        let overlap = overlap_matrix(&basis);
        let core = core_hamiltonian(&basis, &molecule);
        let repulsion = TwoElectronIntegrals::compute(&basis);
        let nuclear_repulsion = molecule.nuclear_repulsion();

        let orthogonalizer =
            symmetric_orthogonalizer(&overlap, self.options.linear_dependence_threshold)?;

        let (_, mut coefficients) = diagonalize(&core, &orthogonalizer);
        let mut densities = SpinDensities::from_orbitals(&coefficients, num_alpha, num_beta);
        let mut previous_energy: Option<f64> = None;
        let mut diis = Diis::new(self.options.diis_subspace);
        let mut energy_change = f64::INFINITY;
        let mut density_change = f64::INFINITY;

        for iteration in 1..=self.options.max_iterations {
            let spin_fock = SpinFock::build(&core, &repulsion, &densities);
            let energy = spin_fock.electronic_energy(&core, &densities);
            if !energy.is_finite() {
                return Err(SolverError::NonFinite {
                    stage: STAGE,
                    quantity: "energy",
                }
                .into());
            }

            if let Some(previous) = previous_energy {
                energy_change = energy - previous;
            }
            previous_energy = Some(energy);

            let converged = energy_change.abs() < self.options.energy_tolerance
                && density_change < self.options.density_tolerance;
            reporter.report(Progress::StatusUpdate {
                text: format!("SCF iteration {iteration}: E = {:.10}", energy + nuclear_repulsion),
            });
            debug!(iteration, energy, energy_change, density_change, "SCF iteration.");

            let fock = spin_fock.roothaan(&coefficients, &overlap, num_alpha, num_beta);
            if converged {
                let (orbital_energies, coefficients) = diagonalize(&fock, &orthogonalizer);
                info!(
                    iterations = iteration,
                    total_energy = energy + nuclear_repulsion,
                    "SCF converged."
                );
                return Ok(ReferenceState {
                    molecule,
                    basis,
                    core_hamiltonian: core,
                    repulsion,
                    orbital_energies,
                    coefficients,
                    alpha_density: densities.alpha,
                    beta_density: densities.beta,
                    electronic_energy: energy,
                    nuclear_repulsion,
                    iterations: iteration,
                });
            }

            diis.update(fock.clone(), &densities.total(), &overlap);
            let extrapolated = diis.extrapolate().unwrap_or(fock);
            (_, coefficients) = diagonalize(&extrapolated, &orthogonalizer);
            let next = SpinDensities::from_orbitals(&coefficients, num_alpha, num_beta);
            density_change = next.rms_change(&densities);
            densities = next;
        }

        warn!(
            iterations = self.options.max_iterations,
            energy_change, density_change, "SCF did not converge."
        );
        Err(SolverError::NotConverged {
            stage: STAGE,
            iterations: self.options.max_iterations,
            energy_change: energy_change.abs(),
            density_change,
        }
        .into())
    }

    /// Number of atomic orbitals `molecule` gets in the named basis set.
    pub fn basis_size(&self, molecule: &Molecule, basis: &str) -> Result<usize, PipelineError> {
        Ok(self.basis_for(molecule, basis)?.len())
    }

    fn basis_for(&self, molecule: &Molecule, name: &str) -> Result<BasisSet, ConfigurationError> {
        let definition = library::resolve(self.basis_library.as_deref(), name)?;
        BasisSet::for_molecule(definition, molecule)
    }
}

impl ReferenceStateSolver for HartreeFockSolver {
    fn solve(
        &self,
        geometry: &Geometry,
        config: &FragmentConfig,
        reporter: &ProgressReporter,
    ) -> Result<f64, PipelineError> {
        Ok(self.run(geometry, config, reporter)?.total_energy())
    }
}

/// Löwdin orthogonalizer `S^{-1/2}`.
fn symmetric_orthogonalizer(
    overlap: &DMatrix<f64>,
    threshold: f64,
) -> Result<DMatrix<f64>, SolverError> {
    let eigen = overlap.clone().symmetric_eigen();
    let smallest = eigen.eigenvalues.min();
    if !(smallest > threshold) {
        return Err(SolverError::LinearDependence {
            smallest_eigenvalue: smallest,
        });
    }
    let inverse_sqrt = DMatrix::from_diagonal(&eigen.eigenvalues.map(|e| e.sqrt().recip()));
    Ok(&eigen.eigenvectors * inverse_sqrt * eigen.eigenvectors.transpose())
}

/// Solves the generalized eigenproblem `F C = S C ε` through the orthogonalizer.
///
/// Eigenvalues come back in ascending order and each orbital's largest coefficient is
/// made positive, so repeated runs give identical orbitals.
fn diagonalize(fock: &DMatrix<f64>, orthogonalizer: &DMatrix<f64>) -> (DVector<f64>, DMatrix<f64>) {
    let transformed = orthogonalizer.transpose() * fock * orthogonalizer;
    let eigen = transformed.symmetric_eigen();

    let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

    let energies = DVector::from_iterator(order.len(), order.iter().map(|&i| eigen.eigenvalues[i]));
    let columns: Vec<_> = order.iter().map(|&i| eigen.eigenvectors.column(i)).collect();
    let sorted = DMatrix::from_columns(&columns);

    (energies, align_phases(orthogonalizer * sorted))
}

fn align_phases(mut coefficients: DMatrix<f64>) -> DMatrix<f64> {
    for mut column in coefficients.column_iter_mut() {
        let largest = column
            .iter()
            .copied()
            .max_by(|a, b| a.abs().total_cmp(&b.abs()))
            .unwrap_or(0.0);
        if largest < 0.0 {
            column.neg_mut();
        }
    }
    coefficients
}

fn occupied_density(coefficients: &DMatrix<f64>, num_occupied: usize) -> DMatrix<f64> {
    let occupied = coefficients.columns(0, num_occupied);
    &occupied * occupied.transpose()
}

/// Per-spin densities of a restricted determinant built from one set of orbitals.
struct SpinDensities {
    alpha: DMatrix<f64>,
    beta: DMatrix<f64>,
    closed_shell: bool,
}

impl SpinDensities {
    fn from_orbitals(coefficients: &DMatrix<f64>, num_alpha: usize, num_beta: usize) -> Self {
        let alpha = occupied_density(coefficients, num_alpha);
        let closed_shell = num_alpha == num_beta;
        let beta = if closed_shell {
            alpha.clone()
        } else {
            occupied_density(coefficients, num_beta)
        };
        Self {
            alpha,
            beta,
            closed_shell,
        }
    }

    fn total(&self) -> DMatrix<f64> {
        &self.alpha + &self.beta
    }

    fn rms_change(&self, previous: &Self) -> f64 {
        let alpha = rms_difference(&self.alpha, &previous.alpha);
        let beta = rms_difference(&self.beta, &previous.beta);
        ((alpha * alpha + beta * beta) / 2.0).sqrt()
    }
}

/// The alpha and beta Fock matrices `F_σ = H + J[D_α + D_β] - K[D_σ]`.
struct SpinFock {
    alpha: DMatrix<f64>,
    beta: DMatrix<f64>,
}

impl SpinFock {
    fn build(
        core: &DMatrix<f64>,
        repulsion: &TwoElectronIntegrals,
        densities: &SpinDensities,
    ) -> Self {
        if densities.closed_shell {
            let (coulomb, exchange) = repulsion.coulomb_exchange(&densities.alpha);
            let fock = core + coulomb * 2.0 - exchange;
            return Self {
                alpha: fock.clone(),
                beta: fock,
            };
        }
        let (coulomb_alpha, exchange_alpha) = repulsion.coulomb_exchange(&densities.alpha);
        let (coulomb_beta, exchange_beta) = repulsion.coulomb_exchange(&densities.beta);
        let coulomb = coulomb_alpha + coulomb_beta;
        Self {
            alpha: core + &coulomb - exchange_alpha,
            beta: core + coulomb - exchange_beta,
        }
    }

    fn electronic_energy(&self, core: &DMatrix<f64>, densities: &SpinDensities) -> f64 {
        0.5 * (densities.total().component_mul(core).sum()
            + densities.alpha.component_mul(&self.alpha).sum()
            + densities.beta.component_mul(&self.beta).sum())
    }

    /// Roothaan's effective Fock matrix in the AO basis.
    ///
    /// In the MO basis of `coefficients` every block takes `(F_α + F_β)/2` except the
    /// closed-open coupling, which takes `F_β`, and the open-virtual coupling, which takes
    /// `F_α`. Its eigenvectors satisfy both spin stationarity conditions at once. For a
    /// closed shell this is just `F_α`.
    fn roothaan(
        &self,
        coefficients: &DMatrix<f64>,
        overlap: &DMatrix<f64>,
        num_alpha: usize,
        num_beta: usize,
    ) -> DMatrix<f64> {
        if num_alpha == num_beta {
            return self.alpha.clone();
        }
        let alpha = coefficients.transpose() * &self.alpha * coefficients;
        let beta = coefficients.transpose() * &self.beta * coefficients;
        let mut effective = (&alpha + &beta) * 0.5;
        let shell = |p: usize| Shell::of(p, num_alpha, num_beta);
        for p in 0..effective.nrows() {
            for q in 0..effective.ncols() {
                match (shell(p), shell(q)) {
                    (Shell::Closed, Shell::Open) | (Shell::Open, Shell::Closed) => {
                        effective[(p, q)] = beta[(p, q)]
                    }
                    (Shell::Open, Shell::Virtual) | (Shell::Virtual, Shell::Open) => {
                        effective[(p, q)] = alpha[(p, q)]
                    }
                    _ => {}
                }
            }
        }
        let projector = overlap * coefficients;
        &projector * effective * projector.transpose()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shell {
    Closed,
    Open,
    Virtual,
}

impl Shell {
    fn of(orbital: usize, num_alpha: usize, num_beta: usize) -> Self {
        if orbital < num_beta {
            Shell::Closed
        } else if orbital < num_alpha {
            Shell::Open
        } else {
            Shell::Virtual
        }
    }
}

fn rms_difference(a: &DMatrix<f64>, b: &DMatrix<f64>) -> f64 {
    let n = a.len().max(1) as f64;
    ((a - b).norm_squared() / n).sqrt()
}

/// Pulay's direct inversion in the iterative subspace.
struct Diis {
    errors: Vec<DMatrix<f64>>,
    focks: Vec<DMatrix<f64>>,
    max_subspace: usize,
}

impl Diis {
    fn new(max_subspace: usize) -> Self {
        Self {
            errors: Vec::new(),
            focks: Vec::new(),
            max_subspace,
        }
    }

    fn update(&mut self, fock: DMatrix<f64>, density: &DMatrix<f64>, overlap: &DMatrix<f64>) {
        if self.max_subspace == 0 {
            return;
        }
        let error = &fock * density * overlap - overlap * density * &fock;
        if self.errors.len() >= self.max_subspace {
            self.errors.remove(0);
            self.focks.remove(0);
        }
        self.errors.push(error);
        self.focks.push(fock);
    }

    fn extrapolate(&self) -> Option<DMatrix<f64>> {
        let n = self.errors.len();
        if n < 2 {
            return None;
        }

        let mut b = DMatrix::zeros(n + 1, n + 1);
        for i in 0..n {
            for j in 0..=i {
                let value = self.errors[i].dot(&self.errors[j]);
                b[(i, j)] = value;
                b[(j, i)] = value;
            }
            b[(i, n)] = -1.0;
            b[(n, i)] = -1.0;
        }
        let mut rhs = DVector::zeros(n + 1);
        rhs[n] = -1.0;

        let weights = b.lu().solve(&rhs)?;
        if weights.iter().any(|w| !w.is_finite()) {
            debug!("DIIS extrapolation skipped: singular subspace.");
            return None;
        }

        let mut fock = DMatrix::zeros(self.focks[0].nrows(), self.focks[0].ncols());
        for (i, f) in self.focks.iter().enumerate() {
            fock += f * weights[i];
        }
        Some(fock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::Element;
    use crate::engine::config::DistanceUnit;

    fn f64_approx_equal(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    fn h2() -> Geometry {
        let h = Element::from_symbol("H").unwrap();
        Geometry::diatomic(h, h, 0.735)
    }

    fn water() -> Geometry {
        Geometry::normalize(vec![
            ("O", [0.0, -0.143225816552, 0.0]),
            ("H", [1.638036840407, 1.136548822547, 0.0]),
            ("H", [-1.638036840407, 1.136548822547, 0.0]),
        ])
        .unwrap()
    }

    fn bohr_config() -> FragmentConfig {
        FragmentConfig::builder()
            .distance_unit(DistanceUnit::Bohr)
            .build()
            .unwrap()
    }

    #[test]
    fn h2_energy_matches_reference_value() {
        let solver = HartreeFockSolver::default();
        let state = solver
            .run(&h2(), &FragmentConfig::default(), &ProgressReporter::new())
            .unwrap();

        assert!(f64_approx_equal(state.total_energy(), -1.1169989968555791, 1e-8));
        assert!(f64_approx_equal(state.nuclear_repulsion, 0.7199689944489797, 1e-12));
        assert!(f64_approx_equal(state.orbital_energies[0], -0.58063, 1e-4));
        assert!(f64_approx_equal(state.orbital_energies[1], 0.67634, 1e-4));
    }

    #[test]
    fn water_energy_matches_reference_value() {
        let solver = HartreeFockSolver::default();
        let energy = solver
            .solve(&water(), &bohr_config(), &ProgressReporter::new())
            .unwrap();
        assert!(f64_approx_equal(energy, -74.942079928, 1e-6));
    }

    #[test]
    fn orbitals_are_orthonormal_and_phase_aligned() {
        let solver = HartreeFockSolver::default();
        let state = solver
            .run(&water(), &bohr_config(), &ProgressReporter::new())
            .unwrap();
        let overlap = overlap_matrix(&state.basis);
        let metric = state.coefficients.transpose() * overlap * &state.coefficients;

        for i in 0..metric.nrows() {
            for j in 0..metric.ncols() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(f64_approx_equal(metric[(i, j)], expected, 1e-8));
            }
        }
        for column in state.coefficients.column_iter() {
            let largest = column
                .iter()
                .copied()
                .max_by(|a, b| a.abs().total_cmp(&b.abs()))
                .unwrap();
            assert!(largest > 0.0);
        }
        assert!(state.orbital_energies.as_slice().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let solver = HartreeFockSolver::default();
        let a = solver.run(&water(), &bohr_config(), &ProgressReporter::new()).unwrap();
        let b = solver.run(&water(), &bohr_config(), &ProgressReporter::new()).unwrap();
        assert_eq!(a.total_energy(), b.total_energy());
        assert_eq!(a.coefficients, b.coefficients);
    }

    #[test]
    fn disabling_diis_converges_to_the_same_energy() {
        let plain = HartreeFockSolver::new(ScfOptions {
            diis_subspace: 0,
            max_iterations: 200,
            ..ScfOptions::default()
        });
        let energy = plain
            .solve(&h2(), &FragmentConfig::default(), &ProgressReporter::new())
            .unwrap();
        assert!(f64_approx_equal(energy, -1.1169989968555791, 1e-8));
    }

    #[test]
    fn h2_cation_doublet_energy_matches_reference_value() {
        let config = FragmentConfig::builder().charge(1).spin(1).build().unwrap();
        let state = HartreeFockSolver::default()
            .run(&h2(), &config, &ProgressReporter::new())
            .unwrap();

        assert_eq!((state.num_alpha(), state.num_beta()), (1, 0));
        assert!(f64_approx_equal(state.total_energy(), -0.5363700793123046, 1e-8));
        assert!(f64_approx_equal(state.orbital_energies[0], -0.91848, 1e-4));
        assert!(f64_approx_equal(state.orbital_energies[1], 0.10222, 1e-4));
        assert_eq!(state.beta_density, DMatrix::zeros(2, 2));
    }

    #[test]
    fn lithium_doublet_energy_matches_reference_value() {
        let geometry = Geometry::normalize(vec![("Li", [0.0, 0.0, 0.0])]).unwrap();
        let config = FragmentConfig::builder().spin(1).build().unwrap();
        let energy = HartreeFockSolver::default()
            .solve(&geometry, &config, &ProgressReporter::new())
            .unwrap();
        assert!(f64_approx_equal(energy, -7.315526014618407, 1e-7));
    }

    #[test]
    fn methylene_triplet_lies_below_the_closed_shell_singlet() {
        let geometry = Geometry::normalize(vec![
            ("C", [0.0, 0.0, 0.0]),
            ("H", [1.8496873822246986, 0.0, 0.862523391524049]),
            ("H", [-1.8496873822246986, 0.0, 0.862523391524049]),
        ])
        .unwrap();
        let solver = HartreeFockSolver::default();
        let singlet = solver
            .solve(&geometry, &bohr_config(), &ProgressReporter::new())
            .unwrap();
        let triplet_config = FragmentConfig::builder()
            .distance_unit(DistanceUnit::Bohr)
            .spin(2)
            .build()
            .unwrap();
        let triplet = solver
            .run(&geometry, &triplet_config, &ProgressReporter::new())
            .unwrap();

        assert!(f64_approx_equal(singlet, -38.243567907464126, 1e-6));
        assert!(f64_approx_equal(triplet.total_energy(), -38.43075406592111, 1e-6));
        let overlap = overlap_matrix(&triplet.basis);
        let alpha_electrons = triplet.alpha_density.component_mul(&overlap).sum();
        let beta_electrons = triplet.beta_density.component_mul(&overlap).sum();
        assert!(f64_approx_equal(alpha_electrons, 5.0, 1e-8));
        assert!(f64_approx_equal(beta_electrons, 3.0, 1e-8));
    }

    #[test]
    fn closed_shell_spin_densities_coincide() {
        let state = HartreeFockSolver::default()
            .run(&h2(), &FragmentConfig::default(), &ProgressReporter::new())
            .unwrap();
        assert_eq!(state.alpha_density, state.beta_density);
    }

    #[test]
    fn unknown_basis_is_rejected() {
        let config = FragmentConfig::builder().basis("cc-pvqz").build().unwrap();
        let err = HartreeFockSolver::default()
            .solve(&h2(), &config, &ProgressReporter::new())
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Configuration(ConfigurationError::UnsupportedBasis { .. })
        ));
    }

    #[test]
    fn element_outside_the_basis_is_rejected() {
        let geometry = Geometry::normalize(vec![("Na", [0.0, 0.0, 0.0]), ("H", [0.0, 0.0, 1.9])])
            .unwrap();
        let err = HartreeFockSolver::default()
            .solve(&geometry, &FragmentConfig::default(), &ProgressReporter::new())
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Configuration(ConfigurationError::UnsupportedElement { .. })
        ));
    }

    #[test]
    fn coincident_atoms_are_reported_as_linear_dependence() {
        let geometry =
            Geometry::normalize(vec![("H", [0.0, 0.0, 0.0]), ("H", [0.0, 0.0, 0.0])]).unwrap();
        let err = HartreeFockSolver::default()
            .solve(&geometry, &FragmentConfig::default(), &ProgressReporter::new())
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Solver(SolverError::LinearDependence { .. })
        ));
    }

    #[test]
    fn iteration_limit_is_reported_as_non_convergence() {
        let solver = HartreeFockSolver::new(ScfOptions {
            max_iterations: 1,
            ..ScfOptions::default()
        });
        let err = solver
            .solve(&water(), &bohr_config(), &ProgressReporter::new())
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Solver(SolverError::NotConverged { iterations: 1, .. })
        ));
    }

    #[test]
    fn iterations_are_reported_as_status_updates() {
        let updates = std::sync::Mutex::new(0usize);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::StatusUpdate { .. } = event {
                *updates.lock().unwrap() += 1;
            }
        }));
        let state = HartreeFockSolver::default()
            .run(&h2(), &FragmentConfig::default(), &reporter)
            .unwrap();
        drop(reporter);
        assert_eq!(updates.into_inner().unwrap(), state.iterations);
    }
}
