use crate::core::io::source::GeometrySource;
use crate::core::models::element::Element;
use crate::core::models::geometry::Geometry;
use crate::core::operators::fermionic::FermionicOperator;
use crate::core::operators::qubit::QubitOperator;
use crate::engine::active_space::{self, ActiveSpaceResult};
use crate::engine::config::{ActiveSpaceDefaults, EncodingScheme, FragmentConfig};
use crate::engine::encoding::QubitEncoder;
use crate::engine::error::{ConfigurationError, FormatError, PipelineError, SolverError};
use crate::engine::problem::ElectronicStructureDriver;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scf::{HartreeFockSolver, ReferenceStateSolver};
use std::path::Path;
use tracing::{debug, info, info_span, instrument};

/// Everything a downstream eigensolver needs for one embedding fragment.
///
/// Built once by [`FragmentAssembler`] and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DMETFragment {
    geometry: Geometry,
    basis: String,
    active_electrons: usize,
    active_orbitals: usize,
    fragment_orbitals: Vec<usize>,
    num_particles: (usize, usize),
    reference_energy: f64,
    energy_shift: f64,
    fermionic_hamiltonian: FermionicOperator,
    qubit_hamiltonian: QubitOperator,
    encoding: EncodingScheme,
    two_qubit_reduction: bool,
}

impl DMETFragment {
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn basis(&self) -> &str {
        &self.basis
    }

    pub fn active_electrons(&self) -> usize {
        self.active_electrons
    }

    pub fn active_orbitals(&self) -> usize {
        self.active_orbitals
    }

    pub fn fragment_orbitals(&self) -> &[usize] {
        &self.fragment_orbitals
    }

    /// Active `(alpha, beta)` electron counts.
    pub fn num_particles(&self) -> (usize, usize) {
        self.num_particles
    }

    /// Converged mean-field total energy in Hartree.
    pub fn reference_energy(&self) -> f64 {
        self.reference_energy
    }

    /// Nuclear repulsion plus frozen-core energy; add it to Hamiltonian eigenvalues.
    pub fn energy_shift(&self) -> f64 {
        self.energy_shift
    }

    pub fn fermionic_hamiltonian(&self) -> &FermionicOperator {
        &self.fermionic_hamiltonian
    }

    pub fn qubit_hamiltonian(&self) -> &QubitOperator {
        &self.qubit_hamiltonian
    }

    pub fn num_qubits(&self) -> usize {
        self.qubit_hamiltonian.num_qubits()
    }

    pub fn encoding(&self) -> EncodingScheme {
        self.encoding
    }

    /// Whether two qubits were tapered from the encoded register.
    pub fn two_qubit_reduction(&self) -> bool {
        self.two_qubit_reduction
    }
}

/// The assembler backed by the built-in restricted Hartree-Fock solver for both stages.
pub type HartreeFockAssembler = FragmentAssembler<HartreeFockSolver, HartreeFockSolver>;

/// Runs the fragment pipeline with a pluggable reference solver and electronic-structure
/// driver.
#[derive(Debug, Clone, Default)]
pub struct FragmentAssembler<S = HartreeFockSolver, D = HartreeFockSolver> {
    solver: S,
    driver: D,
}

impl<S, D> FragmentAssembler<S, D>
where
    S: ReferenceStateSolver,
    D: ElectronicStructureDriver,
{
    pub fn new(solver: S, driver: D) -> Self {
        Self { solver, driver }
    }

    /// Builds a fragment from an in-memory geometry or an XYZ file.
    ///
    /// The first failing stage aborts the build; no partial fragment is returned.
    #[instrument(skip_all, name = "fragment_assembly")]
    pub fn assemble(
        &self,
        source: &GeometrySource,
        config: &FragmentConfig,
        reporter: &ProgressReporter,
    ) -> Result<DMETFragment, PipelineError> {
        let geometry = run_stage("Geometry", reporter, || {
            config.validate()?;
            let geometry = source.load()?;
            info!(atoms = geometry.len(), "Geometry normalized.");
            Ok(geometry)
        })?;

        self.assemble_geometry(geometry, config, reporter)
    }

    pub fn assemble_from_xyz(
        &self,
        path: impl AsRef<Path>,
        config: &FragmentConfig,
        reporter: &ProgressReporter,
    ) -> Result<DMETFragment, PipelineError> {
        self.assemble(
            &GeometrySource::XyzFile(path.as_ref().to_path_buf()),
            config,
            reporter,
        )
    }

    /// Builds a fragment for a diatomic on the z axis, centred on the origin.
    ///
    /// Active-space options left unset default to two electrons in two orbitals, both
    /// belonging to the fragment.
    pub fn build_diatomic_fragment(
        &self,
        first: &str,
        second: &str,
        bond_length: f64,
        config: &FragmentConfig,
        reporter: &ProgressReporter,
    ) -> Result<DMETFragment, PipelineError> {
        let config = config.fill_unset(&ActiveSpaceDefaults::minimal());
        config.validate()?;

        let resolve = |index: usize, symbol: &str| {
            Element::from_symbol(symbol).ok_or_else(|| FormatError::UnknownElement {
                index,
                symbol: symbol.to_string(),
            })
        };
        let a = resolve(0, first)?;
        let b = resolve(1, second)?;
        if !bond_length.is_finite() {
            return Err(FormatError::NonFiniteCoordinate {
                index: 1,
                symbol: second.to_string(),
                axis: 2,
            }
            .into());
        }

        self.assemble_geometry(Geometry::diatomic(a, b, bond_length), &config, reporter)
    }

    pub fn build_h2_fragment(
        &self,
        bond_length: f64,
        config: &FragmentConfig,
        reporter: &ProgressReporter,
    ) -> Result<DMETFragment, PipelineError> {
        self.build_diatomic_fragment("H", "H", bond_length, config, reporter)
    }

    fn assemble_geometry(
        &self,
        geometry: Geometry,
        config: &FragmentConfig,
        reporter: &ProgressReporter,
    ) -> Result<DMETFragment, PipelineError> {
        if let Some(dimensions) = self.driver.dimensions(&geometry, config)? {
            let counts = active_space::check_counts(&dimensions, config)?;
            debug!(
                orbitals = dimensions.num_orbitals,
                active_electrons = counts.num_electrons(),
                active_orbitals = counts.num_orbitals,
                "Active-space counts fit the basis."
            );
        }

        // === Phase 1: Mean-field reference energy ===
        let reference_energy = run_stage("Reference State", reporter, || {
            let energy = self.solver.solve(&geometry, config, reporter)?;
            if !energy.is_finite() {
                return Err(SolverError::NonFinite {
                    stage: "reference",
                    quantity: "energy",
                }
                .into());
            }
            info!(reference_energy = energy, "Reference energy computed.");
            Ok(energy)
        })?;

        // === Phase 2: Full electronic problem ===
        let problem = run_stage("Electronic Problem", reporter, || {
            self.driver.build_problem(&geometry, config, reporter)
        })?;

        // === Phase 3: Active space ===
        let active = run_stage("Active Space", reporter, || {
            let active = active_space::select(&problem, config)?;
            check_register(&active)?;
            info!(
                active_electrons = active.num_electrons(),
                active_orbitals = active.num_orbitals,
                inactive_orbitals = active.inactive_orbitals,
                fermionic_terms = active.hamiltonian.num_terms(),
                "Active space selected."
            );
            Ok(active)
        })?;

        // === Phase 4: Qubit encoding ===
        let encoder = QubitEncoder::from_config(config);
        let qubit_hamiltonian = run_stage("Qubit Encoding", reporter, || {
            let encoded = encoder.encode(&active.hamiltonian, Some(active.num_particles()))?;
            info!(
                scheme = %config.encoding,
                qubits = encoded.num_qubits(),
                pauli_terms = encoded.num_terms(),
                "Hamiltonian encoded."
            );
            Ok(encoded)
        })?;

        let energy_shift = active.energy_shift();
        let ActiveSpaceResult {
            num_alpha,
            num_beta,
            num_orbitals,
            fragment_orbitals,
            hamiltonian,
            ..
        } = active;

        Ok(DMETFragment {
            geometry,
            basis: config.basis.clone(),
            active_electrons: num_alpha + num_beta,
            active_orbitals: num_orbitals,
            fragment_orbitals,
            num_particles: (num_alpha, num_beta),
            reference_energy,
            energy_shift,
            fermionic_hamiltonian: hamiltonian,
            qubit_hamiltonian,
            encoding: config.encoding,
            two_qubit_reduction: encoder.reduces(),
        })
    }
}

/// Runs one pipeline phase inside a `stage` span, bracketed by progress events.
///
/// A failing phase reports no [`Progress::PhaseFinish`].
fn run_stage<T>(
    name: &'static str,
    reporter: &ProgressReporter,
    phase: impl FnOnce() -> Result<T, PipelineError>,
) -> Result<T, PipelineError> {
    reporter.report(Progress::PhaseStart { name });
    let value = info_span!("stage", phase = name).in_scope(phase)?;
    reporter.report(Progress::PhaseFinish);
    Ok(value)
}

fn check_register(active: &ActiveSpaceResult) -> Result<(), ConfigurationError> {
    let operator = active.hamiltonian.register_length();
    let requested = active.register_length();
    if operator != requested {
        return Err(ConfigurationError::RegisterMismatch {
            operator,
            requested,
        });
    }
    Ok(())
}
