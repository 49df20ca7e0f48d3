use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FormatErrorKind {
    #[error("Atom count must be a non-negative integer (value: '{value}')")]
    InvalidCount { value: String },
    #[error("Atom record needs 'symbol x y z', found {found} field(s)")]
    MissingFields { found: usize },
    #[error("Invalid coordinate (value: '{value}')")]
    InvalidFloat { value: String },
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("In geometry file '{path}': {source}", path = path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<FormatError>,
    },

    #[error("Geometry input is too short: found {found} non-empty line(s), need at least 2")]
    TooShort { found: usize },

    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: FormatErrorKind },

    #[error("Geometry declares {declared} atom(s) but contains {found} coordinate line(s)")]
    AtomCountMismatch { declared: usize, found: usize },

    #[error("Coordinate for atom {index} ('{symbol}') must have three components, found {found}")]
    CoordinateArity {
        index: usize,
        symbol: String,
        found: usize,
    },

    #[error("Coordinate component {axis} of atom {index} ('{symbol}') is not finite")]
    NonFiniteCoordinate {
        index: usize,
        symbol: String,
        axis: usize,
    },

    #[error("Unknown element symbol '{symbol}' for atom {index}")]
    UnknownElement { index: usize, symbol: String },

    #[error("Geometry contains no atoms")]
    EmptyGeometry,
}

impl FormatError {
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        FormatError::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Unsupported basis set '{name}'")]
    UnsupportedBasis { name: String },

    #[error("Basis set '{basis}' has no functions for element '{symbol}'")]
    UnsupportedElement { symbol: String, basis: String },

    #[error("Basis library '{origin}' is invalid: {reason}")]
    InvalidBasisLibrary { origin: String, reason: String },

    #[error("Unsupported encoding scheme '{name}'")]
    UnsupportedEncoding { name: String },

    #[error("Unsupported distance unit '{name}'")]
    UnsupportedUnit { name: String },

    #[error("Molecule has {electrons} electron(s) after applying charge {charge}")]
    InvalidElectronCount { electrons: i64, charge: i32 },

    #[error("Electron number {electrons} and spin {spin} are not consistent")]
    InconsistentSpin { electrons: usize, spin: u32 },

    #[error("{occupied} occupied orbital(s) do not fit in {orbitals} basis function(s)")]
    InsufficientBasis { occupied: usize, orbitals: usize },

    #[error("Active {quantity} count must be positive")]
    NonPositiveActiveCount { quantity: &'static str },

    #[error("Requested {requested} active {quantity} but the full space only has {available}")]
    ActiveExceedsFull {
        quantity: &'static str,
        requested: usize,
        available: usize,
    },

    #[error("Active space leaves {inactive} inactive electron(s), which cannot fill closed-shell core orbitals")]
    OddInactiveElectrons { inactive: usize },

    #[error("Active space with {electrons} electron(s) cannot hold {unpaired} unpaired electron(s)")]
    UnpairedExceedsActive { electrons: usize, unpaired: usize },

    #[error(
        "Active window of {active_orbitals} orbital(s) after {inactive_orbitals} core orbital(s) exceeds the {total_orbitals} available"
    )]
    ActiveWindowOutOfRange {
        inactive_orbitals: usize,
        active_orbitals: usize,
        total_orbitals: usize,
    },

    #[error("{electrons} active electron(s) do not fit in {orbitals} active orbital(s)")]
    ActiveElectronsExceedCapacity { electrons: usize, orbitals: usize },

    #[error("Fragment orbital index {index} is outside the active space of {active_orbitals} orbital(s)")]
    FragmentOrbitalOutOfRange { index: usize, active_orbitals: usize },

    #[error("Fragment orbital index {index} is listed more than once")]
    DuplicateFragmentOrbital { index: usize },

    #[error("Two-qubit reduction requires particle counts")]
    MissingParticleCounts,

    #[error("Particle counts ({alpha}, {beta}) exceed the {modes} modes available per spin")]
    ParticleCountsExceedRegister {
        alpha: usize,
        beta: usize,
        modes: usize,
    },

    #[error("Register length {requested} does not match the operator register of {operator} spin orbital(s)")]
    RegisterMismatch { operator: usize, requested: usize },

    #[error("Register length {register_length} is invalid for the requested encoding")]
    InvalidRegister { register_length: usize },

    #[error("Operator does not conserve the parity symmetry tapered on qubit {qubit}")]
    SymmetryViolation { qubit: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error(
        "Stage '{stage}' failed to converge after {iterations} iterations (last energy change {energy_change:.3e}, density change {density_change:.3e})"
    )]
    NotConverged {
        stage: &'static str,
        iterations: usize,
        energy_change: f64,
        density_change: f64,
    },

    #[error("Basis set is linearly dependent (smallest overlap eigenvalue {smallest_eigenvalue:.3e})")]
    LinearDependence { smallest_eigenvalue: f64 },

    #[error("Stage '{stage}' produced a non-finite {quantity}")]
    NonFinite {
        stage: &'static str,
        quantity: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}
