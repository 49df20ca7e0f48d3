use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "QERP Developers",
    version,
    about = "QERP CLI - Builds active-space DMET fragments: a Hartree-Fock reference energy, the active-space Hamiltonian and its qubit encoding.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to build fragments in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build one fragment per XYZ geometry file.
    Build(BuildArgs),
    /// Build the minimal hydrogen-molecule fragment at a given bond length.
    H2(H2Args),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// One or more XYZ geometry files.
    #[arg(required = true, num_args = 1.., value_name = "XYZ")]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub fragment: FragmentArgs,
}

/// Arguments for the `h2` subcommand.
#[derive(Args, Debug)]
pub struct H2Args {
    /// Distance between the two hydrogen nuclei, in the configured unit.
    #[arg(value_name = "BOND_LENGTH")]
    pub bond_length: f64,

    #[command(flatten)]
    pub fragment: FragmentArgs,
}

/// Options shared by every fragment-building subcommand.
#[derive(Args, Debug, Default)]
pub struct FragmentArgs {
    /// Path to a fragment configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Molecule Overrides ---
    /// Override the basis set name (e.g., 'sto-3g').
    #[arg(short, long, value_name = "NAME")]
    pub basis: Option<String>,

    /// Load additional basis sets from a TOML file.
    #[arg(long, value_name = "PATH")]
    pub basis_file: Option<PathBuf>,

    /// Override the total molecular charge.
    #[arg(long, allow_negative_numbers = true, value_name = "INT")]
    pub charge: Option<i32>,

    /// Override the number of unpaired electrons (2S).
    #[arg(long, value_name = "INT")]
    pub spin: Option<u32>,

    /// Override the coordinate unit ('angstrom' or 'bohr').
    #[arg(short, long, value_name = "UNIT")]
    pub unit: Option<String>,

    // --- Active Space Overrides ---
    /// Override the number of active electrons.
    #[arg(short = 'e', long, value_name = "INT")]
    pub active_electrons: Option<usize>,

    /// Override the number of active spatial orbitals.
    #[arg(short = 'o', long, value_name = "INT")]
    pub active_orbitals: Option<usize>,

    /// Override the fragment orbital indices (comma separated, e.g. '0,1').
    #[arg(long, value_delimiter = ',', value_name = "LIST")]
    pub fragment_orbitals: Option<Vec<usize>>,

    // --- Encoding Overrides ---
    /// Override the qubit encoding ('parity' or 'jordan-wigner').
    #[arg(long, value_name = "SCHEME")]
    pub encoding: Option<String>,

    /// Override `encoding.two-qubit-reduction` from the config file.
    #[command(flatten)]
    pub reduction: TwoQubitReduction,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S active-space.electrons=4
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    // --- Output ---
    /// Print every Pauli term of the encoded Hamiltonian.
    #[arg(long)]
    pub print_terms: bool,
}

/// A group to handle mutually exclusive boolean flags for the two-qubit reduction.
#[derive(Args, Debug, Default, Clone, Copy)]
#[group(required = false, multiple = false)]
pub struct TwoQubitReduction {
    /// Taper two qubits using particle-number symmetry (parity encoding only).
    #[arg(long)]
    pub two_qubit_reduction: bool,
    /// Keep the full qubit register.
    #[arg(long)]
    pub no_two_qubit_reduction: bool,
}

impl TwoQubitReduction {
    pub fn requested(self) -> Option<bool> {
        match (self.two_qubit_reduction, self.no_two_qubit_reduction) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_accepts_multiple_inputs_and_overrides() {
        let cli = Cli::parse_from([
            "qerp", "-vv", "-j", "2", "build", "a.xyz", "b.xyz", "--charge", "-1", "-e", "4",
            "--fragment-orbitals", "0,1,2", "--no-two-qubit-reduction",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(2));
        let Commands::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert_eq!(args.inputs, vec![PathBuf::from("a.xyz"), PathBuf::from("b.xyz")]);
        assert_eq!(args.fragment.charge, Some(-1));
        assert_eq!(args.fragment.active_electrons, Some(4));
        assert_eq!(args.fragment.fragment_orbitals, Some(vec![0, 1, 2]));
        assert_eq!(args.fragment.reduction.requested(), Some(false));
    }

    #[test]
    fn reduction_flags_are_mutually_exclusive() {
        let result = Cli::try_parse_from([
            "qerp",
            "h2",
            "0.735",
            "--two-qubit-reduction",
            "--no-two-qubit-reduction",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn h2_takes_bond_length_and_defaults_everything_else() {
        let cli = Cli::parse_from(["qerp", "h2", "0.735"]);
        let Commands::H2(args) = cli.command else {
            panic!("expected h2 command");
        };
        assert_eq!(args.bond_length, 0.735);
        assert!(args.fragment.config.is_none());
        assert_eq!(args.fragment.reduction.requested(), None);
        assert!(!args.fragment.print_terms);
    }

    #[test]
    fn build_requires_at_least_one_input() {
        assert!(Cli::try_parse_from(["qerp", "build"]).is_err());
    }
}
