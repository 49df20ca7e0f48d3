use crate::cli::FragmentArgs;
use crate::error::{CliError, Result};
use qerp::engine::config::{DistanceUnit, EncodingScheme, FragmentConfig};
use qerp::engine::error::{ConfigurationError, PipelineError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialMoleculeConfig {
    basis: Option<String>,
    basis_file: Option<PathBuf>,
    charge: Option<i32>,
    spin: Option<u32>,
    unit: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialActiveSpaceConfig {
    electrons: Option<usize>,
    orbitals: Option<usize>,
    fragment_orbitals: Option<Vec<usize>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialEncodingConfig {
    scheme: Option<String>,
    two_qubit_reduction: Option<bool>,
}

/// Fragment options as read from a TOML file, every field optional.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialFragmentConfig {
    molecule: Option<PartialMoleculeConfig>,
    active_space: Option<PartialActiveSpaceConfig>,
    encoding: Option<PartialEncodingConfig>,
}

/// The fully resolved options of one CLI invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub fragment: FragmentConfig,
    pub basis_file: Option<PathBuf>,
}

impl PartialFragmentConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file named by `--config`, or starts from an empty configuration.
    pub fn load(args: &FragmentArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Layers command-line values over the file values; library defaults fill the rest.
    pub fn merge_with_cli(mut self, args: &FragmentArgs) -> Result<AppConfig> {
        self.apply_set_values(&args.set_values)?;

        let molecule = self.molecule.take().unwrap_or_default();
        let active = self.active_space.take().unwrap_or_default();
        let encoding = self.encoding.take().unwrap_or_default();

        let mut builder = FragmentConfig::builder();
        if let Some(basis) = args.basis.clone().or(molecule.basis) {
            builder = builder.basis(basis);
        }
        if let Some(charge) = args.charge.or(molecule.charge) {
            builder = builder.charge(charge);
        }
        if let Some(spin) = args.spin.or(molecule.spin) {
            builder = builder.spin(spin);
        }
        if let Some(unit) = args.unit.as_ref().or(molecule.unit.as_ref()) {
            builder = builder.distance_unit(parse_option::<DistanceUnit>(unit)?);
        }
        if let Some(electrons) = args.active_electrons.or(active.electrons) {
            builder = builder.active_electrons(electrons);
        }
        if let Some(orbitals) = args.active_orbitals.or(active.orbitals) {
            builder = builder.active_orbitals(orbitals);
        }
        if let Some(indices) = args.fragment_orbitals.clone().or(active.fragment_orbitals) {
            builder = builder.fragment_orbitals(indices);
        }
        if let Some(scheme) = args.encoding.as_ref().or(encoding.scheme.as_ref()) {
            builder = builder.encoding(parse_option::<EncodingScheme>(scheme)?);
        }
        if let Some(reduce) = args.reduction.requested().or(encoding.two_qubit_reduction) {
            builder = builder.two_qubit_reduction(reduce);
        }

        let fragment = builder.build().map_err(PipelineError::from)?;
        Ok(AppConfig {
            fragment,
            basis_file: args.basis_file.clone().or(molecule.basis_file),
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let key = key.trim();
            let value = value.trim();

            match key {
                "molecule.basis" => {
                    self.molecule.get_or_insert_with(Default::default).basis =
                        Some(value.to_string());
                }
                "molecule.basis-file" => {
                    self.molecule.get_or_insert_with(Default::default).basis_file =
                        Some(PathBuf::from(value));
                }
                "molecule.charge" => {
                    self.molecule.get_or_insert_with(Default::default).charge =
                        Some(parse_set_value(key, value)?);
                }
                "molecule.spin" => {
                    self.molecule.get_or_insert_with(Default::default).spin =
                        Some(parse_set_value(key, value)?);
                }
                "molecule.unit" => {
                    self.molecule.get_or_insert_with(Default::default).unit =
                        Some(value.to_string());
                }
                "active-space.electrons" => {
                    self.active_space
                        .get_or_insert_with(Default::default)
                        .electrons = Some(parse_set_value(key, value)?);
                }
                "active-space.orbitals" => {
                    self.active_space
                        .get_or_insert_with(Default::default)
                        .orbitals = Some(parse_set_value(key, value)?);
                }
                "active-space.fragment-orbitals" => {
                    let indices = value
                        .split(',')
                        .filter(|s| !s.trim().is_empty())
                        .map(|s| parse_set_value(key, s.trim()))
                        .collect::<Result<Vec<usize>>>()?;
                    self.active_space
                        .get_or_insert_with(Default::default)
                        .fragment_orbitals = Some(indices);
                }
                "encoding.scheme" => {
                    self.encoding.get_or_insert_with(Default::default).scheme =
                        Some(value.to_string());
                }
                "encoding.two-qubit-reduction" => {
                    self.encoding
                        .get_or_insert_with(Default::default)
                        .two_qubit_reduction = Some(parse_set_value(key, value)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unknown configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_set_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: '{}'", key, value))
    })
}

fn parse_option<T>(value: &str) -> Result<T>
where
    T: FromStr<Err = ConfigurationError>,
{
    value
        .parse()
        .map_err(|e: ConfigurationError| CliError::from(PipelineError::from(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TwoQubitReduction;
    use std::fs;
    use tempfile::tempdir;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fragment.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn empty_configuration_resolves_to_library_defaults() {
        let app = PartialFragmentConfig::default()
            .merge_with_cli(&FragmentArgs::default())
            .unwrap();
        assert_eq!(app.fragment, FragmentConfig::default());
        assert_eq!(app.basis_file, None);
    }

    #[test]
    fn file_values_are_loaded_with_kebab_case_keys() {
        let (_dir, path) = write_config(
            r#"
            [molecule]
            basis = "STO-3G"
            charge = 1
            spin = 0
            unit = "bohr"
            basis-file = "extra-basis.toml"

            [active-space]
            electrons = 2
            orbitals = 3
            fragment-orbitals = [0, 2]

            [encoding]
            scheme = "jordan-wigner"
            two-qubit-reduction = false
            "#,
        );

        let app = PartialFragmentConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&FragmentArgs::default())
            .unwrap();

        let config = app.fragment;
        assert_eq!(config.basis, "STO-3G");
        assert_eq!(config.charge, 1);
        assert_eq!(config.distance_unit, DistanceUnit::Bohr);
        assert_eq!(config.active_electrons, Some(2));
        assert_eq!(config.active_orbitals, Some(3));
        assert_eq!(config.fragment_orbitals, Some(vec![0, 2]));
        assert_eq!(config.encoding, EncodingScheme::JordanWigner);
        assert!(!config.two_qubit_reduction);
        assert_eq!(app.basis_file, Some(PathBuf::from("extra-basis.toml")));
    }

    #[test]
    fn unknown_keys_in_file_are_rejected() {
        let (_dir, path) = write_config("[encoding]\nqubits = 4\n");
        let result = PartialFragmentConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn command_line_overrides_take_precedence_over_file_values() {
        let (_dir, path) = write_config(
            "[active-space]\nelectrons = 4\norbitals = 4\n[encoding]\nscheme = \"parity\"\n",
        );
        let args = FragmentArgs {
            active_electrons: Some(2),
            encoding: Some("jw".to_string()),
            reduction: TwoQubitReduction {
                two_qubit_reduction: false,
                no_two_qubit_reduction: true,
            },
            ..FragmentArgs::default()
        };

        let config = PartialFragmentConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap()
            .fragment;

        assert_eq!(config.active_electrons, Some(2));
        assert_eq!(config.active_orbitals, Some(4));
        assert_eq!(config.encoding, EncodingScheme::JordanWigner);
        assert!(!config.two_qubit_reduction);
    }

    #[test]
    fn set_values_override_file_values() {
        let (_dir, path) = write_config("[molecule]\ncharge = 0\n");
        let args = FragmentArgs {
            set_values: vec![
                "molecule.charge=-1".to_string(),
                "active-space.fragment-orbitals=0,1".to_string(),
                "encoding.two-qubit-reduction=false".to_string(),
            ],
            ..FragmentArgs::default()
        };

        let config = PartialFragmentConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap()
            .fragment;

        assert_eq!(config.charge, -1);
        assert_eq!(config.fragment_orbitals, Some(vec![0, 1]));
        assert!(!config.two_qubit_reduction);
    }

    #[test]
    fn malformed_set_values_are_reported() {
        let missing_equals = FragmentArgs {
            set_values: vec!["molecule.charge".to_string()],
            ..FragmentArgs::default()
        };
        assert!(matches!(
            PartialFragmentConfig::default().merge_with_cli(&missing_equals),
            Err(CliError::Config(_))
        ));

        let unknown_key = FragmentArgs {
            set_values: vec!["molecule.mass=3".to_string()],
            ..FragmentArgs::default()
        };
        assert!(matches!(
            PartialFragmentConfig::default().merge_with_cli(&unknown_key),
            Err(CliError::Config(_))
        ));

        let bad_value = FragmentArgs {
            set_values: vec!["active-space.orbitals=two".to_string()],
            ..FragmentArgs::default()
        };
        assert!(matches!(
            PartialFragmentConfig::default().merge_with_cli(&bad_value),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn unsupported_encoding_surfaces_as_configuration_error() {
        let args = FragmentArgs {
            encoding: Some("bravyi-kitaev".to_string()),
            ..FragmentArgs::default()
        };
        let err = PartialFragmentConfig::default()
            .merge_with_cli(&args)
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Qerp(PipelineError::Configuration(
                ConfigurationError::UnsupportedEncoding { .. }
            ))
        ));
    }

    #[test]
    fn invalid_active_space_is_rejected_before_any_computation() {
        let args = FragmentArgs {
            active_orbitals: Some(0),
            ..FragmentArgs::default()
        };
        let err = PartialFragmentConfig::default()
            .merge_with_cli(&args)
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Qerp(PipelineError::Configuration(
                ConfigurationError::NonPositiveActiveCount { .. }
            ))
        ));
    }
}
