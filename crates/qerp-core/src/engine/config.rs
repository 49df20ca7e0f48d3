use super::error::ConfigurationError;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Bohr radius in Angstrom (CODATA 2010).
pub const BOHR_RADIUS_ANGSTROM: f64 = 0.52917721092;

pub const DEFAULT_BASIS: &str = "sto-3g";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistanceUnit {
    #[default]
    Angstrom,
    Bohr,
}

impl DistanceUnit {
    /// Factor converting a length in this unit to Bohr.
    pub fn to_bohr(self) -> f64 {
        match self {
            DistanceUnit::Angstrom => 1.0 / BOHR_RADIUS_ANGSTROM,
            DistanceUnit::Bohr => 1.0,
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = ConfigurationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "angstrom" | "ang" | "a" => Ok(DistanceUnit::Angstrom),
            "bohr" | "au" => Ok(DistanceUnit::Bohr),
            _ => Err(ConfigurationError::UnsupportedUnit { name: s.to_string() }),
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceUnit::Angstrom => write!(f, "Angstrom"),
            DistanceUnit::Bohr => write!(f, "Bohr"),
        }
    }
}

/// Fermion-to-qubit encoding applied to the active-space Hamiltonian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncodingScheme {
    #[default]
    Parity,
    JordanWigner,
}

impl FromStr for EncodingScheme {
    type Err = ConfigurationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parity" => Ok(EncodingScheme::Parity),
            "jw" | "jordan-wigner" | "jordan_wigner" => Ok(EncodingScheme::JordanWigner),
            _ => Err(ConfigurationError::UnsupportedEncoding { name: s.to_string() }),
        }
    }
}

impl fmt::Display for EncodingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingScheme::Parity => write!(f, "parity"),
            EncodingScheme::JordanWigner => write!(f, "jordan-wigner"),
        }
    }
}

/// The complete set of options for one fragment build.
///
/// `None` in any of the active-space fields means "infer from the full problem".
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentConfig {
    pub basis: String,
    pub charge: i32,
    /// Number of unpaired electrons (2S).
    pub spin: u32,
    pub distance_unit: DistanceUnit,
    pub active_electrons: Option<usize>,
    pub active_orbitals: Option<usize>,
    pub fragment_orbitals: Option<Vec<usize>>,
    pub encoding: EncodingScheme,
    pub two_qubit_reduction: bool,
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            basis: DEFAULT_BASIS.to_string(),
            charge: 0,
            spin: 0,
            distance_unit: DistanceUnit::Angstrom,
            active_electrons: None,
            active_orbitals: None,
            fragment_orbitals: None,
            encoding: EncodingScheme::Parity,
            two_qubit_reduction: true,
        }
    }
}

impl FragmentConfig {
    pub fn builder() -> FragmentConfigBuilder {
        FragmentConfigBuilder::new()
    }

    /// Returns a copy where every unset active-space field takes the value from `defaults`.
    ///
    /// Fields the caller already set are never overwritten.
    pub fn fill_unset(&self, defaults: &ActiveSpaceDefaults) -> Self {
        Self {
            active_electrons: self.active_electrons.or(defaults.active_electrons),
            active_orbitals: self.active_orbitals.or(defaults.active_orbitals),
            fragment_orbitals: self
                .fragment_orbitals
                .clone()
                .or_else(|| defaults.fragment_orbitals.clone()),
            ..self.clone()
        }
    }

    pub fn requires_particle_counts(&self) -> bool {
        self.encoding == EncodingScheme::Parity && self.two_qubit_reduction
    }

    /// Checks everything that can be decided without touching the molecule.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.active_electrons == Some(0) {
            return Err(ConfigurationError::NonPositiveActiveCount {
                quantity: "electron",
            });
        }
        if self.active_orbitals == Some(0) {
            return Err(ConfigurationError::NonPositiveActiveCount {
                quantity: "orbital",
            });
        }
        if let Some(indices) = &self.fragment_orbitals {
            validate_fragment_orbitals(indices, self.active_orbitals)?;
        }
        Ok(())
    }
}

/// Rejects duplicated indices and, when the active orbital count is known, indices outside
/// `0..active_orbitals`.
pub fn validate_fragment_orbitals(
    indices: &[usize],
    active_orbitals: Option<usize>,
) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::with_capacity(indices.len());
    for &index in indices {
        if let Some(limit) = active_orbitals {
            if index >= limit {
                return Err(ConfigurationError::FragmentOrbitalOutOfRange {
                    index,
                    active_orbitals: limit,
                });
            }
        }
        if !seen.insert(index) {
            return Err(ConfigurationError::DuplicateFragmentOrbital { index });
        }
    }
    Ok(())
}

/// Active-space values used to fill a [`FragmentConfig`] the caller left partially unset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActiveSpaceDefaults {
    pub active_electrons: Option<usize>,
    pub active_orbitals: Option<usize>,
    pub fragment_orbitals: Option<Vec<usize>>,
}

impl ActiveSpaceDefaults {
    /// Two electrons in two orbitals, both of which belong to the fragment.
    pub fn minimal() -> Self {
        Self {
            active_electrons: Some(2),
            active_orbitals: Some(2),
            fragment_orbitals: Some(vec![0, 1]),
        }
    }
}

#[derive(Default)]
pub struct FragmentConfigBuilder {
    basis: Option<String>,
    charge: Option<i32>,
    spin: Option<u32>,
    distance_unit: Option<DistanceUnit>,
    active_electrons: Option<usize>,
    active_orbitals: Option<usize>,
    fragment_orbitals: Option<Vec<usize>>,
    encoding: Option<EncodingScheme>,
    two_qubit_reduction: Option<bool>,
}

impl FragmentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn basis(mut self, basis: impl Into<String>) -> Self {
        self.basis = Some(basis.into());
        self
    }
    pub fn charge(mut self, charge: i32) -> Self {
        self.charge = Some(charge);
        self
    }
    pub fn spin(mut self, spin: u32) -> Self {
        self.spin = Some(spin);
        self
    }
    pub fn distance_unit(mut self, unit: DistanceUnit) -> Self {
        self.distance_unit = Some(unit);
        self
    }
    pub fn active_electrons(mut self, electrons: usize) -> Self {
        self.active_electrons = Some(electrons);
        self
    }
    pub fn active_orbitals(mut self, orbitals: usize) -> Self {
        self.active_orbitals = Some(orbitals);
        self
    }
    pub fn fragment_orbitals(mut self, indices: Vec<usize>) -> Self {
        self.fragment_orbitals = Some(indices);
        self
    }
    pub fn encoding(mut self, scheme: EncodingScheme) -> Self {
        self.encoding = Some(scheme);
        self
    }
    pub fn two_qubit_reduction(mut self, enabled: bool) -> Self {
        self.two_qubit_reduction = Some(enabled);
        self
    }

    pub fn build(self) -> Result<FragmentConfig, ConfigurationError> {
        let defaults = FragmentConfig::default();
        let config = FragmentConfig {
            basis: self.basis.unwrap_or(defaults.basis),
            charge: self.charge.unwrap_or(defaults.charge),
            spin: self.spin.unwrap_or(defaults.spin),
            distance_unit: self.distance_unit.unwrap_or(defaults.distance_unit),
            active_electrons: self.active_electrons,
            active_orbitals: self.active_orbitals,
            fragment_orbitals: self.fragment_orbitals,
            encoding: self.encoding.unwrap_or(defaults.encoding),
            two_qubit_reduction: self
                .two_qubit_reduction
                .unwrap_or(defaults.two_qubit_reduction),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_sto3g_parity_with_reduction() {
        let config = FragmentConfig::default();
        assert_eq!(config.basis, "sto-3g");
        assert_eq!(config.encoding, EncodingScheme::Parity);
        assert!(config.two_qubit_reduction);
        assert!(config.requires_particle_counts());
        assert_eq!(config.active_electrons, None);
    }

    #[test]
    fn encoding_scheme_parses_known_aliases_case_insensitively() {
        assert_eq!("Parity".parse(), Ok(EncodingScheme::Parity));
        assert_eq!("JW".parse(), Ok(EncodingScheme::JordanWigner));
        assert_eq!("jordan_wigner".parse(), Ok(EncodingScheme::JordanWigner));
        assert_eq!("jordan-wigner".parse(), Ok(EncodingScheme::JordanWigner));
    }

    #[test]
    fn encoding_scheme_rejects_unknown_name_and_reports_it() {
        let err = "bravyi-kitaev".parse::<EncodingScheme>().unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnsupportedEncoding {
                name: "bravyi-kitaev".to_string()
            }
        );
        assert!(err.to_string().contains("bravyi-kitaev"));
    }

    #[test]
    fn distance_unit_converts_angstrom_to_bohr() {
        let factor = DistanceUnit::Angstrom.to_bohr();
        assert!((factor - 1.8897261245650618).abs() < 1e-12);
        assert_eq!(DistanceUnit::Bohr.to_bohr(), 1.0);
        assert_eq!("bohr".parse(), Ok(DistanceUnit::Bohr));
        assert!("furlong".parse::<DistanceUnit>().is_err());
    }

    #[test]
    fn fill_unset_only_fills_missing_fields() {
        let config = FragmentConfig {
            active_orbitals: Some(3),
            ..FragmentConfig::default()
        };
        let merged = config.fill_unset(&ActiveSpaceDefaults::minimal());

        assert_eq!(merged.active_electrons, Some(2));
        assert_eq!(merged.active_orbitals, Some(3));
        assert_eq!(merged.fragment_orbitals, Some(vec![0, 1]));
        assert_eq!(config.active_electrons, None, "original must stay untouched");
    }

    #[test]
    fn fill_unset_keeps_caller_fragment_orbitals() {
        let config = FragmentConfig {
            fragment_orbitals: Some(vec![1]),
            ..FragmentConfig::default()
        };
        let merged = config.fill_unset(&ActiveSpaceDefaults::minimal());
        assert_eq!(merged.fragment_orbitals, Some(vec![1]));
    }

    #[test]
    fn builder_applies_defaults_for_unset_fields() {
        let config = FragmentConfig::builder()
            .charge(1)
            .encoding(EncodingScheme::JordanWigner)
            .build()
            .unwrap();
        assert_eq!(config.charge, 1);
        assert_eq!(config.basis, DEFAULT_BASIS);
        assert_eq!(config.encoding, EncodingScheme::JordanWigner);
        assert!(config.two_qubit_reduction);
    }

    #[test]
    fn builder_rejects_zero_active_orbitals() {
        let result = FragmentConfig::builder().active_orbitals(0).build();
        assert_eq!(
            result,
            Err(ConfigurationError::NonPositiveActiveCount {
                quantity: "orbital"
            })
        );
    }

    #[test]
    fn validate_rejects_fragment_orbitals_outside_explicit_active_space() {
        let config = FragmentConfig {
            active_orbitals: Some(2),
            fragment_orbitals: Some(vec![0, 2]),
            ..FragmentConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::FragmentOrbitalOutOfRange {
                index: 2,
                active_orbitals: 2
            })
        );
    }

    #[test]
    fn validate_rejects_duplicate_fragment_orbitals() {
        let result = validate_fragment_orbitals(&[0, 1, 0], None);
        assert_eq!(
            result,
            Err(ConfigurationError::DuplicateFragmentOrbital { index: 0 })
        );
    }
}
