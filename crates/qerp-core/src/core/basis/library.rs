use crate::core::models::element::Element;
use crate::engine::error::ConfigurationError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

const BUILTIN_STO3G: &str = include_str!("../../../data/basis/sto-3g.toml");
const BUILTIN_ORIGIN: &str = "<built-in sto-3g>";

/// Highest angular momentum the integral engine handles (d shells).
pub const MAX_ANGULAR_MOMENTUM: u8 = 2;

#[derive(Debug, Error)]
pub enum BasisLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{origin}': {source}")]
    Toml {
        origin: String,
        source: toml::de::Error,
    },
    #[error("Basis set '{basis}' lists unknown element '{symbol}'")]
    UnknownElement { basis: String, symbol: String },
    #[error("Basis set '{basis}', element '{symbol}', shell {index}: {reason}")]
    InvalidShell {
        basis: String,
        symbol: String,
        index: usize,
        reason: String,
    },
    #[error("Basis set name or alias '{name}' is defined more than once")]
    DuplicateName { name: String },
}

impl From<BasisLoadError> for ConfigurationError {
    fn from(err: BasisLoadError) -> Self {
        let origin = match &err {
            BasisLoadError::Io { path, .. } => path.clone(),
            BasisLoadError::Toml { origin, .. } => origin.clone(),
            BasisLoadError::UnknownElement { basis, .. }
            | BasisLoadError::InvalidShell { basis, .. } => basis.clone(),
            BasisLoadError::DuplicateName { name } => name.clone(),
        };
        ConfigurationError::InvalidBasisLibrary {
            origin,
            reason: err.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ShellRecord {
    angular_momentum: u8,
    exponents: Vec<f64>,
    coefficients: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BasisFile {
    name: String,
    #[serde(default)]
    aliases: Vec<String>,
    elements: BTreeMap<String, Vec<ShellRecord>>,
}

/// One contracted shell as tabulated: raw exponents and contraction coefficients,
/// without primitive normalization applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellTemplate {
    pub angular_momentum: u8,
    pub exponents: Vec<f64>,
    pub coefficients: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasisDefinition {
    name: String,
    aliases: Vec<String>,
    shells: HashMap<Element, Vec<ShellTemplate>>,
}

impl BasisDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn shells_for(&self, element: Element) -> Result<&[ShellTemplate], ConfigurationError> {
        self.shells
            .get(&element)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigurationError::UnsupportedElement {
                symbol: element.symbol().to_string(),
                basis: self.name.clone(),
            })
    }

    fn matches(&self, key: &str) -> bool {
        self.name.eq_ignore_ascii_case(key)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(key))
    }

    fn from_file(file: BasisFile) -> Result<Self, BasisLoadError> {
        let mut shells = HashMap::with_capacity(file.elements.len());
        for (symbol, records) in file.elements {
            let element =
                Element::from_symbol(&symbol).ok_or_else(|| BasisLoadError::UnknownElement {
                    basis: file.name.clone(),
                    symbol: symbol.clone(),
                })?;
            let templates = records
                .into_iter()
                .enumerate()
                .map(|(index, record)| {
                    validate_shell(&record).map_err(|reason| BasisLoadError::InvalidShell {
                        basis: file.name.clone(),
                        symbol: symbol.clone(),
                        index,
                        reason,
                    })?;
                    Ok(ShellTemplate {
                        angular_momentum: record.angular_momentum,
                        exponents: record.exponents,
                        coefficients: record.coefficients,
                    })
                })
                .collect::<Result<Vec<_>, BasisLoadError>>()?;
            shells.insert(element, templates);
        }
        Ok(Self {
            name: file.name,
            aliases: file.aliases,
            shells,
        })
    }
}

fn validate_shell(record: &ShellRecord) -> Result<(), String> {
    if record.exponents.is_empty() {
        return Err("shell has no primitives".into());
    }
    if record.exponents.len() != record.coefficients.len() {
        return Err(format!(
            "{} exponent(s) but {} coefficient(s)",
            record.exponents.len(),
            record.coefficients.len()
        ));
    }
    if record.angular_momentum > MAX_ANGULAR_MOMENTUM {
        return Err(format!(
            "angular momentum {} exceeds the supported maximum of {}",
            record.angular_momentum, MAX_ANGULAR_MOMENTUM
        ));
    }
    if let Some(bad) = record.exponents.iter().find(|e| !e.is_finite() || **e <= 0.0) {
        return Err(format!("exponent {bad} is not a positive finite number"));
    }
    if let Some(bad) = record.coefficients.iter().find(|c| !c.is_finite()) {
        return Err(format!("coefficient {bad} is not finite"));
    }
    Ok(())
}

/// A collection of named basis sets, looked up case-insensitively by name or alias.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasisLibrary {
    sets: Vec<BasisDefinition>,
}

impl BasisLibrary {
    /// The library shipped with the crate (STO-3G for H through Ne).
    pub fn builtin() -> Result<&'static BasisLibrary, ConfigurationError> {
        static BUILTIN: OnceLock<Result<BasisLibrary, ConfigurationError>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| {
                let mut library = BasisLibrary::default();
                library
                    .add_toml_str(BUILTIN_ORIGIN, BUILTIN_STO3G)
                    .map_err(ConfigurationError::from)?;
                Ok(library)
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Parses one basis set from TOML text and adds it to the library.
    pub fn add_toml_str(&mut self, origin: &str, content: &str) -> Result<(), BasisLoadError> {
        let file: BasisFile = toml::from_str(content).map_err(|e| BasisLoadError::Toml {
            origin: origin.to_string(),
            source: e,
        })?;
        let definition = BasisDefinition::from_file(file)?;

        for key in std::iter::once(&definition.name).chain(definition.aliases.iter()) {
            if self.sets.iter().any(|set| set.matches(key)) {
                return Err(BasisLoadError::DuplicateName { name: key.clone() });
            }
        }
        self.sets.push(definition);
        Ok(())
    }

    pub fn add_file(&mut self, path: &Path) -> Result<(), BasisLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| BasisLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        self.add_toml_str(&path.to_string_lossy(), &content)
    }

    pub fn get(&self, name: &str) -> Option<&BasisDefinition> {
        let key = name.trim();
        self.sets.iter().find(|set| set.matches(key))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|set| set.name.as_str())
    }
}

/// Finds a basis set in `custom` first and then in the built-in library.
pub fn resolve<'a>(
    custom: Option<&'a BasisLibrary>,
    name: &str,
) -> Result<&'a BasisDefinition, ConfigurationError> {
    if let Some(definition) = custom.and_then(|library| library.get(name)) {
        return Ok(definition);
    }
    BasisLibrary::builtin()?
        .get(name)
        .ok_or_else(|| ConfigurationError::UnsupportedBasis {
            name: name.to_string(),
        })
}
