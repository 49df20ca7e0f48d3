use super::library::{BasisDefinition, ShellTemplate};
use crate::core::models::molecule::Molecule;
use crate::engine::error::ConfigurationError;
use nalgebra::Point3;
use std::f64::consts::PI;

/// A normalized contracted Cartesian Gaussian `x^l y^m z^n Σ c_k exp(-a_k r²)`.
///
/// The stored coefficients already include the primitive normalization constants and the
/// contraction renormalization, so the function has unit self-overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractedGaussian {
    pub center: Point3<f64>,
    pub powers: [u8; 3],
    pub exponents: Vec<f64>,
    pub coefficients: Vec<f64>,
}

impl ContractedGaussian {
    pub fn new(center: Point3<f64>, powers: [u8; 3], template: &ShellTemplate) -> Self {
        let mut coefficients: Vec<f64> = template
            .exponents
            .iter()
            .zip(&template.coefficients)
            .map(|(&a, &c)| c * primitive_norm(a, powers))
            .collect();

        let mut self_overlap = 0.0;
        for (&a, &ca) in template.exponents.iter().zip(&coefficients) {
            for (&b, &cb) in template.exponents.iter().zip(&coefficients) {
                self_overlap += ca * cb * unnormalized_overlap(a + b, powers);
            }
        }
        let scale = self_overlap.sqrt().recip();
        for c in &mut coefficients {
            *c *= scale;
        }

        Self {
            center,
            powers,
            exponents: template.exponents.clone(),
            coefficients,
        }
    }

    pub fn angular_momentum(&self) -> u8 {
        self.powers.iter().sum()
    }

    pub fn primitives(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.exponents.iter().copied().zip(self.coefficients.iter().copied())
    }
}

/// `(2n - 1)!!`, with `(-1)!! = 1`.
fn odd_double_factorial(n: u8) -> f64 {
    (1..=n).map(|k| (2 * k - 1) as f64).product()
}

fn primitive_norm(exponent: f64, powers: [u8; 3]) -> f64 {
    let total: u8 = powers.iter().sum();
    let denominator: f64 = powers.iter().map(|&p| odd_double_factorial(p)).product();
    (2.0 * exponent / PI).powf(0.75) * (4.0 * exponent).powf(total as f64 / 2.0)
        / denominator.sqrt()
}

/// Overlap of two unnormalized same-centre primitives whose exponents sum to `p`.
fn unnormalized_overlap(p: f64, powers: [u8; 3]) -> f64 {
    let angular: f64 = powers
        .iter()
        .map(|&l| odd_double_factorial(l) / (2.0 * p).powi(l as i32))
        .product();
    (PI / p).powf(1.5) * angular
}

/// Cartesian exponent triples of a shell in the conventional order
/// (`x, y, z` for p; `xx, xy, xz, yy, yz, zz` for d).
pub fn cartesian_components(angular_momentum: u8) -> Vec<[u8; 3]> {
    let l = angular_momentum;
    let mut components = Vec::with_capacity(((l as usize + 1) * (l as usize + 2)) / 2);
    for i in (0..=l).rev() {
        for j in (0..=l - i).rev() {
            components.push([i, j, l - i - j]);
        }
    }
    components
}

/// The atomic-orbital basis of a molecule, ordered by atom and then by shell.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisSet {
    name: String,
    functions: Vec<ContractedGaussian>,
}

impl BasisSet {
    pub fn for_molecule(
        definition: &BasisDefinition,
        molecule: &Molecule,
    ) -> Result<Self, ConfigurationError> {
        let mut functions = Vec::new();
        for nucleus in molecule.nuclei() {
            for template in definition.shells_for(nucleus.element)? {
                for powers in cartesian_components(template.angular_momentum) {
                    functions.push(ContractedGaussian::new(nucleus.position, powers, template));
                }
            }
        }
        Ok(Self {
            name: definition.name().to_string(),
            functions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn functions(&self) -> &[ContractedGaussian] {
        &self.functions
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
