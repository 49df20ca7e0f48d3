use super::element::Element;
use super::geometry::Geometry;
use crate::engine::config::DistanceUnit;
use crate::engine::error::ConfigurationError;
use nalgebra::Point3;

#[derive(Debug, Clone, PartialEq)]
pub struct Nucleus {
    pub element: Element,
    /// Position in Bohr.
    pub position: Point3<f64>,
}

/// A geometry in atomic units together with its electronic charge state.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    nuclei: Vec<Nucleus>,
    charge: i32,
    spin: u32,
    num_electrons: usize,
}

impl Molecule {
    /// Builds a molecule, checking that the charge leaves electrons behind and that the
    /// electron count and spin (2S) have the same parity.
    pub fn new(
        geometry: &Geometry,
        unit: DistanceUnit,
        charge: i32,
        spin: u32,
    ) -> Result<Self, ConfigurationError> {
        let scale = unit.to_bohr();
        let nuclei: Vec<Nucleus> = geometry
            .atoms()
            .iter()
            .map(|atom| Nucleus {
                element: atom.element,
                position: Point3::from(atom.position.coords * scale),
            })
            .collect();

        let nuclear_charge: i64 = nuclei
            .iter()
            .map(|n| n.element.atomic_number() as i64)
            .sum();
        let electrons = nuclear_charge - charge as i64;
        if electrons <= 0 {
            return Err(ConfigurationError::InvalidElectronCount { electrons, charge });
        }
        let num_electrons = electrons as usize;
        if spin as usize > num_electrons || (num_electrons - spin as usize) % 2 != 0 {
            return Err(ConfigurationError::InconsistentSpin {
                electrons: num_electrons,
                spin,
            });
        }

        Ok(Self {
            nuclei,
            charge,
            spin,
            num_electrons,
        })
    }

    pub fn nuclei(&self) -> &[Nucleus] {
        &self.nuclei
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    pub fn spin(&self) -> u32 {
        self.spin
    }

    pub fn num_electrons(&self) -> usize {
        self.num_electrons
    }

    pub fn num_alpha(&self) -> usize {
        (self.num_electrons + self.spin as usize) / 2
    }

    pub fn num_beta(&self) -> usize {
        (self.num_electrons - self.spin as usize) / 2
    }

    pub fn nuclear_repulsion(&self) -> f64 {
        let mut energy = 0.0;
        for (i, a) in self.nuclei.iter().enumerate() {
            for b in &self.nuclei[..i] {
                let distance = (a.position - b.position).norm();
                energy += a.element.nuclear_charge() * b.element.nuclear_charge() / distance;
            }
        }
        energy
    }
}
