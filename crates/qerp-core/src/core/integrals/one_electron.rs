use super::hermite::HermiteCoulomb;
use super::pair::{PrimitivePair, primitive_pairs};
use crate::core::basis::shell::{BasisSet, ContractedGaussian};
use crate::core::models::molecule::Molecule;
use nalgebra::DMatrix;
use std::f64::consts::PI;

fn symmetric_matrix(
    basis: &BasisSet,
    mut element: impl FnMut(&ContractedGaussian, &ContractedGaussian) -> f64,
) -> DMatrix<f64> {
    let functions = basis.functions();
    let n = functions.len();
    let mut matrix = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in 0..=i {
            let value = element(&functions[i], &functions[j]);
            matrix[(i, j)] = value;
            matrix[(j, i)] = value;
        }
    }
    matrix
}

/// One-dimensional overlap `E^{ij}_0 sqrt(pi/p)`, zero for negative `j`.
fn overlap_1d(pair: &PrimitivePair, axis: usize, i: usize, j: isize) -> f64 {
    if j < 0 {
        return 0.0;
    }
    pair.expansions[axis].get(i, j as usize, 0) * (PI / pair.p).sqrt()
}

pub fn overlap_matrix(basis: &BasisSet) -> DMatrix<f64> {
    symmetric_matrix(basis, |f, g| {
        primitive_pairs(f, g, 0)
            .iter()
            .map(|pair| {
                let product: f64 = (0..3)
                    .map(|axis| {
                        overlap_1d(pair, axis, f.powers[axis] as usize, g.powers[axis] as isize)
                    })
                    .product();
                pair.coefficient * product
            })
            .sum()
    })
}

pub fn kinetic_matrix(basis: &BasisSet) -> DMatrix<f64> {
    symmetric_matrix(basis, |f, g| {
        primitive_pairs(f, g, 2)
            .iter()
            .map(|pair| {
                let b = pair.b;
                let mut overlaps = [0.0; 3];
                let mut kinetics = [0.0; 3];
                for axis in 0..3 {
                    let i = f.powers[axis] as usize;
                    let j = g.powers[axis] as isize;
                    overlaps[axis] = overlap_1d(pair, axis, i, j);
                    kinetics[axis] = -2.0 * b * b * overlap_1d(pair, axis, i, j + 2)
                        + b * (2 * j + 1) as f64 * overlaps[axis]
                        - 0.5 * (j * (j - 1)) as f64 * overlap_1d(pair, axis, i, j - 2);
                }
                let value = kinetics[0] * overlaps[1] * overlaps[2]
                    + overlaps[0] * kinetics[1] * overlaps[2]
                    + overlaps[0] * overlaps[1] * kinetics[2];
                pair.coefficient * value
            })
            .sum()
    })
}

/// Electron-nucleus attraction, including the negative sign and the nuclear charges.
pub fn nuclear_attraction_matrix(basis: &BasisSet, molecule: &Molecule) -> DMatrix<f64> {
    symmetric_matrix(basis, |f, g| {
        let order = (f.angular_momentum() + g.angular_momentum()) as usize;
        let mut total = 0.0;
        for pair in primitive_pairs(f, g, 0) {
            for nucleus in molecule.nuclei() {
                let coulomb = HermiteCoulomb::new(order, pair.p, &(pair.center - nucleus.position));
                let mut sum = 0.0;
                for t in 0..=(f.powers[0] + g.powers[0]) as usize {
                    let ex = pair.expansions[0].get(f.powers[0] as usize, g.powers[0] as usize, t);
                    for u in 0..=(f.powers[1] + g.powers[1]) as usize {
                        let ey =
                            pair.expansions[1].get(f.powers[1] as usize, g.powers[1] as usize, u);
                        for v in 0..=(f.powers[2] + g.powers[2]) as usize {
                            let ez = pair.expansions[2].get(
                                f.powers[2] as usize,
                                g.powers[2] as usize,
                                v,
                            );
                            sum += ex * ey * ez * coulomb.get(t, u, v);
                        }
                    }
                }
                total -= nucleus.element.nuclear_charge() * pair.coefficient * 2.0 * PI / pair.p
                    * sum;
            }
        }
        total
    })
}

/// The core Hamiltonian `T + V` in the atomic-orbital basis.
pub fn core_hamiltonian(basis: &BasisSet, molecule: &Molecule) -> DMatrix<f64> {
    kinetic_matrix(basis) + nuclear_attraction_matrix(basis, molecule)
}
