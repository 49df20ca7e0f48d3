use super::hermite::HermiteCoulomb;
use super::pair::{PrimitivePair, primitive_pairs};
use crate::core::basis::shell::{BasisSet, ContractedGaussian};
use nalgebra::DMatrix;
use std::f64::consts::PI;

#[inline]
fn pair_index(i: usize, j: usize) -> usize {
    if i >= j { i * (i + 1) / 2 + j } else { j * (j + 1) / 2 + i }
}

/// Two-electron repulsion integrals `(ij|kl)` in chemists' notation.
///
/// Only the unique quartets under the eightfold permutational symmetry of real orbitals
/// are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoElectronIntegrals {
    size: usize,
    data: Vec<f64>,
}

impl TwoElectronIntegrals {
    pub fn zeros(size: usize) -> Self {
        let pairs = size * (size + 1) / 2;
        Self {
            size,
            data: vec![0.0; pairs * (pairs + 1) / 2],
        }
    }

    /// Computes the atomic-orbital integrals of a basis set.
    pub fn compute(basis: &BasisSet) -> Self {
        let functions = basis.functions();
        let n = functions.len();

        let mut pairs = Vec::with_capacity(n * (n + 1) / 2);
        for i in 0..n {
            for j in 0..=i {
                pairs.push((i, j, primitive_pairs(&functions[i], &functions[j], 0)));
            }
        }

        let mut integrals = Self::zeros(n);
        for (ij, (i, j, bra)) in pairs.iter().enumerate() {
            for (k, l, ket) in &pairs[..=ij] {
                let value = contracted_eri(
                    (&functions[*i], &functions[*j], bra),
                    (&functions[*k], &functions[*l], ket),
                );
                integrals.set(*i, *j, *k, *l, value);
            }
        }
        integrals
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize, l: usize) -> f64 {
        self.data[pair_index(pair_index(i, j), pair_index(k, l))]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, l: usize, value: f64) {
        let index = pair_index(pair_index(i, j), pair_index(k, l));
        self.data[index] = value;
    }

    /// Coulomb and exchange matrices `J_ij = Σ D_kl (ij|kl)` and `K_ij = Σ D_kl (ik|jl)`.
    pub fn coulomb_exchange(&self, density: &DMatrix<f64>) -> (DMatrix<f64>, DMatrix<f64>) {
        let n = self.size;
        let mut coulomb = DMatrix::zeros(n, n);
        let mut exchange = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                let mut j_sum = 0.0;
                let mut k_sum = 0.0;
                for k in 0..n {
                    for l in 0..n {
                        let d = density[(k, l)];
                        j_sum += d * self.get(i, j, k, l);
                        k_sum += d * self.get(i, k, j, l);
                    }
                }
                coulomb[(i, j)] = j_sum;
                exchange[(i, j)] = k_sum;
            }
        }
        (coulomb, exchange)
    }

    /// Transforms to the orbital basis given by the columns of `coefficients`.
    pub fn transform(&self, coefficients: &DMatrix<f64>) -> Self {
        let n = self.size;
        let m = coefficients.ncols();
        let idx4 = |a: usize, b: usize, c: usize, d: usize, dims: [usize; 4]| {
            ((a * dims[1] + b) * dims[2] + c) * dims[3] + d
        };

        // (pj|kl)
        let dims1 = [m, n, n, n];
        let mut first = vec![0.0; m * n * n * n];
        for p in 0..m {
            for j in 0..n {
                for k in 0..n {
                    for l in 0..n {
                        let mut sum = 0.0;
                        for i in 0..n {
                            sum += coefficients[(i, p)] * self.get(i, j, k, l);
                        }
                        first[idx4(p, j, k, l, dims1)] = sum;
                    }
                }
            }
        }

        // (pq|kl)
        let dims2 = [m, m, n, n];
        let mut second = vec![0.0; m * m * n * n];
        for p in 0..m {
            for q in 0..m {
                for k in 0..n {
                    for l in 0..n {
                        let mut sum = 0.0;
                        for j in 0..n {
                            sum += coefficients[(j, q)] * first[idx4(p, j, k, l, dims1)];
                        }
                        second[idx4(p, q, k, l, dims2)] = sum;
                    }
                }
            }
        }

        // (pq|rl)
        let dims3 = [m, m, m, n];
        let mut third = vec![0.0; m * m * m * n];
        for p in 0..m {
            for q in 0..m {
                for r in 0..m {
                    for l in 0..n {
                        let mut sum = 0.0;
                        for k in 0..n {
                            sum += coefficients[(k, r)] * second[idx4(p, q, k, l, dims2)];
                        }
                        third[idx4(p, q, r, l, dims3)] = sum;
                    }
                }
            }
        }

        // (pq|rs)
        let mut result = Self::zeros(m);
        for p in 0..m {
            for q in 0..=p {
                for r in 0..m {
                    for s in 0..=r {
                        if pair_index(p, q) < pair_index(r, s) {
                            continue;
                        }
                        let mut sum = 0.0;
                        for l in 0..n {
                            sum += coefficients[(l, s)] * third[idx4(p, q, r, l, dims3)];
                        }
                        result.set(p, q, r, s, sum);
                    }
                }
            }
        }
        result
    }
}

type ContractedPair<'a> = (&'a ContractedGaussian, &'a ContractedGaussian, &'a Vec<PrimitivePair>);

fn contracted_eri(bra: ContractedPair<'_>, ket: ContractedPair<'_>) -> f64 {
    let (fa, fb, bra_pairs) = bra;
    let (fc, fd, ket_pairs) = ket;
    let la = fa.powers.map(usize::from);
    let lb = fb.powers.map(usize::from);
    let lc = fc.powers.map(usize::from);
    let ld = fd.powers.map(usize::from);
    let order = la.iter().chain(&lb).chain(&lc).chain(&ld).sum::<usize>();

    let mut total = 0.0;
    for p1 in bra_pairs {
        for p2 in ket_pairs {
            let (p, q) = (p1.p, p2.p);
            let alpha = p * q / (p + q);
            let coulomb = HermiteCoulomb::new(order, alpha, &(p1.center - p2.center));

            let mut sum = 0.0;
            for t in 0..=(la[0] + lb[0]) {
                let e1x = p1.expansions[0].get(la[0], lb[0], t);
                for u in 0..=(la[1] + lb[1]) {
                    let e1y = p1.expansions[1].get(la[1], lb[1], u);
                    for v in 0..=(la[2] + lb[2]) {
                        let e1 = e1x * e1y * p1.expansions[2].get(la[2], lb[2], v);
                        if e1 == 0.0 {
                            continue;
                        }
                        for tau in 0..=(lc[0] + ld[0]) {
                            let e2x = p2.expansions[0].get(lc[0], ld[0], tau);
                            for nu in 0..=(lc[1] + ld[1]) {
                                let e2y = p2.expansions[1].get(lc[1], ld[1], nu);
                                for phi in 0..=(lc[2] + ld[2]) {
                                    let e2 = e2x * e2y * p2.expansions[2].get(lc[2], ld[2], phi);
                                    let sign = if (tau + nu + phi) % 2 == 0 { 1.0 } else { -1.0 };
                                    sum += e1 * e2 * sign * coulomb.get(t + tau, u + nu, v + phi);
                                }
                            }
                        }
                    }
                }
            }
            total += p1.coefficient * p2.coefficient * 2.0 * PI.powf(2.5)
                / (p * q * (p + q).sqrt())
                * sum;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::basis::library::BasisLibrary;
    use crate::core::models::geometry::Geometry;
    use crate::core::models::molecule::Molecule;
    use crate::engine::config::DistanceUnit;

    fn f64_approx_equal(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    fn basis(atoms: Vec<(&str, [f64; 3])>) -> BasisSet {
        let geometry = Geometry::normalize(atoms).unwrap();
        let molecule = Molecule::new(&geometry, DistanceUnit::Bohr, 0, 0).unwrap();
        let sto3g = BasisLibrary::builtin().unwrap().get("sto-3g").unwrap();
        BasisSet::for_molecule(sto3g, &molecule).unwrap()
    }

    #[test]
    fn h2_integrals_match_reference_values() {
        // Szabo & Ostlund, eq. 3.235 (R = 1.4 bohr)
        let eri = TwoElectronIntegrals::compute(&basis(vec![
            ("H", [0.0, 0.0, 0.0]),
            ("H", [0.0, 0.0, 1.4]),
        ]));
        assert!(f64_approx_equal(eri.get(0, 0, 0, 0), 0.7746, 1e-4));
        assert!(f64_approx_equal(eri.get(0, 0, 1, 1), 0.5697, 1e-4));
        assert!(f64_approx_equal(eri.get(1, 0, 0, 0), 0.4441, 1e-4));
        assert!(f64_approx_equal(eri.get(1, 0, 1, 0), 0.2970, 1e-4));
    }

    #[test]
    fn permutational_symmetry_is_exposed_through_get() {
        let eri = TwoElectronIntegrals::compute(&basis(vec![
            ("O", [0.0, -0.143225816552, 0.0]),
            ("H", [1.638036840407, 1.136548822547, 0.0]),
            ("H", [-1.638036840407, 1.136548822547, 0.0]),
        ]));
        let value = eri.get(5, 2, 6, 3);
        for (i, j, k, l) in [(2, 5, 6, 3), (5, 2, 3, 6), (6, 3, 5, 2), (3, 6, 2, 5)] {
            assert_eq!(eri.get(i, j, k, l), value);
        }
    }

    #[test]
    fn identity_transform_leaves_integrals_unchanged() {
        let eri = TwoElectronIntegrals::compute(&basis(vec![
            ("H", [0.0, 0.0, 0.0]),
            ("H", [0.0, 0.0, 1.4]),
            ("He", [0.0, 1.5, 0.7]),
        ]));
        let transformed = eri.transform(&DMatrix::identity(3, 3));
        for (a, b) in eri.data.iter().zip(&transformed.data) {
            assert!(f64_approx_equal(*a, *b, 1e-14));
        }
    }

    #[test]
    fn transform_to_a_single_orbital_contracts_all_indices() {
        let eri = TwoElectronIntegrals::compute(&basis(vec![
            ("H", [0.0, 0.0, 0.0]),
            ("H", [0.0, 0.0, 1.4]),
        ]));
        let c = DMatrix::from_column_slice(2, 1, &[0.6, 0.3]);
        let transformed = eri.transform(&c);

        let mut expected = 0.0;
        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    for l in 0..2 {
                        expected += c[i] * c[j] * c[k] * c[l] * eri.get(i, j, k, l);
                    }
                }
            }
        }
        assert_eq!(transformed.size(), 1);
        assert!(f64_approx_equal(transformed.get(0, 0, 0, 0), expected, 1e-14));
    }

    #[test]
    fn coulomb_and_exchange_coincide_for_a_density_on_one_function() {
        let eri = TwoElectronIntegrals::compute(&basis(vec![
            ("H", [0.0, 0.0, 0.0]),
            ("H", [0.0, 0.0, 1.4]),
        ]));
        let mut density = DMatrix::zeros(2, 2);
        density[(0, 0)] = 1.0;
        let (j, k) = eri.coulomb_exchange(&density);
        assert!(f64_approx_equal(j[(0, 0)], k[(0, 0)], 1e-15));
        assert!(f64_approx_equal(j[(0, 0)], 0.7746, 1e-4));
    }
}
