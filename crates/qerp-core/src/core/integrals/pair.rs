use super::hermite::HermiteExpansion;
use crate::core::basis::shell::ContractedGaussian;
use nalgebra::Point3;

/// A product of two primitives from a pair of contracted functions.
#[derive(Debug, Clone)]
pub(crate) struct PrimitivePair {
    pub a: f64,
    pub b: f64,
    pub p: f64,
    pub center: Point3<f64>,
    pub coefficient: f64,
    pub expansions: [HermiteExpansion; 3],
}

/// All primitive products of `f` and `g`.
///
/// `extra_j` widens the tabulated range on the `g` side, which the kinetic energy
/// integrals need for their `j + 2` terms.
pub(crate) fn primitive_pairs(
    f: &ContractedGaussian,
    g: &ContractedGaussian,
    extra_j: usize,
) -> Vec<PrimitivePair> {
    let separation = f.center - g.center;
    let mut pairs = Vec::with_capacity(f.exponents.len() * g.exponents.len());
    for (a, ca) in f.primitives() {
        for (b, cb) in g.primitives() {
            let p = a + b;
            let center = Point3::from((f.center.coords * a + g.center.coords * b) / p);
            let expansions = [0, 1, 2].map(|axis| {
                HermiteExpansion::new(
                    f.powers[axis] as usize,
                    g.powers[axis] as usize + extra_j,
                    separation[axis],
                    a,
                    b,
                )
            });
            pairs.push(PrimitivePair {
                a,
                b,
                p,
                center,
                coefficient: ca * cb,
                expansions,
            });
        }
    }
    pairs
}
