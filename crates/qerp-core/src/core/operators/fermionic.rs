use crate::core::integrals::two_electron::TwoElectronIntegrals;
use nalgebra::DMatrix;
use std::collections::BTreeMap;
use std::fmt;

/// Coefficients below this magnitude are not stored.
pub const DROP_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LadderKind {
    Create,
    Annihilate,
}

/// A single creation or annihilation operator on spin-orbital `mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LadderOp {
    pub kind: LadderKind,
    pub mode: usize,
}

impl LadderOp {
    pub fn create(mode: usize) -> Self {
        Self {
            kind: LadderKind::Create,
            mode,
        }
    }

    pub fn annihilate(mode: usize) -> Self {
        Self {
            kind: LadderKind::Annihilate,
            mode,
        }
    }
}

impl fmt::Display for LadderOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.kind {
            LadderKind::Create => '+',
            LadderKind::Annihilate => '-',
        };
        write!(f, "{}_{}", sign, self.mode)
    }
}

/// A weighted sum of products of ladder operators over `register_length` spin orbitals.
///
/// Spin orbitals are block ordered: spatial orbital `p` is mode `p` for alpha spin and
/// mode `p + register_length / 2` for beta spin.
#[derive(Debug, Clone, PartialEq)]
pub struct FermionicOperator {
    register_length: usize,
    terms: BTreeMap<Vec<LadderOp>, f64>,
}

impl FermionicOperator {
    pub fn zero(register_length: usize) -> Self {
        Self {
            register_length,
            terms: BTreeMap::new(),
        }
    }

    /// Builds the electronic Hamiltonian from spatial-orbital integrals.
    ///
    /// `H = Σ_σ Σ_pq h_pq a†_pσ a_qσ + ½ Σ_στ Σ_pqrs (pq|rs) a†_pσ a†_rτ a_sτ a_qσ`
    pub fn from_integrals(one_body: &DMatrix<f64>, two_body: &TwoElectronIntegrals) -> Self {
        let n = one_body.nrows();
        debug_assert_eq!(two_body.size(), n);
        let mut op = Self::zero(2 * n);
        let spins = [0, n];

        for &s in &spins {
            for p in 0..n {
                for q in 0..n {
                    op.add_term(
                        vec![LadderOp::create(p + s), LadderOp::annihilate(q + s)],
                        one_body[(p, q)],
                    );
                }
            }
        }

        for &sigma in &spins {
            for &tau in &spins {
                for p in 0..n {
                    for q in 0..n {
                        for r in 0..n {
                            for s in 0..n {
                                let (ps, rt) = (p + sigma, r + tau);
                                let (st, qs) = (s + tau, q + sigma);
                                if ps == rt || st == qs {
                                    continue;
                                }
                                op.add_term(
                                    vec![
                                        LadderOp::create(ps),
                                        LadderOp::create(rt),
                                        LadderOp::annihilate(st),
                                        LadderOp::annihilate(qs),
                                    ],
                                    0.5 * two_body.get(p, q, r, s),
                                );
                            }
                        }
                    }
                }
            }
        }
        op.simplify(DROP_TOLERANCE)
    }

    /// Adds `coefficient` times the ordered product `ops`.
    pub fn add_term(&mut self, ops: Vec<LadderOp>, coefficient: f64) {
        debug_assert!(ops.iter().all(|o| o.mode < self.register_length));
        *self.terms.entry(ops).or_insert(0.0) += coefficient;
    }

    pub fn simplify(mut self, tolerance: f64) -> Self {
        self.terms.retain(|_, c| c.abs() >= tolerance);
        self
    }

    pub fn register_length(&self) -> usize {
        self.register_length
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&[LadderOp], f64)> {
        self.terms.iter().map(|(ops, c)| (ops.as_slice(), *c))
    }

    /// Looks up a coefficient by its label, e.g. `"+_0 -_1"`.
    pub fn coefficient(&self, label: &str) -> Option<f64> {
        self.terms
            .iter()
            .find(|(ops, _)| term_label(ops) == label)
            .map(|(_, c)| *c)
    }
}

/// Space-separated ladder operators, e.g. `+_0 +_2 -_2 -_0`.
pub fn term_label(ops: &[LadderOp]) -> String {
    ops.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for FermionicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ops, c) in &self.terms {
            writeln!(f, "{:+.12} * ({})", c, term_label(ops))?;
        }
        Ok(())
    }
}
