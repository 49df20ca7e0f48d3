use super::pauli::PauliString;
use nalgebra::{Complex, DMatrix};
use std::collections::BTreeMap;
use std::fmt;

/// Largest register [`QubitOperator::to_matrix`] will expand densely.
pub const MAX_DENSE_QUBITS: usize = 12;

/// A weighted sum of Pauli strings over a fixed number of qubits.
///
/// Terms are kept in a `BTreeMap`, so iteration order depends only on the strings.
#[derive(Debug, Clone, PartialEq)]
pub struct QubitOperator {
    num_qubits: usize,
    terms: BTreeMap<PauliString, Complex<f64>>,
}

impl QubitOperator {
    pub fn zero(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            terms: BTreeMap::new(),
        }
    }

    pub fn identity(num_qubits: usize, coefficient: Complex<f64>) -> Self {
        let mut op = Self::zero(num_qubits);
        op.add_term(PauliString::identity(num_qubits), coefficient);
        op
    }

    pub fn from_terms(
        num_qubits: usize,
        terms: impl IntoIterator<Item = (PauliString, Complex<f64>)>,
    ) -> Self {
        let mut op = Self::zero(num_qubits);
        for (string, coefficient) in terms {
            op.add_term(string, coefficient);
        }
        op
    }

    pub fn add_term(&mut self, string: PauliString, coefficient: Complex<f64>) {
        debug_assert_eq!(string.num_qubits(), self.num_qubits);
        *self.terms.entry(string).or_insert(Complex::new(0.0, 0.0)) += coefficient;
    }

    pub fn add_assign_scaled(&mut self, other: &QubitOperator, factor: Complex<f64>) {
        for (string, coefficient) in &other.terms {
            self.add_term(string.clone(), *coefficient * factor);
        }
    }

    pub fn multiply(&self, other: &QubitOperator) -> QubitOperator {
        let mut product = Self::zero(self.num_qubits);
        for (a, ca) in &self.terms {
            for (b, cb) in &other.terms {
                let (phase, string) = a.multiply(b);
                product.add_term(string, ca * cb * phase);
            }
        }
        product
    }

    /// Drops terms whose coefficient magnitude is below `tolerance`.
    pub fn simplify(mut self, tolerance: f64) -> Self {
        self.terms.retain(|_, c| c.norm() >= tolerance);
        self
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&PauliString, &Complex<f64>)> {
        self.terms.iter()
    }

    pub fn coefficient(&self, label: &str) -> Option<Complex<f64>> {
        PauliString::from_label(label).and_then(|string| self.terms.get(&string).copied())
    }

    /// Whether every coefficient is real to within `tolerance` (Pauli strings are Hermitian).
    pub fn is_hermitian(&self, tolerance: f64) -> bool {
        self.terms.values().all(|c| c.im.abs() < tolerance)
    }

    /// Dense matrix in the computational basis, where bit `k` of a row index is qubit `k`.
    ///
    /// Returns `None` for registers larger than [`MAX_DENSE_QUBITS`].
    pub fn to_matrix(&self) -> Option<DMatrix<Complex<f64>>> {
        if self.num_qubits > MAX_DENSE_QUBITS {
            return None;
        }
        let dim = 1usize << self.num_qubits;
        let mut matrix = DMatrix::from_element(dim, dim, Complex::new(0.0, 0.0));
        for (string, coefficient) in &self.terms {
            for column in 0..dim {
                let (phase, row) = string.apply_to_basis_state(column);
                matrix[(row, column)] += coefficient * phase;
            }
        }
        Some(matrix)
    }
}

impl fmt::Display for QubitOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (string, c) in &self.terms {
            writeln!(f, "{:+.12} {:+.12}i * {}", c.re, c.im, string)?;
        }
        Ok(())
    }
}
