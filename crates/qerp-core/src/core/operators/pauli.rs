use nalgebra::Complex;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    /// Returns the phase and Pauli of the single-qubit product `self * other`.
    pub fn multiply(self, other: Pauli) -> (Complex<f64>, Pauli) {
        let one = Complex::new(1.0, 0.0);
        let i = Complex::new(0.0, 1.0);
        match (self, other) {
            (Pauli::I, p) | (p, Pauli::I) => (one, p),
            (Pauli::X, Pauli::X) | (Pauli::Y, Pauli::Y) | (Pauli::Z, Pauli::Z) => (one, Pauli::I),
            (Pauli::X, Pauli::Y) => (i, Pauli::Z),
            (Pauli::Y, Pauli::Z) => (i, Pauli::X),
            (Pauli::Z, Pauli::X) => (i, Pauli::Y),
            (Pauli::Y, Pauli::X) => (-i, Pauli::Z),
            (Pauli::Z, Pauli::Y) => (-i, Pauli::X),
            (Pauli::X, Pauli::Z) => (-i, Pauli::Y),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(Pauli::I),
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }
}

/// A tensor product of single-qubit Paulis, indexed by qubit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PauliString {
    paulis: Vec<Pauli>,
}

impl PauliString {
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            paulis: vec![Pauli::I; num_qubits],
        }
    }

    pub fn from_paulis(paulis: Vec<Pauli>) -> Self {
        Self { paulis }
    }

    /// Parses a label whose rightmost character is qubit 0.
    pub fn from_label(label: &str) -> Option<Self> {
        let paulis = label
            .chars()
            .rev()
            .map(Pauli::from_char)
            .collect::<Option<Vec<_>>>()?;
        Some(Self { paulis })
    }

    /// The label with qubit 0 as the rightmost character.
    pub fn label(&self) -> String {
        self.paulis.iter().rev().map(|p| p.as_char()).collect()
    }

    pub fn num_qubits(&self) -> usize {
        self.paulis.len()
    }

    pub fn get(&self, qubit: usize) -> Pauli {
        self.paulis[qubit]
    }

    pub fn set(&mut self, qubit: usize, pauli: Pauli) {
        self.paulis[qubit] = pauli;
    }

    pub fn is_identity(&self) -> bool {
        self.paulis.iter().all(|&p| p == Pauli::I)
    }

    /// Returns the phase and string of the product `self * other`.
    pub fn multiply(&self, other: &PauliString) -> (Complex<f64>, PauliString) {
        debug_assert_eq!(self.num_qubits(), other.num_qubits());
        let mut phase = Complex::new(1.0, 0.0);
        let paulis = self
            .paulis
            .iter()
            .zip(&other.paulis)
            .map(|(&a, &b)| {
                let (factor, product) = a.multiply(b);
                phase *= factor;
                product
            })
            .collect();
        (phase, PauliString { paulis })
    }

    /// Removes the given qubits; the remaining qubits keep their relative order.
    pub fn without_qubits(&self, removed: &[usize]) -> PauliString {
        let paulis = self
            .paulis
            .iter()
            .enumerate()
            .filter(|(q, _)| !removed.contains(q))
            .map(|(_, &p)| p)
            .collect();
        PauliString { paulis }
    }

    /// Applies the string to computational basis state `state` (bit `k` is qubit `k`).
    pub(crate) fn apply_to_basis_state(&self, state: usize) -> (Complex<f64>, usize) {
        let mut phase = Complex::new(1.0, 0.0);
        let mut target = state;
        for (qubit, pauli) in self.paulis.iter().enumerate() {
            let bit = (state >> qubit) & 1;
            match pauli {
                Pauli::I => {}
                Pauli::X => target ^= 1 << qubit,
                Pauli::Y => {
                    target ^= 1 << qubit;
                    phase *= if bit == 0 {
                        Complex::new(0.0, 1.0)
                    } else {
                        Complex::new(0.0, -1.0)
                    };
                }
                Pauli::Z => {
                    if bit == 1 {
                        phase = -phase;
                    }
                }
            }
        }
        (phase, target)
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_qubit_products_follow_cyclic_rule() {
        let i = Complex::new(0.0, 1.0);
        assert_eq!(Pauli::X.multiply(Pauli::Y), (i, Pauli::Z));
        assert_eq!(Pauli::Y.multiply(Pauli::X), (-i, Pauli::Z));
        assert_eq!(Pauli::Z.multiply(Pauli::Z), (Complex::new(1.0, 0.0), Pauli::I));
        assert_eq!(Pauli::I.multiply(Pauli::Y), (Complex::new(1.0, 0.0), Pauli::Y));
    }

    #[test]
    fn labels_put_qubit_zero_on_the_right() {
        let mut string = PauliString::identity(3);
        string.set(0, Pauli::X);
        string.set(2, Pauli::Z);
        assert_eq!(string.label(), "ZIX");
        assert_eq!(PauliString::from_label("ZIX"), Some(string));
        assert_eq!(PauliString::from_label("ZQX"), None);
    }

    #[test]
    fn string_product_accumulates_phase() {
        let a = PauliString::from_label("XY").unwrap();
        let b = PauliString::from_label("YY").unwrap();
        let (phase, product) = a.multiply(&b);
        assert_eq!(product.label(), "ZI");
        assert_eq!(phase, Complex::new(0.0, 1.0));
    }

    #[test]
    fn removing_qubits_keeps_relative_order() {
        let string = PauliString::from_label("XYZX").unwrap();
        assert_eq!(string.without_qubits(&[1, 3]).label(), "YX");
    }

    #[test]
    fn y_acts_with_imaginary_phase_on_basis_states() {
        let y = PauliString::from_label("Y").unwrap();
        assert_eq!(y.apply_to_basis_state(0), (Complex::new(0.0, 1.0), 1));
        assert_eq!(y.apply_to_basis_state(1), (Complex::new(0.0, -1.0), 0));
    }
}
