use crate::core::operators::fermionic::{FermionicOperator, LadderKind, LadderOp};
use crate::core::operators::pauli::{Pauli, PauliString};
use crate::core::operators::qubit::QubitOperator;
use crate::engine::config::{EncodingScheme, FragmentConfig};
use crate::engine::error::ConfigurationError;
use nalgebra::Complex;
use tracing::debug;

/// Qubit terms whose coefficient magnitude falls below this are discarded.
pub const SIMPLIFY_TOLERANCE: f64 = 1e-10;

/// Maps fermionic operators to qubit operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QubitEncoder {
    scheme: EncodingScheme,
    two_qubit_reduction: bool,
}

impl QubitEncoder {
    pub fn new(scheme: EncodingScheme, two_qubit_reduction: bool) -> Self {
        Self {
            scheme,
            two_qubit_reduction,
        }
    }

    pub fn from_config(config: &FragmentConfig) -> Self {
        Self::new(config.encoding, config.two_qubit_reduction)
    }

    pub fn scheme(&self) -> EncodingScheme {
        self.scheme
    }

    /// Whether the encoder will taper two qubits. Jordan-Wigner never does.
    pub fn reduces(&self) -> bool {
        self.scheme == EncodingScheme::Parity && self.two_qubit_reduction
    }

    /// Number of qubits produced for a register of `register_length` spin orbitals.
    pub fn num_qubits(&self, register_length: usize) -> usize {
        if self.reduces() {
            register_length.saturating_sub(2)
        } else {
            register_length
        }
    }

    /// Encodes `operator`; `particle_counts` is `(alpha, beta)` and is only consulted
    /// for the two-qubit reduction.
    pub fn encode(
        &self,
        operator: &FermionicOperator,
        particle_counts: Option<(usize, usize)>,
    ) -> Result<QubitOperator, ConfigurationError> {
        let register_length = operator.register_length();
        let counts = if self.reduces() {
            let (alpha, beta) = particle_counts.ok_or(ConfigurationError::MissingParticleCounts)?;
            if register_length < 2 || register_length % 2 != 0 {
                return Err(ConfigurationError::InvalidRegister { register_length });
            }
            let modes = register_length / 2;
            if alpha > modes || beta > modes {
                return Err(ConfigurationError::ParticleCountsExceedRegister { alpha, beta, modes });
            }
            Some((alpha, beta))
        } else {
            None
        };

        let mapped = map_operator(operator, self.scheme);
        let encoded = match counts {
            Some((alpha, beta)) => reduce_two_qubits(&mapped, alpha, beta)?,
            None => mapped,
        };
        debug!(
            scheme = %self.scheme,
            qubits = encoded.num_qubits(),
            terms = encoded.num_terms(),
            "Encoded fermionic operator."
        );
        Ok(encoded)
    }
}

/// Free-function form of [`QubitEncoder::encode`].
pub fn encode(
    operator: &FermionicOperator,
    particle_counts: Option<(usize, usize)>,
    scheme: EncodingScheme,
    two_qubit_reduction: bool,
) -> Result<QubitOperator, ConfigurationError> {
    QubitEncoder::new(scheme, two_qubit_reduction).encode(operator, particle_counts)
}

fn map_operator(operator: &FermionicOperator, scheme: EncodingScheme) -> QubitOperator {
    let n = operator.register_length();
    let ladders: Vec<[QubitOperator; 2]> = (0..n)
        .map(|mode| {
            [
                ladder_image(scheme, LadderOp::create(mode), n),
                ladder_image(scheme, LadderOp::annihilate(mode), n),
            ]
        })
        .collect();

    let mut result = QubitOperator::zero(n);
    for (ops, coefficient) in operator.terms() {
        let mut product = QubitOperator::identity(n, Complex::new(coefficient, 0.0));
        for op in ops {
            let image = match op.kind {
                LadderKind::Create => &ladders[op.mode][0],
                LadderKind::Annihilate => &ladders[op.mode][1],
            };
            product = product.multiply(image);
        }
        result.add_assign_scaled(&product, Complex::new(1.0, 0.0));
    }
    result.simplify(SIMPLIFY_TOLERANCE)
}

/// The image of one ladder operator as `½(A ∓ iB)` (creation takes the minus sign).
///
/// Jordan-Wigner: `A = Z_{<j} X_j`, `B = Z_{<j} Y_j`.
/// Parity: `A = Z_{j-1} X_j X_{>j}`, `B = Y_j X_{>j}`.
fn ladder_image(scheme: EncodingScheme, op: LadderOp, n: usize) -> QubitOperator {
    let j = op.mode;
    let mut real_part = PauliString::identity(n);
    let mut imaginary_part = PauliString::identity(n);

    match scheme {
        EncodingScheme::JordanWigner => {
            for k in 0..j {
                real_part.set(k, Pauli::Z);
                imaginary_part.set(k, Pauli::Z);
            }
            real_part.set(j, Pauli::X);
            imaginary_part.set(j, Pauli::Y);
        }
        EncodingScheme::Parity => {
            if j > 0 {
                real_part.set(j - 1, Pauli::Z);
            }
            real_part.set(j, Pauli::X);
            imaginary_part.set(j, Pauli::Y);
            for k in j + 1..n {
                real_part.set(k, Pauli::X);
                imaginary_part.set(k, Pauli::X);
            }
        }
    }

    let sign = match op.kind {
        LadderKind::Create => -1.0,
        LadderKind::Annihilate => 1.0,
    };
    QubitOperator::from_terms(
        n,
        [
            (real_part, Complex::new(0.5, 0.0)),
            (imaginary_part, Complex::new(0.0, 0.5 * sign)),
        ],
    )
}

/// Tapers the alpha-parity qubit `n/2 - 1` and the total-parity qubit `n - 1`.
///
/// Each `Z` on those qubits is replaced by its eigenvalue: `+1` for an even particle
/// count, `-1` for odd. Any `X` or `Y` there means the operator does not conserve the
/// symmetry.
fn reduce_two_qubits(
    operator: &QubitOperator,
    num_alpha: usize,
    num_beta: usize,
) -> Result<QubitOperator, ConfigurationError> {
    let n = operator.num_qubits();
    let alpha_qubit = n / 2 - 1;
    let total_qubit = n - 1;
    let parity_sign = |count: usize| if count % 2 == 0 { 1.0 } else { -1.0 };
    let alpha_sign = parity_sign(num_alpha);
    let total_sign = parity_sign(num_alpha + num_beta);

    let mut reduced = QubitOperator::zero(n - 2);
    for (string, coefficient) in operator.terms() {
        let mut factor = 1.0;
        for (qubit, sign) in [(alpha_qubit, alpha_sign), (total_qubit, total_sign)] {
            match string.get(qubit) {
                Pauli::I => {}
                Pauli::Z => factor *= sign,
                Pauli::X | Pauli::Y => {
                    return Err(ConfigurationError::SymmetryViolation { qubit });
                }
            }
        }
        reduced.add_term(
            string.without_qubits(&[alpha_qubit, total_qubit]),
            *coefficient * factor,
        );
    }
    Ok(reduced.simplify(SIMPLIFY_TOLERANCE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn f64_approx_equal(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    fn number_operator(mode: usize, register_length: usize) -> FermionicOperator {
        let mut op = FermionicOperator::zero(register_length);
        op.add_term(vec![LadderOp::create(mode), LadderOp::annihilate(mode)], 1.0);
        op
    }

    fn real_coefficient(op: &QubitOperator, label: &str) -> f64 {
        let c = op.coefficient(label).unwrap_or_else(|| panic!("missing term {label}"));
        assert!(c.im.abs() < 1e-12);
        c.re
    }

    #[test]
    fn jordan_wigner_number_operator_is_half_identity_minus_half_z() {
        let op = encode(&number_operator(2, 4), None, EncodingScheme::JordanWigner, false).unwrap();
        assert_eq!(op.num_qubits(), 4);
        assert!(f64_approx_equal(real_coefficient(&op, "IIII"), 0.5, 1e-12));
        assert!(f64_approx_equal(real_coefficient(&op, "IZII"), -0.5, 1e-12));
        assert_eq!(op.num_terms(), 2);
    }

    #[test]
    fn parity_number_operator_acts_on_neighbouring_parity_qubits() {
        let op = encode(&number_operator(2, 4), None, EncodingScheme::Parity, false).unwrap();
        assert!(f64_approx_equal(real_coefficient(&op, "IIII"), 0.5, 1e-12));
        assert!(f64_approx_equal(real_coefficient(&op, "IZZI"), -0.5, 1e-12));
    }

    #[test]
    fn jordan_wigner_hopping_term_has_xzx_and_yzy_strings() {
        let mut op = FermionicOperator::zero(3);
        op.add_term(vec![LadderOp::create(0), LadderOp::annihilate(2)], 1.0);
        op.add_term(vec![LadderOp::create(2), LadderOp::annihilate(0)], 1.0);
        let encoded = encode(&op, None, EncodingScheme::JordanWigner, false).unwrap();
        assert!(f64_approx_equal(real_coefficient(&encoded, "XZX"), 0.5, 1e-12));
        assert!(f64_approx_equal(real_coefficient(&encoded, "YZY"), 0.5, 1e-12));
        assert_eq!(encoded.num_terms(), 2);
    }

    #[test]
    fn reduction_without_particle_counts_is_rejected() {
        let err = encode(&number_operator(0, 4), None, EncodingScheme::Parity, true).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingParticleCounts);
        assert_eq!(err.to_string(), "Two-qubit reduction requires particle counts");
    }

    #[test]
    fn jordan_wigner_ignores_the_reduction_flag() {
        let with_flag =
            encode(&number_operator(1, 4), None, EncodingScheme::JordanWigner, true).unwrap();
        let without_flag =
            encode(&number_operator(1, 4), None, EncodingScheme::JordanWigner, false).unwrap();
        assert_eq!(with_flag, without_flag);
    }

    #[test]
    fn reduction_replaces_tapered_z_by_particle_parity() {
        // n_0 in parity form is ½(I - Z_0); qubit 0 is not tapered for n = 4.
        // n_1 is ½(I - Z_0 Z_1); qubit 1 is the alpha-parity qubit.
        let reduced =
            encode(&number_operator(1, 4), Some((1, 1)), EncodingScheme::Parity, true).unwrap();
        assert_eq!(reduced.num_qubits(), 2);
        // Z_1 → -1 for one alpha electron, so ½(I + Z_0).
        assert!(f64_approx_equal(real_coefficient(&reduced, "II"), 0.5, 1e-12));
        assert!(f64_approx_equal(real_coefficient(&reduced, "IZ"), 0.5, 1e-12));
    }

    #[test]
    fn particle_counts_larger_than_a_spin_block_are_rejected() {
        let err =
            encode(&number_operator(0, 4), Some((3, 0)), EncodingScheme::Parity, true).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::ParticleCountsExceedRegister {
                alpha: 3,
                beta: 0,
                modes: 2
            }
        );
    }

    #[test]
    fn non_conserving_operator_fails_reduction() {
        let mut op = FermionicOperator::zero(4);
        op.add_term(vec![LadderOp::create(1)], 1.0);
        let err = encode(&op, Some((1, 1)), EncodingScheme::Parity, true).unwrap_err();
        assert!(matches!(err, ConfigurationError::SymmetryViolation { .. }));
    }

    #[test]
    fn encoding_is_deterministic() {
        let h = DMatrix::from_row_slice(2, 2, &[-1.25, 0.1, 0.1, -0.47]);
        let mut g = crate::core::integrals::two_electron::TwoElectronIntegrals::zeros(2);
        g.set(0, 0, 0, 0, 0.67);
        g.set(1, 1, 1, 1, 0.70);
        g.set(0, 0, 1, 1, 0.66);
        g.set(0, 1, 0, 1, 0.18);
        let op = FermionicOperator::from_integrals(&h, &g);

        for scheme in [EncodingScheme::Parity, EncodingScheme::JordanWigner] {
            let first = encode(&op, Some((1, 1)), scheme, true).unwrap();
            let second = encode(&op, Some((1, 1)), scheme, true).unwrap();
            let terms = |q: &QubitOperator| {
                q.terms()
                    .map(|(s, c)| (s.label(), c.re.to_bits(), c.im.to_bits()))
                    .collect::<Vec<_>>()
            };
            assert_eq!(terms(&first), terms(&second));
        }
    }

    #[test]
    fn encoder_reports_qubit_counts() {
        assert_eq!(QubitEncoder::new(EncodingScheme::Parity, true).num_qubits(4), 2);
        assert_eq!(QubitEncoder::new(EncodingScheme::Parity, false).num_qubits(4), 4);
        assert_eq!(QubitEncoder::new(EncodingScheme::JordanWigner, true).num_qubits(4), 4);
    }
}
