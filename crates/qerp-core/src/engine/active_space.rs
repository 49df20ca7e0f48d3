use crate::core::integrals::two_electron::TwoElectronIntegrals;
use crate::core::operators::fermionic::FermionicOperator;
use crate::engine::config::{FragmentConfig, validate_fragment_orbitals};
use crate::engine::error::ConfigurationError;
use crate::engine::problem::{ElectronicProblem, ProblemDimensions};
use nalgebra::DMatrix;
use tracing::debug;

/// The electronic problem restricted to an active window of orbitals.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSpaceResult {
    pub num_alpha: usize,
    pub num_beta: usize,
    pub num_orbitals: usize,
    /// Number of doubly occupied orbitals frozen below the active window.
    pub inactive_orbitals: usize,
    pub fragment_orbitals: Vec<usize>,
    /// Effective one-body integrals (core Fock operator) over the active window.
    pub one_body: DMatrix<f64>,
    pub two_body: TwoElectronIntegrals,
    pub hamiltonian: FermionicOperator,
    pub nuclear_repulsion: f64,
    /// Energy of the frozen core, including its interaction with itself.
    pub inactive_energy: f64,
}

impl ActiveSpaceResult {
    pub fn num_electrons(&self) -> usize {
        self.num_alpha + self.num_beta
    }

    pub fn num_particles(&self) -> (usize, usize) {
        (self.num_alpha, self.num_beta)
    }

    pub fn register_length(&self) -> usize {
        2 * self.num_orbitals
    }

    /// Constant to add to eigenvalues of [`Self::hamiltonian`] to obtain total energies.
    pub fn energy_shift(&self) -> f64 {
        self.nuclear_repulsion + self.inactive_energy
    }
}

/// Sizes of the active space a configuration selects from a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveCounts {
    pub num_alpha: usize,
    pub num_beta: usize,
    pub num_orbitals: usize,
    pub inactive_orbitals: usize,
}

impl ActiveCounts {
    pub fn num_electrons(&self) -> usize {
        self.num_alpha + self.num_beta
    }
}

/// Validates the active-space counts of `config` against the size of a problem.
///
/// Only electron and orbital counts are needed, so this runs before any integrals exist.
/// Unset counts fall back to the full problem. The lowest `(N - N_active) / 2` orbitals
/// form the frozen core; they must all be doubly occupied in the reference.
pub fn check_counts(
    dimensions: &ProblemDimensions,
    config: &FragmentConfig,
) -> Result<ActiveCounts, ConfigurationError> {
    let total_electrons = dimensions.num_electrons();
    let total_orbitals = dimensions.num_orbitals;
    let active_electrons = config.active_electrons.unwrap_or(total_electrons);
    let active_orbitals = config.active_orbitals.unwrap_or(total_orbitals);

    if active_electrons == 0 {
        return Err(ConfigurationError::NonPositiveActiveCount {
            quantity: "electron",
        });
    }
    if active_orbitals == 0 {
        return Err(ConfigurationError::NonPositiveActiveCount {
            quantity: "orbital",
        });
    }
    if active_electrons > total_electrons {
        return Err(ConfigurationError::ActiveExceedsFull {
            quantity: "electrons",
            requested: active_electrons,
            available: total_electrons,
        });
    }
    if active_orbitals > total_orbitals {
        return Err(ConfigurationError::ActiveExceedsFull {
            quantity: "orbitals",
            requested: active_orbitals,
            available: total_orbitals,
        });
    }

    let inactive_electrons = total_electrons - active_electrons;
    if inactive_electrons % 2 != 0 {
        return Err(ConfigurationError::OddInactiveElectrons {
            inactive: inactive_electrons,
        });
    }
    let inactive_orbitals = inactive_electrons / 2;
    if inactive_orbitals + active_orbitals > total_orbitals {
        return Err(ConfigurationError::ActiveWindowOutOfRange {
            inactive_orbitals,
            active_orbitals,
            total_orbitals,
        });
    }

    // A core orbital above the last beta electron would be singly occupied.
    let (num_alpha, num_beta) = match (
        dimensions.num_alpha.checked_sub(inactive_orbitals),
        dimensions.num_beta.checked_sub(inactive_orbitals),
    ) {
        (Some(alpha), Some(beta)) => (alpha, beta),
        _ => {
            return Err(ConfigurationError::UnpairedExceedsActive {
                electrons: active_electrons,
                unpaired: dimensions.num_alpha.abs_diff(dimensions.num_beta),
            });
        }
    };
    if num_alpha > active_orbitals || num_beta > active_orbitals {
        return Err(ConfigurationError::ActiveElectronsExceedCapacity {
            electrons: active_electrons,
            orbitals: active_orbitals,
        });
    }

    Ok(ActiveCounts {
        num_alpha,
        num_beta,
        num_orbitals: active_orbitals,
        inactive_orbitals,
    })
}

/// Reduces `problem` to the active space described by `config`.
///
/// Orbitals above the active window are discarded.
pub fn select(
    problem: &ElectronicProblem,
    config: &FragmentConfig,
) -> Result<ActiveSpaceResult, ConfigurationError> {
    let ActiveCounts {
        num_alpha,
        num_beta,
        num_orbitals: active_orbitals,
        inactive_orbitals,
    } = check_counts(&problem.dimensions(), config)?;
    let active_electrons = num_alpha + num_beta;

    let fragment_orbitals = match &config.fragment_orbitals {
        Some(indices) => {
            validate_fragment_orbitals(indices, Some(active_orbitals))?;
            indices.clone()
        }
        None => (0..active_orbitals).collect(),
    };

    let (core_fock, inactive_energy) = inactive_fock(problem, inactive_orbitals);
    let window = inactive_orbitals..inactive_orbitals + active_orbitals;
    let one_body = core_fock
        .view((window.start, window.start), (active_orbitals, active_orbitals))
        .into_owned();

    let mut two_body = TwoElectronIntegrals::zeros(active_orbitals);
    for p in 0..active_orbitals {
        for q in 0..=p {
            for r in 0..active_orbitals {
                for s in 0..=r {
                    let o = window.start;
                    two_body.set(p, q, r, s, problem.two_body.get(p + o, q + o, r + o, s + o));
                }
            }
        }
    }

    let hamiltonian = FermionicOperator::from_integrals(&one_body, &two_body);
    debug!(
        inactive_orbitals,
        active_orbitals,
        active_electrons,
        inactive_energy,
        terms = hamiltonian.num_terms(),
        "Selected active space."
    );

    Ok(ActiveSpaceResult {
        num_alpha,
        num_beta,
        num_orbitals: active_orbitals,
        inactive_orbitals,
        fragment_orbitals,
        one_body,
        two_body,
        hamiltonian,
        nuclear_repulsion: problem.nuclear_repulsion,
        inactive_energy,
    })
}

/// Folds the doubly occupied core into `F^I_pq = h_pq + Σ_i [2(pq|ii) - (pi|iq)]` and
/// returns it with the core energy `Σ_i (h_ii + F^I_ii)`.
fn inactive_fock(problem: &ElectronicProblem, inactive_orbitals: usize) -> (DMatrix<f64>, f64) {
    let n = problem.num_orbitals();
    let g = &problem.two_body;
    let h = &problem.one_body;
    let fock = DMatrix::from_fn(n, n, |p, q| {
        h[(p, q)]
            + (0..inactive_orbitals)
                .map(|i| 2.0 * g.get(p, q, i, i) - g.get(p, i, i, q))
                .sum::<f64>()
    });
    let energy = (0..inactive_orbitals).map(|i| h[(i, i)] + fock[(i, i)]).sum();
    (fock, energy)
}
