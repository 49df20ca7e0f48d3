use super::assembler_for;
use crate::cli::H2Args;
use crate::config::PartialFragmentConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use crate::utils::report::render_fragment;
use qerp::engine::progress::ProgressReporter;
use tracing::{info, info_span};

pub fn run(args: H2Args) -> Result<()> {
    if !(args.bond_length.is_finite() && args.bond_length > 0.0) {
        return Err(CliError::Argument(format!(
            "Bond length must be a positive number, got {}",
            args.bond_length
        )));
    }

    let partial_config = PartialFragmentConfig::load(&args.fragment)?;
    let app = partial_config.merge_with_cli(&args.fragment)?;
    let assembler = assembler_for(&app)?;

    let label = format!("H2 at {} {}", args.bond_length, app.fragment.distance_unit);
    let _span = info_span!("fragment", input = %label).entered();
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!(
        bond_length = args.bond_length,
        unit = %app.fragment.distance_unit,
        "Building H2 fragment."
    );
    let fragment = assembler.build_h2_fragment(args.bond_length, &app.fragment, &reporter)?;
    progress_handler.clear();

    print!(
        "{}",
        render_fragment(&label, &fragment, args.fragment.print_terms)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FragmentArgs;

    #[test]
    fn rejects_non_positive_bond_lengths() {
        for bond_length in [0.0, -0.7, f64::NAN] {
            let args = H2Args {
                bond_length,
                fragment: FragmentArgs::default(),
            };
            assert!(matches!(run(args), Err(CliError::Argument(_))));
        }
    }

    #[test]
    fn builds_the_minimal_fragment_at_equilibrium() {
        let args = H2Args {
            bond_length: 0.735,
            fragment: FragmentArgs::default(),
        };
        assert!(run(args).is_ok());
    }
}
