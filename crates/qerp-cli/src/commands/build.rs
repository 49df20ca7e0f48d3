use super::assembler_for;
use crate::cli::BuildArgs;
use crate::config::PartialFragmentConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use crate::utils::report::render_fragment;
use indicatif::MultiProgress;
use qerp::engine::error::PipelineError;
use qerp::engine::progress::ProgressReporter;
use qerp::workflows::fragment::DMETFragment;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{error, info, info_span};

pub fn run(args: BuildArgs) -> Result<()> {
    let partial_config = PartialFragmentConfig::load(&args.fragment)?;
    info!("Merging configuration from file and CLI arguments...");
    let app = partial_config.merge_with_cli(&args.fragment)?;
    let assembler = assembler_for(&app)?;

    println!("Building {} fragment(s)...", args.inputs.len());
    let group = MultiProgress::new();

    let outcomes: Vec<(PathBuf, std::result::Result<DMETFragment, PipelineError>)> = args
        .inputs
        .par_iter()
        .map(|path| {
            let label = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            let _span = info_span!("fragment", input = %label).entered();
            let handler = CliProgressHandler::in_group(&group, label);
            let reporter = ProgressReporter::with_callback(handler.get_callback());

            info!(path = %path.display(), "Assembling fragment.");
            let outcome = assembler.assemble_from_xyz(path, &app.fragment, &reporter);
            handler.clear();
            (path.clone(), outcome)
        })
        .collect();

    let total = outcomes.len();
    let mut failed = 0;
    for (path, outcome) in outcomes {
        match outcome {
            Ok(fragment) => {
                info!(
                    qubits = fragment.num_qubits(),
                    reference_energy = fragment.reference_energy(),
                    "Fragment built from {:?}",
                    path
                );
                print!(
                    "{}",
                    render_fragment(
                        &path.display().to_string(),
                        &fragment,
                        args.fragment.print_terms
                    )
                );
            }
            Err(e) => {
                failed += 1;
                error!("Fragment build for {:?} failed: {}", path, e);
                eprintln!("✗ {}: {}", path.display(), e);
            }
        }
    }

    if failed > 0 {
        return Err(CliError::BuildFailures { failed, total });
    }
    Ok(())
}
