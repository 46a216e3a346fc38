use crate::cli::FormArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::report;
use crate::utils::progress::CliProgressHandler;
use teamforge::{
    core::io::{assignments, roster},
    engine::progress::ProgressReporter,
    workflows,
};
use tracing::{info, warn};

pub fn run(args: FormArgs, quiet: bool) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let app_config = build_config(&args)?;

    info!("Loading roster from {:?}", &app_config.input_path);
    let roster =
        roster::read_from_path(&app_config.input_path).map_err(|e| CliError::FileParsing {
            path: app_config.input_path.clone(),
            source: e.into(),
        })?;
    info!("Loaded {} participant(s).", roster.len());

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core formation workflow...");
    let result = workflows::form::run(&roster, &app_config.core_config, &reporter)?;

    for fill in result.floor_fills.iter().filter(|f| f.violates_role_bounds()) {
        warn!(
            "Team {} ({}) needed floor-fill beyond role maximums.",
            fill.team_index + 1,
            fill.template
        );
    }

    print!(
        "{}",
        report::render(&roster, &app_config.core_config.templates, &result)
    );

    if let Some(output_path) = &app_config.output_path {
        info!("Writing assignment to {:?}", output_path);
        assignments::write_to_path(output_path, &roster, &result.teams, &result.leftover)
            .map_err(|e| CliError::FileParsing {
                path: output_path.clone(),
                source: e.into(),
            })?;
        println!("✓ Assignment written to: {}", output_path.display());
    }

    Ok(())
}
