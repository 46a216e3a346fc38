use crate::cli::StatsArgs;
use crate::error::{CliError, Result};
use crate::stats::RosterStats;
use teamforge::core::io::roster;
use tracing::info;

pub fn run(args: StatsArgs) -> Result<()> {
    info!("Loading roster from {:?}", &args.input);
    let roster = roster::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    print!("{}", RosterStats::from_roster(&roster));
    Ok(())
}
