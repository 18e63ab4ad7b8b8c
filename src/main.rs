use anyhow::Result;
use clap::Parser;
use log::info;

use mobile_prices::app;
use mobile_prices::config::{Cli, PipelineConfig};
use mobile_prices::error::{PipelineError, Stage};
use mobile_prices::pipeline;
use mobile_prices::state::ViewerState;

fn main() -> Result<()> {
    env_logger::init();

    let config = PipelineConfig::from(Cli::parse());
    info!("running with {config:?}");

    let report = pipeline::run(&config)?;
    info!(
        "{} rows loaded, {} duplicates removed, {} charts written",
        report.rows_loaded,
        report.duplicates_removed,
        report.figures.len()
    );

    if config.show {
        let state = ViewerState::new(&report.table, report.analysis, config.bins)
            .map_err(|e| PipelineError::new(Stage::Viewer, e))?;
        app::show(state).map_err(|e| PipelineError::new(Stage::Viewer, e))?;
    }

    println!("Analysis Complete!");
    Ok(())
}
