use std::path::{Path, PathBuf};

use log::info;

use crate::analysis::{analyze, Analysis};
use crate::chart::render_all;
use crate::config::PipelineConfig;
use crate::data::clean::clean_table;
use crate::data::loader::load_table;
use crate::data::model::RecordTable;
use crate::data::writer::write_table;
use crate::error::{FileError, PipelineError, Stage, StageContext};

const PREVIEW_ROWS: usize = 5;

/// Console heading printed when a stage starts. Persister has none; its
/// output follows the analysis under the same heading.
pub fn step_heading(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::Loader => Some("Step 1: Data Collection"),
        Stage::Cleaner => Some("Step 2: Data Cleaning"),
        Stage::Analyzer => Some("Step 3: Data Analysis"),
        Stage::Visualizer => Some("Step 4: Data Visualization"),
        Stage::Persister | Stage::Viewer => None,
    }
}

fn announce(stage: Stage) {
    if let Some(heading) = step_heading(stage) {
        println!("{heading}");
        info!("{heading}");
    }
}

/// What a complete run produced.
#[derive(Debug)]
pub struct PipelineReport {
    /// The cleaned table, kept for the interactive viewer.
    pub table: RecordTable,
    pub analysis: Analysis,
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub cleaned_path: PathBuf,
    pub summary_path: PathBuf,
    pub figures: Vec<PathBuf>,
}

/// Run loader → cleaner → analyzer → persister → visualizer, once each and
/// in that order. The first failure stops the run.
pub fn run(config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
    announce(Stage::Loader);
    let table = load_table(&config.input_path).stage(Stage::Loader)?;
    let rows_loaded = table.len();
    println!("{}", table.head(PREVIEW_ROWS));

    announce(Stage::Cleaner);
    let outcome = clean_table(table).stage(Stage::Cleaner)?;
    info!(
        "removed {} duplicate rows, filled {:?}",
        outcome.duplicates_removed, outcome.filled
    );
    let table = outcome.table;
    println!("Cleaned Data Preview:\n{}", table.head(PREVIEW_ROWS));

    announce(Stage::Analyzer);
    let analysis = analyze(&table).stage(Stage::Analyzer)?;
    println!("{analysis}");

    let cleaned_path = config.cleaned_path();
    write_table(&table, &cleaned_path).stage(Stage::Persister)?;
    let summary_path = config.summary_path();
    write_summary(&analysis, &summary_path).stage(Stage::Persister)?;
    println!("Cleaned data saved to {}\n", cleaned_path.display());

    announce(Stage::Visualizer);
    let figures = render_all(&table, &analysis, &config.figure_dir, config.bins)
        .stage(Stage::Visualizer)?;

    Ok(PipelineReport {
        table,
        analysis,
        rows_loaded,
        duplicates_removed: outcome.duplicates_removed,
        cleaned_path,
        summary_path,
        figures,
    })
}

/// Serialise the analysis next to the cleaned table.
pub fn write_summary(analysis: &Analysis, path: &Path) -> Result<(), FileError> {
    let write_err = |source: std::io::Error| FileError::Write {
        path: path.to_path_buf(),
        source,
    };
    let json = serde_json::to_string_pretty(analysis)
        .map_err(|e| write_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    std::fs::write(path, json).map_err(write_err)
}
