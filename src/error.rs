use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Problems reaching the filesystem (input, output, figures).
#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited text in {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot render chart {}: {message}", path.display())]
    Render { path: PathBuf, message: String },

    #[error("interactive viewer failed: {0}")]
    Viewer(String),
}

/// Problems with the table content itself.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("column '{0}' missing from input")]
    MissingColumn(String),

    #[error("column '{column}', row {row}: '{value}' is not a number")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("row {row}: expected {expected} fields, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    File(#[from] FileError),
    #[error(transparent)]
    Data(#[from] DataError),
}

// ---------------------------------------------------------------------------
// Stage attribution
// ---------------------------------------------------------------------------

/// The pipeline stage an error surfaced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loader,
    Cleaner,
    Analyzer,
    Persister,
    Visualizer,
    Viewer,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loader => "loader",
            Stage::Cleaner => "cleaner",
            Stage::Analyzer => "analyzer",
            Stage::Persister => "persister",
            Stage::Visualizer => "visualizer",
            Stage::Viewer => "viewer",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("{stage} stage failed")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: TableError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<TableError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

/// Attach a [`Stage`] to a fallible stage result.
pub trait StageContext<T> {
    fn stage(self, stage: Stage) -> Result<T, PipelineError>;
}

impl<T, E: Into<TableError>> StageContext<T> for Result<T, E> {
    fn stage(self, stage: Stage) -> Result<T, PipelineError> {
        self.map_err(|e| PipelineError::new(stage, e))
    }
}
