//! Error types for scenario loading and exports

use std::path::PathBuf;

use thiserror::Error;

use crate::moves::ModuleId;

/// Errors from reading, parsing or writing a scenario
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("line {line}: module references undefined visgroup {visgroup}")]
    UnknownVisgroup { line: usize, visgroup: u32 },
    #[error("line {line}: module {id} is defined twice")]
    DuplicateModule { line: usize, id: ModuleId },
    #[error("could not read scenario {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: Box<ScenarioError>,
    },
}

impl ScenarioError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        ScenarioError::Parse { line, message: message.into() }
    }

    /// Attach the file a failure came from
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        ScenarioError::Load { path: path.into(), source: Box::new(self) }
    }
}

/// Errors from writing lattice exports
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
