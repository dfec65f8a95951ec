use super::config::ConfigError;
use super::extract::ExtractError;
use crate::core::models::series::SeriesError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error("Atom index {atom} is out of range ({available} atoms selected)")]
    AtomOutOfRange { atom: usize, available: usize },

    #[error("Failed to acquire observables from run '{run}': {source}", run = run.display())]
    Acquisition {
        run: PathBuf,
        #[source]
        source: ExtractError,
    },

    #[error("Invalid sweep layout at '{path}': {reason}", path = path.display())]
    Layout { path: PathBuf, reason: String },

    #[error("I/O error while scanning '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
