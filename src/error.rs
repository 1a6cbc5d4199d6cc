//! Error types for loading dictionaries and reading configuration.

use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while populating or tearing down a word set.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The word list could not be opened.
    #[error("Could not open dictionary {path:?}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The word list was opened but reading from it failed part way.
    #[error("Failed reading dictionary: {0}")]
    Read(#[from] std::io::Error),

    /// Storage for a new entry could not be reserved.
    #[error("Out of memory while loading dictionary: {0}")]
    Allocation(#[from] TryReserveError),

    /// A word in the source is longer than the set accepts.
    #[error("Word on line {line} is {word_length} characters long, maximum is {max}")]
    MalformedWord {
        line: usize,
        word_length: usize,
        max: usize,
    },

    /// `load` was called on a set that has not been unloaded.
    #[error("Dictionary is already loaded, unload it first")]
    AlreadyLoaded,
}

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DictionaryError>;
