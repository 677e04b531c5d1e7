//! Error types for triplesplit-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Input corpus could not be opened or read
    #[error("Input error: {0}")]
    Input(String),

    /// Partition index outside `[0, count)` or a count below one
    #[error("Invalid partition index {index} for {count} partitions")]
    InvalidIndex { index: usize, count: usize },

    /// Partition name that does not decode to a partition of this layout
    #[error("Invalid partition name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A destination could not be created
    #[error("Failed to create destination for graph {graph}: {source}")]
    BackendCreation {
        graph: String,
        #[source]
        source: std::io::Error,
    },

    /// A write (or the final flush) to an existing destination failed
    #[error("Failed to write to destination for graph {graph}: {source}")]
    Write {
        graph: String,
        #[source]
        source: std::io::Error,
    },

    /// Upload phase aborted; `uploaded` graphs were stored before the failure
    #[error("Upload of graph {graph} failed after {uploaded} graph(s) uploaded: {source}")]
    Upload {
        uploaded: usize,
        graph: String,
        #[source]
        source: UploadFailure,
    },

    /// Intake attempted on a distributor that was closed or already failed
    #[error("Distributor is closed")]
    Closed,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an input error
    pub fn input(msg: impl Into<String>) -> Self {
        Error::Input(msg.into())
    }

    /// Create an invalid index error
    pub fn invalid_index(index: usize, count: usize) -> Self {
        Error::InvalidIndex { index, count }
    }

    /// Create an invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an upload error
    pub fn upload(uploaded: usize, graph: impl Into<String>, source: UploadFailure) -> Self {
        Error::Upload {
            uploaded,
            graph: graph.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Number of graphs uploaded before an upload failure, if this is one.
    pub fn uploaded_before_failure(&self) -> Option<usize> {
        match self {
            Error::Upload { uploaded, .. } => Some(*uploaded),
            _ => None,
        }
    }
}

/// Why a single graph could not be uploaded
#[derive(Error, Debug)]
pub enum UploadFailure {
    /// The partition file could not be read
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No response within the configured timeout
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// The graph store could not be reached
    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    /// Any other transport failure
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The graph store answered with a non-success status
    #[error("graph store returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl From<reqwest::Error> for UploadFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UploadFailure::Timeout(e)
        } else if e.is_connect() {
            UploadFailure::Connect(e)
        } else {
            UploadFailure::Network(e)
        }
    }
}
