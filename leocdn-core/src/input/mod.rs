//! Input collaborators: readers for the precomputed workload files.
//!
//! Every reader is split into a pure `parse_*` function over file content and
//! an async `read_*` wrapper that loads the file. Parse failures of fields the
//! simulation depends on are fatal; only the producer-side noise rows of the
//! static tables are skipped.

mod csv;
mod requests;
mod tables;
mod topology;
mod workload;

use std::path::PathBuf;

pub use requests::{parse_requests, read_requests};
pub use tables::{parse_gst_population, parse_item_sizes, read_gst_population, read_item_sizes};
pub use topology::{
    parse_gnd_sat_links, parse_shortest_sat_paths, read_gnd_sat_links, read_shortest_sat_paths,
};
pub use workload::{StepInputSource, WorkloadFiles};

/// Errors raised while loading input files.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: missing header row")]
    MissingHeader { path: PathBuf },

    #[error("{path}:{line}: missing column {column}")]
    MissingColumn {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    #[error("{path}:{line}: invalid integer '{value}'")]
    InvalidInteger {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("{path}:{line}: size '{value}' does not end in .0")]
    MissingDecimalSuffix {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("Request for item {item} has a path of {length} node(s), need at least 2")]
    PathTooShort { item: i64, length: usize },

    #[error("{path}:{line}: negative size {value}")]
    NegativeSize {
        path: PathBuf,
        line: usize,
        value: i64,
    },
}

async fn read_file(path: &std::path::Path) -> Result<String, InputError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })
}
