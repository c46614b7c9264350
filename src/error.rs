use std::path::PathBuf;

use thiserror::Error;

use crate::models::Coordinates;

/// Failure to read an archive at all. Missing entries are not errors.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Outcome of resolving a parent descriptor by coordinates.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{0} not found in any repository")]
    NotFound(Coordinates),
    #[error("cannot resolve {coordinates}: {message}")]
    Resolution {
        coordinates: Coordinates,
        message: String,
    },
}

/// Reasons a descriptor parent chain stopped without licenses.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("cannot parse descriptor {origin}: {message}")]
    Parse { origin: String, message: String },
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("cannot read descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parent chain loops back to {0}")]
    CycleDetected(Coordinates),
}
