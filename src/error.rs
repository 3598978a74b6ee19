// src/error.rs

use std::{io, path::PathBuf};
use thiserror::Error;

/// File-level failures. Row-level problems never surface here; they are
/// repaired and listed in the `MalformedRowReport` instead.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("error reading {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("input is empty")]
    Empty,

    #[error("input has only a header row, no data")]
    HeaderOnly,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unknown template `{name}`; available templates: {}", available.join(", "))]
    Unknown { name: String, available: Vec<String> },
}
