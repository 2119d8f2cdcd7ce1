//! Error taxonomy for ingestion and aggregation.

use thiserror::Error;

/// Every failure the engine can report. All of them abort the run.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// A source file is missing or cannot be read.
    #[error("source '{source_name}' is unavailable: {source}")]
    SourceUnavailable {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    /// A row has an unparseable date, number, or is missing a column.
    #[error("malformed record in '{source_name}' at line {line}: {reason}")]
    MalformedRecord {
        source_name: String,
        line: u64,
        reason: String,
    },

    /// A location was constructed in violation of its invariants.
    #[error("invalid location: {reason}")]
    InvalidLocation { reason: String },

    #[error("location '{name}' has an empty series")]
    EmptySeries { name: String },
}

pub type Result<T> = std::result::Result<T, AtlasError>;

impl AtlasError {
    pub(crate) fn malformed(source_name: &str, line: u64, reason: impl Into<String>) -> Self {
        AtlasError::MalformedRecord {
            source_name: source_name.to_string(),
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_location(reason: impl Into<String>) -> Self {
        AtlasError::InvalidLocation {
            reason: reason.into(),
        }
    }

    /// Classifies a `csv` error: I/O failures mean the source itself is
    /// unreadable, anything else is a bad row.
    pub(crate) fn from_csv(source_name: &str, err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(source) => AtlasError::SourceUnavailable {
                source_name: source_name.to_string(),
                source,
            },
            other => AtlasError::malformed(source_name, line, format!("{other:?}")),
        }
    }
}
