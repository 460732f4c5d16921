//! Error types for chart loading and quote lookups.
//!
//! Every failure carries an explicit category ([`ErrorKind`]) so calling
//! layers can map it to their own status or exit codes by tag.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Failure category of a [`QuoteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedChart,
    InvalidInputType,
    InvalidInputRange,
    SourceUnavailable,
}

impl ErrorKind {
    /// True for problems with caller-supplied input ("bad request"),
    /// false for chart or source problems (configuration/server faults).
    pub fn is_client_fault(self) -> bool {
        matches!(self, ErrorKind::InvalidInputType | ErrorKind::InvalidInputRange)
    }
}

#[derive(Debug, Clone, Error)]
pub enum QuoteError {
    /// Structural or content problem in the chart text
    #[error("malformed rate chart: {0}")]
    MalformedChart(String),

    /// `miles` or `weight` is not a finite number
    #[error("{0}")]
    InvalidInputType(String),

    /// `miles` or `weight` is finite but negative
    #[error("{0}")]
    InvalidInputRange(String),

    /// Reading the chart text failed
    #[error("rate chart source {path:?} unavailable: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl QuoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuoteError::MalformedChart(_) => ErrorKind::MalformedChart,
            QuoteError::InvalidInputType(_) => ErrorKind::InvalidInputType,
            QuoteError::InvalidInputRange(_) => ErrorKind::InvalidInputRange,
            QuoteError::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        QuoteError::MalformedChart(msg.into())
    }

    pub(crate) fn unavailable(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        QuoteError::SourceUnavailable {
            path: path.into(),
            source: Arc::new(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuoteError>;
