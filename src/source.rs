//! Where chart text comes from.
//!
//! [`ChartSource`] is the seam between the engine and storage. [`FileSource`]
//! reads charts from the local filesystem; tests plug in in-memory sources.

use std::path::Path;

use tracing::debug;

use crate::error::{QuoteError, Result};

/// Reads raw chart text for a source path.
pub trait ChartSource: Send + Sync {
    /// # Errors
    ///
    /// Returns [`QuoteError::SourceUnavailable`] if the text cannot be read.
    fn read(&self, path: &Path) -> Result<String>;
}

/// Reads chart text from UTF-8 files on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSource;

impl FileSource {
    pub fn new() -> Self {
        Self
    }
}

impl ChartSource for FileSource {
    fn read(&self, path: &Path) -> Result<String> {
        let text = std::fs::read_to_string(path).map_err(|e| QuoteError::unavailable(path, e))?;
        debug!(path = %path.display(), bytes = text.len(), "Read chart source");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    #[test]
    fn test_read_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "miles_start,miles_end").unwrap();

        let text = FileSource::new().read(file.path()).unwrap();
        assert_eq!(text, "miles_start,miles_end");
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does_not_exist.csv");

        let err = FileSource::new().read(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
        assert!(err.to_string().contains("does_not_exist.csv"));
    }
}
