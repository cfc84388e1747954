//! Fully-buffered documents with all-or-nothing emission.

use std::io::Write;
use std::path::Path;

use contracts::PipelineError;
use tracing::{debug, instrument};

/// A completely serialized output file, not yet on disk
///
/// Serialization always finishes in memory before any byte reaches the
/// destination, so a mid-serialization failure can never leave a truncated
/// file behind.
#[derive(Debug, Clone)]
pub struct FormatDocument {
    pub text: String,
}

impl FormatDocument {
    pub fn new(text: String) -> Self {
        Self { text }
    }

    /// Write the document to `path` atomically
    ///
    /// The content goes to a temp file in the destination directory, then
    /// replaces `path` in one rename. The destination either keeps its old
    /// content or receives the complete new document.
    #[instrument(name = "write_document", skip(self), fields(path = %path.display(), bytes = self.text.len()))]
    pub fn write_to(&self, path: &Path) -> Result<(), PipelineError> {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
            None => tempfile::NamedTempFile::new_in(".")?,
        };
        tmp.write_all(self.text.as_bytes())?;
        tmp.persist(path).map_err(|e| e.error)?;

        debug!(path = %path.display(), "document written");
        metrics::counter!("writer_documents_total").increment(1);
        metrics::counter!("writer_bytes_total").increment(self.text.len() as u64);
        Ok(())
    }
}
