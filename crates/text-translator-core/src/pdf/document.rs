use std::fmt;
use std::path::Path;
use std::sync::Arc;

use mupdf::Document as MuDocument;

use crate::error::{Error, Result};

/// PDF bytes that mupdf accepted, plus their page count.
///
/// mupdf handles are not `Send`, so only the bytes are kept and a fresh
/// handle is opened per extraction pass. Clones share the bytes.
#[derive(Clone)]
pub struct PdfDocument {
    bytes: Arc<[u8]>,
    page_count: usize,
}

impl PdfDocument {
    /// Parse `bytes`; password-protected files are rejected.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes: Vec<u8> = bytes.into();
        let bytes: Arc<[u8]> = Arc::from(bytes);
        let doc = parse(&bytes)?;

        if doc
            .needs_password()
            .map_err(|e| Error::PdfOpen(format!("Failed to inspect PDF security: {e}")))?
        {
            return Err(Error::PdfEncrypted(
                "a password is required to read this document".to_string(),
            ));
        }

        let pages = doc
            .page_count()
            .map_err(|e| Error::PdfOpen(format!("Failed to count pages: {e}")))?;

        Ok(Self {
            bytes,
            page_count: usize::try_from(pages).unwrap_or(0),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| Error::PdfOpen(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_bytes(bytes)
    }

    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    pub(crate) fn open_document(&self) -> Result<MuDocument> {
        parse(&self.bytes)
    }
}

fn parse(bytes: &[u8]) -> Result<MuDocument> {
    MuDocument::from_bytes(bytes, "")
        .map_err(|e| Error::PdfOpen(format!("Failed to parse PDF: {e}")))
}

impl fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfDocument")
            .field("page_count", &self.page_count)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf() {
        assert!(matches!(
            PdfDocument::from_bytes(b"hello".to_vec()),
            Err(Error::PdfOpen(_))
        ));
        assert!(PdfDocument::from_bytes(Vec::new()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = PdfDocument::from_file("/nonexistent/scan.pdf");
        assert!(matches!(result, Err(Error::PdfOpen(msg)) if msg.contains("scan.pdf")));
    }
}
