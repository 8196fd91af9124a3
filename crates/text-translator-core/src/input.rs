//! Where input text comes from: text files, PDFs and the clipboard.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::pdf::{PdfDocument, TextExtractor};
use crate::util::has_extension;

/// A place input text can be read from.
pub trait TextSource: Send + Sync {
    /// Read the full text.
    fn read_text(&self) -> Result<String>;

    /// Short description for logs and dialogs.
    fn describe(&self) -> String;
}

/// A UTF-8 text file, read verbatim.
#[derive(Debug, Clone)]
pub struct TextFile(pub PathBuf);

impl TextSource for TextFile {
    fn read_text(&self) -> Result<String> {
        let bytes = std::fs::read(&self.0)?;
        let text = String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8(self.0.clone()))?;
        info!("Read {} chars from {}", text.chars().count(), self.0.display());
        Ok(text)
    }

    fn describe(&self) -> String {
        self.0.display().to_string()
    }
}

/// A PDF with a text layer.
#[derive(Debug, Clone)]
pub struct PdfFile(pub PathBuf);

impl TextSource for PdfFile {
    fn read_text(&self) -> Result<String> {
        let doc = PdfDocument::from_file(&self.0)?;
        let text = TextExtractor::new(&doc).document_text()?;
        info!(
            "Extracted {} chars from {} ({} pages)",
            text.chars().count(),
            self.0.display(),
            doc.page_count()
        );
        Ok(text)
    }

    fn describe(&self) -> String {
        self.0.display().to_string()
    }
}

/// The system clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clipboard;

impl TextSource for Clipboard {
    fn read_text(&self) -> Result<String> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;

        match clipboard.get_text() {
            Ok(text) => {
                info!("Pasted {} chars from clipboard", text.chars().count());
                Ok(text)
            }
            Err(arboard::Error::ContentNotAvailable) => Err(Error::ClipboardEmpty),
            Err(e) => Err(Error::Clipboard(e.to_string())),
        }
    }

    fn describe(&self) -> String {
        "clipboard".to_string()
    }
}

/// Pick the file source for `path` by extension (`txt` or `pdf`).
pub fn source_for_path(path: impl AsRef<Path>) -> Result<Box<dyn TextSource>> {
    let path = path.as_ref();
    if has_extension(path, "txt") {
        Ok(Box::new(TextFile(path.to_path_buf())))
    } else if has_extension(path, "pdf") {
        Ok(Box::new(PdfFile(path.to_path_buf())))
    } else {
        Err(Error::UnsupportedFileType(path.to_path_buf()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_text_file_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "  Hallo\n\nWelt\n").unwrap();

        let text = source_for_path(&path).unwrap().read_text().unwrap();
        assert_eq!(text, "  Hallo\n\nWelt\n");
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, [b'G', b'r', 0xfc, b'e']).unwrap();

        let result = TextFile(path.clone()).read_text();
        assert!(matches!(result, Err(Error::InvalidUtf8(p)) if p == path));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = TextFile(PathBuf::from("/nonexistent/input.txt")).read_text();
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_source_for_path_by_extension() {
        assert_eq!(source_for_path("a.TXT").unwrap().describe(), "a.TXT");
        assert_eq!(source_for_path("scan.pdf").unwrap().describe(), "scan.pdf");

        let result = source_for_path("slides.docx");
        assert!(matches!(result, Err(Error::UnsupportedFileType(_))));
        assert!(matches!(source_for_path("README"), Err(Error::UnsupportedFileType(_))));
    }

    #[test]
    fn test_garbage_pdf_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        assert!(matches!(PdfFile(path).read_text(), Err(Error::PdfOpen(_))));
    }
}
