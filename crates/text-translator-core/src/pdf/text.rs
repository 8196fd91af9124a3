use mupdf::{Document as MuDocument, TextPageOptions};
use tracing::debug;

use super::document::PdfDocument;
use crate::error::{Error, Result};

/// Reads the text layer of a [`PdfDocument`].
pub struct TextExtractor<'a> {
    doc: &'a PdfDocument,
}

impl<'a> TextExtractor<'a> {
    pub const fn new(doc: &'a PdfDocument) -> Self {
        Self { doc }
    }

    /// Text of one page (0-based), lines joined with `\n`, no trailing newline.
    pub fn page_text(&self, page_num: usize) -> Result<String> {
        let doc = self.doc.open_document()?;
        read_page(&doc, page_num, self.doc.page_count())
    }

    /// Text of the whole document, pages in order.
    ///
    /// Pages are concatenated with no separator, so the last line of a page
    /// and the first line of the next may run together.
    pub fn document_text(&self) -> Result<String> {
        let total = self.doc.page_count();
        let doc = self.doc.open_document()?;
        let pages = (0..total)
            .map(|page_num| read_page(&doc, page_num, total))
            .collect::<Result<Vec<_>>>()?;
        let text = pages.concat();

        debug!(
            "Extracted {} chars from {} pages",
            text.chars().count(),
            pages.len()
        );
        Ok(text)
    }
}

fn read_page(doc: &MuDocument, page_num: usize, total: usize) -> Result<String> {
    let index = i32::try_from(page_num)
        .ok()
        .filter(|_| page_num < total)
        .ok_or(Error::PdfInvalidPage {
            page: page_num,
            total,
        })?;

    let extraction_error = |reason: String| Error::PdfTextExtraction {
        page: page_num,
        reason,
    };

    let page = doc
        .load_page(index)
        .map_err(|e| extraction_error(format!("Failed to load page: {e}")))?;
    let text_page = page
        .to_text_page(TextPageOptions::empty())
        .map_err(|e| extraction_error(format!("Failed to read text layer: {e}")))?;

    let mut lines: Vec<String> = Vec::new();
    for block in text_page.blocks() {
        for line in block.lines() {
            lines.push(line.chars().filter_map(|c| c.char()).collect());
        }
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::PageGeometry;
    use crate::pdf::PdfWriter;

    fn generated(text: &str) -> PdfDocument {
        let bytes = PdfWriter::new(PageGeometry::default())
            .unwrap()
            .render(text)
            .unwrap();
        PdfDocument::from_bytes(bytes).unwrap()
    }

    #[test]
    fn test_page_out_of_range() {
        let doc = generated("one page");
        let result = TextExtractor::new(&doc).page_text(3);
        assert!(matches!(result, Err(Error::PdfInvalidPage { page: 3, total: 1 })));
    }

    #[test]
    fn test_document_text_covers_all_pages() {
        let text: Vec<_> = (0..60).map(|i| format!("row{i}")).collect();
        let doc = generated(&text.join("\n"));
        assert_eq!(doc.page_count(), 2);

        let extracted = TextExtractor::new(&doc).document_text().unwrap();
        assert!(extracted.starts_with("row0\n"));
        assert!(extracted.ends_with("row59"));
        // Page one ends at row54; the page break adds no newline
        assert!(extracted.contains("row54row55"));
        assert_eq!(extracted.lines().count(), text.len() - 1);
    }

    #[test]
    fn test_page_text_reads_single_page() {
        let text: Vec<_> = (0..60).map(|i| format!("row{i}")).collect();
        let doc = generated(&text.join("\n"));

        let second = TextExtractor::new(&doc).page_text(1).unwrap();
        assert_eq!(second, "row55\nrow56\nrow57\nrow58\nrow59");
    }
}
