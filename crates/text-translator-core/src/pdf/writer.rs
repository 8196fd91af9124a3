//! PDF export with lopdf.
//!
//! Text is set in the standard Helvetica Type1 font with WinAnsiEncoding,
//! so no font program is embedded. Characters outside that encoding are
//! written as `?`.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::{debug, info};

use super::layout::{Page, paginate};
use crate::config::PageGeometry;
use crate::error::{Error, Result};

const FONT_RESOURCE: &str = "F1";

/// Destination for exported text.
pub trait PdfSink: Send + Sync {
    /// Render `text` and write it to `path`.
    fn write_pdf(&self, text: &str, path: &Path) -> Result<()>;
}

/// Renders paginated text into a PDF document.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    geometry: PageGeometry,
}

impl PdfWriter {
    pub fn new(geometry: PageGeometry) -> Result<Self> {
        geometry.validate()?;
        Ok(Self { geometry })
    }

    pub const fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Lay out `text` and return the PDF bytes.
    pub fn render(&self, text: &str) -> Result<Vec<u8>> {
        let pages = paginate(text, &self.geometry);
        self.render_pages(&pages)
    }

    /// Build a PDF with one page per entry in `pages`.
    pub fn render_pages(&self, pages: &[Page]) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
            ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
        ]));

        let resources_id = doc.add_object(Dictionary::from_iter([(
            "Font",
            Object::Dictionary(Dictionary::from_iter([(
                FONT_RESOURCE,
                Object::Reference(font_id),
            )])),
        )]));

        let mut kids = Vec::with_capacity(pages.len());
        for page in pages {
            let page_id = self.add_page(&mut doc, page, pages_id, resources_id)?;
            kids.push(Object::Reference(page_id));
        }

        let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
        doc.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter([
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(kids)),
                ("Count", Object::Integer(count)),
            ])),
        );

        let catalog_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.compress();

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| Error::PdfSave(format!("Failed to serialize PDF: {e}")))?;

        debug!("Rendered {} pages ({} bytes)", pages.len(), output.len());
        Ok(output)
    }

    fn add_page(
        &self,
        doc: &mut Document,
        page: &Page,
        pages_id: ObjectId,
        resources_id: ObjectId,
    ) -> Result<ObjectId> {
        let mut operations = Vec::new();
        for line in page.lines.iter().filter(|l| !l.text.is_empty()) {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![FONT_RESOURCE.into(), Object::Real(self.geometry.font_size)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Real(line.x), Object::Real(line.y)],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(&line.text), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations }
            .encode()
            .map_err(|e| Error::Lopdf(format!("Failed to encode page content: {e}")))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

        Ok(doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Reference(resources_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(self.geometry.page_width),
                    Object::Real(self.geometry.page_height),
                ]),
            ),
        ])))
    }
}

impl PdfSink for PdfWriter {
    fn write_pdf(&self, text: &str, path: &Path) -> Result<()> {
        let bytes = self.render(text)?;
        std::fs::write(path, bytes)
            .map_err(|e| Error::PdfSave(format!("Failed to write {}: {e}", path.display())))?;
        info!("Saved PDF to {}", path.display());
        Ok(())
    }
}

/// Render `text` with `geometry` and write it to `path`.
pub fn export_pdf(text: &str, path: &Path, geometry: &PageGeometry) -> Result<()> {
    PdfWriter::new(geometry.clone())?.write_pdf(text, path)
}

/// Encode text for a WinAnsiEncoding font.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => u8::try_from(c).unwrap_or(b'?'),
        '\t' => b' ',
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => b'?',
    }
}
