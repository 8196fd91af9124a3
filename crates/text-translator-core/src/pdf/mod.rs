//! PDF text extraction (mupdf) and export (lopdf).

mod document;
mod layout;
mod text;
mod writer;

pub use document::PdfDocument;
pub use layout::{Page, PlacedLine, chunk_line, paginate};
pub use text::TextExtractor;
pub use writer::{PdfSink, PdfWriter, encode_win_ansi, export_pdf};
