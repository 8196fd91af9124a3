//! Text Translator Core Library
//!
//! This library provides the core functionality for translating text:
//! - Input from text files, PDFs and the clipboard
//! - Paragraph segmentation and reassembly
//! - Translation with local opus-mt models or OpenAI-compatible APIs
//! - Fixed-layout PDF export
//! - Application state and handlers shared by the front ends

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod input;
pub mod pdf;
pub mod segment;
pub mod translator;
pub mod util;

pub use app::{AppState, TranslationJob, TranslationProgress};
pub use config::{
    AppConfig, Backend, BlankLines, Lang, LanguageOption, LanguagePair, PageGeometry,
    TranslatorConfig, SUPPORTED_LANGUAGES, language_name,
};
pub use error::{Error, Result, Severity};
pub use input::{Clipboard, PdfFile, TextFile, TextSource, source_for_path};
pub use pdf::{PdfDocument, PdfSink, PdfWriter, export_pdf};
pub use segment::{reassemble, segment, translatable, translate_text};
pub use translator::{MarianTranslator, OpenAiTranslator, Translator, create_translator};

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The configured translator and PDF writer, bundled for front ends.
pub struct TextTranslator {
    translator: Arc<dyn Translator>,
    writer: PdfWriter,
    config: AppConfig,
}

impl TextTranslator {
    /// Create a new text translator with the given configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        let translator = create_translator(&config.translator, &config.cache)?;
        Self::with_translator(config, translator)
    }

    /// Create with a specific translator (for testing or custom backends)
    pub fn with_translator(config: AppConfig, translator: Arc<dyn Translator>) -> Result<Self> {
        let writer = PdfWriter::new(config.export.clone())?;
        Ok(Self {
            translator,
            writer,
            config,
        })
    }

    /// Shared handle to the translator, for running jobs on other tasks.
    pub fn translator(&self) -> Arc<dyn Translator> {
        Arc::clone(&self.translator)
    }

    pub fn translator_info(&self) -> translator::TranslatorInfo {
        self.translator.info()
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    pub const fn blank_lines(&self) -> BlankLines {
        self.config.blank_lines
    }

    pub const fn pdf_writer(&self) -> &PdfWriter {
        &self.writer
    }

    /// Translate the input panel of `state` into its output panel.
    pub async fn translate(&self, state: &mut AppState) -> Result<()> {
        state
            .translate(self.translator.as_ref(), self.config.blank_lines)
            .await
    }

    /// Export the output panel of `state` to `path`.
    pub fn save_as_pdf(&self, state: &AppState, path: impl AsRef<Path>) -> Result<PathBuf> {
        state.save_as_pdf(path, &self.writer)
    }
}
