//! Application state and the handlers behind each user action.
//!
//! Front ends own an [`AppState`] and call these handlers; services are
//! passed in as trait objects so the same flow runs in the window, the CLI
//! and tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use crate::config::{AppConfig, BlankLines, Lang, LanguagePair};
use crate::error::{Error, Result};
use crate::input::TextSource;
use crate::pdf::PdfSink;
use crate::segment::translate_text;
use crate::translator::Translator;

/// Contents of the two panels and the selected languages.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub input_text: String,
    pub output_text: String,
    pub source_lang: Option<Lang>,
    pub target_lang: Option<Lang>,
}

impl AppState {
    /// Empty panels with the configured default languages selected.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            source_lang: config.source_lang.clone(),
            target_lang: config.target_lang.clone(),
            ..Default::default()
        }
    }

    /// Replace the input panel with the contents of a file.
    ///
    /// On error the input panel is left as it was.
    pub fn open_file(&mut self, source: &dyn TextSource) -> Result<()> {
        self.input_text = source.read_text()?;
        info!("Loaded input from {}", source.describe());
        Ok(())
    }

    /// Replace the input panel with the clipboard text.
    pub fn paste_from_clipboard(&mut self, source: &dyn TextSource) -> Result<()> {
        self.input_text = source.read_text()?;
        info!("Loaded input from {}", source.describe());
        Ok(())
    }

    /// Check the selection and input, and snapshot them into a job.
    pub fn prepare_translation(&self) -> Result<TranslationJob> {
        let pair = match (&self.source_lang, &self.target_lang) {
            (Some(source), Some(target)) => LanguagePair::new(source.clone(), target.clone()),
            (None, Some(_)) => {
                return Err(Error::MissingLanguageSelection { missing: "source" });
            }
            (Some(_), None) => {
                return Err(Error::MissingLanguageSelection { missing: "target" });
            }
            (None, None) => {
                return Err(Error::MissingLanguageSelection {
                    missing: "source and target",
                });
            }
        };

        let text = self.input_text.trim();
        if text.is_empty() {
            return Err(Error::EmptyInput);
        }

        Ok(TranslationJob {
            text: text.to_string(),
            pair,
        })
    }

    /// Replace the output panel with a finished translation.
    pub fn finish_translation(&mut self, text: String) {
        self.output_text = text;
    }

    /// Validate, translate and show the result.
    ///
    /// The output panel only changes when the whole text translated.
    pub async fn translate(
        &mut self,
        translator: &dyn Translator,
        blank_lines: BlankLines,
    ) -> Result<()> {
        let job = self.prepare_translation()?;
        let text = job.run(translator, blank_lines, None).await?;
        self.finish_translation(text);
        Ok(())
    }

    /// Export the output panel and return the path written.
    ///
    /// A path without an extension gets `.pdf` appended.
    pub fn save_as_pdf(&self, path: impl AsRef<Path>, sink: &dyn PdfSink) -> Result<PathBuf> {
        if self.output_text.trim().is_empty() {
            return Err(Error::EmptyOutput);
        }

        let path = path.as_ref();
        let path = if path.extension().is_none() {
            path.with_extension("pdf")
        } else {
            path.to_path_buf()
        };

        sink.write_pdf(self.output_text.trim(), &path)?;
        Ok(path)
    }
}

/// A validated translation request, detached from the state so it can run
/// on another task.
#[derive(Debug, Clone)]
pub struct TranslationJob {
    text: String,
    pair: LanguagePair,
}

impl TranslationJob {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn pair(&self) -> &LanguagePair {
        &self.pair
    }

    /// Translate the snapshot, reporting per paragraph to `progress`.
    pub async fn run(
        &self,
        translator: &dyn Translator,
        blank_lines: BlankLines,
        progress: Option<&TranslationProgress>,
    ) -> Result<String> {
        info!(
            "Translating {} chars {} with {}",
            self.text.chars().count(),
            self.pair,
            translator.name()
        );

        let report = |done: usize, total: usize| {
            if let Some(progress) = progress {
                progress.set(done, total);
            }
        };

        translate_text(&self.text, translator, &self.pair, blank_lines, Some(&report)).await
    }
}

/// Paragraph progress of a running job, shared with the front end.
#[derive(Debug, Default)]
pub struct TranslationProgress {
    done: AtomicUsize,
    total: AtomicUsize,
}

impl TranslationProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, done: usize, total: usize) {
        self.total.store(total, Ordering::SeqCst);
        self.done.store(done, Ordering::SeqCst);
    }

    pub fn done(&self) -> usize {
        self.done.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Completed share in `0.0..=1.0`; zero before the total is known.
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.done().min(total) as f32) / (total as f32)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Severity;
    use crate::translator::TranslatorInfo;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Upper;

    #[async_trait]
    impl Translator for Upper {
        fn info(&self) -> TranslatorInfo {
            TranslatorInfo {
                name: "upper",
                local: true,
            }
        }

        async fn translate(&self, text: &str, _source: &Lang, _target: &Lang) -> Result<String> {
            Ok(text.to_uppercase())
        }
    }

    struct Failing;

    #[async_trait]
    impl Translator for Failing {
        fn info(&self) -> TranslatorInfo {
            TranslatorInfo {
                name: "failing",
                local: true,
            }
        }

        async fn translate(&self, _text: &str, source: &Lang, target: &Lang) -> Result<String> {
            Err(Error::ModelNotFound {
                pair: format!("{source}-{target}"),
                path: PathBuf::from("/models/missing"),
            })
        }
    }

    struct Fixed(&'static str);

    impl TextSource for Fixed {
        fn read_text(&self) -> Result<String> {
            Ok(self.0.to_string())
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    struct EmptyClipboard;

    impl TextSource for EmptyClipboard {
        fn read_text(&self) -> Result<String> {
            Err(Error::ClipboardEmpty)
        }

        fn describe(&self) -> String {
            "clipboard".to_string()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        written: Mutex<Vec<(String, PathBuf)>>,
    }

    impl PdfSink for RecordingSink {
        fn write_pdf(&self, text: &str, path: &Path) -> Result<()> {
            self.written
                .lock()
                .unwrap()
                .push((text.to_string(), path.to_path_buf()));
            Ok(())
        }
    }

    fn ready_state(input: &str) -> AppState {
        AppState {
            input_text: input.to_string(),
            output_text: "previous".to_string(),
            source_lang: Some(Lang::new("de")),
            target_lang: Some(Lang::new("en")),
        }
    }

    #[test]
    fn test_from_config_preselects_languages() {
        let config = AppConfig {
            source_lang: Some(Lang::new("fr")),
            ..Default::default()
        };
        let state = AppState::from_config(&config);
        assert_eq!(state.source_lang, Some(Lang::new("fr")));
        assert_eq!(state.target_lang, None);
        assert!(state.input_text.is_empty());
    }

    #[test]
    fn test_open_and_paste_replace_input() {
        let mut state = ready_state("old");
        state.open_file(&Fixed("from file")).unwrap();
        assert_eq!(state.input_text, "from file");

        state.paste_from_clipboard(&Fixed("pasted")).unwrap();
        assert_eq!(state.input_text, "pasted");
    }

    #[test]
    fn test_failed_paste_keeps_input() {
        let mut state = ready_state("keep me");
        let result = state.paste_from_clipboard(&EmptyClipboard);
        assert!(matches!(result, Err(Error::ClipboardEmpty)));
        assert_eq!(state.input_text, "keep me");
    }

    #[tokio::test]
    async fn test_missing_source_leaves_output_unchanged() {
        let mut state = ready_state("Hallo");
        state.source_lang = None;

        let err = state.translate(&Upper, BlankLines::Drop).await.unwrap_err();
        assert!(matches!(err, Error::MissingLanguageSelection { missing: "source" }));
        assert_eq!(err.severity(), Severity::Warning);
        assert_eq!(state.output_text, "previous");
    }

    #[test]
    fn test_missing_both_languages() {
        let mut state = ready_state("Hallo");
        state.source_lang = None;
        state.target_lang = None;

        assert!(matches!(
            state.prepare_translation(),
            Err(Error::MissingLanguageSelection {
                missing: "source and target"
            })
        ));
    }

    #[tokio::test]
    async fn test_blank_input_is_warning() {
        let mut state = ready_state(" \n\t\n");
        let err = state.translate(&Upper, BlankLines::Drop).await.unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
        assert_eq!(state.output_text, "previous");
    }

    #[tokio::test]
    async fn test_translate_replaces_output() {
        let mut state = ready_state("Hallo\n\nWelt\n");
        state.translate(&Upper, BlankLines::Drop).await.unwrap();
        assert_eq!(state.output_text, "HALLO\nWELT");
        assert_eq!(state.input_text, "Hallo\n\nWelt\n");
    }

    #[tokio::test]
    async fn test_failed_translation_keeps_output() {
        let mut state = ready_state("Hallo");
        let err = state.translate(&Failing, BlankLines::Drop).await.unwrap_err();
        assert!(matches!(err, Error::ModelNotFound { ref pair, .. } if pair == "de-en"));
        assert_eq!(err.severity(), Severity::Error);
        assert_eq!(state.output_text, "previous");
    }

    #[tokio::test]
    async fn test_job_reports_progress() {
        let state = ready_state("a\nb\n\nc");
        let job = state.prepare_translation().unwrap();
        assert_eq!(job.pair().to_string(), "de-en");

        let progress = TranslationProgress::new();
        assert!(progress.fraction().abs() < f32::EPSILON);

        let out = job.run(&Upper, BlankLines::Drop, Some(&progress)).await.unwrap();
        assert_eq!(out, "A\nB\nC");
        assert_eq!((progress.done(), progress.total()), (3, 3));
        assert!((progress.fraction() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_save_empty_output_is_warning() {
        let mut state = ready_state("Hallo");
        state.output_text = "  \n".to_string();
        let sink = RecordingSink::default();

        let err = state.save_as_pdf("out.pdf", &sink).unwrap_err();
        assert!(matches!(err, Error::EmptyOutput));
        assert_eq!(err.severity(), Severity::Warning);
        assert!(sink.written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_save_returns_path_written() {
        let state = ready_state("Hallo");
        let sink = RecordingSink::default();

        let saved = state.save_as_pdf("/tmp/translation", &sink).unwrap();
        assert_eq!(saved, PathBuf::from("/tmp/translation.pdf"));

        let saved = state.save_as_pdf("/tmp/out.PDF", &sink).unwrap();
        assert_eq!(saved, PathBuf::from("/tmp/out.PDF"));

        let written = sink.written.lock().unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].0, "previous");
    }

    #[test]
    fn test_save_trims_surrounding_whitespace() {
        let mut state = ready_state("Hallo");
        state.output_text = "\nfirst\n\nsecond\n\n".to_string();
        let sink = RecordingSink::default();

        state.save_as_pdf("out.pdf", &sink).unwrap();

        let written = sink.written.lock().unwrap();
        assert_eq!(written[0].0, "first\n\nsecond");
        assert_eq!(state.output_text, "\nfirst\n\nsecond\n\n");
    }
}
