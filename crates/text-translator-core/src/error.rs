use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for text-translator-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - User input validation (missing language selection, empty panels)
/// - Input acquisition (text files, PDFs, clipboard)
/// - Translation operations (model lookup, inference, remote API requests)
/// - PDF export
/// - Configuration and general I/O
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Validation Errors
    // ==========================================================================
    /// A language dropdown was left empty
    #[error("please select both a source and a target language ({missing} missing)")]
    MissingLanguageSelection { missing: &'static str },

    /// Translate was requested with an empty input panel
    #[error("the input text is empty")]
    EmptyInput,

    /// Export was requested with an empty output panel
    #[error("the output text is empty")]
    EmptyOutput,

    /// Language code outside the supported set
    #[error("unsupported language code: {0}")]
    UnsupportedLanguage(String),

    // ==========================================================================
    // Input Errors
    // ==========================================================================
    /// File extension is neither .txt nor .pdf
    #[error("unsupported file type: {}", .0.display())]
    UnsupportedFileType(PathBuf),

    /// Text file is not valid UTF-8
    #[error("{} is not valid UTF-8", .0.display())]
    InvalidUtf8(PathBuf),

    /// Clipboard holds no text content
    #[error("the clipboard does not contain any text")]
    ClipboardEmpty,

    /// Clipboard could not be accessed
    #[error("clipboard error: {0}")]
    Clipboard(String),

    // ==========================================================================
    // PDF Errors
    // ==========================================================================
    /// Failed to open or parse a PDF file
    #[error("failed to open PDF: {0}")]
    PdfOpen(String),

    /// PDF requires a password
    #[error("PDF is encrypted: {0}")]
    PdfEncrypted(String),

    /// Invalid page number requested
    #[error("invalid page number {page} (document has {total} pages)")]
    PdfInvalidPage { page: usize, total: usize },

    /// Failed to extract text from a PDF page
    #[error("failed to extract text from page {page}: {reason}")]
    PdfTextExtraction { page: usize, reason: String },

    /// Failed to save a PDF
    #[error("failed to save PDF: {0}")]
    PdfSave(String),

    /// Error from the lopdf library
    #[error("lopdf error: {0}")]
    Lopdf(String),

    // ==========================================================================
    // Translation Errors
    // ==========================================================================
    /// No pretrained model exists for the language pair
    #[error("no translation model for {pair} (looked in {})", path.display())]
    ModelNotFound { pair: String, path: PathBuf },

    /// Model exists but failed to load or run
    #[error("translation model error: {0}")]
    ModelLoad(String),

    /// Translation API request failed
    #[error("translation API request failed: {0}")]
    TranslationRequest(String),

    /// Invalid response from translation API
    #[error("invalid translation API response: {0}")]
    TranslationInvalidResponse(String),

    /// Rate limited by translation API
    #[error(
        "translation rate limited{}",
        retry_after.map(|s| format!(", retry after {s} seconds")).unwrap_or_default()
    )]
    TranslationRateLimited { retry_after: Option<u64> },

    /// Translation request timed out
    #[error("translation request timed out")]
    TranslationTimeout,

    /// Maximum retry attempts exceeded for translation
    #[error("translation failed after maximum retries")]
    TranslationMaxRetriesExceeded,

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a front end should present an error to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The action was refused because of missing user input
    Warning,
    /// The action failed
    Error,
}

impl Error {
    /// Classify the error for display.
    ///
    /// Missing selections and empty panels are warnings; everything else
    /// aborted an action that was otherwise valid.
    pub const fn severity(&self) -> Severity {
        match self {
            Self::MissingLanguageSelection { .. } | Self::EmptyInput | Self::EmptyOutput => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_warnings() {
        assert_eq!(Error::EmptyInput.severity(), Severity::Warning);
        assert_eq!(Error::EmptyOutput.severity(), Severity::Warning);
        assert_eq!(
            Error::MissingLanguageSelection { missing: "source" }.severity(),
            Severity::Warning
        );
    }

    #[test]
    fn test_model_not_found_is_error() {
        let err = Error::ModelNotFound {
            pair: "de-xx".to_string(),
            path: PathBuf::from("/models/opus-mt-de-xx"),
        };
        assert_eq!(err.severity(), Severity::Error);
        assert!(err.to_string().contains("de-xx"));
    }

    #[test]
    fn test_rate_limited_message() {
        let err = Error::TranslationRateLimited { retry_after: Some(5) };
        assert_eq!(err.to_string(), "translation rate limited, retry after 5 seconds");
        let err = Error::TranslationRateLimited { retry_after: None };
        assert_eq!(err.to_string(), "translation rate limited");
    }
}
