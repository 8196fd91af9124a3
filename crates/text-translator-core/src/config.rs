use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Language codes following ISO 639-1
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lang(pub String);

impl Lang {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this code is one of [`SUPPORTED_LANGUAGES`].
    pub fn is_supported(&self) -> bool {
        SUPPORTED_LANGUAGES.iter().any(|l| l.code == self.0)
    }

    /// Parse a code, rejecting anything outside the supported set.
    pub fn parse_supported(code: &str) -> Result<Self> {
        let lang = Self::new(code.trim());
        if lang.is_supported() {
            Ok(lang)
        } else {
            Err(Error::UnsupportedLanguage(code.to_string()))
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Lang {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Lang {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Source and target language of one translation.
///
/// Displays as `"{source}-{target}"`, which is also how models are named.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    pub source: Lang,
    pub target: Lang,
}

impl LanguagePair {
    pub fn new(source: impl Into<Lang>, target: impl Into<Lang>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl std::fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

/// A language option for UI dropdowns
#[derive(Debug, Clone, Copy)]
pub struct LanguageOption {
    /// ISO language code (e.g., "en", "de")
    pub code: &'static str,
    /// Display name (e.g., "English", "German")
    pub name: &'static str,
}

/// Languages offered in both dropdowns.
///
/// Whether a given pair actually works depends on which opus-mt models are
/// installed; an unknown pair fails at translation time.
pub const SUPPORTED_LANGUAGES: &[LanguageOption] = &[
    LanguageOption { code: "de", name: "German" },
    LanguageOption { code: "en", name: "English" },
    LanguageOption { code: "fr", name: "French" },
    LanguageOption { code: "es", name: "Spanish" },
    LanguageOption { code: "it", name: "Italian" },
    LanguageOption { code: "nl", name: "Dutch" },
    LanguageOption { code: "pt", name: "Portuguese" },
    LanguageOption { code: "ru", name: "Russian" },
    LanguageOption { code: "zh", name: "Chinese" },
];

/// Human-readable name for a language code.
pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|l| l.code == code)
        .map(|l| l.name)
}

/// What happens to blank lines of the input when the translation is reassembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlankLines {
    /// Blank lines are removed from the output
    #[default]
    Drop,
    /// Blank lines are kept as empty lines in the output
    Preserve,
}

/// Which translation backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Local opus-mt models converted for CTranslate2
    #[default]
    Marian,
    /// Any OpenAI-compatible chat completions endpoint
    OpenAi,
}

/// Local Marian (opus-mt) model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarianConfig {
    /// Directory holding `opus-mt-{src}-{tgt}` model folders
    /// (defaults to $XDG_DATA_HOME/text-translator/models)
    pub models_dir: Option<PathBuf>,

    /// Token budget per paragraph; longer input is truncated by the tokenizer
    #[serde(default = "default_max_input_tokens")]
    pub max_input_tokens: usize,

    /// Beam width for decoding
    #[serde(default = "default_beam_size")]
    pub beam_size: usize,

    /// How many language pairs stay loaded at once
    #[serde(default = "default_max_loaded_models")]
    pub max_loaded_models: u64,
}

const fn default_max_input_tokens() -> usize {
    512
}

const fn default_beam_size() -> usize {
    4
}

const fn default_max_loaded_models() -> u64 {
    4
}

impl MarianConfig {
    /// The configured models directory, or the per-user default.
    pub fn resolved_models_dir(&self) -> PathBuf {
        self.models_dir
            .clone()
            .unwrap_or_else(crate::util::default_models_dir)
    }
}

impl Default for MarianConfig {
    fn default() -> Self {
        Self {
            models_dir: None,
            max_input_tokens: default_max_input_tokens(),
            beam_size: default_beam_size(),
            max_loaded_models: default_max_loaded_models(),
        }
    }
}

/// Settings for OpenAI-compatible APIs.
///
/// Supports llama.cpp, Ollama, DeepSeek, OpenAI, and any other OpenAI-compatible API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl OpenAiConfig {
    pub fn new(
        api_base: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_base: api_base.into(),
            api_key,
            model: model.into(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

const fn default_retry_count() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/v1", None, "default_model")
    }
}

/// Translator backend configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub marian: MarianConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// Paragraph cache configuration (in-memory only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enable the paragraph cache
    #[serde(default = "default_true")]
    pub memory_enabled: bool,

    /// Maximum cached paragraphs
    #[serde(default = "default_memory_max_entries")]
    pub memory_max_entries: u64,

    /// Cache TTL in seconds (0 = no expiry)
    #[serde(default)]
    pub memory_ttl_seconds: u64,
}

const fn default_true() -> bool {
    true
}

const fn default_memory_max_entries() -> u64 {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_enabled: true,
            memory_max_entries: default_memory_max_entries(),
            memory_ttl_seconds: 0,
        }
    }
}

/// Page layout for PDF export, in PDF points (1/72 inch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    #[serde(default = "default_page_width")]
    pub page_width: f32,
    #[serde(default = "default_page_height")]
    pub page_height: f32,
    #[serde(default = "default_margin")]
    pub margin_top: f32,
    #[serde(default = "default_margin")]
    pub margin_bottom: f32,
    #[serde(default = "default_margin")]
    pub margin_left: f32,
    /// Vertical distance between baselines
    #[serde(default = "default_line_pitch")]
    pub line_pitch: f32,
    /// Characters per rendered line before a line is cut
    #[serde(default = "default_max_line_chars")]
    pub max_line_chars: usize,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

// US Letter
const fn default_page_width() -> f32 {
    612.0
}

const fn default_page_height() -> f32 {
    792.0
}

const fn default_margin() -> f32 {
    72.0
}

const fn default_line_pitch() -> f32 {
    12.0
}

const fn default_max_line_chars() -> usize {
    85
}

const fn default_font_size() -> f32 {
    12.0
}

impl PageGeometry {
    /// Baseline of the first line on a page.
    pub fn top_cursor(&self) -> f32 {
        self.page_height - self.margin_top
    }

    /// Number of lines that fit on one page.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn lines_per_page(&self) -> usize {
        let usable = (self.page_height - self.margin_top - self.margin_bottom).max(0.0);
        (usable / self.line_pitch).floor() as usize + 1
    }

    /// Reject layouts that cannot paginate.
    pub fn validate(&self) -> Result<()> {
        if self.line_pitch <= 0.0 {
            return Err(Error::ConfigInvalid {
                field: "export.line_pitch".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.max_line_chars == 0 {
            return Err(Error::ConfigInvalid {
                field: "export.max_line_chars".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.top_cursor() < self.margin_bottom {
            return Err(Error::ConfigInvalid {
                field: "export.margin_top".to_string(),
                reason: "margins leave no room for text".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: default_page_width(),
            page_height: default_page_height(),
            margin_top: default_margin(),
            margin_bottom: default_margin(),
            margin_left: default_margin(),
            line_pitch: default_line_pitch(),
            max_line_chars: default_max_line_chars(),
            font_size: default_font_size(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Preselected source language (empty dropdown when unset)
    #[serde(default)]
    pub source_lang: Option<Lang>,

    /// Preselected target language (empty dropdown when unset)
    #[serde(default)]
    pub target_lang: Option<Lang>,

    /// Blank line handling during reassembly
    #[serde(default)]
    pub blank_lines: BlankLines,

    /// Translator backend configuration
    #[serde(default)]
    pub translator: TranslatorConfig,

    /// Paragraph cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// PDF export layout
    #[serde(default)]
    pub export: PageGeometry,
}

/// Prefix for environment overrides, e.g. `TEXT_TRANSLATOR__TRANSLATOR__BACKEND=openai`.
pub const ENV_PREFIX: &str = "TEXT_TRANSLATOR";

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config: {e}")))?;
        config.validated()
    }

    /// Load from default locations.
    ///
    /// Layers, lowest priority first: built-in defaults,
    /// ~/.config/text-translator/config.toml, ./config.toml, then
    /// `TEXT_TRANSLATOR__*` environment variables.
    pub fn load() -> Self {
        match Self::load_layered() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn load_layered() -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("text-translator").join("config.toml");
            if user_config.exists() {
                tracing::debug!("Loading config from {}", user_config.display());
            }
            builder = builder.add_source(config::File::from(user_config).required(false));
        }

        builder = builder
            .add_source(config::File::from(PathBuf::from("config.toml")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder
            .build()
            .and_then(|c| c.try_deserialize::<Self>())
            .map_err(|e| Error::ConfigLoad(e.to_string()))?;

        config.validated()
    }

    /// Check preselected languages and the page geometry.
    fn validated(mut self) -> Result<Self> {
        self.source_lang = self
            .source_lang
            .map(|lang| Lang::parse_supported(lang.as_str()))
            .transpose()?;
        self.target_lang = self
            .target_lang
            .map(|lang| Lang::parse_supported(lang.as_str()))
            .transpose()?;
        self.export.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_languages() {
        assert!(Lang::new("de").is_supported());
        assert!(Lang::new("zh").is_supported());
        assert!(!Lang::new("xx").is_supported());
        assert!(!Lang::new("").is_supported());
        assert_eq!(SUPPORTED_LANGUAGES.len(), 9);
    }

    #[test]
    fn test_parse_supported() {
        assert_eq!(Lang::parse_supported(" en ").ok(), Some(Lang::new("en")));
        assert!(matches!(
            Lang::parse_supported("klingon"),
            Err(Error::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_language_pair_display() {
        let pair = LanguagePair::new("de", "en");
        assert_eq!(pair.to_string(), "de-en");
    }

    #[test]
    fn test_default_geometry_fits_55_lines() {
        let geometry = PageGeometry::default();
        assert!((geometry.top_cursor() - 720.0).abs() < f32::EPSILON);
        assert_eq!(geometry.lines_per_page(), 55);
    }

    #[test]
    fn test_geometry_validation() {
        let bad = PageGeometry {
            max_line_chars: 0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let bad = PageGeometry {
            margin_top: 500.0,
            margin_bottom: 500.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = AppConfig::from_toml(
            r#"
            source_lang = "de"
            blank_lines = "preserve"

            [translator]
            backend = "openai"

            [translator.openai]
            api_base = "http://localhost:11434/v1"
            model = "llama3"

            [export]
            max_line_chars = 60
            "#,
        )
        .unwrap_or_default();

        assert_eq!(config.source_lang, Some(Lang::new("de")));
        assert_eq!(config.target_lang, None);
        assert_eq!(config.blank_lines, BlankLines::Preserve);
        assert_eq!(config.translator.backend, Backend::OpenAi);
        assert_eq!(config.translator.openai.model, "llama3");
        assert_eq!(config.translator.openai.retry_count, 3);
        assert_eq!(config.export.max_line_chars, 60);
        assert!((config.export.line_pitch - 12.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_from_toml_rejects_bad_geometry() {
        let result = AppConfig::from_toml("[export]\nline_pitch = 0.0\n");
        assert!(matches!(result, Err(Error::ConfigInvalid { .. })));
    }

    #[test]
    fn test_from_toml_rejects_unsupported_language() {
        let result = AppConfig::from_toml("source_lang = \"xx\"\n");
        assert!(matches!(result, Err(Error::UnsupportedLanguage(code)) if code == "xx"));

        let result = AppConfig::from_toml("target_lang = \"klingon\"\n");
        assert!(matches!(result, Err(Error::UnsupportedLanguage(_))));
    }

    #[test]
    fn test_from_toml_trims_language() {
        let config = AppConfig::from_toml("target_lang = \" en \"\n").unwrap_or_default();
        assert_eq!(config.target_lang, Some(Lang::new("en")));
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.source_lang, None);
        assert_eq!(config.blank_lines, BlankLines::Drop);
        assert_eq!(config.translator.backend, Backend::Marian);
        assert_eq!(config.translator.marian.max_input_tokens, 512);
    }
}
