//! Local neural translation with Helsinki-NLP opus-mt models.
//!
//! Models are CTranslate2 conversions stored as
//! `{models_dir}/opus-mt-{source}-{target}`, e.g. produced with
//! `ct2-transformers-converter --model Helsinki-NLP/opus-mt-de-en --output_dir opus-mt-de-en`.
//! A model is loaded the first time its pair is requested and then kept in
//! a bounded cache, so repeated translations reuse it.

use async_trait::async_trait;
use moka::sync::Cache;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::traits::{Translator, TranslatorInfo};
use crate::config::{Lang, LanguagePair, MarianConfig};
use crate::error::{Error, Result};

/// Decoding settings passed to a loaded model.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Input longer than this many tokens is truncated
    pub max_input_tokens: usize,
    pub beam_size: usize,
}

impl From<&MarianConfig> for DecodeOptions {
    fn from(config: &MarianConfig) -> Self {
        Self {
            max_input_tokens: config.max_input_tokens,
            beam_size: config.beam_size,
        }
    }
}

/// A model ready to translate one language pair.
pub trait LoadedModel: Send + Sync {
    fn translate(&self, text: &str, options: &DecodeOptions) -> anyhow::Result<String>;
}

/// Turns a model directory into a [`LoadedModel`].
pub trait ModelLoader: Send + Sync {
    fn load(&self, dir: &Path) -> anyhow::Result<Arc<dyn LoadedModel>>;
}

/// Loads CTranslate2 models with `ct2rs`, tokenizer detected from the model directory.
pub struct Ct2Loader;

impl ModelLoader for Ct2Loader {
    fn load(&self, dir: &Path) -> anyhow::Result<Arc<dyn LoadedModel>> {
        let translator = ct2rs::Translator::new(dir, &ct2rs::Config::default())?;
        Ok(Arc::new(Ct2Model(translator)))
    }
}

struct Ct2Model<T: ct2rs::Tokenizer>(ct2rs::Translator<T>);

impl<T> LoadedModel for Ct2Model<T>
where
    T: ct2rs::Tokenizer + Send + Sync,
{
    fn translate(&self, text: &str, options: &DecodeOptions) -> anyhow::Result<String> {
        let opts = ct2rs::TranslationOptions {
            beam_size: options.beam_size,
            max_input_length: options.max_input_tokens,
            ..Default::default()
        };

        let results = self.0.translate_batch(&[text], &opts, None)?;
        results
            .into_iter()
            .next()
            .map(|(translated, _score)| translated)
            .ok_or_else(|| anyhow::anyhow!("model returned no hypothesis"))
    }
}

/// Loaded models keyed by language pair.
pub struct ModelRegistry {
    models_dir: PathBuf,
    loader: Arc<dyn ModelLoader>,
    loaded: Cache<LanguagePair, Arc<dyn LoadedModel>>,
}

impl ModelRegistry {
    pub fn new(
        models_dir: impl Into<PathBuf>,
        max_loaded_models: u64,
        loader: Arc<dyn ModelLoader>,
    ) -> Self {
        Self {
            models_dir: models_dir.into(),
            loader,
            loaded: Cache::new(max_loaded_models.max(1)),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Directory the model for `pair` is expected in.
    pub fn model_dir(&self, pair: &LanguagePair) -> PathBuf {
        self.models_dir.join(format!("opus-mt-{pair}"))
    }

    /// Get the model for `pair`, loading it on first use.
    ///
    /// Concurrent first requests for the same pair load it once.
    pub fn get(&self, pair: &LanguagePair) -> Result<Arc<dyn LoadedModel>> {
        if let Some(model) = self.loaded.get(pair) {
            return Ok(model);
        }

        let dir = self.model_dir(pair);
        if !dir.is_dir() {
            return Err(Error::ModelNotFound {
                pair: pair.to_string(),
                path: dir,
            });
        }

        self.loaded
            .try_get_with(pair.clone(), || {
                info!("Loading translation model {} from {}", pair, dir.display());
                self.loader.load(&dir)
            })
            .map_err(|e| Error::ModelLoad(format!("{pair}: {e}")))
    }

    /// Number of models currently held.
    pub fn loaded_count(&self) -> u64 {
        self.loaded.run_pending_tasks();
        self.loaded.entry_count()
    }
}

/// Translator backed by local opus-mt models.
pub struct MarianTranslator {
    registry: Arc<ModelRegistry>,
    options: DecodeOptions,
}

impl MarianTranslator {
    /// Create a translator that loads models with CTranslate2.
    pub fn new(config: &MarianConfig) -> Self {
        Self::with_loader(config, Arc::new(Ct2Loader))
    }

    /// Create a translator with a custom model loader.
    pub fn with_loader(config: &MarianConfig, loader: Arc<dyn ModelLoader>) -> Self {
        let registry = ModelRegistry::new(
            config.resolved_models_dir(),
            config.max_loaded_models,
            loader,
        );

        Self {
            registry: Arc::new(registry),
            options: DecodeOptions::from(config),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }
}

#[async_trait]
impl Translator for MarianTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo {
            name: "Marian (opus-mt)",
            local: true,
        }
    }

    async fn translate(&self, text: &str, source: &Lang, target: &Lang) -> Result<String> {
        // Skip empty text
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let registry = Arc::clone(&self.registry);
        let pair = LanguagePair::new(source.clone(), target.clone());
        let text = text.to_owned();
        let options = self.options;

        // Model loading and inference are CPU-bound and block
        tokio::task::spawn_blocking(move || {
            let model = registry.get(&pair)?;
            debug!("Running {} on {} chars", pair, text.chars().count());
            model
                .translate(&text, &options)
                .map_err(|e| Error::ModelLoad(format!("{pair}: {e}")))
        })
        .await
        .map_err(|e| Error::ModelLoad(format!("inference task failed: {e}")))?
    }

    fn is_available(&self) -> bool {
        self.registry.models_dir().is_dir()
    }
}
