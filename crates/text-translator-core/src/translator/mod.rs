mod cached;
mod marian;
mod openai;
mod traits;

pub use cached::CachedTranslator;
pub use marian::{
    Ct2Loader, DecodeOptions, LoadedModel, MarianTranslator, ModelLoader, ModelRegistry,
};
pub use openai::OpenAiTranslator;
pub use traits::{Translator, TranslatorInfo};

use crate::cache::TranslationCache;
use crate::config::{Backend, CacheConfig, TranslatorConfig};
use crate::error::Result;
use std::sync::Arc;
use tracing::info;

/// Create a translator from configuration
///
/// The backend is wrapped in a paragraph cache unless caching is disabled.
pub fn create_translator(
    config: &TranslatorConfig,
    cache: &CacheConfig,
) -> Result<Arc<dyn Translator>> {
    let backend: Arc<dyn Translator> = match config.backend {
        Backend::Marian => {
            let translator = MarianTranslator::new(&config.marian);
            info!(
                "Using local opus-mt models from {}",
                translator.registry().models_dir().display()
            );
            Arc::new(translator)
        }
        Backend::OpenAi => {
            info!("Using OpenAI-compatible API at {}", config.openai.api_base);
            Arc::new(OpenAiTranslator::new(&config.openai)?)
        }
    };

    if !backend.is_available() {
        let info = backend.info();
        if info.local {
            tracing::warn!("{} backend has no models installed yet", info.name);
        } else {
            tracing::warn!("{} backend is not reachable yet", info.name);
        }
    }

    let cache = TranslationCache::new(cache);
    if cache.is_enabled() {
        Ok(Arc::new(CachedTranslator::new(backend, cache)))
    } else {
        Ok(backend)
    }
}
