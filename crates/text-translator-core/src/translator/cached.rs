use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::traits::{Translator, TranslatorInfo};
use crate::cache::{CacheKey, TranslationCache};
use crate::config::Lang;
use crate::error::Result;

/// Wraps a translator so repeated paragraphs are answered from memory.
pub struct CachedTranslator {
    inner: Arc<dyn Translator>,
    cache: TranslationCache,
}

impl CachedTranslator {
    pub const fn new(inner: Arc<dyn Translator>, cache: TranslationCache) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl Translator for CachedTranslator {
    fn info(&self) -> TranslatorInfo {
        self.inner.info()
    }

    async fn translate(&self, text: &str, source: &Lang, target: &Lang) -> Result<String> {
        let key = CacheKey::new(text, self.inner.name(), source, target);

        if let Some(cached) = self.cache.get(&key).await {
            debug!("Cache hit for paragraph {}", key);
            return Ok(cached);
        }

        let translated = self.inner.translate(text, source, target).await?;
        self.cache.insert(&key, translated.clone()).await;
        Ok(translated)
    }

    fn is_available(&self) -> bool {
        self.inner.is_available()
    }
}
