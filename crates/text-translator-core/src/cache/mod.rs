mod memory;
mod key;

pub use memory::MemoryCache;
pub use key::CacheKey;

use crate::config::CacheConfig;

/// Paragraph translations kept for the lifetime of the process.
///
/// Nothing is written to disk.
pub struct TranslationCache {
    memory: Option<MemoryCache>,
}

impl TranslationCache {
    /// Create a new translation cache from configuration
    pub fn new(config: &CacheConfig) -> Self {
        let memory = config
            .memory_enabled
            .then(|| MemoryCache::new(config.memory_max_entries, config.memory_ttl_seconds));

        Self { memory }
    }

    pub const fn is_enabled(&self) -> bool {
        self.memory.is_some()
    }

    /// Get a cached translation
    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        match self.memory {
            Some(ref memory) => memory.get(key.as_str()).await,
            None => None,
        }
    }

    /// Store a translation in cache
    pub async fn insert(&self, key: &CacheKey, value: String) {
        if let Some(ref memory) = self.memory {
            memory.insert(key.to_string(), value).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Lang;

    fn key(text: &str) -> CacheKey {
        CacheKey::new(text, "mock", &Lang::new("de"), &Lang::new("en"))
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = TranslationCache::new(&CacheConfig::default());
        cache.insert(&key("Hallo"), "Hello".to_string()).await;

        assert_eq!(cache.get(&key("Hallo")).await.as_deref(), Some("Hello"));
        assert_eq!(cache.get(&key("Welt")).await, None);
    }

    #[tokio::test]
    async fn test_disabled_cache_stores_nothing() {
        let cache = TranslationCache::new(&CacheConfig {
            memory_enabled: false,
            ..Default::default()
        });
        assert!(!cache.is_enabled());

        cache.insert(&key("Hallo"), "Hello".to_string()).await;
        assert_eq!(cache.get(&key("Hallo")).await, None);
    }
}
