use md5::Context;

use crate::config::Lang;

/// Identifies one paragraph translation: the text, the backend that
/// produced it and the language pair, hashed to 32 hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    digest: String,
}

impl CacheKey {
    pub fn new(text: &str, translator: &str, source: &Lang, target: &Lang) -> Self {
        let backend = translator.to_ascii_lowercase();
        let mut context = Context::new();

        // NUL after every field keeps ("a", "bc") and ("ab", "c") apart
        for field in [text, backend.as_str(), source.as_str(), target.as_str()] {
            context.consume(field.as_bytes());
            context.consume([0u8]);
        }

        Self {
            digest: format!("{:x}", context.compute()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.digest
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.digest)
    }
}
