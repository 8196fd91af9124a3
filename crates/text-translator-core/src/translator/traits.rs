use async_trait::async_trait;

use crate::config::Lang;
use crate::error::Result;

/// Static facts about a backend, shown in logs and the window title.
#[derive(Debug, Clone)]
pub struct TranslatorInfo {
    pub name: &'static str,
    /// Runs on this machine rather than behind an HTTP API
    pub local: bool,
}

/// Turns one paragraph in `source` into `target`.
///
/// Implementations are shared across tasks, so they must be `Send + Sync`.
#[async_trait]
pub trait Translator: Send + Sync {
    fn info(&self) -> TranslatorInfo;

    fn name(&self) -> &'static str {
        self.info().name
    }

    async fn translate(&self, text: &str, source: &Lang, target: &Lang) -> Result<String>;

    /// Whether the backend looks usable right now (models present, etc.).
    fn is_available(&self) -> bool {
        true
    }
}
