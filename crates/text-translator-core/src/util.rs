//! Utility functions shared across the crate.

use std::path::PathBuf;

/// Get the user's config directory following XDG conventions.
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise `$HOME/.config`.
pub fn config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
}

/// Get the user's data directory following XDG conventions.
///
/// Returns `$XDG_DATA_HOME` if set, otherwise `$HOME/.local/share`.
pub fn data_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
        })
}

/// Get the default directory for converted opus-mt models.
pub fn default_models_dir() -> PathBuf {
    data_dir()
        .unwrap_or_else(|| PathBuf::from(".local/share"))
        .join("text-translator")
        .join("models")
}

/// Whether `path` has the given extension, ignoring ASCII case.
pub fn has_extension(path: &std::path::Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("notes.txt"), "txt"));
        assert!(has_extension(Path::new("Scan.PDF"), "pdf"));
        assert!(!has_extension(Path::new("archive.tar.gz"), "tar"));
        assert!(!has_extension(Path::new("README"), "txt"));
    }

    #[test]
    fn test_default_models_dir_ends_with_app_name() {
        let dir = default_models_dir();
        assert!(dir.ends_with("text-translator/models"));
    }
}
