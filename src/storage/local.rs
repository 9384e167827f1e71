//! Durable local storage for saved articles and display settings.
//!
//! A single JSON document, `{"savedArticles": [...], "settings": {...}}`,
//! written in full after every mutation. Reads never fail: an absent,
//! oversized, or corrupt file yields empty defaults.

use super::saved::SavedSet;
use super::types::{Article, Settings, StorageError};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Upper bound on the storage file size accepted at load time (10 MB).
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// On-disk document shape.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Document {
    saved_articles: Vec<Article>,
    settings: Settings,
}

/// Handle to the storage file plus its loaded contents.
pub struct LocalStorage {
    path: PathBuf,
    saved: SavedSet,
    settings: Settings,
}

impl LocalStorage {
    /// Load from `path`, falling back to empty defaults on any read problem.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let document = read_document(&path).unwrap_or_default();
        tracing::debug!(
            path = %path.display(),
            saved = document.saved_articles.len(),
            "Loaded local storage"
        );
        Self {
            path,
            saved: SavedSet::from_articles(document.saved_articles),
            settings: document.settings,
        }
    }

    pub fn saved(&self) -> &SavedSet {
        &self.saved
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Toggle an article in the saved set and persist.
    ///
    /// The in-memory set keeps the new state even if the write fails; the
    /// error is returned so the caller can tell the user.
    pub fn toggle_save(&mut self, article: &Article) -> Result<bool, StorageError> {
        let saved = self.saved.toggle(article);
        tracing::debug!(url = %article.url, saved, "Toggled saved article");
        self.persist()?;
        Ok(saved)
    }

    /// Replace the settings and persist.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), StorageError> {
        self.settings = settings;
        self.persist()
    }

    fn persist(&self) -> Result<(), StorageError> {
        let document = Document {
            saved_articles: self.saved.as_slice().to_vec(),
            settings: self.settings,
        };
        let bytes = serde_json::to_vec_pretty(&document)?;
        atomic_write(&self.path, &bytes)?;
        Ok(())
    }
}

fn read_document(path: &Path) -> Option<Document> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_FILE_SIZE => {
            tracing::warn!(
                path = %path.display(),
                size = meta.len(),
                "Storage file too large, starting empty"
            );
            return None;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No storage file found, using defaults");
            return None;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to stat storage file");
            return None;
        }
        Ok(_) => {}
    }

    let content = match std::fs::read(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read storage file");
            return None;
        }
    };

    match serde_json::from_slice::<Document>(&content) {
        Ok(document) => Some(document),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Corrupt storage file, using defaults");
            None
        }
    }
}

/// Write-to-temp-then-rename so the storage file is never left half written.
fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    use std::time::{SystemTime, UNIX_EPOCH};
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{:016x}", random_suffix));

    let result = (|| {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        #[cfg(windows)]
        if path.exists() {
            std::fs::remove_file(path)?;
        }

        std::fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result
}
