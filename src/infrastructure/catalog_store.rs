//! Catalog store - owns the live class catalog and swaps it on reload
//!
//! Readers clone the current `Arc` and drop the lock immediately, so a
//! reload never exposes a half-built catalog and never blocks generation
//! for longer than a pointer swap.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::value_objects::{CatalogError, ClassCatalog};

/// Where the active catalog came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Builtin,
}

/// Result of loading the catalog
#[derive(Debug, Clone)]
pub struct ReloadOutcome {
    pub source: CatalogSource,
    pub target_count: usize,
    /// Why a configured file was not used
    pub fallback_reason: Option<String>,
}

impl ReloadOutcome {
    pub fn message(&self) -> String {
        let origin = match &self.source {
            CatalogSource::File(path) => format!("from {}", path.display()),
            CatalogSource::Builtin => "built-in catalog".to_string(),
        };
        match &self.fallback_reason {
            Some(reason) => format!(
                "Catalog reloaded ({}, {} targets); catalog file ignored: {}",
                origin, self.target_count, reason
            ),
            None => format!("Catalog reloaded ({}, {} targets)", origin, self.target_count),
        }
    }
}

pub struct CatalogStore {
    path: Option<PathBuf>,
    current: RwLock<Arc<ClassCatalog>>,
}

impl CatalogStore {
    /// Load the catalog from `path`, or the built-in table when absent or unusable
    pub async fn load(path: Option<PathBuf>) -> Self {
        let (catalog, outcome) = read_catalog(path.as_deref()).await;
        tracing::info!(message = %outcome.message(), "Catalog loaded");

        Self {
            path,
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Store holding a fixed catalog and no backing file
    #[cfg(test)]
    pub fn with_catalog(catalog: ClassCatalog) -> Self {
        Self {
            path: None,
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Snapshot of the active catalog
    pub async fn current(&self) -> Arc<ClassCatalog> {
        self.current.read().await.clone()
    }

    /// Re-read the catalog file and swap it in
    ///
    /// Never fails: a missing or malformed file leaves the built-in table
    /// active and the reason is reported in the outcome.
    pub async fn reload(&self) -> ReloadOutcome {
        let (catalog, outcome) = read_catalog(self.path.as_deref()).await;
        *self.current.write().await = Arc::new(catalog);

        tracing::info!(message = %outcome.message(), "Catalog reloaded");
        outcome
    }
}

async fn read_catalog(path: Option<&Path>) -> (ClassCatalog, ReloadOutcome) {
    let Some(path) = path else {
        return builtin(None);
    };

    match read_catalog_file(path).await {
        Ok(catalog) => {
            let outcome = ReloadOutcome {
                source: CatalogSource::File(path.to_path_buf()),
                target_count: catalog.target_count(),
                fallback_reason: None,
            };
            (catalog, outcome)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Falling back to built-in catalog");
            builtin(Some(e.to_string()))
        }
    }
}

async fn read_catalog_file(path: &Path) -> Result<ClassCatalog, CatalogError> {
    let raw = tokio::fs::read_to_string(path).await?;
    ClassCatalog::from_json(&raw)
}

fn builtin(fallback_reason: Option<String>) -> (ClassCatalog, ReloadOutcome) {
    let catalog = ClassCatalog::builtin();
    let outcome = ReloadOutcome {
        source: CatalogSource::Builtin,
        target_count: catalog.target_count(),
        fallback_reason,
    };
    (catalog, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::domain::value_objects::PlayerClass;

    fn catalog_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_without_path_uses_builtin() {
        let store = CatalogStore::load(None).await;
        assert_eq!(*store.current().await, ClassCatalog::builtin());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let file = catalog_file(r#"{"cook": ["minecraft:bread", "cake"]}"#);

        let store = CatalogStore::load(Some(file.path().to_path_buf())).await;
        let catalog = store.current().await;

        assert_eq!(catalog.targets(PlayerClass::Cook), ["bread", "cake"]);
        assert_eq!(
            catalog.targets(PlayerClass::Miner),
            ClassCatalog::builtin().targets(PlayerClass::Miner)
        );
    }

    #[tokio::test]
    async fn test_reload_picks_up_changes() {
        let file = catalog_file(r#"{"cook": ["bread"]}"#);
        let store = CatalogStore::load(Some(file.path().to_path_buf())).await;
        let before = store.current().await;

        std::fs::write(file.path(), r#"{"cook": ["cookie", "cake"]}"#).unwrap();
        let outcome = store.reload().await;

        assert_eq!(outcome.source, CatalogSource::File(file.path().to_path_buf()));
        assert!(outcome.fallback_reason.is_none());
        assert_eq!(store.current().await.targets(PlayerClass::Cook), ["cookie", "cake"]);
        // Earlier snapshots are unaffected by the swap
        assert_eq!(before.targets(PlayerClass::Cook), ["bread"]);
    }

    #[tokio::test]
    async fn test_malformed_file_falls_back_to_builtin() {
        let file = catalog_file("{ not json");
        let store = CatalogStore::load(Some(file.path().to_path_buf())).await;

        let outcome = store.reload().await;

        assert_eq!(outcome.source, CatalogSource::Builtin);
        assert!(outcome.fallback_reason.is_some());
        assert!(outcome.message().contains("catalog file ignored"));
        assert_eq!(*store.current().await, ClassCatalog::builtin());
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::load(Some(dir.path().join("absent.json"))).await;

        let outcome = store.reload().await;

        assert_eq!(outcome.source, CatalogSource::Builtin);
        assert_eq!(outcome.target_count, ClassCatalog::builtin().target_count());
    }
}
