//! # File Store
//!
//! One pretty-printed JSON document per project under a data directory,
//! named `<id>.json`. Writes go to a temporary file first and are renamed
//! into place, so a crash never leaves a half-written record.

use async_trait::async_trait;
use chrono::Utc;
use pagekit_editor::{
    project_id, sort_newest_first, NewProject, ProjectRecord, ProjectStore, ProjectSummary,
    ProjectUpdate, StoreError,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    counter: AtomicU64,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens (and creates if needed) a store rooted at `dir`.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            counter: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a project's document. Ids that could escape the directory
    /// resolve to nothing.
    fn path(&self, id: &str) -> Option<PathBuf> {
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        safe.then(|| self.dir.join(format!("{}.json", id)))
    }

    async fn read(&self, id: &str) -> Result<ProjectRecord, StoreError> {
        let path = self.path(id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write(&self, record: &ProjectRecord) -> Result<(), StoreError> {
        let path = self
            .path(&record.id)
            .ok_or_else(|| StoreError::NotFound(record.id.clone()))?;
        let tmp = path.with_extension("json.tmp");

        let json = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for FileStore {
    async fn get(&self, id: &str) -> Result<ProjectRecord, StoreError> {
        self.read(id).await
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<ProjectSummary>, StoreError> {
        let mut summaries = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let bytes = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<ProjectRecord>(&bytes) {
                Ok(record) if record.is_owned_by(owner_id) => summaries.push(record.summary()),
                Ok(_) => {}
                Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable project"),
            }
        }

        sort_newest_first(&mut summaries);
        Ok(summaries)
    }

    async fn create(&self, project: NewProject) -> Result<ProjectRecord, StoreError> {
        let _guard = self.write_lock.lock().await;
        let now = Utc::now();

        let id = loop {
            let counter = self.counter.fetch_add(1, Ordering::Relaxed);
            let candidate = project_id(&project.owner_id, &project.name, counter, now);
            let taken = match self.path(&candidate) {
                Some(path) => tokio::fs::try_exists(&path).await?,
                None => true,
            };
            if !taken {
                break candidate;
            }
        };

        let record = ProjectRecord::seeded(id, project, now);
        self.write(&record).await?;
        debug!(id = %record.id, "project file created");
        Ok(record)
    }

    async fn update(&self, id: &str, update: ProjectUpdate) -> Result<ProjectRecord, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.read(id).await?;
        update.apply_to(&mut record, Utc::now());
        self.write(&record).await?;
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.path(id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id.to_string())),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagekit_model::{starter_template, ThemeTokens};

    fn new_project(owner: &str, name: &str) -> NewProject {
        NewProject {
            owner_id: owner.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let created = {
            let store = FileStore::open(dir.path()).await.unwrap();
            store.create(new_project("u1", "Launch")).await.unwrap()
        };

        let store = FileStore::open(dir.path()).await.unwrap();
        let loaded = store.get(&created.id).await.unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.tree_json, starter_template());
        assert_eq!(loaded.theme_json, ThemeTokens::default());
    }

    #[tokio::test]
    async fn test_update_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        let first = store.create(new_project("u1", "First")).await.unwrap();
        let second = store.create(new_project("u1", "Second")).await.unwrap();
        store.create(new_project("u2", "Other")).await.unwrap();

        let update = ProjectUpdate {
            name: Some("Renamed".to_string()),
            ..ProjectUpdate::default()
        };
        store.update(&first.id, update).await.unwrap();

        let listed = store.list("u1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[0].name, "Renamed");
        assert_eq!(listed[1].id, second.id);
    }

    #[tokio::test]
    async fn test_delete_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let record = store.create(new_project("u1", "Gone")).await.unwrap();

        store.delete(&record.id).await.unwrap();
        assert!(matches!(store.get(&record.id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete(&record.id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data")).await.unwrap();
        std::fs::write(dir.path().join("secret.json"), "{}").unwrap();

        assert!(matches!(store.get("../secret").await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete("").await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_skipped_in_listing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        store.create(new_project("u1", "Fine")).await.unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        assert_eq!(store.list("u1").await.unwrap().len(), 1);
        assert!(matches!(store.get("broken").await, Err(StoreError::Serialization(_))));
    }
}
