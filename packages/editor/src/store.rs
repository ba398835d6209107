//! # Project Storage
//!
//! The persistence collaborator. A project is one opaque record holding
//! its tree and theme documents plus ownership metadata; backends only
//! need get/list/create/update/delete over whole records.
//!
//! Ownership checks belong to the caller. The store answers every request
//! it is given.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagekit_model::{get_seed, starter_template, ThemeTokens, Tree};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Io(_) | StoreError::Unavailable(_))
    }
}

/// A stored project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub tree_json: Tree,
    #[serde(default)]
    pub theme_json: ThemeTokens,
    #[serde(default)]
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectRecord {
    /// A fresh record seeded with the starter tree and default theme.
    pub fn seeded(id: String, project: NewProject, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id: project.owner_id,
            name: project.name,
            tree_json: starter_template(),
            theme_json: ThemeTokens::default(),
            published: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            published: self.published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

/// Listing entry: metadata without the documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub owner_id: String,
    pub name: String,
}

/// Partial record update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_json: Option<Tree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_json: Option<ThemeTokens>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl ProjectUpdate {
    pub fn apply_to(self, record: &mut ProjectRecord, now: DateTime<Utc>) {
        if let Some(tree) = self.tree_json {
            record.tree_json = tree;
        }
        if let Some(theme) = self.theme_json {
            record.theme_json = theme;
        }
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(published) = self.published {
            record.published = published;
        }
        record.updated_at = now;
    }
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<ProjectRecord, StoreError>;

    /// Projects owned by `owner_id`, most recently updated first.
    async fn list(&self, owner_id: &str) -> Result<Vec<ProjectSummary>, StoreError>;

    async fn create(&self, project: NewProject) -> Result<ProjectRecord, StoreError>;

    async fn update(&self, id: &str, update: ProjectUpdate) -> Result<ProjectRecord, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Short project id derived from the owner, name and a per-store counter.
pub fn project_id(owner_id: &str, name: &str, counter: u64, now: DateTime<Utc>) -> String {
    let source = format!(
        "{}:{}:{}:{}",
        owner_id,
        name,
        counter,
        now.timestamp_nanos_opt().unwrap_or_default()
    );
    format!("p{}", get_seed(&source))
}

/// Listing order shared by every backend.
pub fn sort_newest_first(summaries: &mut [ProjectSummary]) {
    summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
}

/// In-process store. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: RwLock<HashMap<String, ProjectRecord>>,
    counter: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.projects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.projects.read().await.is_empty()
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<ProjectRecord, StoreError> {
        self.projects
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<ProjectSummary>, StoreError> {
        let projects = self.projects.read().await;
        let mut summaries: Vec<ProjectSummary> = projects
            .values()
            .filter(|record| record.is_owned_by(owner_id))
            .map(ProjectRecord::summary)
            .collect();
        sort_newest_first(&mut summaries);
        Ok(summaries)
    }

    async fn create(&self, project: NewProject) -> Result<ProjectRecord, StoreError> {
        let now = Utc::now();
        let mut projects = self.projects.write().await;

        let id = loop {
            let counter = self.counter.fetch_add(1, Ordering::Relaxed);
            let candidate = project_id(&project.owner_id, &project.name, counter, now);
            if !projects.contains_key(&candidate) {
                break candidate;
            }
        };

        let record = ProjectRecord::seeded(id.clone(), project, now);
        projects.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, update: ProjectUpdate) -> Result<ProjectRecord, StoreError> {
        let mut projects = self.projects.write().await;
        let record = projects
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        update.apply_to(record, Utc::now());
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.projects
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_project(owner: &str, name: &str) -> NewProject {
        NewProject {
            owner_id: owner.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_seeds_starter() {
        let store = MemoryStore::new();
        let record = store.create(new_project("u1", "Launch")).await.unwrap();

        assert_eq!(record.tree_json, starter_template());
        assert_eq!(record.theme_json, ThemeTokens::default());
        assert!(!record.published);
        assert_eq!(store.get(&record.id).await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = MemoryStore::new();
        let a = store.create(new_project("u1", "Same")).await.unwrap();
        let b = store.create(new_project("u1", "Same")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_list_filters_by_owner() {
        let store = MemoryStore::new();
        store.create(new_project("u1", "Mine")).await.unwrap();
        store.create(new_project("u2", "Theirs")).await.unwrap();

        let mine = store.list("u1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "Mine");
    }

    #[tokio::test]
    async fn test_partial_update() {
        let store = MemoryStore::new();
        let record = store.create(new_project("u1", "Draft")).await.unwrap();

        let update = ProjectUpdate {
            published: Some(true),
            ..ProjectUpdate::default()
        };
        let updated = store.update(&record.id, update).await.unwrap();

        assert!(updated.published);
        assert_eq!(updated.name, "Draft");
        assert_eq!(updated.tree_json, record.tree_json);
        assert!(updated.updated_at >= record.updated_at);
    }

    #[tokio::test]
    async fn test_missing_project() {
        let store = MemoryStore::new();
        assert!(matches!(store.get("nope").await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete("nope").await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update("nope", ProjectUpdate::default()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_record_wire_names() {
        let record = ProjectRecord::seeded("p1".to_string(), new_project("u1", "N"), Utc::now());
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["treeJson"]["type"], "Page");
        assert_eq!(value["themeJson"]["borderRadius"], "0.75rem");
        assert_eq!(value["ownerId"], "u1");
        assert!(value.get("createdAt").is_some());
    }
}
