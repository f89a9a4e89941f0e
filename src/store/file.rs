//! File-backed object store.
//!
//! One YAML document per object, laid out as
//! `<root>/<kind>/<namespace>/<name>.yaml`. This is the store the CLI
//! `reconcile` command runs against: requests and builders are seeded by
//! writing files, generated objects appear as new files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::model::{ObjectKey, ObjectKind};

use super::{ObjectRecord, ObjectStore, StoreError};

/// Store rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`. The directory itself is created
    /// lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &ObjectKey) -> PathBuf {
        self.root
            .join(key.kind.as_str())
            .join(&key.namespace)
            .join(format!("{}.yaml", key.name))
    }

    fn parse_document(path: &Path, text: &str) -> Result<serde_json::Value, StoreError> {
        serde_yaml::from_str(text).map_err(|err| StoreError::Corrupt {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl ObjectStore for FileStore {
    async fn get(&self, key: &ObjectKey) -> Result<Option<ObjectRecord>, StoreError> {
        let path = self.object_path(key);
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let data = Self::parse_document(&path, &text)?;
        Ok(Some(ObjectRecord {
            key: key.clone(),
            data,
        }))
    }

    async fn list(
        &self,
        kind: ObjectKind,
        namespace: &str,
    ) -> Result<Vec<ObjectRecord>, StoreError> {
        let dir = self.root.join(kind.as_str()).join(namespace);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("yaml") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();

        let mut records = Vec::with_capacity(names.len());
        for name in names {
            let key = ObjectKey::new(kind, namespace, name);
            if let Some(record) = self.get(&key).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn create(&self, record: ObjectRecord) -> Result<(), StoreError> {
        let path = self.object_path(&record.key);
        if fs::try_exists(&path).await? {
            return Err(StoreError::AlreadyExists(record.key));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let text = serde_yaml::to_string(&record.data).map_err(|err| StoreError::Corrupt {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        fs::write(&path, text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectMeta;

    fn record(kind: ObjectKind, namespace: &str, name: &str) -> ObjectRecord {
        ObjectRecord::new(
            kind,
            &ObjectMeta::new(namespace, name),
            &serde_json::json!({"marker": name}),
        )
        .expect("record")
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        store
            .create(record(ObjectKind::ImageRequest, "edge", "edge1"))
            .await
            .expect("create");

        let key = ObjectKey::new(ObjectKind::ImageRequest, "edge", "edge1");
        let fetched = store.get(&key).await.expect("get").expect("present");
        assert_eq!(fetched.data["marker"], "edge1");
    }

    #[tokio::test]
    async fn test_duplicate_create_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        store
            .create(record(ObjectKind::Task, "edge", "generate-commit"))
            .await
            .expect("first create");
        let err = store
            .create(record(ObjectKind::Task, "edge", "generate-commit"))
            .await
            .expect_err("second create");
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_scoped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        store
            .create(record(ObjectKind::Builder, "edge", "zeta"))
            .await
            .expect("create");
        store
            .create(record(ObjectKind::Builder, "edge", "alpha"))
            .await
            .expect("create");
        store
            .create(record(ObjectKind::Builder, "other", "beta"))
            .await
            .expect("create");

        let builders = store.list(ObjectKind::Builder, "edge").await.expect("list");
        let names: Vec<&str> = builders.iter().map(|r| r.key.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        let path = dir.path().join("builders").join("edge");
        std::fs::create_dir_all(&path).expect("mkdir");
        std::fs::write(path.join("bad.yaml"), "{unbalanced").expect("write");

        let key = ObjectKey::new(ObjectKind::Builder, "edge", "bad");
        let err = store.get(&key).await.expect_err("corrupt");
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
