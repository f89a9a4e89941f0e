//! In-memory object store for tests and embedding.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::model::{ObjectKey, ObjectKind};

use super::{ObjectRecord, ObjectStore, StoreError};

/// A store keeping every object in a process-local map.
///
/// Listing order is the key order of the map, so results are stable
/// across runs. The lock is held only for the duration of each call.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<ObjectKey, serde_json::Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, key: &ObjectKey) -> Result<Option<ObjectRecord>, StoreError> {
        let objects = self.objects.read().map_err(lock_poisoned)?;
        Ok(objects.get(key).map(|data| ObjectRecord {
            key: key.clone(),
            data: data.clone(),
        }))
    }

    async fn list(
        &self,
        kind: ObjectKind,
        namespace: &str,
    ) -> Result<Vec<ObjectRecord>, StoreError> {
        let objects = self.objects.read().map_err(lock_poisoned)?;
        Ok(objects
            .iter()
            .filter(|(key, _)| key.kind == kind && key.namespace == namespace)
            .map(|(key, data)| ObjectRecord {
                key: key.clone(),
                data: data.clone(),
            })
            .collect())
    }

    async fn create(&self, record: ObjectRecord) -> Result<(), StoreError> {
        let mut objects = self.objects.write().map_err(lock_poisoned)?;
        if objects.contains_key(&record.key) {
            return Err(StoreError::AlreadyExists(record.key));
        }
        objects.insert(record.key, record.data);
        Ok(())
    }
}

fn lock_poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Corrupt {
        path: "<memory>".to_string(),
        message: "store lock poisoned".to_string(),
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
    async fn test_create_then_get() {
        let store = MemoryStore::new();
        store
            .create(record(ObjectKind::Builder, "edge", "osbuild"))
            .await
            .expect("create");

        let key = ObjectKey::new(ObjectKind::Builder, "edge", "osbuild");
        let fetched = store.get(&key).await.expect("get").expect("present");
        assert_eq!(fetched.data["marker"], "osbuild");
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        let key = ObjectKey::new(ObjectKind::Builder, "edge", "missing");
        assert!(store.get(&key).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_create_fails() {
        let store = MemoryStore::new();
        store
            .create(record(ObjectKind::Pipeline, "edge", "p1"))
            .await
            .expect("first create");
        let err = store
            .create(record(ObjectKind::Pipeline, "edge", "p1"))
            .await
            .expect_err("second create");
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_list_filters_kind_and_namespace() {
        let store = MemoryStore::new();
        store
            .create(record(ObjectKind::Builder, "edge", "b"))
            .await
            .expect("create");
        store
            .create(record(ObjectKind::Builder, "other", "a"))
            .await
            .expect("create");
        store
            .create(record(ObjectKind::Task, "edge", "c"))
            .await
            .expect("create");
        store
            .create(record(ObjectKind::Builder, "edge", "a"))
            .await
            .expect("create");

        let builders = store.list(ObjectKind::Builder, "edge").await.expect("list");
        let names: Vec<&str> = builders.iter().map(|r| r.key.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
