//! Object store access.
//!
//! The forge never owns its objects' persistence; it talks to an external
//! declarative store through the `ObjectStore` trait. The trait is an
//! injected capability so the reconciler can run against an in-memory
//! fake in tests and a file-backed store from the CLI.
//!
//! Creates are write-once: creating a key that already exists fails with
//! `StoreError::AlreadyExists`. The forge deliberately does not update or
//! delete objects.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::model::{ObjectKey, ObjectKind, ObjectMeta};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An object with this key already exists.
    #[error("object already exists: {0}")]
    AlreadyExists(ObjectKey),

    /// An object payload could not be encoded.
    #[error("failed to encode object payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// IO error from the backing storage.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be parsed.
    #[error("malformed stored document at {path}: {message}")]
    Corrupt { path: String, message: String },
}

/// One stored object: its address plus a JSON payload.
///
/// Payloads stay untyped at the store boundary; callers decode them into
/// the typed shapes from `model` when they need to look inside.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    /// Full store address of the object.
    pub key: ObjectKey,
    /// The object payload.
    pub data: serde_json::Value,
}

impl ObjectRecord {
    /// Creates a record from a typed payload.
    pub fn new<T: Serialize>(
        kind: ObjectKind,
        meta: &ObjectMeta,
        payload: &T,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            key: ObjectKey::for_meta(kind, meta),
            data: serde_json::to_value(payload)?,
        })
    }

    /// Decodes the payload into a typed shape.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }
}

/// Access to the external declarative object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetches one object; `None` when it does not exist.
    async fn get(&self, key: &ObjectKey) -> Result<Option<ObjectRecord>, StoreError>;

    /// Lists all objects of a kind within a namespace, ordered by name.
    async fn list(&self, kind: ObjectKind, namespace: &str)
        -> Result<Vec<ObjectRecord>, StoreError>;

    /// Creates an object; fails if the key is already taken.
    async fn create(&self, record: ObjectRecord) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Endpoint;

    #[test]
    fn test_record_round_trip() {
        let meta = ObjectMeta::new("edge", "osbuild");
        let record = ObjectRecord::new(ObjectKind::Endpoint, &meta, &Endpoint::new("svc", 8080))
            .expect("record");
        assert_eq!(record.key.kind, ObjectKind::Endpoint);
        assert_eq!(record.key.name, "osbuild");
        let endpoint: Endpoint = record.decode().expect("decode");
        assert_eq!(endpoint, Endpoint::new("svc", 8080));
    }
}
