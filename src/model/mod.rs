//! Domain objects handled by the forge.
//!
//! This module defines the entities the reconciler reads from and writes
//! to the external object store:
//!
//! - `ImageRequest`: the user-facing build request
//! - `Endpoint`: the network endpoint a builder is reachable at
//! - `ConfigArtifact`: a persisted key/value artifact holding rendered text
//!
//! Builders themselves carry no payload the forge reads; they are
//! addressed purely by identity, so the resolver works with their store
//! keys directly.
//!
//! Every stored object is addressed by an `ObjectKey` (kind + namespace +
//! name); `ObjectMeta` is the identity carried on the objects themselves.

pub mod builder;
pub mod request;

pub use builder::Endpoint;
pub use request::{ImageRequest, ImageSpec};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kinds of objects the forge reads or creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectKind {
    /// A user-created image build request.
    ImageRequest,
    /// A registered image-composition backend.
    Builder,
    /// The network endpoint of a builder.
    Endpoint,
    /// A generated key/value artifact (rendered blueprint text).
    ConfigArtifact,
    /// A generated build task definition.
    Task,
    /// A generated pipeline definition.
    Pipeline,
    /// A launched execution of a pipeline.
    PipelineRun,
}

impl ObjectKind {
    /// Stable lowercase identifier, also used as the file-store directory.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::ImageRequest => "image-requests",
            ObjectKind::Builder => "builders",
            ObjectKind::Endpoint => "endpoints",
            ObjectKind::ConfigArtifact => "config-artifacts",
            ObjectKind::Task => "tasks",
            ObjectKind::Pipeline => "pipelines",
            ObjectKind::PipelineRun => "pipeline-runs",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of an object within the store: namespace plus name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Namespace the object lives in.
    pub namespace: String,
    /// Name of the object, unique within its namespace and kind.
    pub name: String,
}

impl ObjectMeta {
    /// Creates a new object identity.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Full store address of an object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    /// The object kind.
    pub kind: ObjectKind,
    /// Namespace the object lives in.
    pub namespace: String,
    /// Name of the object.
    pub name: String,
}

impl ObjectKey {
    /// Creates a new object key.
    pub fn new(kind: ObjectKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Creates a key for an object carrying the given identity.
    pub fn for_meta(kind: ObjectKind, meta: &ObjectMeta) -> Self {
        Self::new(kind, meta.namespace.clone(), meta.name.clone())
    }

    /// The identity portion of the key.
    pub fn meta(&self) -> ObjectMeta {
        ObjectMeta::new(self.namespace.clone(), self.name.clone())
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}

/// A persisted key/value artifact.
///
/// Rendered blueprints are stored as one entry keyed by the artifact's own
/// name, so executors can mount the artifact and find the blueprint text
/// at a path equal to the artifact name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigArtifact {
    /// Identity of the artifact.
    pub meta: ObjectMeta,
    /// Entries, deterministically ordered by key.
    pub data: BTreeMap<String, String>,
}

impl ConfigArtifact {
    /// Creates an artifact holding a single entry keyed by its own name.
    pub fn single(meta: ObjectMeta, value: impl Into<String>) -> Self {
        let mut data = BTreeMap::new();
        data.insert(meta.name.clone(), value.into());
        Self { meta, data }
    }
}
