//! imageforge: reconciles declarative image build requests into compose
//! pipelines.
//!
//! Given a build request and a resolved builder endpoint, this library
//! deterministically generates the blueprint config artifacts, the
//! build task encoding the compose API protocol, the pipeline wiring
//! that task to its data channels, and the pipeline run that launches
//! it, then persists all of them through an injected object store.

// Core modules
pub mod blueprint;
pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod reconciler;
pub mod store;
pub mod template;

// Re-export commonly used types
pub use config::ForgeConfig;
pub use error::{ReconcileError, TemplateError};
pub use reconciler::{Outcome, Reconciler, SkipReason};
pub use store::{FileStore, MemoryStore, ObjectStore};
