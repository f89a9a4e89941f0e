//! Error types for imageforge operations.
//!
//! Defines the error taxonomy for the two failure domains the core owns:
//! - Template parsing and blueprint rendering
//! - Reconciliation passes (resolution, generation, persistence)
//!
//! Store and configuration errors live with their own modules and are
//! funneled into `ReconcileError` at the reconciler boundary.

use thiserror::Error;

use crate::model::ObjectKey;
use crate::store::StoreError;

/// Errors that can occur while rendering blueprint templates.
///
/// A malformed user-supplied template fails only the pass that used it;
/// it is never allowed to abort the controlling process.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template could not be parsed or a substitution referenced an
    /// undefined field.
    #[error("template rendering failed: {0}")]
    Render(#[from] tera::Error),

    /// The rendered blueprint is not well-formed configuration text.
    #[error("rendered blueprint '{name}' is not valid TOML: {message}")]
    InvalidOutput { name: String, message: String },
}

/// Errors that can occur during a reconciliation pass.
///
/// Quiet terminations (request gone, no unambiguous builder) are not
/// errors; they are reported through `reconciler::Outcome` instead.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Blueprint generation failed.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// The object store rejected a read or a create.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The request named a builder that does not exist.
    #[error("builder '{0}' not found")]
    BuilderNotFound(String),

    /// A stored object could not be decoded into its expected shape.
    #[error("malformed object {key}: {source}")]
    Decode {
        key: ObjectKey,
        #[source]
        source: serde_json::Error,
    },
}
