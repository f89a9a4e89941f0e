//! The reconciliation loop body.
//!
//! One invocation turns one image build request into its generated
//! artifacts: two blueprint config artifacts, a build task, a pipeline
//! and a pipeline run, all persisted through the injected object store.
//! Each pass is stateless and strictly sequential; data flows request →
//! builder/endpoint → defaulted spec → blueprints → task → pipeline →
//! run, with every create gating the next.
//!
//! Passes terminate quietly (no error, nothing created) when the
//! request has vanished or when no single builder can be chosen; those
//! outcomes wait for external correction and a fresh trigger. All other
//! failures propagate to the invoking framework, which owns retries.

use std::sync::Arc;

use tracing::{info, warn};

use crate::blueprint;
use crate::compose;
use crate::config::ForgeConfig;
use crate::error::ReconcileError;
use crate::model::{ConfigArtifact, Endpoint, ImageRequest, ObjectKey, ObjectKind, ObjectMeta};
use crate::pipeline::{commit_task, image_pipeline, pipeline_run, TASK_NAME};
use crate::store::{ObjectRecord, ObjectStore};

/// Result of a completed reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// All artifacts were generated and persisted.
    Completed {
        /// Key of the launched pipeline run.
        pipeline_run: ObjectKey,
    },
    /// The pass ended early without creating anything.
    Skipped(SkipReason),
}

/// Why a pass ended without creating anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The request no longer exists.
    RequestGone,
    /// No builder is registered in the namespace.
    NoBuilder,
    /// More than one builder is registered and none was referenced.
    AmbiguousBuilders(usize),
}

enum BuilderChoice {
    One(ObjectMeta),
    Skip(SkipReason),
}

/// Reconciles image build requests into pipeline artifacts.
pub struct Reconciler {
    store: Arc<dyn ObjectStore>,
    config: ForgeConfig,
}

impl Reconciler {
    /// Creates a reconciler over the given store.
    pub fn new(store: Arc<dyn ObjectStore>, config: ForgeConfig) -> Self {
        Self { store, config }
    }

    /// Runs one reconciliation pass for the named request.
    pub async fn reconcile(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Outcome, ReconcileError> {
        let request_key = ObjectKey::new(ObjectKind::ImageRequest, namespace, name);
        let Some(record) = self.store.get(&request_key).await? else {
            info!("Image request {request_key} is gone, nothing to do");
            return Ok(Outcome::Skipped(SkipReason::RequestGone));
        };
        let request: ImageRequest =
            record.decode().map_err(|source| ReconcileError::Decode {
                key: request_key.clone(),
                source,
            })?;

        let builder = match self.resolve_builder(namespace, &request).await? {
            BuilderChoice::One(meta) => meta,
            BuilderChoice::Skip(reason) => return Ok(Outcome::Skipped(reason)),
        };
        let api_base = self.resolve_api_base(&builder).await;

        // Defaults are filled on a copy; the request object is never touched.
        let spec = request.spec.with_defaults(name);

        let blueprints = blueprint::generate(&spec)?;
        for rendered in [&blueprints.base, &blueprints.iso] {
            let artifact = ConfigArtifact::single(
                ObjectMeta::new(namespace, &rendered.name),
                &rendered.text,
            );
            self.store
                .create(ObjectRecord::new(
                    ObjectKind::ConfigArtifact,
                    &artifact.meta,
                    &artifact,
                )?)
                .await?;
        }

        let task = commit_task(
            ObjectMeta::new(namespace, TASK_NAME),
            &api_base,
            &blueprints.base.name,
            &self.config,
        );
        self.store
            .create(ObjectRecord::new(ObjectKind::Task, &task.meta, &task)?)
            .await?;

        let pipeline = image_pipeline(
            ObjectMeta::new(namespace, format!("{name}-pipeline")),
            std::slice::from_ref(&task),
        );
        self.store
            .create(ObjectRecord::new(
                ObjectKind::Pipeline,
                &pipeline.meta,
                &pipeline,
            )?)
            .await?;

        let run = pipeline_run(
            ObjectMeta::new(namespace, format!("{name}-pipeline-run")),
            &pipeline,
            &blueprints.base.name,
            spec.storage_claim(),
        );
        let run_key = ObjectKey::for_meta(ObjectKind::PipelineRun, &run.meta);
        self.store
            .create(ObjectRecord::new(ObjectKind::PipelineRun, &run.meta, &run)?)
            .await?;

        info!(
            "Launched pipeline run {} for image request {namespace}/{name}",
            run.meta.name
        );
        Ok(Outcome::Completed {
            pipeline_run: run_key,
        })
    }

    /// Chooses the builder a request targets.
    ///
    /// An explicit reference is fetched directly and must exist. Without
    /// one, exactly one registered builder must be present; zero or
    /// several ends the pass quietly so an operator can correct the
    /// namespace.
    async fn resolve_builder(
        &self,
        namespace: &str,
        request: &ImageRequest,
    ) -> Result<BuilderChoice, ReconcileError> {
        if let Some(reference) = request.spec.builder_ref() {
            let key = ObjectKey::new(ObjectKind::Builder, namespace, reference);
            return match self.store.get(&key).await? {
                Some(record) => Ok(BuilderChoice::One(record.key.meta())),
                None => Err(ReconcileError::BuilderNotFound(reference.to_string())),
            };
        }

        info!("No builder referenced, trying to find the default");
        let builders = self.store.list(ObjectKind::Builder, namespace).await?;
        match builders.as_slice() {
            [] => {
                warn!("No builder registered in namespace {namespace}");
                Ok(BuilderChoice::Skip(SkipReason::NoBuilder))
            }
            [sole] => {
                info!("Using {} builder", sole.key.name);
                Ok(BuilderChoice::One(sole.key.meta()))
            }
            several => {
                warn!(
                    "Found {} builders in namespace {namespace}, refusing to pick one",
                    several.len()
                );
                Ok(BuilderChoice::Skip(SkipReason::AmbiguousBuilders(
                    several.len(),
                )))
            }
        }
    }

    /// Resolves the compose API base of a builder's endpoint.
    ///
    /// Any failure here is tolerated: the pass continues with an empty
    /// API base and the problem surfaces when the generated task runs.
    async fn resolve_api_base(&self, builder: &ObjectMeta) -> String {
        let key = ObjectKey::for_meta(ObjectKind::Endpoint, builder);
        let record = match self.store.get(&key).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!("Could not get endpoint for builder {builder}");
                return String::new();
            }
            Err(err) => {
                warn!("Could not get endpoint for builder {builder}: {err}");
                return String::new();
            }
        };
        match record.decode::<Endpoint>() {
            Ok(endpoint) => compose::api_base(&endpoint.host, endpoint.port),
            Err(err) => {
                warn!("Malformed endpoint for builder {builder}: {err}");
                String::new()
            }
        }
    }
}
