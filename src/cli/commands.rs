//! CLI command definitions for imageforge.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Deserialize;
use tracing::info;

use crate::blueprint;
use crate::config::ForgeConfig;
use crate::model::{ConfigArtifact, ImageSpec, ObjectMeta};
use crate::pipeline::{commit_task, image_pipeline, pipeline_run, TASK_NAME};
use crate::reconciler::{Outcome, Reconciler};
use crate::store::FileStore;

/// Reconciles declarative image build requests into compose pipelines.
#[derive(Parser)]
#[command(name = "imageforge")]
#[command(about = "Reconcile image build requests into compose pipelines")]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Run one reconciliation pass against a file-backed object store.
    Reconcile(ReconcileArgs),

    /// Render the artifacts for a request document without persisting.
    Render(RenderArgs),
}

/// Arguments for `imageforge reconcile`.
#[derive(Parser, Debug)]
pub struct ReconcileArgs {
    /// Root directory of the file-backed object store.
    #[arg(long, env = "FORGE_STATE_DIR")]
    pub state: PathBuf,

    /// Request to reconcile, as `<namespace>/<name>`.
    #[arg(long)]
    pub request: String,
}

/// Arguments for `imageforge render`.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Path to a request document (YAML with `metadata` and `spec`).
    #[arg(long)]
    pub request: PathBuf,

    /// Compose API base to wire into the generated task.
    #[arg(long, default_value = "")]
    pub api_base: String,
}

/// A standalone request document as fed to `render`.
#[derive(Debug, Deserialize)]
struct RequestDocument {
    metadata: ObjectMeta,
    #[serde(default)]
    spec: ImageSpec,
}

/// Parses command-line arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Runs the CLI with already-parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Reconcile(args) => reconcile(args).await,
        Commands::Render(args) => render(args),
    }
}

async fn reconcile(args: ReconcileArgs) -> anyhow::Result<()> {
    let Some((namespace, name)) = args.request.split_once('/') else {
        bail!("--request must be of the form <namespace>/<name>");
    };

    let config = ForgeConfig::from_env()?;
    let store = Arc::new(FileStore::new(&args.state));
    let reconciler = Reconciler::new(store, config);

    match reconciler.reconcile(namespace, name).await? {
        Outcome::Completed { pipeline_run } => {
            info!("Created {pipeline_run}");
            println!("launched {pipeline_run}");
        }
        Outcome::Skipped(reason) => {
            println!("skipped: {reason:?}");
        }
    }
    Ok(())
}

fn render(args: RenderArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.request)
        .with_context(|| format!("reading {}", args.request.display()))?;
    let document: RequestDocument =
        serde_yaml::from_str(&text).with_context(|| format!("parsing {}", args.request.display()))?;

    let namespace = document.metadata.namespace.as_str();
    let request_name = document.metadata.name.as_str();
    let config = ForgeConfig::from_env()?;

    let spec = document.spec.with_defaults(request_name);
    let blueprints = blueprint::generate(&spec)?;

    let base = ConfigArtifact::single(
        ObjectMeta::new(namespace, &blueprints.base.name),
        &blueprints.base.text,
    );
    let iso = ConfigArtifact::single(
        ObjectMeta::new(namespace, &blueprints.iso.name),
        &blueprints.iso.text,
    );
    let task = commit_task(
        ObjectMeta::new(namespace, TASK_NAME),
        &args.api_base,
        &blueprints.base.name,
        &config,
    );
    let pipeline = image_pipeline(
        ObjectMeta::new(namespace, format!("{request_name}-pipeline")),
        std::slice::from_ref(&task),
    );
    let run = pipeline_run(
        ObjectMeta::new(namespace, format!("{request_name}-pipeline-run")),
        &pipeline,
        &blueprints.base.name,
        spec.storage_claim(),
    );

    print!("{}", serde_yaml::to_string(&base)?);
    println!("---");
    print!("{}", serde_yaml::to_string(&iso)?);
    println!("---");
    print!("{}", serde_yaml::to_string(&task)?);
    println!("---");
    print!("{}", serde_yaml::to_string(&pipeline)?);
    println!("---");
    print!("{}", serde_yaml::to_string(&run)?);
    Ok(())
}
