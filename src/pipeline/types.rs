//! Serialized shapes of the generated pipeline objects.
//!
//! These are the payloads persisted to the object store and consumed by
//! the external pipeline executor. Field names follow the executor's
//! manifest convention (camelCase), matching how requests and endpoints
//! are written.

use serde::{Deserialize, Serialize};

use crate::model::ObjectMeta;

/// An environment value passed to a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvVar {
    /// Variable name.
    pub name: String,
    /// Variable value.
    pub value: String,
}

impl EnvVar {
    /// Creates a new environment value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One container step of a task.
///
/// A step runs either an argv `command` or an embedded `script`, never
/// both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Step {
    /// Step name, unique within its task.
    pub name: String,
    /// Container image the step runs in.
    pub image: String,
    /// Argv to execute.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Shell script to execute instead of a command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Environment values injected into the step.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
}

/// A named data channel slot declared by a task or pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDeclaration {
    /// Channel name.
    pub name: String,
}

impl ChannelDeclaration {
    /// Declares a channel slot.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A generated build task definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Identity of the task object.
    pub meta: ObjectMeta,
    /// The task definition.
    pub spec: TaskSpec,
}

/// Definition of a task: declared channels plus ordered steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Channel slots the task expects to be bound.
    pub channels: Vec<ChannelDeclaration>,
    /// Steps, executed in order; each assumes the side effects of the
    /// previous one.
    pub steps: Vec<Step>,
}

/// Reference to a task by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRef {
    /// Name of the referenced task.
    pub name: String,
}

/// One task entry inside a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTask {
    /// Entry name; mirrors the referenced task.
    pub name: String,
    /// The referenced task.
    pub task_ref: TaskRef,
    /// Channels this entry binds from the pipeline's declarations.
    pub channels: Vec<ChannelDeclaration>,
}

/// A generated pipeline definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Identity of the pipeline object.
    pub meta: ObjectMeta,
    /// The pipeline definition.
    pub spec: PipelineSpec,
}

/// Definition of a pipeline: declared channels plus ordered task entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Channel slots the pipeline declares for its tasks.
    pub channels: Vec<ChannelDeclaration>,
    /// Task entries; list order is execution order.
    pub tasks: Vec<PipelineTask>,
}

/// Reference to a pipeline by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRef {
    /// Name of the referenced pipeline.
    pub name: String,
}

/// Backing of a channel by a config artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigChannelSource {
    /// Name of the config artifact.
    pub name: String,
}

/// Backing of a channel by a storage claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeChannelSource {
    /// Name of the claim.
    pub claim_name: String,
}

/// Binding of one declared channel to a concrete resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelBinding {
    /// Channel name being bound.
    pub name: String,
    /// Read-only config artifact backing, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ConfigChannelSource>,
    /// Read/write storage backing, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeChannelSource>,
}

impl ChannelBinding {
    /// Binds a channel to a config artifact.
    pub fn config(channel: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            name: channel.into(),
            config: Some(ConfigChannelSource {
                name: artifact.into(),
            }),
            volume: None,
        }
    }

    /// Binds a channel to a storage claim.
    pub fn volume(channel: impl Into<String>, claim: impl Into<String>) -> Self {
        Self {
            name: channel.into(),
            config: None,
            volume: Some(VolumeChannelSource {
                claim_name: claim.into(),
            }),
        }
    }
}

/// A launched execution of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Identity of the run object.
    pub meta: ObjectMeta,
    /// The run definition.
    pub spec: PipelineRunSpec,
}

/// Definition of a run: the pipeline plus concrete channel bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRunSpec {
    /// The pipeline this run executes.
    pub pipeline_ref: PipelineRef,
    /// Bindings of the pipeline's channel slots to concrete resources.
    pub channels: Vec<ChannelBinding>,
}
