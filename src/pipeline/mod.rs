//! Generated pipeline objects.
//!
//! The forge hands the external pipeline executor three kinds of
//! objects: task definitions (`commit`), a pipeline wiring tasks to data
//! channels, and a pipeline run binding those channels to concrete
//! resources (`graph`). The serialized shapes live in `types`.
//!
//! Tasks and pipelines share two named data channels:
//! - `blueprints`: read-only, backed by the blueprint config artifact
//! - `shared-volume`: read/write scratch storage shared between steps

pub mod commit;
pub mod graph;
pub mod types;

pub use commit::{commit_task, TASK_NAME};
pub use graph::{image_pipeline, pipeline_run};
pub use types::{
    ChannelBinding, ChannelDeclaration, EnvVar, Pipeline, PipelineRun, Step, Task,
};

/// Name of the read-only blueprint channel.
pub const CHANNEL_BLUEPRINTS: &str = "blueprints";

/// Name of the read/write shared storage channel.
pub const CHANNEL_SHARED_VOLUME: &str = "shared-volume";

/// The channel declarations every generated task and pipeline carries.
pub fn declared_channels() -> Vec<ChannelDeclaration> {
    vec![
        ChannelDeclaration::new(CHANNEL_BLUEPRINTS),
        ChannelDeclaration::new(CHANNEL_SHARED_VOLUME),
    ]
}

/// Path a channel is mounted at inside step containers.
pub fn channel_path(channel: &str) -> String {
    format!("/workspace/{channel}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_channels_order() {
        let channels = declared_channels();
        let names: Vec<&str> = channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["blueprints", "shared-volume"]);
    }

    #[test]
    fn test_channel_path() {
        assert_eq!(channel_path(CHANNEL_BLUEPRINTS), "/workspace/blueprints");
    }
}
