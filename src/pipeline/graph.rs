//! Pipeline and pipeline-run generation.

use crate::model::ObjectMeta;

use super::types::{
    ChannelBinding, Pipeline, PipelineRef, PipelineRun, PipelineRunSpec, PipelineSpec,
    PipelineTask, Task, TaskRef,
};
use super::{declared_channels, CHANNEL_BLUEPRINTS, CHANNEL_SHARED_VOLUME};

/// Wraps tasks into a pipeline definition.
///
/// Each task becomes one entry referenced by name and bound to the two
/// channel slots the pipeline declares. Input order is execution order;
/// no dependency edges are inferred between entries.
pub fn image_pipeline(meta: ObjectMeta, tasks: &[Task]) -> Pipeline {
    let entries = tasks
        .iter()
        .map(|task| PipelineTask {
            name: task.meta.name.clone(),
            task_ref: TaskRef {
                name: task.meta.name.clone(),
            },
            channels: declared_channels(),
        })
        .collect();

    Pipeline {
        meta,
        spec: PipelineSpec {
            channels: declared_channels(),
            tasks: entries,
        },
    }
}

/// Constructs one execution of a pipeline.
///
/// Binds the `blueprints` slot to the named config artifact (read-only)
/// and the `shared-volume` slot to the storage claim (read/write).
pub fn pipeline_run(
    meta: ObjectMeta,
    pipeline: &Pipeline,
    blueprint_artifact: &str,
    storage_claim: &str,
) -> PipelineRun {
    PipelineRun {
        meta,
        spec: PipelineRunSpec {
            pipeline_ref: PipelineRef {
                name: pipeline.meta.name.clone(),
            },
            channels: vec![
                ChannelBinding::config(CHANNEL_BLUEPRINTS, blueprint_artifact),
                ChannelBinding::volume(CHANNEL_SHARED_VOLUME, storage_claim),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForgeConfig;
    use crate::pipeline::commit::{commit_task, TASK_NAME};

    fn tasks() -> Vec<Task> {
        vec![commit_task(
            ObjectMeta::new("edge", TASK_NAME),
            "http://svc.ns:8080/api/v1",
            "edge1",
            &ForgeConfig::default(),
        )]
    }

    #[test]
    fn test_pipeline_wraps_tasks_in_order() {
        let tasks = tasks();
        let pipeline = image_pipeline(ObjectMeta::new("edge", "edge1-pipeline"), &tasks);

        assert_eq!(pipeline.spec.tasks.len(), 1);
        let entry = &pipeline.spec.tasks[0];
        assert_eq!(entry.name, TASK_NAME);
        assert_eq!(entry.task_ref.name, TASK_NAME);
        let names: Vec<&str> = entry.channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["blueprints", "shared-volume"]);
    }

    #[test]
    fn test_pipeline_declares_channels() {
        let pipeline = image_pipeline(ObjectMeta::new("edge", "edge1-pipeline"), &tasks());
        let names: Vec<&str> = pipeline
            .spec
            .channels
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["blueprints", "shared-volume"]);
    }

    #[test]
    fn test_run_binds_channels_to_resources() {
        let pipeline = image_pipeline(ObjectMeta::new("edge", "edge1-pipeline"), &tasks());
        let run = pipeline_run(
            ObjectMeta::new("edge", "edge1-pipeline-run"),
            &pipeline,
            "edge1",
            "edge1-data",
        );

        assert_eq!(run.spec.pipeline_ref.name, "edge1-pipeline");
        assert_eq!(run.spec.channels.len(), 2);

        let blueprints = &run.spec.channels[0];
        assert_eq!(blueprints.name, "blueprints");
        assert_eq!(
            blueprints.config.as_ref().map(|c| c.name.as_str()),
            Some("edge1")
        );

        let volume = &run.spec.channels[1];
        assert_eq!(volume.name, "shared-volume");
        assert_eq!(
            volume.volume.as_ref().map(|v| v.claim_name.as_str()),
            Some("edge1-data")
        );
    }

    #[test]
    fn test_multiple_tasks_keep_list_order() {
        let config = ForgeConfig::default();
        let first = commit_task(
            ObjectMeta::new("edge", "first"),
            "http://svc.ns:8080/api/v1",
            "edge1",
            &config,
        );
        let second = commit_task(
            ObjectMeta::new("edge", "second"),
            "http://svc.ns:8080/api/v1",
            "edge1",
            &config,
        );

        let pipeline = image_pipeline(
            ObjectMeta::new("edge", "edge1-pipeline"),
            &[first, second],
        );
        let names: Vec<&str> = pipeline
            .spec
            .tasks
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
