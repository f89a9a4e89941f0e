//! Build task generation.
//!
//! Encodes the four-step build-and-poll protocol against the compose
//! API as a task definition: register the blueprint, clear any stale
//! status artifact, start the compose job, then poll the queue until
//! the job leaves it and fail if it landed in the failed set.

use crate::compose::{paths, ComposeRequest};
use crate::config::ForgeConfig;
use crate::model::ObjectMeta;

use super::types::{EnvVar, Step, Task, TaskSpec};
use super::{channel_path, declared_channels, CHANNEL_BLUEPRINTS, CHANNEL_SHARED_VOLUME};

/// Name of the generated build task.
pub const TASK_NAME: &str = "generate-commit";

/// File in shared storage holding the compose job descriptor.
const COMPOSE_STATUS_FILE: &str = "compose.json";

/// Generates the build task for a registered blueprint.
///
/// Step order is fixed and significant: each step assumes the
/// filesystem and API side effects of the one before it. The compose
/// API base arrives as the `api` environment value of the wait step and
/// inline in the curl steps; an empty base is tolerated here and fails
/// only when the task runs.
pub fn commit_task(
    meta: ObjectMeta,
    api_base: &str,
    blueprint_name: &str,
    config: &ForgeConfig,
) -> Task {
    let status_path = format!(
        "{}/{}",
        channel_path(CHANNEL_SHARED_VOLUME),
        COMPOSE_STATUS_FILE
    );
    let blueprint_path = format!("{}/{}", channel_path(CHANNEL_BLUEPRINTS), blueprint_name);

    let steps = vec![
        Step {
            name: "push-blueprint".to_string(),
            image: config.utility_image.clone(),
            command: vec![
                "/usr/bin/curl".to_string(),
                "-H".to_string(),
                "Content-Type: text/x-toml".to_string(),
                "--data-binary".to_string(),
                format!("@{blueprint_path}"),
                format!("{api_base}/{}", paths::BLUEPRINTS_NEW),
                "--silent".to_string(),
            ],
            ..Step::default()
        },
        Step {
            name: "clear-compose-file".to_string(),
            image: config.utility_image.clone(),
            command: vec![
                "/usr/bin/rm".to_string(),
                "-f".to_string(),
                status_path.clone(),
            ],
            ..Step::default()
        },
        Step {
            name: "start-compose".to_string(),
            image: config.utility_image.clone(),
            command: vec![
                "/usr/bin/curl".to_string(),
                "-H".to_string(),
                "Content-Type: application/json".to_string(),
                "--data".to_string(),
                ComposeRequest::edge_commit(blueprint_name).body(),
                format!("{api_base}/{}", paths::COMPOSE),
                "--output".to_string(),
                status_path.clone(),
                "--silent".to_string(),
            ],
            ..Step::default()
        },
        Step {
            name: "wait-for-finish".to_string(),
            image: config.composer_image.clone(),
            script: Some(wait_script(&status_path, config.poll_interval_secs)),
            env: vec![EnvVar::new("api", api_base)],
            ..Step::default()
        },
    ];

    Task {
        meta,
        spec: TaskSpec {
            channels: declared_channels(),
            steps,
        },
    }
}

/// The polling script of the wait step.
///
/// Reads the job id from the status descriptor, loops on the queue
/// listing until the id disappears, then exits non-zero if the id shows
/// up in the failed listing, and finally confirms against the finished
/// listing. There is no poll timeout: a job that never leaves the queue
/// blocks the step indefinitely.
fn wait_script(status_path: &str, poll_interval_secs: u64) -> String {
    format!(
        r#"#!/bin/bash
compose_id=$(jq '.build_id' -r {status_path})
while /usr/bin/curl "${{api}}/{queue}" --silent | jq -r '.run[].id' | grep ${{compose_id}}; do sleep {poll_interval_secs}; done
/usr/bin/curl "${{api}}/{failed}" --silent | jq -r '.failed[].id' | grep "${{compose_id}}" && echo "Compose ${{compose_id}} failed!" && exit 1
/usr/bin/curl "${{api}}/{finished}" --silent | jq -r --arg id "${{compose_id}}" '.finished[] | select (.id==$id)'
"#,
        queue = paths::QUEUE,
        failed = paths::FAILED,
        finished = paths::FINISHED,
    )
}
