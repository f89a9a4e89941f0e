//! Wire contract of the external compose API.
//!
//! The forge never calls this API in-process; the generated task steps
//! do, with curl, when the pipeline executes. This module pins down the
//! URL layout and the JSON shapes both sides agree on, so the task
//! generator and the polling script stay consistent with what the
//! service actually serves.

use serde::{Deserialize, Serialize};

/// The compose type every generated build uses.
pub const COMPOSE_TYPE_EDGE_COMMIT: &str = "edge-commit";

/// API paths, relative to the versioned base.
pub mod paths {
    /// Registers a new blueprint (POST, `text/x-toml` body).
    pub const BLUEPRINTS_NEW: &str = "blueprints/new";
    /// Starts a compose job (POST, JSON body).
    pub const COMPOSE: &str = "compose";
    /// Lists jobs still in the queue.
    pub const QUEUE: &str = "compose/queue";
    /// Lists failed jobs.
    pub const FAILED: &str = "compose/failed";
    /// Lists finished jobs.
    pub const FINISHED: &str = "compose/finished";
}

/// The versioned API base for an endpoint, e.g. `http://svc.ns:8080/api/v1`.
pub fn api_base(host: &str, port: u16) -> String {
    format!("http://{host}:{port}/api/v1")
}

/// Body of a compose start request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposeRequest {
    /// Name of a previously registered blueprint.
    pub blueprint_name: String,
    /// Kind of artifact to compose.
    pub compose_type: String,
}

impl ComposeRequest {
    /// A request to compose an edge commit from the named blueprint.
    pub fn edge_commit(blueprint_name: impl Into<String>) -> Self {
        Self {
            blueprint_name: blueprint_name.into(),
            compose_type: COMPOSE_TYPE_EDGE_COMMIT.to_string(),
        }
    }

    /// The exact JSON body the start-compose step sends.
    ///
    /// Built by hand so the byte layout is fixed independently of
    /// serializer settings; a test pins it against the serde encoding.
    pub fn body(&self) -> String {
        format!(
            r#"{{"blueprint_name":"{}","compose_type":"{}"}}"#,
            self.blueprint_name, self.compose_type
        )
    }
}

/// Descriptor returned by a compose start, written to shared storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposeJob {
    /// Identifier the status listings report the job under.
    pub build_id: String,
}

/// One entry in a status listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposeJobRef {
    /// The job identifier.
    pub id: String,
}

/// Response of the queue listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueListing {
    /// Jobs still queued or running.
    #[serde(default)]
    pub run: Vec<ComposeJobRef>,
}

/// Response of the failed listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedListing {
    /// Jobs that finished in the failed state.
    #[serde(default)]
    pub failed: Vec<ComposeJobRef>,
}

/// Response of the finished listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedListing {
    /// Jobs that finished successfully.
    #[serde(default)]
    pub finished: Vec<ComposeJobRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_format() {
        assert_eq!(api_base("svc.ns", 8080), "http://svc.ns:8080/api/v1");
    }

    #[test]
    fn test_edge_commit_body() {
        let request = ComposeRequest::edge_commit("edge1");
        assert_eq!(
            request.body(),
            r#"{"blueprint_name":"edge1","compose_type":"edge-commit"}"#
        );
    }

    #[test]
    fn test_body_matches_serde_encoding() {
        let request = ComposeRequest::edge_commit("edge1");
        let encoded = serde_json::to_string(&request).expect("encode");
        assert_eq!(request.body(), encoded);
    }

    #[test]
    fn test_queue_listing_shape() {
        let listing: QueueListing =
            serde_json::from_str(r#"{"run":[{"id":"abc"},{"id":"def"}]}"#).expect("parse");
        assert_eq!(listing.run.len(), 2);
        assert_eq!(listing.run[0].id, "abc");
    }

    #[test]
    fn test_failed_listing_shape() {
        let listing: FailedListing =
            serde_json::from_str(r#"{"failed":[{"id":"abc"}]}"#).expect("parse");
        assert_eq!(listing.failed[0].id, "abc");
    }

    #[test]
    fn test_finished_listing_tolerates_empty() {
        let listing: FinishedListing = serde_json::from_str("{}").expect("parse");
        assert!(listing.finished.is_empty());
    }

    #[test]
    fn test_job_descriptor_shape() {
        let job: ComposeJob = serde_json::from_str(r#"{"build_id":"abc"}"#).expect("parse");
        assert_eq!(job.build_id, "abc");
    }
}
