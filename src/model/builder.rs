//! Builder backends and their network endpoints.

use serde::{Deserialize, Serialize};

/// The network endpoint a builder's compose API is reachable at.
///
/// Stored under the builder's own identity and looked up by that match.
/// A builder without an endpoint is tolerated; the generated task then
/// carries an empty API base and fails downstream when it executes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Endpoint {
    /// Hostname the service answers on.
    pub host: String,
    /// TCP port of the compose API.
    pub port: u16,
}

impl Endpoint {
    /// Creates a new endpoint.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}
