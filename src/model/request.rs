//! The user-facing image build request.

use serde::{Deserialize, Serialize};

/// A declarative request for an image build.
///
/// Requests are created and updated externally; the forge only reads
/// them. The payload mirrors the manifest shape users write, so the
/// identity lives on the store key and only the spec is carried here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// The requested image, as written by the user.
    #[serde(default)]
    pub spec: ImageSpec,
}

/// Specification of the image to build.
///
/// All fields are optional in the manifest; `with_defaults` fills the
/// derivable ones from the request's own identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageSpec {
    /// Image name; defaults to the request's own name when empty.
    pub name: String,
    /// Explicit builder to use instead of the sole registered one.
    pub builder_ref: Option<String>,
    /// User account the SSH key customization is created for.
    pub user_name: String,
    /// Public SSH key installed for `user_name`.
    pub ssh_key: String,
    /// Target device for the ISO installer.
    pub installation_device: String,
    /// FDO manufacturing server contacted during device onboarding.
    pub fdo_manufacturing_server_url: String,
    /// Override template for the base blueprint.
    pub blueprint_template: Option<String>,
    /// Override template for the ISO installer blueprint.
    pub blueprint_iso_template: Option<String>,
    /// Pre-existing read/write storage claim; defaults to `<request>-data`.
    pub shared_storage: Option<String>,
}

impl ImageSpec {
    /// Fills derivable defaults from the request's identity.
    ///
    /// The request object itself is never modified; reconciliation works
    /// on this defaulted copy only.
    pub fn with_defaults(mut self, request_name: &str) -> Self {
        if self.name.is_empty() {
            self.name = request_name.to_string();
        }
        if self.shared_storage.as_deref().is_none_or(str::is_empty) {
            self.shared_storage = Some(format!("{request_name}-data"));
        }
        self
    }

    /// The explicit builder reference, treating an empty string as unset.
    pub fn builder_ref(&self) -> Option<&str> {
        self.builder_ref.as_deref().filter(|name| !name.is_empty())
    }

    /// The shared storage claim name; empty until defaults are applied.
    pub fn storage_claim(&self) -> &str {
        self.shared_storage.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_defaults_to_request_identity() {
        let spec = ImageSpec::default().with_defaults("edge1");
        assert_eq!(spec.name, "edge1");
    }

    #[test]
    fn test_explicit_name_kept() {
        let spec = ImageSpec {
            name: "custom".to_string(),
            ..ImageSpec::default()
        }
        .with_defaults("edge1");
        assert_eq!(spec.name, "custom");
    }

    #[test]
    fn test_shared_storage_defaults_to_request_data() {
        let spec = ImageSpec::default().with_defaults("edge1");
        assert_eq!(spec.storage_claim(), "edge1-data");
    }

    #[test]
    fn test_explicit_shared_storage_kept() {
        let spec = ImageSpec {
            shared_storage: Some("scratch".to_string()),
            ..ImageSpec::default()
        }
        .with_defaults("edge1");
        assert_eq!(spec.storage_claim(), "scratch");
    }

    #[test]
    fn test_empty_builder_ref_treated_as_unset() {
        let spec = ImageSpec {
            builder_ref: Some(String::new()),
            ..ImageSpec::default()
        };
        assert_eq!(spec.builder_ref(), None);
    }

    #[test]
    fn test_manifest_field_names() {
        let request: ImageRequest = serde_json::from_value(serde_json::json!({
            "spec": {
                "name": "edge1",
                "sshKey": "ssh-rsa AAA",
                "userName": "admin",
                "blueprintTemplate": "name = \"fixed\"",
            }
        }))
        .expect("manifest");
        assert_eq!(request.spec.user_name, "admin");
        assert_eq!(request.spec.ssh_key, "ssh-rsa AAA");
        assert_eq!(
            request.spec.blueprint_template.as_deref(),
            Some("name = \"fixed\"")
        );
    }
}
