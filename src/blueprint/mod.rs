//! Blueprint generation.
//!
//! Produces the two blueprint variants the build pipeline consumes: a
//! base image blueprint and an ISO installer blueprint. Each comes from
//! a built-in template unless the spec overrides it, rendered against
//! the defaulted spec and checked to be well-formed TOML before anything
//! downstream gets to reference it by name.

use crate::error::TemplateError;
use crate::model::ImageSpec;
use crate::template;

/// Built-in template for the base image blueprint.
pub const DEFAULT_BLUEPRINT_TEMPLATE: &str = r#"name = "{{ name }}"
version = "0.0.1"
modules = []
groups = []

[[customizations.sshkey]]
user = "{{ userName }}"
key = "{{ sshKey }}"
"#;

/// Built-in template for the ISO installer blueprint.
pub const DEFAULT_ISO_BLUEPRINT_TEMPLATE: &str = r#"name = "{{ name }}-iso"
version = "0.0.1"
modules = []
groups = []
distro = ""

[customizations]
installation_device = "{{ installationDevice }}"

[customizations.fdo]
manufacturing_server_url = "{{ fdoManufacturingServerUrl }}"
diun_pub_key_insecure = "true"
"#;

/// A rendered, named blueprint text.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlueprint {
    /// Name the blueprint is registered and referenced under.
    pub name: String,
    /// The rendered configuration text.
    pub text: String,
}

/// The two blueprint variants generated for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct BlueprintPair {
    /// Blueprint for the base image.
    pub base: RenderedBlueprint,
    /// Blueprint for the ISO installer image.
    pub iso: RenderedBlueprint,
}

/// Generates both blueprint variants for a defaulted spec.
///
/// Falls back to the built-in templates where the spec does not override
/// them. Errors propagate from template rendering and from the TOML
/// validity check on the rendered output.
pub fn generate(spec: &ImageSpec) -> Result<BlueprintPair, TemplateError> {
    let base_template = spec
        .blueprint_template
        .as_deref()
        .filter(|text| !text.is_empty())
        .unwrap_or(DEFAULT_BLUEPRINT_TEMPLATE);
    let iso_template = spec
        .blueprint_iso_template
        .as_deref()
        .filter(|text| !text.is_empty())
        .unwrap_or(DEFAULT_ISO_BLUEPRINT_TEMPLATE);

    let base = RenderedBlueprint {
        name: spec.name.clone(),
        text: template::render(base_template, spec)?,
    };
    let iso = RenderedBlueprint {
        name: format!("{}-iso", spec.name),
        text: template::render(iso_template, spec)?,
    };

    validate_toml(&base)?;
    validate_toml(&iso)?;

    Ok(BlueprintPair { base, iso })
}

/// Checks that a rendered blueprint parses as TOML.
fn validate_toml(blueprint: &RenderedBlueprint) -> Result<(), TemplateError> {
    blueprint
        .text
        .parse::<toml::Table>()
        .map(|_| ())
        .map_err(|err| TemplateError::InvalidOutput {
            name: blueprint.name.clone(),
            message: err.to_string(),
        })
}
