//! Spec-driven template rendering.
//!
//! A thin, pure wrapper around one-off Tera rendering: the context is the
//! serialized image spec, so templates substitute the manifest field
//! names directly (`{{ name }}`, `{{ sshKey }}`, ...). Rendering is a
//! function of its two inputs only; callers rely on identical inputs
//! producing byte-identical output because generated object names are
//! derived from rendered content downstream.

use tera::{Context, Tera};

use crate::error::TemplateError;
use crate::model::ImageSpec;

/// Renders a template against the given spec.
///
/// Fails when the template cannot be parsed or when it substitutes a
/// field the spec does not define.
pub fn render(template: &str, spec: &ImageSpec) -> Result<String, TemplateError> {
    let context = Context::from_serialize(spec)?;
    Ok(Tera::one_off(template, &context, false)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ImageSpec {
        ImageSpec {
            name: "edge1".to_string(),
            user_name: "admin".to_string(),
            ssh_key: "ssh-rsa AAA".to_string(),
            ..ImageSpec::default()
        }
    }

    #[test]
    fn test_substitutes_spec_fields() {
        let rendered = render("image {{ name }} for {{ userName }}", &spec()).expect("render");
        assert_eq!(rendered, "image edge1 for admin");
    }

    #[test]
    fn test_undefined_field_errors() {
        let err = render("{{ no_such_field }}", &spec()).expect_err("undefined field");
        assert!(matches!(err, TemplateError::Render(_)));
    }

    #[test]
    fn test_unbalanced_directive_errors() {
        let err = render("{{ name", &spec()).expect_err("parse failure");
        assert!(matches!(err, TemplateError::Render(_)));
    }

    #[test]
    fn test_deterministic() {
        let first = render("{{ name }}-{{ sshKey }}", &spec()).expect("render");
        let second = render("{{ name }}-{{ sshKey }}", &spec()).expect("render");
        assert_eq!(first, second);
    }
}
