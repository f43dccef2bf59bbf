//! Domain DTOs for the templates API.
//!
//! # Design
//! Every field is optional and omitted from the JSON output when `None`, so
//! the same struct serves as create payload, partial-update payload, and
//! response body.
//!
//! `TemplateVersion` has one schema: a nested `template` reference and a
//! boolean `active` flag. The live API answers with a flat `template_id` and
//! an integer `active`; both are folded into that schema on the way in.

use serde::{Deserialize, Serialize};

/// A transactional email template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `legacy` or `dynamic`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,
}

impl Template {
    /// A template payload carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A reference to an existing template by id.
    pub fn reference(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// A content revision of a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireTemplateVersion")]
pub struct TemplateVersion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plain_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl TemplateVersion {
    /// An empty version payload bound to `template_id`.
    pub fn for_template(template_id: impl Into<String>) -> Self {
        Self {
            template: Some(Template::reference(template_id)),
            ..Self::default()
        }
    }

    /// Id of the owning template, if the reference carries one.
    pub fn template_id(&self) -> Option<&str> {
        self.template.as_ref().and_then(|t| t.id.as_deref())
    }
}

/// Accepted input shape for `TemplateVersion`.
#[derive(Deserialize)]
struct WireTemplateVersion {
    #[serde(default)]
    template: Option<Template>,
    #[serde(default)]
    template_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    html_content: Option<String>,
    #[serde(default)]
    plain_content: Option<String>,
    #[serde(default)]
    active: Option<ActiveFlag>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ActiveFlag {
    Bool(bool),
    Int(i64),
}

impl From<ActiveFlag> for bool {
    fn from(flag: ActiveFlag) -> Self {
        match flag {
            ActiveFlag::Bool(b) => b,
            ActiveFlag::Int(n) => n != 0,
        }
    }
}

impl From<WireTemplateVersion> for TemplateVersion {
    fn from(wire: WireTemplateVersion) -> Self {
        // Nested id wins over the flat one.
        let template = match (wire.template, wire.template_id) {
            (Some(mut template), Some(id)) => {
                template.id.get_or_insert(id);
                Some(template)
            }
            (Some(template), None) => Some(template),
            (None, id) => id.map(Template::reference),
        };
        Self {
            template,
            id: wire.id,
            name: wire.name,
            subject: wire.subject,
            html_content: wire.html_content,
            plain_content: wire.plain_content,
            active: wire.active.map(bool::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_omits_absent_fields() {
        let json = serde_json::to_value(Template::named("welcome")).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "welcome" }));
    }

    #[test]
    fn template_ignores_unknown_fields() {
        let template: Template = serde_json::from_str(
            r#"{"id":"t1","name":"welcome","generation":"dynamic","updated_at":"2021-01-01","versions":[]}"#,
        )
        .unwrap();
        assert_eq!(template.id.as_deref(), Some("t1"));
        assert_eq!(template.generation.as_deref(), Some("dynamic"));
    }

    #[test]
    fn version_serializes_nested_reference_and_bool() {
        let version = TemplateVersion {
            name: Some("v1".to_string()),
            active: Some(true),
            ..TemplateVersion::for_template("t1")
        };
        let json = serde_json::to_value(&version).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "template": { "id": "t1" }, "name": "v1", "active": true })
        );
    }

    #[test]
    fn version_folds_flat_template_id_and_int_active() {
        let version: TemplateVersion = serde_json::from_str(
            r#"{"id":"v1","template_id":"t1","name":"first","active":1}"#,
        )
        .unwrap();
        assert_eq!(version.template_id(), Some("t1"));
        assert_eq!(version.active, Some(true));

        let inactive: TemplateVersion =
            serde_json::from_str(r#"{"id":"v2","active":0}"#).unwrap();
        assert_eq!(inactive.active, Some(false));
        assert!(inactive.template.is_none());
    }

    #[test]
    fn version_prefers_nested_template_id() {
        let version: TemplateVersion = serde_json::from_str(
            r#"{"template":{"id":"nested","name":"n"},"template_id":"flat"}"#,
        )
        .unwrap();
        assert_eq!(version.template_id(), Some("nested"));
        assert_eq!(
            version.template.as_ref().and_then(|t| t.name.as_deref()),
            Some("n")
        );
    }

    #[test]
    fn version_rejects_non_flag_active() {
        let result: Result<TemplateVersion, _> = serde_json::from_str(r#"{"active":"yes"}"#);
        assert!(result.is_err());
    }
}
