// Declarative inquiry form description, loadable from JSON.
use super::validation::ValidatorRegistry;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use site_shared::models::{FieldType, FieldValue, FormData, Service};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InquiryFormConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub service: Option<Service>,
    pub sections: Vec<SectionConfig>,
    pub fields: Vec<FieldConfig>,
    #[serde(default = "default_submit_label")]
    pub submit_label: String,
    #[serde(default)]
    pub success_message: Option<String>,
}

fn default_submit_label() -> String {
    "Send inquiry".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub pattern_message: Option<String>,
    /// Name of a validator in the [`ValidatorRegistry`].
    pub custom: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub section: String,
    pub order: u32,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub help_text: Option<String>,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub default: Option<FieldValue>,
    #[serde(default)]
    pub validation: ValidationRules,
    #[serde(default)]
    pub condition: Option<Condition>,
}

/// Visibility rule evaluated against another field's current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Condition {
    Equals { field: String, value: String },
    NotEquals { field: String, value: String },
    OneOf { field: String, values: Vec<String> },
    NotEmpty { field: String },
}

impl Condition {
    pub fn dependency(&self) -> &str {
        match self {
            Condition::Equals { field, .. }
            | Condition::NotEquals { field, .. }
            | Condition::OneOf { field, .. }
            | Condition::NotEmpty { field } => field,
        }
    }

    pub fn evaluate(&self, data: &FormData) -> bool {
        let current = data.get(self.dependency());
        match self {
            Condition::Equals { value, .. } => {
                current.map_or(false, |v| v.display_value() == *value)
            }
            Condition::NotEquals { value, .. } => {
                current.map_or(true, |v| v.display_value() != *value)
            }
            Condition::OneOf { values, .. } => current.map_or(false, |v| {
                let shown = v.display_value();
                values.iter().any(|candidate| *candidate == shown)
            }),
            Condition::NotEmpty { .. } => current.map_or(false, |v| !v.is_empty()),
        }
    }
}

impl InquiryFormConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn sorted_sections(&self) -> Vec<&SectionConfig> {
        let mut sections: Vec<&SectionConfig> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.order);
        sections
    }

    pub fn fields_in_section(&self, section: &str) -> Vec<&FieldConfig> {
        let mut fields: Vec<&FieldConfig> =
            self.fields.iter().filter(|f| f.section == section).collect();
        fields.sort_by_key(|f| f.order);
        fields
    }

    /// Checks the structural invariants. A failure here is a programming error in the
    /// form definition.
    pub fn validate(&self, registry: &ValidatorRegistry) -> Result<()> {
        let fail = |message: String| -> Result<()> { Err(EngineError::form_config(&self.id, message)) };

        let mut section_names = HashSet::new();
        let mut section_orders = HashSet::new();
        for section in &self.sections {
            if !section_names.insert(section.name.as_str()) {
                return fail(format!("duplicate section '{}'", section.name));
            }
            if !section_orders.insert(section.order) {
                return fail(format!("section '{}' reuses order {}", section.name, section.order));
            }
        }

        let mut field_names = HashSet::new();
        let mut field_orders = HashSet::new();
        for field in &self.fields {
            if !field_names.insert(field.name.as_str()) {
                return fail(format!("duplicate field '{}'", field.name));
            }
            if !section_names.contains(field.section.as_str()) {
                return fail(format!(
                    "field '{}' references unknown section '{}'",
                    field.name, field.section
                ));
            }
            if !field_orders.insert((field.section.as_str(), field.order)) {
                return fail(format!(
                    "field '{}' reuses order {} in section '{}'",
                    field.name, field.order, field.section
                ));
            }
            if field.field_type.is_choice() && field.options.is_empty() {
                return fail(format!("{:?} field '{}' has no options", field.field_type, field.name));
            }
            if let Some(default) = &field.default {
                if !default.matches_type(field.field_type) {
                    return fail(format!("default for '{}' doesn't match its type", field.name));
                }
            }
            if let Some(pattern) = &field.validation.pattern {
                if let Err(e) = regex::Regex::new(pattern) {
                    return fail(format!("field '{}' has an invalid pattern: {}", field.name, e));
                }
            }
            if let Some(custom) = &field.validation.custom {
                if !registry.contains(custom) {
                    return fail(format!(
                        "field '{}' uses unregistered validator '{}'",
                        field.name, custom
                    ));
                }
            }
        }

        for field in &self.fields {
            if let Some(condition) = &field.condition {
                let dependency = condition.dependency();
                if dependency == field.name || !field_names.contains(dependency) {
                    return fail(format!(
                        "field '{}' depends on unknown field '{}'",
                        field.name, dependency
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_json(fields: &str) -> String {
        format!(
            r#"{{
                "id": "test",
                "title": "Test",
                "sections": [
                    {{"name": "contact", "title": "Contact", "order": 1}},
                    {{"name": "details", "title": "Details", "order": 2}}
                ],
                "fields": {}
            }}"#,
            fields
        )
    }

    fn parse(fields: &str) -> InquiryFormConfig {
        InquiryFormConfig::from_json(&base_json(fields)).unwrap()
    }

    #[test]
    fn parses_and_sorts_fields_by_order() {
        let config = parse(
            r#"[
                {"name": "email", "label": "Email", "type": "email", "section": "contact", "order": 2, "required": true},
                {"name": "name", "label": "Name", "type": "text", "section": "contact", "order": 1}
            ]"#,
        );
        let names: Vec<&str> = config.fields_in_section("contact").iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "email"]);
        assert_eq!(config.submit_label, "Send inquiry");
        assert!(config.validate(&ValidatorRegistry::with_builtins()).is_ok());
    }

    #[test]
    fn unknown_section_is_a_config_error() {
        let config = parse(r#"[{"name": "x", "label": "X", "type": "text", "section": "nowhere", "order": 1}]"#);
        let err = config.validate(&ValidatorRegistry::with_builtins()).unwrap_err();
        assert!(err.to_string().contains("unknown section 'nowhere'"));
    }

    #[test]
    fn tied_field_order_is_a_config_error() {
        let config = parse(
            r#"[
                {"name": "a", "label": "A", "type": "text", "section": "contact", "order": 1},
                {"name": "b", "label": "B", "type": "text", "section": "contact", "order": 1}
            ]"#,
        );
        assert!(config.validate(&ValidatorRegistry::with_builtins()).is_err());
    }

    #[test]
    fn condition_on_missing_field_is_a_config_error() {
        let config = parse(
            r#"[{"name": "a", "label": "A", "type": "text", "section": "contact", "order": 1,
                 "condition": {"rule": "equals", "field": "ghost", "value": "x"}}]"#,
        );
        assert!(config.validate(&ValidatorRegistry::with_builtins()).is_err());
    }

    #[test]
    fn choice_field_without_options_is_a_config_error() {
        let config = parse(r#"[{"name": "a", "label": "A", "type": "select", "section": "details", "order": 1}]"#);
        assert!(config.validate(&ValidatorRegistry::with_builtins()).is_err());
    }

    #[test]
    fn unregistered_custom_validator_is_a_config_error() {
        let config = parse(
            r#"[{"name": "a", "label": "A", "type": "text", "section": "details", "order": 1,
                 "validation": {"custom": "no-such-rule"}}]"#,
        );
        assert!(config.validate(&ValidatorRegistry::with_builtins()).is_err());
    }

    #[test]
    fn conditions_evaluate_against_dependency_value() {
        let mut data = FormData::new();
        data.insert("format".into(), FieldValue::Choice("online".into()));
        data.insert("newsletter".into(), FieldValue::Bool(true));

        let equals = Condition::Equals { field: "format".into(), value: "online".into() };
        let not_equals = Condition::NotEquals { field: "format".into(), value: "online".into() };
        let one_of = Condition::OneOf {
            field: "format".into(),
            values: vec!["in-person".into(), "online".into()],
        };
        let checked = Condition::Equals { field: "newsletter".into(), value: "true".into() };
        let not_empty_missing = Condition::NotEmpty { field: "notes".into() };

        assert!(equals.evaluate(&data));
        assert!(!not_equals.evaluate(&data));
        assert!(one_of.evaluate(&data));
        assert!(checked.evaluate(&data));
        assert!(!not_empty_missing.evaluate(&data));
    }
}
