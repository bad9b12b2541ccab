// Per-field validation rules and the registry of named custom validators.
use super::config::FieldConfig;
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use site_shared::models::{FieldType, FieldValue, FormData};
use std::collections::HashMap;
use std::fmt;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PATTERN_MESSAGE: &str = "Please enter a valid value";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub type CustomValidator = Box<dyn Fn(&FieldValue, &FormData) -> Option<String>>;

/// Named validators that form configs can refer to by string.
pub struct ValidatorRegistry {
    validators: HashMap<String, CustomValidator>,
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.validators.keys().collect();
        names.sort();
        f.debug_struct("ValidatorRegistry").field("validators", &names).finish()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ValidatorRegistry {
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// `future-date` and `phone`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("future-date", |value, _| future_date(value));
        registry.register("phone", |value, _| phone(value));
        registry
    }

    pub fn register(
        &mut self,
        name: &str,
        validator: impl Fn(&FieldValue, &FormData) -> Option<String> + 'static,
    ) {
        self.validators.insert(name.to_string(), Box::new(validator));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    pub fn run(&self, name: &str, value: &FieldValue, data: &FormData) -> Option<String> {
        self.validators.get(name).and_then(|validator| validator(value, data))
    }
}

fn future_date(value: &FieldValue) -> Option<String> {
    let raw = value.as_str()?.trim();
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) if date > Local::now().date_naive() => None,
        Ok(_) => Some("Please choose a date in the future".to_string()),
        Err(_) => Some("Please enter a valid date".to_string()),
    }
}

fn phone(value: &FieldValue) -> Option<String> {
    let digits = value.as_str()?.chars().filter(|c| c.is_ascii_digit()).count();
    if digits >= 10 {
        None
    } else {
        Some("Please enter a valid phone number".to_string())
    }
}

/// Validates one visible field. `pattern` is the field's compiled pattern, if any.
pub fn validate_field(
    field: &FieldConfig,
    value: Option<&FieldValue>,
    data: &FormData,
    pattern: Option<&Regex>,
    registry: &ValidatorRegistry,
) -> Option<String> {
    let empty = value.map_or(true, FieldValue::is_empty);
    if empty {
        return field.required.then(|| REQUIRED_MESSAGE.to_string());
    }
    let value = value?;
    let rules = &field.validation;

    if let Some(text) = value.as_str() {
        let length = text.chars().count();
        if let Some(min) = rules.min_length {
            if length < min {
                return Some(format!("Must be at least {} characters", min));
            }
        }
        if let Some(max) = rules.max_length {
            if length > max {
                return Some(format!("Must be at most {} characters", max));
            }
        }

        let is_email = field.field_type == FieldType::Email;
        let regex = pattern.or_else(|| is_email.then(|| &*EMAIL_PATTERN));
        if let Some(regex) = regex {
            if !regex.is_match(text.trim()) {
                let message = match (&rules.pattern_message, is_email) {
                    (Some(custom), _) => custom.clone(),
                    (None, true) => EMAIL_MESSAGE.to_string(),
                    (None, false) => PATTERN_MESSAGE.to_string(),
                };
                return Some(message);
            }
        }
    }

    rules
        .custom
        .as_deref()
        .and_then(|name| registry.run(name, value, data))
}
