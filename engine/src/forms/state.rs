// Inquiry form state machine: Closed -> Editing -> Submitting -> Submitted.
use super::config::{FieldConfig, InquiryFormConfig, SectionConfig};
use super::validation::{validate_field, ValidatorRegistry};
use crate::error::{EngineError, Result};
use chrono::Utc;
use regex::Regex;
use site_shared::models::{FieldType, FieldValue, FormData, FormSubmission};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::future::Future;
use std::rc::Rc;
use tracing::{error, info};
use uuid::Uuid;

pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Closed,
    Editing,
    Submitting,
    Submitted,
}

impl FormPhase {
    fn describe(&self) -> &'static str {
        match self {
            FormPhase::Closed => "closed",
            FormPhase::Editing => "editing",
            FormPhase::Submitting => "submitting",
            FormPhase::Submitted => "submitted",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub data: FormData,
    pub errors: FieldErrors,
    pub is_submitting: bool,
    pub is_submitted: bool,
    /// Failure reported by the submission handler, kept apart from field errors.
    pub submission_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitAttempt {
    /// Validation passed; the form is now submitting this payload.
    Ready(FormSubmission),
    Invalid(FieldErrors),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted,
    Invalid(FieldErrors),
    Failed(String),
}

pub struct InquiryForm {
    config: InquiryFormConfig,
    registry: Rc<ValidatorRegistry>,
    patterns: HashMap<String, Regex>,
    phase: FormPhase,
    state: FormState,
}

impl InquiryForm {
    pub fn new(config: InquiryFormConfig) -> Result<Self> {
        Self::with_registry(config, Rc::new(ValidatorRegistry::with_builtins()))
    }

    /// Fails fast when the config breaks a structural invariant.
    pub fn with_registry(config: InquiryFormConfig, registry: Rc<ValidatorRegistry>) -> Result<Self> {
        config.validate(&registry)?;
        let mut patterns = HashMap::new();
        for field in &config.fields {
            if let Some(pattern) = &field.validation.pattern {
                let compiled = Regex::new(pattern)
                    .map_err(|e| EngineError::form_config(&config.id, e.to_string()))?;
                patterns.insert(field.name.clone(), compiled);
            }
        }
        Ok(Self {
            config,
            registry,
            patterns,
            phase: FormPhase::Closed,
            state: FormState::default(),
        })
    }

    pub fn config(&self) -> &InquiryFormConfig {
        &self.config
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Closed
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.state.data.get(name)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.state.errors.get(name).map(String::as_str)
    }

    /// Fresh state: type defaults, then config defaults, then `initial`.
    pub fn open(&mut self, initial: FormData) {
        let mut data = FormData::new();
        for field in &self.config.fields {
            if let Some(value) = Self::initial_value(field) {
                data.insert(field.name.clone(), value);
            }
            if let Some(default) = &field.default {
                data.insert(field.name.clone(), default.clone());
            }
        }
        for (name, value) in initial {
            match self.config.field(&name) {
                Some(field) if value.matches_type(field.field_type) => {
                    data.insert(name, value);
                }
                Some(field) => {
                    tracing::warn!(form = %self.config.id, field = %name, expected = ?field.field_type, "Ignoring initial value of the wrong type");
                }
                None => {
                    tracing::warn!(form = %self.config.id, field = %name, "Ignoring initial value for unknown field");
                }
            }
        }
        self.state = FormState {
            data,
            ..FormState::default()
        };
        self.phase = FormPhase::Editing;
        info!(form = %self.config.id, "Inquiry form opened");
    }

    fn initial_value(field: &FieldConfig) -> Option<FieldValue> {
        match field.field_type {
            FieldType::Checkbox => Some(FieldValue::Bool(false)),
            FieldType::Text
            | FieldType::Email
            | FieldType::Tel
            | FieldType::Textarea
            | FieldType::Date
            | FieldType::Time => Some(FieldValue::Text(String::new())),
            FieldType::Select | FieldType::Radio => {
                field.required.then(|| FieldValue::Choice(String::new()))
            }
            FieldType::Number | FieldType::File => None,
        }
    }

    /// Stores a value and clears that field's error; other errors stay until the next
    /// submit attempt.
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        self.require_phase(FormPhase::Editing, "edit")?;
        let field = self
            .config
            .field(name)
            .ok_or_else(|| EngineError::UnknownField(name.to_string()))?;
        if !value.matches_type(field.field_type) {
            return Err(EngineError::FieldTypeMismatch {
                field: name.to_string(),
                expected: field.field_type,
            });
        }
        self.state.data.insert(name.to_string(), value);
        self.state.errors.remove(name);
        self.state.submission_error = None;
        Ok(())
    }

    /// Unsets a field (e.g. an optional select back to "no choice").
    pub fn clear_field(&mut self, name: &str) -> Result<()> {
        self.require_phase(FormPhase::Editing, "edit")?;
        if self.config.field(name).is_none() {
            return Err(EngineError::UnknownField(name.to_string()));
        }
        self.state.data.remove(name);
        self.state.errors.remove(name);
        Ok(())
    }

    pub fn is_visible(&self, field: &FieldConfig) -> bool {
        field
            .condition
            .as_ref()
            .map_or(true, |condition| condition.evaluate(&self.state.data))
    }

    /// Visible fields in section order, then field order.
    pub fn visible_fields(&self) -> Vec<&FieldConfig> {
        self.visible_sections()
            .into_iter()
            .flat_map(|(_, fields)| fields)
            .collect()
    }

    /// Sections with at least one visible field.
    pub fn visible_sections(&self) -> Vec<(&SectionConfig, Vec<&FieldConfig>)> {
        self.config
            .sorted_sections()
            .into_iter()
            .map(|section| {
                let fields = self
                    .config
                    .fields_in_section(&section.name)
                    .into_iter()
                    .filter(|f| self.is_visible(f))
                    .collect::<Vec<_>>();
                (section, fields)
            })
            .filter(|(_, fields)| !fields.is_empty())
            .collect()
    }

    /// Errors for every visible field; hidden fields are never validated.
    pub fn validate(&self) -> FieldErrors {
        self.visible_fields()
            .into_iter()
            .filter_map(|field| {
                validate_field(
                    field,
                    self.state.data.get(&field.name),
                    &self.state.data,
                    self.patterns.get(&field.name),
                    &self.registry,
                )
                .map(|message| (field.name.clone(), message))
            })
            .collect()
    }

    pub fn begin_submit(&mut self) -> Result<SubmitAttempt> {
        self.require_phase(FormPhase::Editing, "submit")?;
        let errors = self.validate();
        if !errors.is_empty() {
            info!(form = %self.config.id, failing = errors.len(), "Inquiry form has validation errors");
            self.state.errors = errors.clone();
            return Ok(SubmitAttempt::Invalid(errors));
        }

        let data: FormData = self
            .visible_fields()
            .into_iter()
            .filter_map(|field| {
                self.state
                    .data
                    .get(&field.name)
                    .map(|value| (field.name.clone(), value.clone()))
            })
            .collect();
        let submission = FormSubmission {
            id: Uuid::new_v4(),
            form_id: self.config.id.clone(),
            service: self.config.service,
            submitted_at: Utc::now(),
            data,
        };

        self.state.errors.clear();
        self.state.submission_error = None;
        self.state.is_submitting = true;
        self.phase = FormPhase::Submitting;
        Ok(SubmitAttempt::Ready(submission))
    }

    /// Records the handler's verdict. A failure returns to Editing so the user can retry.
    pub fn complete_submission<E: Display>(&mut self, outcome: std::result::Result<(), E>) -> Result<()> {
        self.require_phase(FormPhase::Submitting, "complete a submission")?;
        self.state.is_submitting = false;
        match outcome {
            Ok(()) => {
                self.state.is_submitted = true;
                self.phase = FormPhase::Submitted;
                info!(form = %self.config.id, "Inquiry submitted");
            }
            Err(e) => {
                error!(form = %self.config.id, "Inquiry submission failed: {}", e);
                self.state.submission_error = Some(e.to_string());
                self.phase = FormPhase::Editing;
            }
        }
        Ok(())
    }

    /// Validates, hands the payload to `handler` and records the result.
    pub async fn submit<F, Fut, E>(&mut self, handler: F) -> Result<SubmitOutcome>
    where
        F: FnOnce(FormSubmission) -> Fut,
        Fut: Future<Output = std::result::Result<(), E>>,
        E: Display,
    {
        let submission = match self.begin_submit()? {
            SubmitAttempt::Ready(submission) => submission,
            SubmitAttempt::Invalid(errors) => return Ok(SubmitOutcome::Invalid(errors)),
        };
        let outcome = handler(submission).await;
        let failure = outcome.as_ref().err().map(|e| e.to_string());
        self.complete_submission(outcome)?;
        Ok(match failure {
            Some(message) => SubmitOutcome::Failed(message),
            None => SubmitOutcome::Submitted,
        })
    }

    /// Discards everything, from any phase.
    pub fn close(&mut self) {
        if self.phase != FormPhase::Closed {
            info!(form = %self.config.id, from = self.phase.describe(), "Inquiry form closed");
        }
        self.state = FormState::default();
        self.phase = FormPhase::Closed;
    }

    pub fn cancel(&mut self) {
        self.close();
    }

    /// Escape closes an open form. Returns whether the key was handled.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if key == "Escape" && self.is_open() {
            self.close();
            return true;
        }
        false
    }

    fn require_phase(&self, expected: FormPhase, action: &'static str) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidFormState {
                form: self.config.id.clone(),
                action,
                state: self.phase.describe(),
            })
        }
    }
}
