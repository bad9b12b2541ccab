use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Preference storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Media query unsupported: {0}")]
    MediaQueryUnsupported(String),

    #[error("Form configuration error in '{form}': {message}")]
    FormConfig { form: String, message: String },

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Field '{field}' expects a {expected:?} value")]
    FieldTypeMismatch {
        field: String,
        expected: site_shared::models::FieldType,
    },

    #[error("Form '{form}' cannot {action} while {state}")]
    InvalidFormState {
        form: String,
        action: &'static str,
        state: &'static str,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    // Errors raised by caller-supplied validators or submission handlers
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

impl EngineError {
    pub(crate) fn form_config(form: &str, message: impl Into<String>) -> Self {
        EngineError::FormConfig {
            form: form.to_string(),
            message: message.into(),
        }
    }
}
