use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// --- Theme ---

/// User-selected theme preference. This is what gets persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
            ThemeMode::System => "System",
        }
    }

    /// light -> dark -> system -> light
    pub fn next(&self) -> ThemeMode {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::System,
            ThemeMode::System => ThemeMode::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidThemeMode(pub String);

impl fmt::Display for InvalidThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid theme mode '{}', expected light, dark or system", self.0)
    }
}

impl std::error::Error for InvalidThemeMode {}

impl FromStr for ThemeMode {
    type Err = InvalidThemeMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            other => Err(InvalidThemeMode(other.to_string())),
        }
    }
}

impl From<ActiveTheme> for ThemeMode {
    fn from(theme: ActiveTheme) -> Self {
        match theme {
            ActiveTheme::Light => ThemeMode::Light,
            ActiveTheme::Dark => ThemeMode::Dark,
        }
    }
}

/// The theme actually rendered. Never "system".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActiveTheme {
    #[default]
    Light,
    Dark,
}

impl ActiveTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveTheme::Light => "light",
            ActiveTheme::Dark => "dark",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            ActiveTheme::Light => "theme-light",
            ActiveTheme::Dark => "theme-dark",
        }
    }

    pub fn opposite(&self) -> ActiveTheme {
        match self {
            ActiveTheme::Light => ActiveTheme::Dark,
            ActiveTheme::Dark => ActiveTheme::Light,
        }
    }
}

impl fmt::Display for ActiveTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named color roles. Both palettes are values of this one struct, so a role
/// can't exist in one and be missing from the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub primary_hover: String,
    pub primary_active: String,
    pub secondary: String,
    pub secondary_hover: String,
    pub secondary_active: String,
    pub background: String,
    pub background_secondary: String,
    pub background_tertiary: String,
    pub surface: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub text_tertiary: String,
    pub text_inverse: String,
    pub border: String,
    pub divider: String,
    pub success: String,
    pub warning: String,
    pub error: String,
    pub info: String,
    pub accent: String,
    pub shadow: String,
    pub overlay: String,
}

impl ThemeColors {
    /// `(role, value)` pairs in a stable order.
    pub fn roles(&self) -> [(&'static str, &str); 23] {
        [
            ("primary", &self.primary),
            ("primary-hover", &self.primary_hover),
            ("primary-active", &self.primary_active),
            ("secondary", &self.secondary),
            ("secondary-hover", &self.secondary_hover),
            ("secondary-active", &self.secondary_active),
            ("background", &self.background),
            ("background-secondary", &self.background_secondary),
            ("background-tertiary", &self.background_tertiary),
            ("surface", &self.surface),
            ("text-primary", &self.text_primary),
            ("text-secondary", &self.text_secondary),
            ("text-tertiary", &self.text_tertiary),
            ("text-inverse", &self.text_inverse),
            ("border", &self.border),
            ("divider", &self.divider),
            ("success", &self.success),
            ("warning", &self.warning),
            ("error", &self.error),
            ("info", &self.info),
            ("accent", &self.accent),
            ("shadow", &self.shadow),
            ("overlay", &self.overlay),
        ]
    }

    /// CSS custom properties, e.g. `("--color-primary-hover", "#1d4ed8")`.
    pub fn css_properties(&self) -> Vec<(String, String)> {
        self.roles()
            .iter()
            .map(|(role, value)| (format!("--color-{}", role), value.to_string()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConfig {
    pub fast_ms: u64,
    pub normal_ms: u64,
    pub slow_ms: u64,
    pub easing: String,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            fast_ms: 150,
            normal_ms: 300,
            slow_ms: 500,
            easing: "cubic-bezier(0.4, 0, 0.2, 1)".to_string(),
        }
    }
}

impl TransitionConfig {
    pub fn css_properties(&self) -> Vec<(String, String)> {
        vec![
            ("--transition-fast".to_string(), format!("{}ms", self.fast_ms)),
            ("--transition-normal".to_string(), format!("{}ms", self.normal_ms)),
            ("--transition-slow".to_string(), format!("{}ms", self.slow_ms)),
            ("--transition-easing".to_string(), self.easing.clone()),
        ]
    }
}

/// Everything a component needs to style itself for the current theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub mode: ThemeMode,
    pub active_theme: ActiveTheme,
    pub colors: ThemeColors,
    pub transitions: TransitionConfig,
}

// --- Services ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Teaching,
    Performance,
    Collaboration,
}

impl Service {
    pub const ALL: [Service; 3] = [Service::Teaching, Service::Performance, Service::Collaboration];

    pub fn label(&self) -> &'static str {
        match self {
            Service::Teaching => "Lessons",
            Service::Performance => "Live Performance",
            Service::Collaboration => "Collaboration",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Service::Teaching => "/teaching",
            Service::Performance => "/performance",
            Service::Collaboration => "/collaboration",
        }
    }

    /// Same literal as the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Teaching => "teaching",
            Service::Performance => "performance",
            Service::Collaboration => "collaboration",
        }
    }
}

impl FromStr for Service {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL.into_iter().find(|service| service.as_str() == s.trim()).ok_or(())
    }
}

// --- Forms ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
    Time,
    Number,
    File,
}

impl FieldType {
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio)
    }

    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldType::Text
                | FieldType::Email
                | FieldType::Tel
                | FieldType::Textarea
                | FieldType::Date
                | FieldType::Time
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub size_bytes: u64,
    pub mime: Option<String>,
}

/// A single form value. A field with no entry in [`FormData`] is "unset".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Choice(String),
    Number(f64),
    File(FileHandle),
}

impl FieldValue {
    /// Empty string, whitespace-only string, `false`, or a nameless file.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) => s.trim().is_empty(),
            FieldValue::Bool(b) => !*b,
            FieldValue::Number(n) => n.is_nan(),
            FieldValue::File(f) => f.name.trim().is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) => Some(s),
            _ => None,
        }
    }

    /// String form used when comparing against declarative conditions.
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) => s.clone(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::File(f) => f.name.clone(),
        }
    }

    /// Whether this variant may be stored in a field of `field_type`.
    pub fn matches_type(&self, field_type: FieldType) -> bool {
        match self {
            FieldValue::Text(_) => field_type.is_textual(),
            FieldValue::Choice(_) => field_type.is_choice(),
            FieldValue::Bool(_) => field_type == FieldType::Checkbox,
            FieldValue::Number(_) => field_type == FieldType::Number,
            FieldValue::File(_) => field_type == FieldType::File,
        }
    }
}

pub type FormData = BTreeMap<String, FieldValue>;

/// Validated payload handed to the submission collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub id: Uuid,
    pub form_id: String,
    pub service: Option<Service>,
    pub submitted_at: DateTime<Utc>,
    pub data: FormData,
}

// --- Pricing ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Bucket a 0..=1 fraction of informative inputs.
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction < 0.5 || fraction.is_nan() {
            Confidence::Low
        } else if fraction < 0.8 {
            Confidence::Medium
        } else {
            Confidence::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAdjustment {
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub range: PriceRange,
    pub base_price: f64,
    pub adjustments: Vec<PriceAdjustment>,
    pub total_adjustment: f64,
    pub confidence: Confidence,
    pub factors: Vec<String>,
    pub consultation_recommended: bool,
    pub estimate_valid_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackagePricing {
    pub lessons: u32,
    pub lesson_minutes: u32,
    pub price_per_lesson: f64,
    pub subtotal: f64,
    pub discount_percent: u32,
    pub savings: f64,
    pub total: f64,
}

// --- Recommendations ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub service: Service,
    pub confidence: f64,
    pub priority: Priority,
    pub reason: String,
    pub context_tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_mode_parses_only_known_literals() {
        assert_eq!("light".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert_eq!(" system ".parse::<ThemeMode>(), Ok(ThemeMode::System));
        assert!("Dark".parse::<ThemeMode>().is_err());
        assert!("".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn theme_mode_serializes_as_lowercase_literal() {
        assert_eq!(serde_json::to_string(&ThemeMode::Dark).unwrap(), "\"dark\"");
    }

    #[test]
    fn whitespace_text_counts_as_empty() {
        assert!(FieldValue::Text("   ".into()).is_empty());
        assert!(FieldValue::Bool(false).is_empty());
        assert!(!FieldValue::Choice("duo".into()).is_empty());
    }

    #[test]
    fn field_value_type_compatibility() {
        assert!(FieldValue::Text("a".into()).matches_type(FieldType::Email));
        assert!(!FieldValue::Text("a".into()).matches_type(FieldType::Select));
        assert!(FieldValue::Bool(true).matches_type(FieldType::Checkbox));
    }

    #[test]
    fn submission_ids_must_be_uuids() {
        let valid = r#"{"id":"6f1c2b0e-8a1d-4c55-9b0a-3a2f4d1e7c90","form_id":"t","service":null,
            "submitted_at":"2026-01-05T10:00:00Z","data":{}}"#;
        let parsed: FormSubmission = serde_json::from_str(valid).unwrap();
        assert_eq!(parsed.id.get_version(), Some(uuid::Version::Random));

        let invalid = valid.replace("6f1c2b0e-8a1d-4c55-9b0a-3a2f4d1e7c90", "a");
        assert!(serde_json::from_str::<FormSubmission>(&invalid).is_err());
    }

    #[test]
    fn service_literals_match_serde() {
        for service in Service::ALL {
            let json = serde_json::to_string(&service).unwrap();
            assert_eq!(json, format!("\"{}\"", service.as_str()));
            assert_eq!(service.as_str().parse::<Service>(), Ok(service));
        }
        assert!("".parse::<Service>().is_err());
    }

    #[test]
    fn confidence_buckets() {
        assert_eq!(Confidence::from_fraction(0.49), Confidence::Low);
        assert_eq!(Confidence::from_fraction(0.5), Confidence::Medium);
        assert_eq!(Confidence::from_fraction(0.8), Confidence::High);
    }

    #[test]
    fn css_properties_cover_every_role() {
        let colors = ThemeColors {
            primary: "a".into(), primary_hover: "a".into(), primary_active: "a".into(),
            secondary: "a".into(), secondary_hover: "a".into(), secondary_active: "a".into(),
            background: "a".into(), background_secondary: "a".into(), background_tertiary: "a".into(),
            surface: "a".into(), text_primary: "a".into(), text_secondary: "a".into(),
            text_tertiary: "a".into(), text_inverse: "a".into(), border: "a".into(),
            divider: "a".into(), success: "a".into(), warning: "a".into(), error: "a".into(),
            info: "a".into(), accent: "a".into(), shadow: "a".into(), overlay: "a".into(),
        };
        let props = colors.css_properties();
        assert_eq!(props.len(), 23);
        assert!(props.iter().any(|(k, _)| k == "--color-text-inverse"));
    }
}
