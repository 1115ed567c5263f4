//! Assessment parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_assessment_schema;
use crate::types::{PartnerLabels, Rating, ValidationError, DEFAULT_RATING};

/// Built-in assessment shipped with the crate.
const BUILTIN_ASSESSMENT: &str = include_str!("../../assessments/builtin.yaml");

/// Combined-average threshold at or above which a category is a shared struggle.
pub const DEFAULT_SHARED_STRUGGLE_THRESHOLD: f64 = 4.0;

/// Gap at or above which the lower-scoring partner should lead.
pub const DEFAULT_LEAD_GAP_THRESHOLD: f64 = 1.5;

const DEFAULT_SEVERITY_MARKER: &str = "[HIGH PRIORITY]";

const DEFAULT_BALANCED_TEMPLATE: &str =
    "You are well balanced in {category}. Keep doing what works and check in regularly.";

/// Errors raised while loading an assessment. All of them are fatal: no
/// `Assessment` value exists until every check has passed.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Failed to read assessment file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Assessment does not match schema: {}", .0.join("; "))]
    Schema(Vec<String>),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid assessment: {0}")]
    Invalid(String),
}

/// Advice text for one category. Both slots are required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdviceTemplates {
    /// Shown when both partners struggle with the category.
    pub struggle: String,

    /// Shown when one partner should lead. `{leader}` and `{support}` are
    /// replaced with partner labels.
    pub complementary: String,
}

/// A named group of attributes rated by both partners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub name: String,

    /// Ordered attribute names, unique within the category.
    pub attributes: Vec<String>,

    pub advice: AdviceTemplates,
}

impl Category {
    /// Position of an attribute within this category.
    pub fn attribute_index(&self, attribute: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a == attribute)
    }
}

/// Policy thresholds for the advice rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Thresholds {
    #[serde(default = "default_shared_struggle")]
    pub shared_struggle: f64,

    #[serde(default = "default_lead_gap")]
    pub lead_gap: f64,
}

fn default_shared_struggle() -> f64 {
    DEFAULT_SHARED_STRUGGLE_THRESHOLD
}

fn default_lead_gap() -> f64 {
    DEFAULT_LEAD_GAP_THRESHOLD
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            shared_struggle: DEFAULT_SHARED_STRUGGLE_THRESHOLD,
            lead_gap: DEFAULT_LEAD_GAP_THRESHOLD,
        }
    }
}

fn default_rating() -> Rating {
    DEFAULT_RATING
}

fn default_severity_marker() -> String {
    DEFAULT_SEVERITY_MARKER.to_string()
}

fn default_balanced_template() -> String {
    DEFAULT_BALANCED_TEMPLATE.to_string()
}

/// Assessment document as written, before semantic validation.
#[derive(Deserialize)]
struct AssessmentDocument {
    assessment_version: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "default_rating")]
    default_rating: Rating,
    #[serde(default)]
    partners: PartnerLabels,
    #[serde(default)]
    thresholds: Thresholds,
    #[serde(default = "default_severity_marker")]
    severity_marker: String,
    #[serde(default = "default_balanced_template")]
    balanced_template: String,
    categories: Vec<Category>,
}

/// A validated assessment: category schema, advice table and policy.
///
/// Only obtainable through the loaders or deserialization, both of which
/// run the full validation first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "AssessmentDocument")]
pub struct Assessment {
    /// Version of this assessment document (semver)
    assessment_version: String,

    /// Human-readable name
    name: String,

    description: Option<String>,

    /// Rating used for attributes nobody has rated yet
    default_rating: Rating,

    partners: PartnerLabels,

    thresholds: Thresholds,

    /// Prefix for shared-struggle advice
    severity_marker: String,

    /// Category-independent text for balanced results. `{category}` is
    /// replaced with the category name.
    balanced_template: String,

    /// Ordered categories
    categories: Vec<Category>,
}

impl TryFrom<AssessmentDocument> for Assessment {
    type Error = ConfigurationError;

    fn try_from(document: AssessmentDocument) -> Result<Self, Self::Error> {
        let assessment = Assessment {
            assessment_version: document.assessment_version,
            name: document.name,
            description: document.description,
            default_rating: document.default_rating,
            partners: document.partners,
            thresholds: document.thresholds,
            severity_marker: document.severity_marker,
            balanced_template: document.balanced_template,
            categories: document.categories,
        };
        assessment.validate()?;
        Ok(assessment)
    }
}

impl Assessment {
    /// The assessment embedded in the crate.
    pub fn builtin() -> Result<Self, ConfigurationError> {
        Self::from_yaml(BUILTIN_ASSESSMENT)
    }

    /// Parse an assessment from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigurationError> {
        let document: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_document(document)
    }

    /// Parse an assessment from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Parse an assessment from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse an assessment from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load from a file, choosing JSON for `.json` and YAML otherwise.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_yaml_file(path)
        }
    }

    fn from_document(document: serde_json::Value) -> Result<Self, ConfigurationError> {
        validate_assessment_schema(&document).map_err(ConfigurationError::Schema)?;
        let document: AssessmentDocument = serde_json::from_value(document)?;
        let assessment = Assessment::try_from(document)?;

        tracing::debug!(
            name = %assessment.name,
            categories = assessment.categories.len(),
            "Assessment loaded"
        );
        Ok(assessment)
    }

    /// Validate the semantic rules the schema cannot express.
    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.name.trim().is_empty() {
            return Err(ConfigurationError::MissingField("name".to_string()));
        }

        if self.categories.is_empty() {
            return Err(ConfigurationError::MissingField("categories".to_string()));
        }

        for (field, value) in [
            ("thresholds.shared_struggle", self.thresholds.shared_struggle),
            ("thresholds.lead_gap", self.thresholds.lead_gap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::Invalid(format!(
                    "{} must be a non-negative number, got {}",
                    field, value
                )));
            }
        }

        if self.balanced_template.trim().is_empty() {
            return Err(ConfigurationError::MissingField(
                "balanced_template".to_string(),
            ));
        }

        self.validate_categories()
    }

    /// Every category needs a unique name, at least one attribute, unique
    /// attributes, and both advice templates.
    fn validate_categories(&self) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::new();

        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(ConfigurationError::MissingField("categories[].name".to_string()));
            }

            if !seen.insert(category.name.as_str()) {
                return Err(ConfigurationError::Invalid(format!(
                    "Duplicate category: {}",
                    category.name
                )));
            }

            if category.attributes.is_empty() {
                return Err(ConfigurationError::Invalid(format!(
                    "Category '{}' has no attributes",
                    category.name
                )));
            }

            let mut attributes = HashSet::new();
            for attribute in &category.attributes {
                if !attributes.insert(attribute.as_str()) {
                    return Err(ConfigurationError::Invalid(format!(
                        "Duplicate attribute '{}' in category '{}'",
                        attribute, category.name
                    )));
                }
            }

            if category.advice.struggle.trim().is_empty() {
                return Err(ConfigurationError::MissingField(format!(
                    "categories[{}].advice.struggle",
                    category.name
                )));
            }

            if category.advice.complementary.trim().is_empty() {
                return Err(ConfigurationError::MissingField(format!(
                    "categories[{}].advice.complementary",
                    category.name
                )));
            }
        }

        Ok(())
    }

    pub fn assessment_version(&self) -> &str {
        &self.assessment_version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn default_rating(&self) -> Rating {
        self.default_rating
    }

    pub fn partners(&self) -> &PartnerLabels {
        &self.partners
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn severity_marker(&self) -> &str {
        &self.severity_marker
    }

    pub fn balanced_template(&self) -> &str {
        &self.balanced_template
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Look up a category by name, rejecting unknown names.
    pub fn require_category(&self, name: &str) -> Result<&Category, ValidationError> {
        self.category(name)
            .ok_or_else(|| ValidationError::UnknownCategory(name.to_string()))
    }

    /// Category names in schema order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Total number of rated attributes per partner.
    pub fn attribute_count(&self) -> usize {
        self.categories.iter().map(|c| c.attributes.len()).sum()
    }
}
