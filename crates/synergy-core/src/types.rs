//! Core value types shared across the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lowest rating on the scale (attribute comes easily).
pub const MIN_RATING: u8 = 1;

/// Highest rating on the scale (attribute is a struggle).
pub const MAX_RATING: u8 = 5;

/// Rating every attribute starts at before anyone touches it.
pub const DEFAULT_RATING: Rating = Rating(3);

/// Rejected input at the point of write or lookup.
///
/// Values are never clamped or coerced; the caller decides how to surface
/// the rejection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Rating {value} is outside the allowed range {min}..={max}", min = MIN_RATING, max = MAX_RATING)]
    RatingOutOfRange { value: i64 },

    #[error("Average {value} is outside the rating scale {min}..={max}", min = MIN_RATING, max = MAX_RATING)]
    AverageOutOfRange { value: f64 },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown attribute '{attribute}' in category '{category}'")]
    UnknownAttribute { category: String, attribute: String },
}

/// One of the two partners taking the assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partner {
    One,
    Two,
}

impl Partner {
    /// Both partners, in display order.
    pub const BOTH: [Partner; 2] = [Partner::One, Partner::Two];

    /// The other partner.
    pub fn other(self) -> Partner {
        match self {
            Partner::One => Partner::Two,
            Partner::Two => Partner::One,
        }
    }
}

impl fmt::Display for Partner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partner::One => write!(f, "Partner 1"),
            Partner::Two => write!(f, "Partner 2"),
        }
    }
}

/// A validated rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Validate a raw value. Out-of-range input is rejected, never clamped.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (MIN_RATING as i64..=MAX_RATING as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::RatingOutOfRange { value })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Rating::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Display labels for the two partners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerLabels {
    #[serde(default = "default_label_one")]
    pub one: String,

    #[serde(default = "default_label_two")]
    pub two: String,
}

fn default_label_one() -> String {
    Partner::One.to_string()
}

fn default_label_two() -> String {
    Partner::Two.to_string()
}

impl Default for PartnerLabels {
    fn default() -> Self {
        Self {
            one: default_label_one(),
            two: default_label_two(),
        }
    }
}

impl PartnerLabels {
    pub fn label(&self, partner: Partner) -> &str {
        match partner {
            Partner::One => &self.one,
            Partner::Two => &self.two,
        }
    }
}

/// Both partners' averages for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartnerAverages {
    pub one: f64,
    pub two: f64,
}

impl PartnerAverages {
    pub fn get(&self, partner: Partner) -> f64 {
        match partner {
            Partner::One => self.one,
            Partner::Two => self.two,
        }
    }

    /// Reject averages that could not come from `1..=5` ratings, NaN included.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let scale = f64::from(MIN_RATING)..=f64::from(MAX_RATING);
        for value in [self.one, self.two] {
            if !scale.contains(&value) {
                return Err(ValidationError::AverageOutOfRange { value });
            }
        }
        Ok(())
    }

    /// Mean of the two partners' averages.
    pub fn combined(&self) -> f64 {
        (self.one + self.two) / 2.0
    }

    /// Absolute difference between the two partners' averages.
    pub fn gap(&self) -> f64 {
        (self.one - self.two).abs()
    }
}

/// Which advice rule fired for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdviceTag {
    /// Both partners find this category hard.
    SharedStruggle,

    /// One partner is clearly better placed to lead.
    LeadSupport { leader: Partner },

    /// Neither partner is struggling and the gap is small.
    Balanced,
}

impl AdviceTag {
    pub fn is_shared_struggle(&self) -> bool {
        matches!(self, AdviceTag::SharedStruggle)
    }

    pub fn is_lead_support(&self) -> bool {
        matches!(self, AdviceTag::LeadSupport { .. })
    }

    pub fn is_balanced(&self) -> bool {
        matches!(self, AdviceTag::Balanced)
    }

    /// The leading partner, if this is a lead/support result.
    pub fn leader(&self) -> Option<Partner> {
        match self {
            AdviceTag::LeadSupport { leader } => Some(*leader),
            _ => None,
        }
    }
}

/// Tagged advice for a category plus its rendered text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceResult {
    pub tag: AdviceTag,
    pub text: String,
}
