//! Advice engine: maps a category's two averages to tagged advice.
//!
//! Rules are evaluated in strict priority order, first match wins:
//! 1. Combined average >= shared-struggle threshold → SHARED STRUGGLE
//! 2. Else gap >= lead threshold → LEAD/SUPPORT, lower average leads
//! 3. Else → BALANCED
//!
//! Lower ratings mean a behavior comes more easily, so the partner with the
//! lower average is the one placed to lead.

use std::sync::Arc;

use crate::assessment::{Assessment, Category, Thresholds};
use crate::types::{AdviceResult, AdviceTag, Partner, PartnerAverages, ValidationError};

/// Apply the advice rules to a pair of averages.
///
/// Pure and deterministic. When an overridden gap threshold of zero lets
/// equal averages reach rule 2, Partner 1 is named leader.
pub fn classify(averages: PartnerAverages, thresholds: &Thresholds) -> AdviceTag {
    // Rule 1: struggle is checked before the gap
    if averages.combined() >= thresholds.shared_struggle {
        return AdviceTag::SharedStruggle;
    }

    // Rule 2: a large gap means the lower-scoring partner leads
    if averages.gap() >= thresholds.lead_gap {
        let leader = if averages.two < averages.one {
            Partner::Two
        } else {
            Partner::One
        };
        return AdviceTag::LeadSupport { leader };
    }

    // Rule 3
    AdviceTag::Balanced
}

/// Produces advice for categories of one assessment.
#[derive(Debug, Clone)]
pub struct AdviceEngine {
    assessment: Arc<Assessment>,
    thresholds: Thresholds,
}

impl AdviceEngine {
    /// Engine using the assessment's own thresholds.
    pub fn new(assessment: Arc<Assessment>) -> Self {
        let thresholds = *assessment.thresholds();
        Self {
            assessment,
            thresholds,
        }
    }

    /// Override the policy thresholds.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Advice for `category` given each partner's average.
    ///
    /// Averages must lie on the rating scale; NaN or off-scale values are
    /// rejected rather than classified.
    pub fn advice_for(
        &self,
        category: &str,
        p1_average: f64,
        p2_average: f64,
    ) -> Result<AdviceResult, ValidationError> {
        self.advise(
            category,
            PartnerAverages {
                one: p1_average,
                two: p2_average,
            },
        )
    }

    /// Advice for `category` given both partners' averages.
    pub fn advise(
        &self,
        category: &str,
        averages: PartnerAverages,
    ) -> Result<AdviceResult, ValidationError> {
        let category = self.assessment.require_category(category)?;
        averages.validate()?;
        let tag = classify(averages, &self.thresholds);

        tracing::debug!(
            category = %category.name,
            p1 = averages.one,
            p2 = averages.two,
            tag = ?tag,
            "Advice selected"
        );

        Ok(AdviceResult {
            tag,
            text: self.render(category, tag),
        })
    }

    fn render(&self, category: &Category, tag: AdviceTag) -> String {
        match tag {
            AdviceTag::SharedStruggle => {
                let marker = self.assessment.severity_marker().trim();
                if marker.is_empty() {
                    category.advice.struggle.clone()
                } else {
                    format!("{} {}", marker, category.advice.struggle)
                }
            }
            AdviceTag::LeadSupport { leader } => {
                let labels = self.assessment.partners();
                category
                    .advice
                    .complementary
                    .replace("{leader}", labels.label(leader))
                    .replace("{support}", labels.label(leader.other()))
            }
            AdviceTag::Balanced => self
                .assessment
                .balanced_template()
                .replace("{category}", &category.name),
        }
    }
}
