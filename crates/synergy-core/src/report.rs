//! The reveal payload: averages, advice, radar series and the win log.
//!
//! A `Report` carries everything the presentation and export collaborators
//! need; it holds no format-specific logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::advice::AdviceEngine;
use crate::averaging::averages_for;
use crate::scoring::ScoringStore;
use crate::session::WinEntry;
use crate::types::{AdviceResult, AdviceTag, Partner, PartnerAverages, ValidationError};

/// Results for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: String,
    pub averages: PartnerAverages,
    pub advice: AdviceResult,

    /// The partners' free-text note for this category (may be empty)
    #[serde(default)]
    pub note: String,
}

/// One partner's polygon on the radar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarSeries {
    pub partner: Partner,
    pub label: String,

    /// One value per axis, in axis order
    pub values: Vec<f64>,
}

impl RadarSeries {
    /// Values with the first point repeated at the end, closing the polygon.
    pub fn closed_values(&self) -> Vec<f64> {
        let mut values = self.values.clone();
        if let Some(first) = self.values.first() {
            values.push(*first);
        }
        values
    }
}

/// Radar chart data: one axis per category, one series per partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarChart {
    pub axes: Vec<String>,
    pub series: Vec<RadarSeries>,
}

impl RadarChart {
    /// Axes with the first repeated at the end, matching `closed_values`.
    pub fn closed_axes(&self) -> Vec<String> {
        let mut axes = self.axes.clone();
        if let Some(first) = self.axes.first() {
            axes.push(first.clone());
        }
        axes
    }
}

/// Counts of each advice outcome across categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceSummary {
    pub shared_struggle: usize,
    pub lead_support: usize,
    pub balanced: usize,
}

/// Full results for a session, in category order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub assessment: String,
    pub categories: Vec<CategoryReport>,
    pub radar: RadarChart,
    pub wins: Vec<WinEntry>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Compute a fresh report from the current ratings.
    pub fn build(
        store: &ScoringStore,
        engine: &AdviceEngine,
        notes: &HashMap<String, String>,
        wins: &[WinEntry],
    ) -> Result<Self, ValidationError> {
        let assessment = store.assessment();
        let mut categories = Vec::with_capacity(assessment.categories().len());

        for category in assessment.categories() {
            let averages = averages_for(store, &category.name)?;
            let advice = engine.advise(&category.name, averages)?;

            categories.push(CategoryReport {
                category: category.name.clone(),
                averages,
                advice,
                note: notes.get(&category.name).cloned().unwrap_or_default(),
            });
        }

        let radar = RadarChart {
            axes: categories.iter().map(|c| c.category.clone()).collect(),
            series: Partner::BOTH
                .into_iter()
                .map(|partner| RadarSeries {
                    partner,
                    label: assessment.partners().label(partner).to_string(),
                    values: categories.iter().map(|c| c.averages.get(partner)).collect(),
                })
                .collect(),
        };

        Ok(Self {
            assessment: assessment.name().to_string(),
            categories,
            radar,
            wins: wins.to_vec(),
            generated_at: Utc::now(),
        })
    }

    /// Look up one category's results.
    pub fn category(&self, name: &str) -> Option<&CategoryReport> {
        self.categories.iter().find(|c| c.category == name)
    }

    pub fn summary(&self) -> AdviceSummary {
        self.categories
            .iter()
            .fold(AdviceSummary::default(), |mut summary, c| {
                match c.advice.tag {
                    AdviceTag::SharedStruggle => summary.shared_struggle += 1,
                    AdviceTag::LeadSupport { .. } => summary.lead_support += 1,
                    AdviceTag::Balanced => summary.balanced += 1,
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::Assessment;
    use std::sync::Arc;

    fn fixtures() -> (ScoringStore, AdviceEngine) {
        let assessment = Arc::new(
            Assessment::from_yaml(
                r#"
assessment_version: "1.0"
name: "Test"
partners: { one: "Sam", two: "Alex" }
categories:
  - name: "Household"
    attributes: ["Laundry", "Meal Planning"]
    advice: { struggle: "S", complementary: "{leader} leads." }
  - name: "Finance"
    attributes: ["Bills"]
    advice: { struggle: "Money is hard.", complementary: "{leader} budgets." }
"#,
            )
            .unwrap(),
        );
        (
            ScoringStore::new(Arc::clone(&assessment)),
            AdviceEngine::new(assessment),
        )
    }

    #[test]
    fn test_report_follows_category_order() {
        let (mut store, engine) = fixtures();
        for attribute in ["Laundry", "Meal Planning"] {
            store.set_rating(Partner::One, "Household", attribute, 4).unwrap();
            store.set_rating(Partner::Two, "Household", attribute, 2).unwrap();
        }
        store.set_rating(Partner::One, "Finance", "Bills", 5).unwrap();
        store.set_rating(Partner::Two, "Finance", "Bills", 4).unwrap();

        let mut notes = HashMap::new();
        notes.insert("Finance".to_string(), "Sort out the joint account".to_string());

        let report = Report::build(&store, &engine, &notes, &[]).unwrap();

        assert_eq!(report.assessment, "Test");
        let household = report.category("Household").unwrap();
        assert_eq!(household.averages, PartnerAverages { one: 4.0, two: 2.0 });
        assert_eq!(household.advice.text, "Alex leads.");
        assert_eq!(household.note, "");

        let finance = report.category("Finance").unwrap();
        assert!(finance.advice.tag.is_shared_struggle());
        assert_eq!(finance.note, "Sort out the joint account");

        assert_eq!(
            report.summary(),
            AdviceSummary {
                shared_struggle: 1,
                lead_support: 1,
                balanced: 0,
            }
        );
    }

    #[test]
    fn test_radar_series() {
        let (mut store, engine) = fixtures();
        store.set_rating(Partner::Two, "Finance", "Bills", 1).unwrap();

        let report = Report::build(&store, &engine, &HashMap::new(), &[]).unwrap();
        let radar = &report.radar;

        assert_eq!(radar.axes, vec!["Household", "Finance"]);
        assert_eq!(radar.closed_axes(), vec!["Household", "Finance", "Household"]);
        assert_eq!(radar.series.len(), 2);
        assert_eq!(radar.series[0].label, "Sam");
        assert_eq!(radar.series[1].values, vec![3.0, 1.0]);
        assert_eq!(radar.series[1].closed_values(), vec![3.0, 1.0, 3.0]);
    }

    #[test]
    fn test_report_serializes() {
        let (store, engine) = fixtures();
        let report = Report::build(&store, &engine, &HashMap::new(), &[]).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["categories"][0]["advice"]["tag"]["kind"], "balanced");
        assert_eq!(json["radar"]["series"][1]["partner"], "two");
    }
}
