//! Per-category averages.
//!
//! Averages are recomputed from the scoring store on every call; nothing is
//! cached. Categories always have at least one attribute, so the mean is
//! always defined.

use crate::scoring::ScoringStore;
use crate::types::{Partner, PartnerAverages, ValidationError};

/// Mean of a partner's ratings over every attribute in `category`.
pub fn average_for(
    store: &ScoringStore,
    partner: Partner,
    category: &str,
) -> Result<f64, ValidationError> {
    let ratings = store.category_ratings(partner, category)?;
    let total: u32 = ratings.iter().map(|r| u32::from(r.value())).sum();

    Ok(f64::from(total) / ratings.len() as f64)
}

/// Both partners' averages for `category`.
pub fn averages_for(
    store: &ScoringStore,
    category: &str,
) -> Result<PartnerAverages, ValidationError> {
    Ok(PartnerAverages {
        one: average_for(store, Partner::One, category)?,
        two: average_for(store, Partner::Two, category)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::Assessment;
    use std::sync::Arc;

    fn store_with_default(default_rating: u8) -> ScoringStore {
        let yaml = format!(
            r#"
assessment_version: "1.0"
name: "Test"
default_rating: {}
categories:
  - name: "Household"
    attributes: ["Laundry", "Meal Planning"]
    advice: {{ struggle: "S", complementary: "C" }}
  - name: "Finance"
    attributes: ["Bills", "Saving", "Filing"]
    advice: {{ struggle: "S", complementary: "C" }}
"#,
            default_rating
        );
        ScoringStore::new(Arc::new(Assessment::from_yaml(&yaml).unwrap()))
    }

    #[test]
    fn test_defaults_average_to_default() {
        assert_eq!(
            average_for(&store_with_default(3), Partner::One, "Household").unwrap(),
            3.0
        );
        assert_eq!(
            average_for(&store_with_default(1), Partner::Two, "Finance").unwrap(),
            1.0
        );
    }

    #[test]
    fn test_household_scenario() {
        let mut store = store_with_default(3);
        for attribute in ["Laundry", "Meal Planning"] {
            store.set_rating(Partner::One, "Household", attribute, 4).unwrap();
            store.set_rating(Partner::Two, "Household", attribute, 2).unwrap();
        }

        let averages = averages_for(&store, "Household").unwrap();
        assert_eq!(averages, PartnerAverages { one: 4.0, two: 2.0 });
    }

    #[test]
    fn test_uses_floating_point_division() {
        let mut store = store_with_default(1);
        store.set_rating(Partner::One, "Finance", "Bills", 2).unwrap();
        let average = average_for(&store, Partner::One, "Finance").unwrap();
        assert!((average - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_category() {
        let store = store_with_default(3);
        assert_eq!(
            averages_for(&store, "Garden"),
            Err(ValidationError::UnknownCategory("Garden".to_string()))
        );
    }
}
