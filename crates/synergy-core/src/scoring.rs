//! Scoring store: one rating per partner per attribute.
//!
//! Unrated attributes read back as the assessment's default rating, so every
//! attribute has a defined value at all times. Writes are last-write-wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::assessment::Assessment;
use crate::types::{Partner, Rating, ValidationError};

/// Position of one attribute in the assessment, per partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct RatingKey {
    partner: Partner,
    category: usize,
    attribute: usize,
}

/// Per-partner, per-attribute ratings for one assessment.
#[derive(Debug, Clone)]
pub struct ScoringStore {
    assessment: Arc<Assessment>,
    default_rating: Rating,
    ratings: BTreeMap<RatingKey, Rating>,
}

impl ScoringStore {
    pub fn new(assessment: Arc<Assessment>) -> Self {
        let default_rating = assessment.default_rating();
        Self {
            assessment,
            default_rating,
            ratings: BTreeMap::new(),
        }
    }

    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    /// The rating every unrated attribute reads as.
    pub fn default_rating(&self) -> Rating {
        self.default_rating
    }

    /// Record a rating, overwriting any earlier value for the same attribute.
    ///
    /// Rejects unknown categories/attributes and values outside `1..=5`.
    pub fn set_rating(
        &mut self,
        partner: Partner,
        category: &str,
        attribute: &str,
        value: i64,
    ) -> Result<Rating, ValidationError> {
        let key = self.key(partner, category, attribute)?;
        let rating = Rating::new(value)?;

        self.ratings.insert(key, rating);
        tracing::debug!(
            partner = %partner,
            category,
            attribute,
            rating = rating.value(),
            "Rating recorded"
        );
        Ok(rating)
    }

    /// Current rating, or the default if this attribute was never rated.
    pub fn get_rating(
        &self,
        partner: Partner,
        category: &str,
        attribute: &str,
    ) -> Result<Rating, ValidationError> {
        let key = self.key(partner, category, attribute)?;
        Ok(self.lookup(key))
    }

    /// All of a partner's ratings for a category, in attribute order.
    pub fn category_ratings(
        &self,
        partner: Partner,
        category: &str,
    ) -> Result<Vec<Rating>, ValidationError> {
        let (index, found) = self.category_index(category)?;

        Ok((0..found.attributes.len())
            .map(|attribute| {
                self.lookup(RatingKey {
                    partner,
                    category: index,
                    attribute,
                })
            })
            .collect())
    }

    /// Number of attributes explicitly rated (by either partner).
    pub fn rated_count(&self) -> usize {
        self.ratings.len()
    }

    /// Forget every rating; all attributes read as the default again.
    pub fn clear(&mut self) {
        self.ratings.clear();
    }

    fn lookup(&self, key: RatingKey) -> Rating {
        self.ratings
            .get(&key)
            .copied()
            .unwrap_or(self.default_rating)
    }

    fn category_index(
        &self,
        category: &str,
    ) -> Result<(usize, &crate::assessment::Category), ValidationError> {
        self.assessment
            .categories()
            .iter()
            .enumerate()
            .find(|(_, c)| c.name == category)
            .ok_or_else(|| ValidationError::UnknownCategory(category.to_string()))
    }

    fn key(
        &self,
        partner: Partner,
        category: &str,
        attribute: &str,
    ) -> Result<RatingKey, ValidationError> {
        let (category_index, found) = self.category_index(category)?;
        let attribute_index =
            found
                .attribute_index(attribute)
                .ok_or_else(|| ValidationError::UnknownAttribute {
                    category: category.to_string(),
                    attribute: attribute.to_string(),
                })?;

        Ok(RatingKey {
            partner,
            category: category_index,
            attribute: attribute_index,
        })
    }
}
