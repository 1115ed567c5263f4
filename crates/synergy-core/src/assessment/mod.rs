//! Assessment loading and validation.
//!
//! An assessment is the category schema, the per-category advice table and
//! the advice policy, loaded from YAML/JSON and validated completely before
//! any computation can use it.

mod parser;
mod schema;

pub use parser::{
    AdviceTemplates, Assessment, Category, ConfigurationError, Thresholds,
    DEFAULT_LEAD_GAP_THRESHOLD, DEFAULT_SHARED_STRUGGLE_THRESHOLD,
};
pub use schema::validate_assessment_schema;
