//! JSON Schema validation for assessment documents.
//!
//! Every assessment document is checked against schema/assessment.schema.json
//! before it is deserialized, so structural mistakes (unknown fields, a
//! category without an advice block) surface with a path to the offending value.

use std::sync::OnceLock;

use jsonschema::Validator;

/// Assessment schema, embedded at compile time.
const ASSESSMENT_SCHEMA_JSON: &str = include_str!("../../../../schema/assessment.schema.json");

/// Compiled once on first use. A broken embedded schema is remembered as its
/// error message so every later load reports the same failure.
static ASSESSMENT_VALIDATOR: OnceLock<Result<Validator, String>> = OnceLock::new();

fn compile_assessment_schema() -> Result<Validator, String> {
    let schema: serde_json::Value = serde_json::from_str(ASSESSMENT_SCHEMA_JSON)
        .map_err(|e| format!("embedded assessment schema is not valid JSON: {}", e))?;
    jsonschema::options()
        .build(&schema)
        .map_err(|e| format!("embedded assessment schema does not compile: {}", e))
}

fn assessment_validator() -> Result<&'static Validator, String> {
    ASSESSMENT_VALIDATOR
        .get_or_init(compile_assessment_schema)
        .as_ref()
        .map_err(Clone::clone)
}

/// Validate an assessment document against the schema.
///
/// Returns every violation found, each suffixed with its instance path.
pub fn validate_assessment_schema(document: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = assessment_validator().map_err(|e| vec![e])?;

    let errors: Vec<String> = validator
        .iter_errors(document)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
