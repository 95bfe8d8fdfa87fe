use jsonschema::Validator;
use serde_json::Value;

use crate::errors::Error;

/// Creates a JSON Schema validator from a schema value
///
/// # Arguments
/// * `schema` - The JSON Schema
///
/// # Returns
/// * `Result<Validator, Error>` - The compiled validator on success, or an error
pub fn build_validator(schema: &Value) -> Result<Validator, Error> {
    jsonschema::validator_for(schema).map_err(|e| Error::Schema(e.to_string()))
}

/// Parses `response` as JSON and returns it only if it satisfies `schema`
///
/// # Arguments
/// * `schema` - The compiled JSON Schema validator
/// * `response` - Raw text returned by the model
///
/// # Returns
/// * `Option<Value>` - The parsed value when it is JSON and matches the schema
pub fn parse_conforming(schema: &Validator, response: &str) -> Option<Value> {
    let val: Value = serde_json::from_str(response.trim()).ok()?;
    schema.is_valid(&val).then_some(val)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_values_outside_schema() {
        let validator = build_validator(&json!({"type": "object"})).unwrap();
        assert!(parse_conforming(&validator, r#"{"a": 1}"#).is_some());
        assert!(parse_conforming(&validator, "[1, 2]").is_none());
        assert!(parse_conforming(&validator, "not json").is_none());
    }
}
