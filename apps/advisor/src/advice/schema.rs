//! AdviceResult and the shape check applied to the model's raw text.
//!
//! The model is asked for a JSON object with three keys. Anything else
//! (not JSON, not an object, a missing key, a wrongly typed value) is
//! rejected with a named `SchemaError` rather than a bare parse failure.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

pub const KEY_RETIREMENT_AGE: &str = "estimated_retirement_age";
pub const KEY_MONTHLY_SAVINGS: &str = "monthly_savings_needed";
pub const KEY_RECOMMENDATIONS: &str = "recommendations";

/// Structured outcome of one successful advice request.
///
/// Numbers are kept as `serde_json::Number` so they render exactly as the
/// model wrote them (`65`, `2500.5`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceResult {
    pub estimated_retirement_age: Number,
    pub monthly_savings_needed: Number,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("response is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("response is JSON but not an object")]
    NotAnObject,

    #[error("response is missing key '{0}'")]
    MissingKey(&'static str),

    #[error("key '{key}' must be {expected}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },
}

/// Parses the model's text strictly as a JSON object carrying the three
/// advice keys. Extra keys are ignored.
pub fn parse_advice(text: &str) -> Result<AdviceResult, SchemaError> {
    let value: Value = serde_json::from_str(text)?;
    let object = value.as_object().ok_or(SchemaError::NotAnObject)?;

    Ok(AdviceResult {
        estimated_retirement_age: number_field(object, KEY_RETIREMENT_AGE)?,
        monthly_savings_needed: number_field(object, KEY_MONTHLY_SAVINGS)?,
        recommendations: string_list_field(object, KEY_RECOMMENDATIONS)?,
    })
}

fn field<'a>(object: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value, SchemaError> {
    object.get(key).ok_or(SchemaError::MissingKey(key))
}

fn number_field(object: &Map<String, Value>, key: &'static str) -> Result<Number, SchemaError> {
    match field(object, key)? {
        Value::Number(n) => Ok(n.clone()),
        _ => Err(SchemaError::WrongType {
            key,
            expected: "a number",
        }),
    }
}

fn string_list_field(
    object: &Map<String, Value>,
    key: &'static str,
) -> Result<Vec<String>, SchemaError> {
    let wrong_type = SchemaError::WrongType {
        key,
        expected: "an array of strings",
    };

    let Value::Array(items) = field(object, key)? else {
        return Err(wrong_type);
    };

    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or(wrong_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"{
        "estimated_retirement_age": 65,
        "monthly_savings_needed": 2500,
        "recommendations": [
            "Increase your emergency fund",
            "Diversify your investment portfolio",
            "Reduce discretionary spending"
        ]
    }"#;

    #[test]
    fn test_parse_well_formed_response() {
        let result = parse_advice(WELL_FORMED).unwrap();
        assert_eq!(result.estimated_retirement_age, Number::from(65));
        assert_eq!(result.monthly_savings_needed, Number::from(2500));
        assert_eq!(
            result.recommendations,
            vec![
                "Increase your emergency fund",
                "Diversify your investment portfolio",
                "Reduce discretionary spending"
            ]
        );
    }

    #[test]
    fn test_parse_keeps_fractional_numbers() {
        let result = parse_advice(
            r#"{"estimated_retirement_age": 62.5, "monthly_savings_needed": 1800.75, "recommendations": []}"#,
        )
        .unwrap();
        assert_eq!(result.estimated_retirement_age.to_string(), "62.5");
        assert_eq!(result.monthly_savings_needed.to_string(), "1800.75");
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_parse_ignores_extra_keys() {
        let result = parse_advice(
            r#"{"estimated_retirement_age": 60, "monthly_savings_needed": 900, "recommendations": ["Save"], "confidence": "high"}"#,
        )
        .unwrap();
        assert_eq!(result.recommendations, vec!["Save"]);
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = parse_advice("Sure! Here is your plan: retire at 65.").unwrap_err();
        assert!(matches!(err, SchemaError::NotJson(_)));
    }

    #[test]
    fn test_parse_rejects_fenced_json() {
        let fenced = format!("```json\n{WELL_FORMED}\n```");
        assert!(matches!(
            parse_advice(&fenced).unwrap_err(),
            SchemaError::NotJson(_)
        ));
    }

    #[test]
    fn test_parse_rejects_array_root() {
        assert!(matches!(
            parse_advice("[1, 2, 3]").unwrap_err(),
            SchemaError::NotAnObject
        ));
    }

    #[test]
    fn test_parse_reports_each_missing_key() {
        for missing in [KEY_RETIREMENT_AGE, KEY_MONTHLY_SAVINGS, KEY_RECOMMENDATIONS] {
            let mut object: Map<String, Value> = serde_json::from_str(WELL_FORMED).unwrap();
            object.remove(missing);
            let text = Value::Object(object).to_string();
            match parse_advice(&text).unwrap_err() {
                SchemaError::MissingKey(key) => assert_eq!(key, missing),
                other => panic!("expected MissingKey({missing}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_rejects_numeric_string() {
        let err = parse_advice(
            r#"{"estimated_retirement_age": "65", "monthly_savings_needed": 2500, "recommendations": []}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::WrongType {
                key: KEY_RETIREMENT_AGE,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_rejects_non_string_recommendation() {
        let err = parse_advice(
            r#"{"estimated_retirement_age": 65, "monthly_savings_needed": 2500, "recommendations": ["Save", 3]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::WrongType {
                key: KEY_RECOMMENDATIONS,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_rejects_recommendations_as_string() {
        let err = parse_advice(
            r#"{"estimated_retirement_age": 65, "monthly_savings_needed": 2500, "recommendations": "Save more"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::WrongType { .. }));
    }
}
