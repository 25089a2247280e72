use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::codec::ToolCallCodec;

/// 工具参数的轻量 schema
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParamSchema {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub properties: HashMap<String, PropertySchema>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: String,
}

/// 校验结论；所有违规都被累积，不短路
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ToolCallCodec {
    pub fn validate_params(params: &Value, schema: &ParamSchema) -> Validation {
        let mut errors = Vec::new();

        for field in &schema.required {
            if params.get(field).is_none() {
                errors.push(format!("Missing required field: {field}"));
            }
        }

        for (field, property) in &schema.properties {
            let Some(value) = params.get(field) else {
                continue;
            };
            if !type_matches(value, &property.kind) {
                errors.push(format!("Invalid type for {field}"));
            }
        }

        Validation {
            valid: errors.is_empty(),
            errors,
        }
    }
}

fn type_matches(value: &Value, kind: &str) -> bool {
    match kind {
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "number" => value.is_number(),
        // 宽松的整数规则：数值且没有小数部分即可
        "integer" => {
            value.as_i64().is_some()
                || value.as_u64().is_some()
                || value.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(required: &[&str], properties: &[(&str, &str)]) -> ParamSchema {
        ParamSchema {
            required: required.iter().map(|s| s.to_string()).collect(),
            properties: properties
                .iter()
                .map(|(name, kind)| {
                    (
                        name.to_string(),
                        PropertySchema {
                            kind: kind.to_string(),
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn missing_required_field_is_reported() {
        let outcome = ToolCallCodec::validate_params(
            &json!({"name": "Test"}),
            &schema(&["name", "email"], &[]),
        );
        assert!(!outcome.valid);
        assert_eq!(outcome.errors, vec!["Missing required field: email"]);
    }

    #[test]
    fn violations_accumulate_without_short_circuit() {
        let outcome = ToolCallCodec::validate_params(
            &json!({"count": "three"}),
            &schema(&["name"], &[("count", "number")]),
        );
        assert!(!outcome.valid);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome
            .errors
            .contains(&"Missing required field: name".to_string()));
        assert!(outcome.errors.contains(&"Invalid type for count".to_string()));
    }

    #[test]
    fn integer_rule_rejects_fractional_numbers() {
        let schema = schema(&[], &[("retries", "integer")]);
        assert!(ToolCallCodec::validate_params(&json!({"retries": 3}), &schema).valid);
        assert!(ToolCallCodec::validate_params(&json!({"retries": 3.0}), &schema).valid);
        assert!(!ToolCallCodec::validate_params(&json!({"retries": 3.5}), &schema).valid);
    }

    #[test]
    fn valid_params_produce_no_errors() {
        let outcome = ToolCallCodec::validate_params(
            &json!({"name": "Test", "tags": ["a"]}),
            &schema(&["name"], &[("name", "string"), ("tags", "array")]),
        );
        assert!(outcome.valid);
        assert!(outcome.errors.is_empty());
    }
}
