use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::ExecutionContext;

/// 路由条件
///
/// 历史配置里条件可以直接写一个字符串（对输出做子串匹配），
/// 新配置用带 `type` 的结构化形式；两种都显式建模。
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Condition {
    /// 裸字符串：输出（字符串或其渲染文本）包含它即为真
    Raw(String),
    Typed(TypedCondition),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypedCondition {
    Equals { field: String, value: Value },
    Contains { field: String, value: Value },
    Exists { field: String },
    Default,
    /// 未知谓词保守拒绝，绝不放行
    #[serde(other)]
    Unknown,
}

/// 对一个 Agent 输出求值一条路由条件
///
/// 条件缺失视为真。`ctx` 是求值契约的一部分，当前谓词集合
/// 尚未用到它。
pub fn evaluate_condition(
    condition: Option<&Condition>,
    output: &Value,
    _ctx: &ExecutionContext,
) -> bool {
    let Some(condition) = condition else {
        return true;
    };
    match condition {
        Condition::Raw(needle) => stringify(output).contains(needle.as_str()),
        Condition::Typed(typed) => match typed {
            TypedCondition::Equals { field, value } => output.get(field) == Some(value),
            TypedCondition::Contains { field, value } => output
                .get(field)
                .map(|actual| stringify(actual).contains(&stringify(value)))
                .unwrap_or(false),
            TypedCondition::Exists { field } => output.get(field).is_some(),
            TypedCondition::Default => true,
            TypedCondition::Unknown => false,
        },
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> ExecutionContext {
        ExecutionContext::new("exec-test")
    }

    #[test]
    fn absent_condition_is_true() {
        assert!(evaluate_condition(None, &json!("anything"), &ctx()));
    }

    #[test]
    fn raw_condition_matches_substring() {
        let condition = Condition::Raw("refund".to_string());
        assert!(evaluate_condition(
            Some(&condition),
            &json!("customer wants a refund"),
            &ctx()
        ));
        // 非字符串输出先渲染再匹配
        assert!(evaluate_condition(
            Some(&condition),
            &json!({"intent": "refund"}),
            &ctx()
        ));
        assert!(!evaluate_condition(Some(&condition), &json!("greeting"), &ctx()));
    }

    #[test]
    fn equals_is_strict() {
        let condition = Condition::Typed(TypedCondition::Equals {
            field: "count".to_string(),
            value: json!(3),
        });
        assert!(evaluate_condition(Some(&condition), &json!({"count": 3}), &ctx()));
        // 字符串 "3" 不等于数字 3
        assert!(!evaluate_condition(
            Some(&condition),
            &json!({"count": "3"}),
            &ctx()
        ));
        assert!(!evaluate_condition(Some(&condition), &json!({}), &ctx()));
    }

    #[test]
    fn contains_stringifies_the_field() {
        let condition = Condition::Typed(TypedCondition::Contains {
            field: "summary".to_string(),
            value: json!("urgent"),
        });
        assert!(evaluate_condition(
            Some(&condition),
            &json!({"summary": "this is urgent indeed"}),
            &ctx()
        ));
        assert!(!evaluate_condition(
            Some(&condition),
            &json!({"summary": "routine"}),
            &ctx()
        ));
    }

    #[test]
    fn exists_accepts_null_valued_fields() {
        let condition = Condition::Typed(TypedCondition::Exists {
            field: "flag".to_string(),
        });
        assert!(evaluate_condition(
            Some(&condition),
            &json!({"flag": null}),
            &ctx()
        ));
        assert!(!evaluate_condition(Some(&condition), &json!({}), &ctx()));
    }

    #[test]
    fn default_is_true_and_unknown_is_false() {
        assert!(evaluate_condition(
            Some(&Condition::Typed(TypedCondition::Default)),
            &json!(null),
            &ctx()
        ));
        assert!(!evaluate_condition(
            Some(&Condition::Typed(TypedCondition::Unknown)),
            &json!(null),
            &ctx()
        ));
    }

    #[test]
    fn unknown_predicate_deserializes_to_unknown() {
        let condition: Condition =
            serde_json::from_value(json!({"type": "regex", "field": "x"})).unwrap();
        assert_eq!(condition, Condition::Typed(TypedCondition::Unknown));
    }

    #[test]
    fn bare_string_deserializes_to_raw() {
        let condition: Condition = serde_json::from_value(json!("refund")).unwrap();
        assert_eq!(condition, Condition::Raw("refund".to_string()));
    }
}
