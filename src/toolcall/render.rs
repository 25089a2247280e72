use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::codec::ToolCallCodec;

/// 工具执行结果，交给 `render_result` 渲染成提供方无关的文本块
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn ok(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(message.into()),
        }
    }
}

impl ToolCallCodec {
    pub fn render_result(name: &str, result: &ToolResult) -> String {
        let mut lines = vec![format!("[Tool Result: {name}]")];
        if result.success {
            lines.push("Status: SUCCESS".to_string());
            let body = match &result.result {
                Some(Value::String(text)) => text.clone(),
                Some(value) => value.to_string(),
                None => String::new(),
            };
            if !body.is_empty() {
                lines.push(body);
            }
        } else {
            lines.push("Status: ERROR".to_string());
            lines.push(
                result
                    .error
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string()),
            );
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_success_with_structured_result() {
        let rendered =
            ToolCallCodec::render_result("search", &ToolResult::ok(json!({"hits": 2})));
        assert_eq!(
            rendered,
            "[Tool Result: search]\nStatus: SUCCESS\n{\"hits\":2}"
        );
    }

    #[test]
    fn renders_error_with_raw_message() {
        let rendered = ToolCallCodec::render_result("search", &ToolResult::err("upstream 503"));
        assert_eq!(rendered, "[Tool Result: search]\nStatus: ERROR\nupstream 503");
    }
}
