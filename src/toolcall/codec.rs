use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::state::message::now_millis;

/// 规范化之后的工具调用
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// 合法时一定是结构化键值，不会是原始字符串
    pub arguments: Value,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolCall {
    fn ok(id: String, name: &str, arguments: Value) -> Self {
        Self {
            id,
            name: name.to_string(),
            arguments,
            valid: true,
            error: None,
        }
    }

    fn invalid(error: impl Into<String>) -> Self {
        Self {
            id: generated_id("call"),
            name: String::new(),
            arguments: Value::Null,
            valid: false,
            error: Some(error.into()),
        }
    }
}

pub(crate) fn generated_id(prefix: &str) -> String {
    format!("{prefix}_{}", now_millis())
}

/// 三种上游线格式与内部表示之间的双向转换
pub struct ToolCallCodec;

impl ToolCallCodec {
    /// 判别式解析，按 function-call、tool-use、custom 的顺序尝试
    pub fn decode(raw: &Value) -> ToolCall {
        // 1. function-call 形态：arguments 可能是字符串，也可能已结构化
        if let Some(function) = raw.get("function") {
            if let (Some(name), Some(arguments)) = (
                function.get("name").and_then(Value::as_str),
                function.get("arguments"),
            ) {
                let arguments = match arguments {
                    Value::String(text) => match serde_json::from_str::<Value>(text) {
                        Ok(parsed) => parsed,
                        Err(err) => {
                            return ToolCall::invalid(format!(
                                "Failed to parse tool call: {err}"
                            ))
                        }
                    },
                    other => other.clone(),
                };
                let id = decoded_id(raw, "call");
                return ToolCall::ok(id, name, arguments);
            }
        }

        // 2. tool-use 形态：input 已结构化，原样使用
        if let (Some(name), Some(input)) =
            (raw.get("name").and_then(Value::as_str), raw.get("input"))
        {
            return ToolCall::ok(decoded_id(raw, "toolu"), name, input.clone());
        }

        // 3. custom 形态：缺 id 时生成 custom_<timestamp>
        if let (Some(name), Some(params)) = (
            raw.get("toolName").and_then(Value::as_str),
            raw.get("params"),
        ) {
            return ToolCall::ok(decoded_id(raw, "custom"), name, params.clone());
        }

        ToolCall::invalid("Unknown tool call format")
    }

    pub fn encode_function_call(name: &str, params: &Value) -> Value {
        json!({
            "id": generated_id("call"),
            "function": {
                "name": name,
                "arguments": params.to_string(),
            },
        })
    }

    pub fn encode_tool_use(name: &str, params: &Value) -> Value {
        json!({
            "id": generated_id("toolu"),
            "name": name,
            "input": params,
        })
    }

    pub fn encode_custom(name: &str, params: &Value) -> Value {
        json!({
            "id": generated_id("custom"),
            "toolName": name,
            "params": params,
        })
    }
}

fn decoded_id(raw: &Value, prefix: &str) -> String {
    raw.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| generated_id(prefix))
}
