use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::codec::ToolCallCodec;

/// 自由文本中的内联工具调用：`{{tool:<name>|<k>=<v>|...}}`
///
/// 给不支持原生 tool-calling 的上游提供方用的降级语法。
static INLINE_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{tool:([A-Za-z0-9_.\-]+)(?:\|([^{}]*))?\}\}").expect("inline pattern")
});

static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+(\.\d+)?$").expect("numeric pattern"));

/// 内联语法扫描出的一次调用
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineToolCall {
    pub tool_name: String,
    pub params: Value,
    /// 原文中匹配到的完整片段
    pub raw: String,
}

impl ToolCallCodec {
    /// 从左到右扫描全部内联调用；没有匹配返回空
    pub fn scan_inline(text: &str) -> Vec<InlineToolCall> {
        INLINE_CALL
            .captures_iter(text)
            .map(|caps| InlineToolCall {
                tool_name: caps[1].trim().to_string(),
                params: caps
                    .get(2)
                    .map(|m| Self::parse_params(m.as_str()))
                    .unwrap_or_else(|| Value::Object(Map::new())),
                raw: caps[0].to_string(),
            })
            .collect()
    }

    /// `k=v|k2=v2` 参数串解析
    ///
    /// 只在第一个 `=` 处切分，值本身可以再包含 `=`。
    pub fn parse_params(raw: &str) -> Value {
        let mut params = Map::new();
        if raw.trim().is_empty() {
            return Value::Object(params);
        }
        for segment in raw.split('|') {
            if segment.trim().is_empty() {
                continue;
            }
            match segment.split_once('=') {
                Some((key, value)) => {
                    params.insert(key.trim().to_string(), Self::parse_value(value));
                }
                None => {
                    params.insert(segment.trim().to_string(), Value::Null);
                }
            }
        }
        Value::Object(params)
    }

    /// 单个参数值的类型还原
    ///
    /// 顺序敏感：数字判定必须先于 JSON 解析尝试，
    /// 去引号只在 JSON 解析失败之后进行。
    pub fn parse_value(raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        match trimmed {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            "null" => return Value::Null,
            _ => {}
        }
        if NUMERIC.is_match(trimmed) {
            if let Ok(int) = trimmed.parse::<i64>() {
                return Value::from(int);
            }
            if let Ok(float) = trimmed.parse::<f64>() {
                return Value::from(float);
            }
        }
        // 放行内联对象/数组字面量
        if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
            return parsed;
        }
        if trimmed.len() >= 2 {
            let bytes = trimmed.as_bytes();
            let first = bytes[0];
            let last = bytes[trimmed.len() - 1];
            if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
                return Value::String(trimmed[1..trimmed.len() - 1].to_string());
            }
        }
        Value::String(trimmed.to_string())
    }
}
