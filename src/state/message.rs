use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 广播接收者哨兵值，表示"发给所有 Agent"
///
/// 注意：一个恰好叫 "all" 的 Agent id 会与哨兵值冲突，
/// 调用方需要避免使用该 id。
pub const BROADCAST: &str = "all";

/// Agent 之间传递的消息
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub from_agent: String,
    pub to_agent: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Value,
    /// 由 `ExecutionContext::add_message` 在插入时盖章
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl Message {
    pub fn new(
        from_agent: impl Into<String>,
        to_agent: impl Into<String>,
        kind: impl Into<String>,
        content: Value,
    ) -> Self {
        Self {
            from_agent: from_agent.into(),
            to_agent: to_agent.into(),
            kind: kind.into(),
            content,
            timestamp_ms: 0,
        }
    }

    /// 发给所有 Agent 的消息
    pub fn broadcast(from_agent: impl Into<String>, kind: impl Into<String>, content: Value) -> Self {
        Self::new(from_agent, BROADCAST, kind, content)
    }

    pub fn is_broadcast(&self) -> bool {
        self.to_agent == BROADCAST
    }
}

pub(crate) fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
