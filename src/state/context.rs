use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent::AgentDescriptor;
use crate::error::{Result, WeaveError};

use super::message::{now_millis, Message, BROADCAST};

/// 一次工作流运行内所有 Agent 共享的可变状态
///
/// `Clone` 之后两个句柄指向同一份状态。内部只有一把锁，
/// 保证跨字段写入（记录输出 + 追加轨迹）是一个原子动作。
#[derive(Clone)]
pub struct ExecutionContext {
    execution_id: String,
    inner: Arc<Mutex<ContextInner>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ContextInner {
    shared_memory: HashMap<String, Value>,
    message_history: Vec<Message>,
    previous_outputs: HashMap<String, Value>,
    variables: HashMap<String, Value>,
    current_agent: Option<AgentDescriptor>,
    previous_agents: Vec<AgentDescriptor>,
}

/// serialize()/deserialize() 的落盘形态
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContextSnapshot {
    execution_id: String,
    #[serde(flatten)]
    inner: ContextInner,
}

impl ExecutionContext {
    pub fn new(execution_id: impl Into<String>) -> Self {
        Self {
            execution_id: execution_id.into(),
            inner: Arc::new(Mutex::new(ContextInner::default())),
        }
    }

    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    /// 写共享内存
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.inner.lock().shared_memory.insert(key.into(), value);
    }

    /// 读共享内存，缺失返回 None
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().shared_memory.get(key).cloned()
    }

    /// 读共享内存，缺失返回调用方给定的默认值
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// 写变量（与共享内存互相独立的命名空间）
    pub fn set_variable(&self, key: impl Into<String>, value: Value) {
        self.inner.lock().variables.insert(key.into(), value);
    }

    pub fn variable(&self, key: &str) -> Option<Value> {
        self.inner.lock().variables.get(key).cloned()
    }

    pub fn variable_or(&self, key: &str, default: Value) -> Value {
        self.variable(key).unwrap_or(default)
    }

    /// 追加一条消息，插入时盖时间戳
    pub fn add_message(&self, mut message: Message) {
        let mut inner = self.inner.lock();
        let mut stamp = now_millis();
        // 时钟回拨时保持时间戳随插入顺序单调不减
        if let Some(last) = inner.message_history.last() {
            stamp = stamp.max(last.timestamp_ms);
        }
        message.timestamp_ms = stamp;
        inner.message_history.push(message);
    }

    /// 按插入顺序返回发给指定 Agent 或广播的消息
    pub fn messages_for(&self, agent_id: &str) -> Vec<Message> {
        self.inner
            .lock()
            .message_history
            .iter()
            .filter(|msg| msg.to_agent == agent_id || msg.to_agent == BROADCAST)
            .cloned()
            .collect()
    }

    /// 按插入顺序返回指定 Agent 发出的消息
    pub fn messages_from(&self, agent_id: &str) -> Vec<Message> {
        self.inner
            .lock()
            .message_history
            .iter()
            .filter(|msg| msg.from_agent == agent_id)
            .cloned()
            .collect()
    }

    pub fn history(&self) -> Vec<Message> {
        self.inner.lock().message_history.clone()
    }

    /// 记录一个 Agent 的输出；若设置了当前 Agent，同时追加访问轨迹
    ///
    /// 两个写入必须在同一次持锁内完成。
    pub fn add_agent_output(&self, agent_id: impl Into<String>, output: Value) {
        let mut inner = self.inner.lock();
        inner.previous_outputs.insert(agent_id.into(), output);
        if let Some(current) = inner.current_agent.clone() {
            inner.previous_agents.push(current);
        }
    }

    pub fn agent_output(&self, agent_id: &str) -> Option<Value> {
        self.inner.lock().previous_outputs.get(agent_id).cloned()
    }

    pub fn previous_outputs(&self) -> HashMap<String, Value> {
        self.inner.lock().previous_outputs.clone()
    }

    /// 替换当前 Agent（持有的是描述符拷贝，不是共享引用）
    pub fn set_current_agent(&self, agent: Option<AgentDescriptor>) {
        self.inner.lock().current_agent = agent;
    }

    pub fn current_agent(&self) -> Option<AgentDescriptor> {
        self.inner.lock().current_agent.clone()
    }

    pub fn previous_agents(&self) -> Vec<AgentDescriptor> {
        self.inner.lock().previous_agents.clone()
    }

    /// 渲染用于提示词注入的上下文文本
    ///
    /// 最多三段，非空才输出；全空返回空字符串。
    pub fn render_prompt_context(&self) -> String {
        let inner = self.inner.lock();
        let mut sections = Vec::new();

        if !inner.previous_outputs.is_empty() {
            sections.push(render_section(
                "Previous agent outputs",
                &inner.previous_outputs,
            ));
        }
        if !inner.shared_memory.is_empty() {
            sections.push(render_section("Shared information", &inner.shared_memory));
        }
        if !inner.variables.is_empty() {
            sections.push(render_section("Variables", &inner.variables));
        }

        sections.join("\n\n")
    }

    /// 持久化边界：外部调用方可以存档或回放一次运行
    pub fn serialize(&self) -> Value {
        let snapshot = ContextSnapshot {
            execution_id: self.execution_id.clone(),
            inner: self.inner.lock().clone(),
        };
        serde_json::to_value(snapshot).unwrap_or(Value::Null)
    }

    pub fn deserialize(data: &Value) -> Result<Self> {
        let snapshot: ContextSnapshot = serde_json::from_value(data.clone())
            .map_err(|e| WeaveError::Serialization(e.to_string()))?;
        Ok(Self {
            execution_id: snapshot.execution_id,
            inner: Arc::new(Mutex::new(snapshot.inner)),
        })
    }

    /// 清空所有集合，保留 execution_id
    pub fn clear(&self) {
        *self.inner.lock() = ContextInner::default();
    }
}

fn render_section(title: &str, entries: &HashMap<String, Value>) -> String {
    let mut keys: Vec<&String> = entries.keys().collect();
    keys.sort();
    let mut lines = vec![format!("{title}:")];
    for key in keys {
        lines.push(format!("- {key}: {}", value_text(&entries[key])));
    }
    lines.join("\n")
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
