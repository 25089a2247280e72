use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::state::ExecutionContext;

/// Agent 的纯数据描述，用于上下文中的当前 Agent 与访问轨迹
///
/// 刻意不持有 Agent 实例本身，避免并发运行时的别名共享。
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentDescriptor {
    pub id: String,
    pub name: String,
    pub role: String,
}

/// Agent 单步执行的结果
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgentReply {
    pub success: bool,
    pub output: Value,
}

impl AgentReply {
    pub fn ok(output: Value) -> Self {
        Self {
            success: true,
            output,
        }
    }

    pub fn failed(output: Value) -> Self {
        Self {
            success: false,
            output,
        }
    }
}

/// 编排器调用的外部能力单元
///
/// 实例注册一次、跨多次运行复用，因此要求 `Send + Sync`。
#[async_trait]
pub trait Agent: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str {
        self.id()
    }

    fn role(&self) -> &str {
        ""
    }

    fn tools(&self) -> Vec<String> {
        Vec::new()
    }

    /// 生命周期钩子，注册后、首次执行前调用
    async fn load_tools(&self) -> Result<()> {
        Ok(())
    }

    async fn execute(&self, input: Value, ctx: &ExecutionContext) -> Result<AgentReply>;

    fn descriptor(&self) -> AgentDescriptor {
        AgentDescriptor {
            id: self.id().to_string(),
            name: self.name().to_string(),
            role: self.role().to_string(),
        }
    }
}
