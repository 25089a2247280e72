use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::conditions::Condition;

/// 执行拓扑，封闭枚举
///
/// 未识别的类型落到 `Unknown`，执行时按 sequential 处理，
/// 作为向前兼容的默认值而不是报错。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum WorkflowType {
    #[default]
    Sequential,
    Parallel,
    Dag,
    Conditional,
    Unknown,
}

impl From<String> for WorkflowType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "sequential" => Self::Sequential,
            "parallel" => Self::Parallel,
            "dag" => Self::Dag,
            "conditional" => Self::Conditional,
            _ => Self::Unknown,
        }
    }
}

/// 工作流里的一个 Agent 绑定
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentBinding {
    /// 历史配置用过 `id`，两个键都接受
    #[serde(alias = "id")]
    pub agent_id: String,
    /// dag 拓扑的前置依赖
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl AgentBinding {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            depends_on: Vec::new(),
        }
    }

    pub fn depends_on(mut self, dependencies: &[&str]) -> Self {
        self.depends_on = dependencies.iter().map(|d| d.to_string()).collect();
        self
    }
}

/// conditional 拓扑的一条路由
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default)]
    pub condition: Option<Condition>,
    pub target_agent_id: String,
}

/// 声明式工作流定义，普通数据
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "type")]
    pub workflow_type: WorkflowType,
    #[serde(default, alias = "agents")]
    pub agents_config: Vec<AgentBinding>,
    /// 仅 conditional 拓扑使用
    #[serde(default)]
    pub entry_agent_id: Option<String>,
    /// 仅 conditional 拓扑使用，按数组顺序求值
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl Workflow {
    pub fn new(id: impl Into<String>, workflow_type: WorkflowType) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            workflow_type,
            agents_config: Vec::new(),
            entry_agent_id: None,
            routes: Vec::new(),
        }
    }

    pub fn with_agents(mut self, bindings: Vec<AgentBinding>) -> Self {
        self.agents_config = bindings;
        self
    }

    pub fn with_entry(mut self, entry_agent_id: impl Into<String>) -> Self {
        self.entry_agent_id = Some(entry_agent_id.into());
        self
    }

    pub fn with_routes(mut self, routes: Vec<Route>) -> Self {
        self.routes = routes;
        self
    }
}

/// 一次运行的状态
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Error,
}

/// 单个 Agent 的执行记录
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentResult {
    pub agent_id: String,
    pub output: Value,
    pub duration_ms: u64,
}

/// `execute_workflow` 的结构化结果，永远返回、从不抛出
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub execution_id: String,
    pub workflow_id: String,
    pub status: RunStatus,
    pub agent_results: Vec<AgentResult>,
    pub total_duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
