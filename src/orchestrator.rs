use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{error, info};

use crate::agent::{Agent, AgentConfig, AgentRegistry, ConfigDrivenAgent};
use crate::error::{Result, WeaveError};
use crate::state::ExecutionContext;
use crate::workflow::{
    evaluate_condition, AgentResult, Condition, ExecutionResult, RunStatus, Workflow,
    WorkflowExecutor,
};

/// 编排器门面：持有注册表与执行器
///
/// 对外暴露 Agent/工作流注册、工作流执行和条件求值。
/// `execute_workflow` 是唯一的错误边界：Agent 执行异常、
/// 拓扑解析异常在这里恰好捕获一次，降级成 `status: error`
/// 的结构化结果，绝不向宿主进程抛出。
#[derive(Default)]
pub struct Orchestrator {
    agents: RwLock<AgentRegistry>,
    workflows: RwLock<HashMap<String, Workflow>>,
    executor: WorkflowExecutor,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按配置构造并注册一个 Agent，同 id 覆盖旧注册
    pub async fn load_agent(&self, config: AgentConfig) -> Result<Arc<dyn Agent>> {
        let agent: Arc<dyn Agent> = Arc::new(ConfigDrivenAgent::new(config));
        agent.load_tools().await?;
        self.agents.write().register(Arc::clone(&agent));
        Ok(agent)
    }

    pub async fn load_agents(&self, configs: Vec<AgentConfig>) -> Result<Vec<Arc<dyn Agent>>> {
        let mut loaded = Vec::with_capacity(configs.len());
        for config in configs {
            loaded.push(self.load_agent(config).await?);
        }
        Ok(loaded)
    }

    /// 注册调用方自己实现的 Agent 实例
    pub fn register_agent(&self, agent: Arc<dyn Agent>) {
        self.agents.write().register(agent);
    }

    pub fn register_workflow(&self, workflow: Workflow) {
        self.workflows.write().insert(workflow.id.clone(), workflow);
    }

    pub fn workflow(&self, id: &str) -> Option<Workflow> {
        self.workflows.read().get(id).cloned()
    }

    pub fn agent(&self, id: &str) -> Option<Arc<dyn Agent>> {
        self.agents.read().get(id)
    }

    pub fn all_agents(&self) -> Vec<Arc<dyn Agent>> {
        self.agents.read().all()
    }

    pub fn agents_by_role(&self, role: &str) -> Vec<Arc<dyn Agent>> {
        self.agents.read().by_role(role)
    }

    /// 清空 Agent 注册表与工作流存储
    pub fn clear(&self) {
        self.agents.write().clear();
        self.workflows.write().clear();
    }

    /// 路由条件求值的直通入口
    pub fn evaluate_condition(
        &self,
        condition: Option<&Condition>,
        output: &Value,
        ctx: &ExecutionContext,
    ) -> bool {
        evaluate_condition(condition, output, ctx)
    }

    /// 执行一个工作流定义，总是返回结构化结果
    pub async fn execute_workflow(&self, workflow: &Workflow, input: Value) -> ExecutionResult {
        let execution_id = new_execution_id();
        let ctx = ExecutionContext::new(execution_id.clone());
        info!(workflow = %workflow.id, execution = %execution_id, "workflow run started");

        let started = Instant::now();
        let agents = {
            let registry = self.agents.read();
            self.executor.resolve_agents(workflow, &registry)
        };
        let outcome = self.executor.execute(workflow, &agents, &ctx, input).await;
        let total_duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(agent_results) => {
                info!(
                    workflow = %workflow.id,
                    execution = %execution_id,
                    agents = agent_results.len(),
                    total_duration_ms,
                    "workflow run completed"
                );
                ExecutionResult {
                    execution_id,
                    workflow_id: workflow.id.clone(),
                    status: RunStatus::Completed,
                    agent_results,
                    total_duration_ms,
                    error: None,
                }
            }
            Err(err) => {
                error!(
                    workflow = %workflow.id,
                    execution = %execution_id,
                    error = %err,
                    "workflow run failed"
                );
                ExecutionResult {
                    execution_id,
                    workflow_id: workflow.id.clone(),
                    status: RunStatus::Error,
                    agent_results: Vec::<AgentResult>::new(),
                    total_duration_ms,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// 按 id 执行已注册的工作流；未注册同样降级为错误结果
    pub async fn execute_workflow_by_id(&self, workflow_id: &str, input: Value) -> ExecutionResult {
        match self.workflow(workflow_id) {
            Some(workflow) => self.execute_workflow(&workflow, input).await,
            None => ExecutionResult {
                execution_id: new_execution_id(),
                workflow_id: workflow_id.to_string(),
                status: RunStatus::Error,
                agent_results: Vec::new(),
                total_duration_ms: 0,
                error: Some(
                    WeaveError::WorkflowNotRegistered(workflow_id.to_string()).to_string(),
                ),
            },
        }
    }
}

fn new_execution_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("exec-{}-{}", now.as_secs(), now.subsec_nanos())
}
