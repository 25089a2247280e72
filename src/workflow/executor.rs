use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;
use serde_json::Value;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::agent::{Agent, AgentRegistry};
use crate::error::{Result, WeaveError};
use crate::state::ExecutionContext;

use super::conditions::evaluate_condition;
use super::types::{AgentResult, Workflow, WorkflowType};

/// 按拓扑执行一个工作流定义
///
/// 四种拓扑是四个独立的策略函数，共享同一套上下文穿线约定：
/// 每个 Agent 执行前设置当前 Agent，执行后把输出写回上下文。
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkflowExecutor;

impl WorkflowExecutor {
    pub fn new() -> Self {
        Self
    }

    /// 把工作流的 Agent 绑定解析成已注册的实例
    ///
    /// 解析不到的绑定跳过并告警，运行在可解析的子集上继续，
    /// 不因单个缺失整体失败。
    pub fn resolve_agents(
        &self,
        workflow: &Workflow,
        registry: &AgentRegistry,
    ) -> Vec<Arc<dyn Agent>> {
        let mut resolved = Vec::with_capacity(workflow.agents_config.len());
        for binding in &workflow.agents_config {
            match registry.get(&binding.agent_id) {
                Some(agent) => resolved.push(agent),
                None => warn!(
                    agent = %binding.agent_id,
                    workflow = %workflow.id,
                    "skipping unresolvable agent binding"
                ),
            }
        }
        resolved
    }

    /// 拓扑分发；配置与 Agent 层的错误都向上冒泡，
    /// 由 Orchestrator 边界统一降级
    pub async fn execute(
        &self,
        workflow: &Workflow,
        agents: &[Arc<dyn Agent>],
        ctx: &ExecutionContext,
        input: Value,
    ) -> Result<Vec<AgentResult>> {
        debug!(
            workflow = %workflow.id,
            topology = ?workflow.workflow_type,
            agents = agents.len(),
            "executing workflow"
        );
        match workflow.workflow_type {
            WorkflowType::Parallel => self.run_parallel(agents, ctx, input).await,
            WorkflowType::Dag => self.run_dag(workflow, agents, ctx, input).await,
            WorkflowType::Conditional => self.run_conditional(workflow, agents, ctx, input).await,
            WorkflowType::Sequential | WorkflowType::Unknown => {
                self.run_sequential(agents, ctx, input).await
            }
        }
    }

    /// sequential：对输入做左折叠，上一个输出是下一个输入
    async fn run_sequential(
        &self,
        agents: &[Arc<dyn Agent>],
        ctx: &ExecutionContext,
        input: Value,
    ) -> Result<Vec<AgentResult>> {
        let mut results = Vec::with_capacity(agents.len());
        let mut carried = input;
        for agent in agents {
            let result = run_agent(Arc::clone(agent), carried, ctx.clone()).await?;
            carried = result.output.clone();
            results.push(result);
        }
        Ok(results)
    }

    /// parallel：所有 Agent 拿同一份原始输入并发执行
    ///
    /// 等待全部完成；任何一个失败整个运行失败，没有部分成功语义。
    /// 结果按配置顺序上报。
    async fn run_parallel(
        &self,
        agents: &[Arc<dyn Agent>],
        ctx: &ExecutionContext,
        input: Value,
    ) -> Result<Vec<AgentResult>> {
        try_join_all(
            agents
                .iter()
                .map(|agent| run_agent(Arc::clone(agent), input.clone(), ctx.clone())),
        )
        .await
    }

    /// dag：波次调度，所有依赖都有输出之后才允许启动，
    /// 相互独立的分支并发执行
    async fn run_dag(
        &self,
        workflow: &Workflow,
        agents: &[Arc<dyn Agent>],
        ctx: &ExecutionContext,
        input: Value,
    ) -> Result<Vec<AgentResult>> {
        let lookup: HashMap<&str, &Arc<dyn Agent>> =
            agents.iter().map(|agent| (agent.id(), agent)).collect();

        // 依赖表只认本次运行实际解析到的 Agent
        let mut dependencies: HashMap<String, Vec<String>> = HashMap::new();
        let mut pending: Vec<String> = Vec::new();
        for binding in &workflow.agents_config {
            if !lookup.contains_key(binding.agent_id.as_str()) {
                continue;
            }
            if dependencies.contains_key(&binding.agent_id) {
                continue;
            }
            for dependency in &binding.depends_on {
                if !lookup.contains_key(dependency.as_str()) {
                    return Err(WeaveError::UnresolvedDependency {
                        agent: binding.agent_id.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
            dependencies.insert(binding.agent_id.clone(), binding.depends_on.clone());
            pending.push(binding.agent_id.clone());
        }

        let mut completed: HashSet<String> = HashSet::new();
        let mut results = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            let ready: Vec<String> = pending
                .iter()
                .filter(|id| {
                    dependencies[id.as_str()]
                        .iter()
                        .all(|dependency| completed.contains(dependency))
                })
                .cloned()
                .collect();
            if ready.is_empty() {
                // 剩下的节点互相等待，只能是环
                return Err(WeaveError::DependencyCycle(pending.join(", ")));
            }

            let mut join_set: JoinSet<(usize, Result<AgentResult>)> = JoinSet::new();
            for (index, id) in ready.iter().enumerate() {
                let agent = Arc::clone(lookup[id.as_str()]);
                let ctx = ctx.clone();
                let input = input.clone();
                join_set.spawn(async move { (index, run_agent(agent, input, ctx).await) });
            }

            let mut wave: Vec<Option<AgentResult>> = vec![None; ready.len()];
            while let Some(joined) = join_set.join_next().await {
                let (index, result) = joined.map_err(|e| WeaveError::Other(e.into()))?;
                wave[index] = Some(result?);
            }
            for result in wave.into_iter().flatten() {
                completed.insert(result.agent_id.clone());
                results.push(result);
            }
            pending.retain(|id| !completed.contains(id));
        }

        Ok(results)
    }

    /// conditional：执行入口 Agent，按数组顺序对其输出求值路由，
    /// 第一条命中的路由决定下一跳；没有命中则运行到此结束
    async fn run_conditional(
        &self,
        workflow: &Workflow,
        agents: &[Arc<dyn Agent>],
        ctx: &ExecutionContext,
        input: Value,
    ) -> Result<Vec<AgentResult>> {
        let entry_id = workflow
            .entry_agent_id
            .as_deref()
            .ok_or_else(|| WeaveError::MissingEntryAgent(workflow.id.clone()))?;

        let lookup: HashMap<&str, &Arc<dyn Agent>> =
            agents.iter().map(|agent| (agent.id(), agent)).collect();
        let entry = *lookup
            .get(entry_id)
            .ok_or_else(|| WeaveError::AgentNotRegistered(entry_id.to_string()))?;

        let entry_result = run_agent(Arc::clone(entry), input, ctx.clone()).await?;
        let entry_output = entry_result.output.clone();
        let mut results = vec![entry_result];

        for route in &workflow.routes {
            if !evaluate_condition(route.condition.as_ref(), &entry_output, ctx) {
                continue;
            }
            debug!(next = %route.target_agent_id, "route matched");
            let target = *lookup
                .get(route.target_agent_id.as_str())
                .ok_or_else(|| WeaveError::AgentNotRegistered(route.target_agent_id.clone()))?;
            results.push(run_agent(Arc::clone(target), entry_output.clone(), ctx.clone()).await?);
            break;
        }

        Ok(results)
    }
}

/// 单个 Agent 的执行约定：设当前 Agent、计时、写回输出
async fn run_agent(
    agent: Arc<dyn Agent>,
    input: Value,
    ctx: ExecutionContext,
) -> Result<AgentResult> {
    ctx.set_current_agent(Some(agent.descriptor()));
    let started = Instant::now();
    let reply = agent
        .execute(input, &ctx)
        .await
        .map_err(|err| WeaveError::AgentFailed {
            agent: agent.id().to_string(),
            message: err.to_string(),
        })?;
    let duration_ms = started.elapsed().as_millis() as u64;
    ctx.add_agent_output(agent.id(), reply.output.clone());
    debug!(agent = %agent.id(), duration_ms, success = reply.success, "agent finished");
    Ok(AgentResult {
        agent_id: agent.id().to_string(),
        output: reply.output,
        duration_ms,
    })
}
