use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::Result;
use crate::state::ExecutionContext;

use super::agent::{Agent, AgentReply};
use super::config::AgentConfig;

/// 配置驱动的 Agent 实现
///
/// `Orchestrator::load_agent` 的构造产物。没有接入外部模型时
/// 回显结构化载荷并附带提示词上下文，方便在接入 LLM 之前
/// 验证编排逻辑；真正的推理能力由调用方自己实现 [`Agent`] 提供。
#[derive(Clone, Debug)]
pub struct ConfigDrivenAgent {
    config: AgentConfig,
}

impl ConfigDrivenAgent {
    pub fn new(config: AgentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

#[async_trait]
impl Agent for ConfigDrivenAgent {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn name(&self) -> &str {
        self.config.name.as_deref().unwrap_or(&self.config.id)
    }

    fn role(&self) -> &str {
        self.config.role.as_deref().unwrap_or("")
    }

    fn tools(&self) -> Vec<String> {
        self.config.tools.clone()
    }

    async fn execute(&self, input: Value, ctx: &ExecutionContext) -> Result<AgentReply> {
        let prompt_context = ctx.render_prompt_context();
        tracing::debug!(agent = %self.config.id, "config-driven agent executing");

        let mut output = json!({
            "agent": self.config.id,
            "role": self.role(),
            "input": input,
        });
        if let Some(prompt) = &self.config.prompt {
            output["prompt"] = Value::String(prompt.clone());
        }
        if !prompt_context.is_empty() {
            output["promptContext"] = Value::String(prompt_context);
        }
        Ok(AgentReply::ok(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn echoes_input_with_prompt_context() {
        let agent = ConfigDrivenAgent::new(
            AgentConfig::new("echo")
                .with_role("support")
                .with_prompt("Be brief."),
        );
        let ctx = ExecutionContext::new("exec-1");
        ctx.set("topic", json!("refunds"));

        let reply = agent.execute(json!("hello"), &ctx).await.unwrap();
        assert!(reply.success);
        assert_eq!(reply.output["agent"], "echo");
        assert_eq!(reply.output["input"], "hello");
        assert_eq!(reply.output["prompt"], "Be brief.");
        assert!(reply.output["promptContext"]
            .as_str()
            .unwrap()
            .contains("Shared information:"));
    }
}
