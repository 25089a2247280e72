use std::collections::HashMap;
use std::sync::Arc;

use super::agent::Agent;

/// 按 id 持有已加载的 Agent 实例，支持按角色查找
#[derive(Clone, Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同 id 重复注册时覆盖旧实例
    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        self.agents.insert(agent.id().to_string(), agent);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(id).cloned()
    }

    pub fn all(&self) -> Vec<Arc<dyn Agent>> {
        self.agents.values().cloned().collect()
    }

    pub fn by_role(&self, role: &str) -> Vec<Arc<dyn Agent>> {
        self.agents
            .values()
            .filter(|agent| agent.role() == role)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn clear(&mut self) {
        self.agents.clear();
    }
}
