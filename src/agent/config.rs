use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, WeaveError};

/// 声明式 Agent 配置，由外部调用方提供
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl AgentConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            role: None,
            prompt: None,
            tools: Vec::new(),
            metadata: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| WeaveError::Serialization(e.to_string()))
    }

    pub fn from_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| WeaveError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_parses_with_optional_fields_absent() {
        let config = AgentConfig::from_value(json!({"id": "researcher"})).unwrap();
        assert_eq!(config.id, "researcher");
        assert!(config.role.is_none());
        assert!(config.tools.is_empty());
    }

    #[test]
    fn config_parses_full_shape() {
        let config = AgentConfig::from_str(
            r#"{"id": "writer", "name": "Writer", "role": "author", "tools": ["search"]}"#,
        )
        .unwrap();
        assert_eq!(config.name.as_deref(), Some("Writer"));
        assert_eq!(config.tools, vec!["search".to_string()]);
    }
}
