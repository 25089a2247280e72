use std::path::Path;

use anyhow::Context as _;
use serde_json::Value;

use crate::error::{Result, WeaveError};

use super::types::Workflow;

/// 从已解析的 JSON 值加载工作流定义
pub fn load_workflow_from_value(value: Value) -> Result<Workflow> {
    serde_json::from_value(value).map_err(|e| WeaveError::Serialization(e.to_string()))
}

/// 从 JSON 文本加载工作流定义
pub fn load_workflow_from_str(raw: &str) -> Result<Workflow> {
    serde_json::from_str(raw).map_err(|e| WeaveError::Serialization(e.to_string()))
}

/// 从磁盘文件加载工作流定义
pub fn load_workflow_from_path(path: impl AsRef<Path>) -> Result<Workflow> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read workflow file {}", path.display()))?;
    load_workflow_from_str(&raw)
}
