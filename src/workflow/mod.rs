// 工作流模块：数据模型、条件求值、四种拓扑的执行器

mod conditions;
mod executor;
mod loader;
mod types;

pub use conditions::{evaluate_condition, Condition, TypedCondition};
pub use executor::WorkflowExecutor;
pub use loader::{load_workflow_from_path, load_workflow_from_str, load_workflow_from_value};
pub use types::{
    AgentBinding, AgentResult, ExecutionResult, Route, RunStatus, Workflow, WorkflowType,
};
