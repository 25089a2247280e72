pub mod agent;
pub mod error;
pub mod orchestrator;
pub mod state;
pub mod toolcall;
pub mod utils;
pub mod workflow;

pub use agent::{Agent, AgentConfig, AgentDescriptor, AgentRegistry, AgentReply, ConfigDrivenAgent};
pub use error::{Result, WeaveError};
pub use orchestrator::Orchestrator;
pub use state::{ExecutionContext, Message, BROADCAST};
pub use toolcall::{
    InlineToolCall, ParamSchema, PropertySchema, ToolCall, ToolCallCodec, ToolResult, Validation,
};
pub use workflow::{
    evaluate_condition, load_workflow_from_path, load_workflow_from_str, load_workflow_from_value,
    AgentBinding, AgentResult, Condition, ExecutionResult, Route, RunStatus, TypedCondition,
    Workflow, WorkflowExecutor, WorkflowType,
};
pub use utils::logging::LoggingConfig;
