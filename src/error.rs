use thiserror::Error;

pub type Result<T> = std::result::Result<T, WeaveError>;

#[derive(Debug, Error)]
pub enum WeaveError {
    #[error("agent `{0}` not registered")]
    AgentNotRegistered(String),
    #[error("workflow `{0}` not registered")]
    WorkflowNotRegistered(String),
    #[error("conditional workflow `{0}` has no entry agent")]
    MissingEntryAgent(String),
    #[error("agent `{agent}` depends on `{dependency}`, which is not part of this run")]
    UnresolvedDependency { agent: String, dependency: String },
    #[error("cyclic dependency among agents: {0}")]
    DependencyCycle(String),
    #[error("agent `{agent}` failed: {message}")]
    AgentFailed { agent: String, message: String },
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("context error: {0}")]
    Context(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
