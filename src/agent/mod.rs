// Agent 抽象与注册表

mod agent;
mod config;
mod config_driven;
mod registry;

pub use agent::{Agent, AgentDescriptor, AgentReply};
pub use config::AgentConfig;
pub use config_driven::ConfigDrivenAgent;
pub use registry::AgentRegistry;
