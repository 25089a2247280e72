// 运行状态模块

mod context;
pub(crate) mod message;

pub use context::ExecutionContext;
pub use message::{Message, BROADCAST};
