// 工具调用规范化模块
//
// 三种上游线格式（function-call / tool-use / custom）归一到一个
// 内部表示，另带自由文本内联语法扫描与轻量参数校验。

mod codec;
mod inline;
mod render;
mod validate;

pub use codec::{ToolCall, ToolCallCodec};
pub use inline::InlineToolCall;
pub use render::ToolResult;
pub use validate::{ParamSchema, PropertySchema, Validation};
