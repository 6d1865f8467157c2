// LLM Adapters
// 远端生成服务的适配器实现

mod factory;
mod gemini;
mod mock;

pub use factory::*;
pub use gemini::*;
pub use mock::*;
