// Chat Domain - Entities
// 实体通过唯一标识符来识别

mod history;
mod message;

pub use history::*;
pub use message::*;
