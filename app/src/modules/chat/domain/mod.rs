// Chat Domain Layer
// 领域层包含聊天消息实体、历史记录和值对象

pub mod entities;
pub mod value_objects;

// 重导出常用类型
pub use entities::{
    ChatMessage, History, HistoryError, TransitionError, FAILED_CONTENT, LOADING_SENTINEL,
};
pub use value_objects::{BubbleRole, MessageId, MessageStatus};
