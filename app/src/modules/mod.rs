// Modules Layer - 业务模块
//
// 按照六边形架构组织的业务模块：
// - chat: 聊天模块，处理消息历史和远端调用
// - config: 配置模块，处理应用设置

pub mod chat;
pub mod config;

pub use chat::ChatModule;
pub use config::ConfigModule;
