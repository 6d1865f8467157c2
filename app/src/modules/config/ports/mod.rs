// Config Ports
//
// 配置模块端口

mod config_repository;

pub use config_repository::*;
