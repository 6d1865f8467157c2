// Config Domain
//
// 配置领域层

mod entities;

pub use entities::*;
