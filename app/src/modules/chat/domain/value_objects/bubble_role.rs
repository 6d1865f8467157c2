use serde::{Deserialize, Serialize};
use std::fmt;

/// 气泡角色
///
/// 创建时确定，只影响渲染（对齐方式、颜色），不影响任何行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleRole {
    /// 用户发出的消息
    Sent,
    /// 远端服务返回的消息
    Received,
}

impl BubbleRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            BubbleRole::Sent => "sent",
            BubbleRole::Received => "received",
        }
    }
}

impl fmt::Display for BubbleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
