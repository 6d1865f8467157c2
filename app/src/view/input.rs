// 输入框状态

/// 单行输入框
///
/// 只有非空时才允许提交；提交后清空
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    text: String,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_submit_enabled(&self) -> bool {
        !self.text.is_empty()
    }

    /// 取出待提交的文本并清空输入框
    pub fn submit(&mut self) -> Option<String> {
        if self.is_submit_enabled() {
            Some(std::mem::take(&mut self.text))
        } else {
            None
        }
    }
}
