// 消息气泡渲染
//
// 发送的消息靠右，接收的消息靠左，颜色按角色区分

use chrono::Local;

use crate::modules::chat::{BubbleRole, ChatMessage, MessageStatus};

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_SENT: &str = "\x1b[36m";
const ANSI_RECEIVED: &str = "\x1b[32m";
const ANSI_FAILED: &str = "\x1b[33m";
const ANSI_DIM: &str = "\x1b[2m";

/// 等待响应时显示的进度指示
pub const PROGRESS_INDICATOR: &str = "● ● ●";
/// 失败标记
pub const FAILED_MARK: &str = "⚠";

/// 气泡布局参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleStyle {
    /// 气泡最大宽度（含边框）
    pub width: usize,
    /// 整个画面宽度，发送方气泡右对齐到这里
    pub frame_width: usize,
    pub color: bool,
}

impl BubbleStyle {
    pub fn new(width: usize, color: bool) -> Self {
        Self {
            width,
            frame_width: width + width / 2,
            color,
        }
    }

    fn text_width(&self) -> usize {
        self.width.saturating_sub(4).max(1)
    }
}

/// 渲染单条消息为若干行
pub fn render_bubble(message: &ChatMessage, style: &BubbleStyle) -> Vec<String> {
    let mut body = match message.status() {
        MessageStatus::Pending => vec![PROGRESS_INDICATOR.to_string()],
        MessageStatus::Failed { .. } => {
            wrap(&format!("{} {}", FAILED_MARK, message.content()), style.text_width())
        }
        _ => wrap(message.content(), style.text_width()),
    };
    if let MessageStatus::Failed { reason } = message.status() {
        body.extend(wrap(&format!("({})", reason), style.text_width()));
    }

    let inner = body.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let mut lines = Vec::with_capacity(body.len() + 3);
    lines.push(format!("╭{}╮", "─".repeat(inner + 2)));
    for line in &body {
        let pad = inner - line.chars().count();
        lines.push(format!("│ {}{} │", line, " ".repeat(pad)));
    }
    lines.push(format!("╰{}╯", "─".repeat(inner + 2)));
    lines.push(meta_line(message));

    let color = bubble_color(message);
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let is_meta = i == body.len() + 2;
            let aligned = align(&line, message.role(), style.frame_width);
            if !style.color {
                aligned
            } else if is_meta {
                format!("{}{}{}", ANSI_DIM, aligned, ANSI_RESET)
            } else {
                format!("{}{}{}", color, aligned, ANSI_RESET)
            }
        })
        .collect()
}

fn meta_line(message: &ChatMessage) -> String {
    let author = match message.role() {
        BubbleRole::Sent => "You",
        BubbleRole::Received => "Gemini",
    };
    let time = message.created_at().with_timezone(&Local).format("%H:%M");
    format!("{} · {}", author, time)
}

fn bubble_color(message: &ChatMessage) -> &'static str {
    if message.status().is_failed() {
        return ANSI_FAILED;
    }
    match message.role() {
        BubbleRole::Sent => ANSI_SENT,
        BubbleRole::Received => ANSI_RECEIVED,
    }
}

fn align(line: &str, role: BubbleRole, frame_width: usize) -> String {
    match role {
        BubbleRole::Sent => {
            let pad = frame_width.saturating_sub(line.chars().count());
            format!("{}{}", " ".repeat(pad), line)
        }
        BubbleRole::Received => line.to_string(),
    }
}

/// 按单词折行，超长单词强制截断
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut line = String::new();
        let mut line_len = 0;

        for word in paragraph.split(' ') {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > width {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let sep = usize::from(line_len > 0);
            if line_len + sep + word.len() > width {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            } else if sep == 1 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(word.iter());
            line_len += word.len();
        }

        lines.push(line);
    }

    lines
}
