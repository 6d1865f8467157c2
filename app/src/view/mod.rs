// Chat View - 终端聊天界面
//
// 渲染消息列表和输入框。历史通过 watch 快照响应式读取，
// 提交时调用 ChatStore::send，失败事件通过 EventBus 显示在状态行

pub mod bubble;
pub mod input;

pub use bubble::{render_bubble, BubbleStyle, FAILED_MARK, PROGRESS_INDICATOR};
pub use input::InputField;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, info, warn};

use crate::infrastructure::{AppEvent, UiContext};
use crate::modules::chat::{ChatMessage, ChatStore, MessageId};
use crate::modules::config::ViewConfig;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const PROMPT: &str = "> ";

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// 聊天视图
pub struct ChatView {
    title: String,
    config: ViewConfig,
    style: BubbleStyle,
    input: InputField,
    /// 滚动位置：当前可见的最新消息
    scroll_anchor: Option<MessageId>,
    status: Option<String>,
}

impl ChatView {
    pub fn new(title: impl Into<String>, config: ViewConfig) -> Self {
        let style = BubbleStyle::new(config.bubble_width, config.color);
        Self {
            title: title.into(),
            config,
            style,
            input: InputField::new(),
            scroll_anchor: None,
            status: None,
        }
    }

    pub fn input(&self) -> &InputField {
        &self.input
    }

    pub fn scroll_anchor(&self) -> Option<MessageId> {
        self.scroll_anchor
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// 驱动视图，直到输入结束且所有发送都已完成
    pub async fn run<R, W>(
        &mut self,
        ctx: &mut UiContext<ChatStore>,
        input: R,
        mut output: W,
    ) -> Result<(), ViewError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut history = ctx.state().subscribe();
        let mut events = ctx.state().event_bus().subscribe();
        let mut input_open = true;
        let mut history_open = true;
        let mut events_open = true;

        let snapshot = history.borrow_and_update().clone();
        self.draw(&snapshot, &mut output).await?;

        loop {
            if !input_open && ctx.state().in_flight() == 0 {
                break;
            }

            tokio::select! {
                line = lines.next_line(), if input_open => {
                    match line? {
                        Some(line) => {
                            self.input.set_text(line);
                            self.submit(ctx);
                        }
                        None => {
                            debug!("Input closed, waiting for {} in-flight sends", ctx.state().in_flight());
                            input_open = false;
                        }
                    }
                }
                alive = ctx.next_task() => {
                    if !alive {
                        break;
                    }
                }
                changed = history.changed(), if history_open => {
                    if changed.is_err() {
                        history_open = false;
                        continue;
                    }
                    let snapshot = history.borrow_and_update().clone();
                    self.draw(&snapshot, &mut output).await?;
                }
                event = events.recv(), if events_open => {
                    match event {
                        Ok(event) => {
                            if self.apply_event(&event) {
                                let snapshot = ctx.state().history().as_slice().to_vec();
                                self.draw(&snapshot, &mut output).await?;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("View lagged behind {} chat events", skipped);
                        }
                        Err(RecvError::Closed) => events_open = false,
                    }
                }
            }
        }

        // 循环退出时可能还有未读的事件
        loop {
            match events.try_recv() {
                Ok(event) => {
                    self.apply_event(&event);
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("View lagged behind {} chat events", skipped);
                }
                Err(_) => break,
            }
        }

        // 最后一帧
        let snapshot = ctx.state().history().as_slice().to_vec();
        self.draw(&snapshot, &mut output).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;

        info!("Chat view finished");
        Ok(())
    }

    /// 处理聊天事件，返回是否需要重绘
    pub fn apply_event(&mut self, event: &AppEvent) -> bool {
        match event {
            AppEvent::MessageFailed { error, .. } => {
                self.status = Some(format!("{} Gemini request failed: {}", FAILED_MARK, error));
                true
            }
            _ => false,
        }
    }

    /// 提交输入框内容
    fn submit(&mut self, ctx: &mut UiContext<ChatStore>) {
        let Some(text) = self.input.submit() else {
            return;
        };

        match ctx.state_mut().send(text) {
            Ok(receipt) => {
                debug!("Submitted message {}", receipt.sent_id);
                self.status = None;
            }
            Err(e) => {
                warn!("Send rejected: {}", e);
                self.status = Some(format!("Cannot send: {}", e));
            }
        }
    }

    async fn draw<W>(&mut self, messages: &[ChatMessage], output: &mut W) -> Result<(), ViewError>
    where
        W: AsyncWrite + Unpin,
    {
        let frame = self.render_frame(messages);
        output.write_all(frame.as_bytes()).await?;
        output.flush().await?;
        Ok(())
    }

    /// 渲染完整画面，并自动滚动到最新消息
    pub fn render_frame(&mut self, messages: &[ChatMessage]) -> String {
        self.scroll_anchor = messages.last().map(|m| m.id());

        let start = messages
            .len()
            .saturating_sub(self.config.max_visible_messages);
        let rule = "─".repeat(self.style.frame_width);

        let mut frame = String::new();
        if self.config.clear_screen {
            frame.push_str(CLEAR_SCREEN);
        }
        frame.push_str(&self.title);
        frame.push('\n');
        frame.push_str(&rule);
        frame.push('\n');

        if start > 0 {
            frame.push_str(&format!("({} earlier messages)\n", start));
        }
        for message in &messages[start..] {
            for line in render_bubble(message, &self.style) {
                frame.push_str(&line);
                frame.push('\n');
            }
        }

        frame.push_str(&rule);
        frame.push('\n');
        if let Some(status) = &self.status {
            frame.push_str(status);
            frame.push('\n');
        }
        frame.push_str(PROMPT);
        frame.push_str(self.input.text());
        frame
    }
}
