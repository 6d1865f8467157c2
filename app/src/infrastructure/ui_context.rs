// UI 上下文
//
// 渲染所在的单一上下文。状态只在这里被修改：
// 其他任务（包括在工作线程上完成的远端调用）通过 UiHandle 投递闭包，
// 由驱动渲染的循环按投递顺序依次执行

use thiserror::Error;
use tokio::sync::mpsc;

/// 在 UI 上下文中执行的任务
pub type UiTask<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("UI context is closed")]
pub struct UiContextClosed;

/// 向 UI 上下文投递任务的句柄，可跨线程克隆
pub struct UiHandle<S> {
    sender: mpsc::UnboundedSender<UiTask<S>>,
}

impl<S> Clone for UiHandle<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S: 'static> UiHandle<S> {
    /// 将任务投递到 UI 上下文，不等待其执行
    pub fn dispatch<F>(&self, task: F) -> Result<(), UiContextClosed>
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.sender
            .send(Box::new(task))
            .map_err(|_| UiContextClosed)
    }
}

/// UI 上下文，持有状态和任务队列
pub struct UiContext<S> {
    state: S,
    receiver: mpsc::UnboundedReceiver<UiTask<S>>,
}

impl<S: 'static> UiContext<S> {
    /// 创建上下文；`build` 拿到句柄后构造状态（状态自身可以持有句柄）
    pub fn new(build: impl FnOnce(UiHandle<S>) -> S) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let state = build(UiHandle { sender });
        Self { state, receiver }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// 等待并执行下一个任务
    ///
    /// 所有句柄都已释放时返回 `false`。可在 `select!` 中使用
    pub async fn next_task(&mut self) -> bool {
        match self.receiver.recv().await {
            Some(task) => {
                task(&mut self.state);
                true
            }
            None => false,
        }
    }

    /// 执行所有已到达的任务，返回执行数量
    pub fn run_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task(&mut self.state);
            applied += 1;
        }
        applied
    }
}
