//! 进度通知
//!
//! 每处理完一个文档回调一次，这是运行中唯一对外的反馈。

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

/// 一次进度回调
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
    pub display_name: String,
    pub summary: String,
}

/// 进度接收方
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, progress: &Progress);
}

/// 写日志
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn on_progress(&self, progress: &Progress) {
        info!(
            "📊 进度 {}/{}: {} → {}",
            progress.processed, progress.total, progress.display_name, progress.summary
        );
    }
}

/// 转发到通道，供独立的展示层消费
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: UnboundedSender<Progress>,
}

impl ChannelProgress {
    pub fn new(sender: UnboundedSender<Progress>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelProgress {
    fn on_progress(&self, progress: &Progress) {
        if self.sender.send(progress.clone()).is_err() {
            debug!("进度接收端已关闭");
        }
    }
}
