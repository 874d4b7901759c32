//! 批量文档编排器 - 编排层
//!
//! ## 职责
//!
//! 把一组文档依次送入同一个远端页面，汇总为完整的 [`Report`]。
//!
//! ## 设计特点
//!
//! - **严格顺序**：远端只有一个对话框，同一时间只处理一个文档
//! - **失败隔离**：单个文档的失败（包括 panic）只影响它自己的结果
//! - **完整报告**：每个输入文档在报告中恰好一条
//! - **可停止**：停止后不再开始新文档，当前文档的有界等待照常结束

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::infrastructure::{PageProbe, RemoteSession};
use crate::models::{order_documents, Document, FailureKind, Report, SubmissionResult};
use crate::services::{LogProgress, Progress, ProgressSink};
use crate::workflow::{DocumentCtx, SubmissionFlow};

/// 停止开关
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// 未开始的文档在报告中的说明
pub const NOT_STARTED_MESSAGE: &str = "run stopped before this document started";

/// 批量文档编排器
pub struct BatchOrchestrator<'a> {
    flow: SubmissionFlow,
    probe: &'a dyn PageProbe,
    session: &'a dyn RemoteSession,
    progress: Box<dyn ProgressSink + 'a>,
    stop: StopHandle,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(flow: SubmissionFlow, probe: &'a dyn PageProbe, session: &'a dyn RemoteSession) -> Self {
        Self {
            flow,
            probe,
            session,
            progress: Box::new(LogProgress),
            stop: StopHandle::new(),
        }
    }

    pub fn with_progress(mut self, progress: impl ProgressSink + 'a) -> Self {
        self.progress = Box::new(progress);
        self
    }

    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// 处理全部文档
    ///
    /// 按文件名尾部编号升序依次处理，永远返回完整报告。
    pub async fn run(&self, documents: Vec<Document>) -> Report {
        let documents = order_documents(documents);
        let total = documents.len();
        let mut report = Report::with_capacity(total);

        for (idx, document) in documents.iter().enumerate() {
            let ctx = DocumentCtx::new(idx + 1, total, &document.display_name);

            let result = if self.stop.is_stopped() {
                warn!("{} ⏹️ 运行已停止，不再开始此文档", ctx);
                SubmissionResult::Failure(FailureKind::UnknownError(NOT_STARTED_MESSAGE.to_string()))
            } else {
                log_document_start(&ctx);
                self.process_document(document, &ctx).await
            };

            let summary = result.summary();
            let name = report.insert(&document.display_name, result);
            self.progress.on_progress(&Progress {
                processed: idx + 1,
                total,
                display_name: name,
                summary,
            });
        }

        report
    }

    /// 处理单个文档，把 panic 也转换为结果
    async fn process_document(&self, document: &Document, ctx: &DocumentCtx) -> SubmissionResult {
        let flow = self.flow.run(self.probe, self.session, document, ctx);
        match AssertUnwindSafe(flow).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!("{} ❌ 处理过程中发生意外错误: {}", ctx, message);
                SubmissionResult::Failure(FailureKind::UnknownError(message))
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ========== 日志辅助函数 ==========

fn log_document_start(ctx: &DocumentCtx) {
    info!("\n{}", "─".repeat(60));
    info!("{} 开始处理", ctx);
}
