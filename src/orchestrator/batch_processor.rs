//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：连接已运行的浏览器，创建 JsExecutor / ChromiumPage
//! 2. **文档加载**：扫描输入目录中的 PDF
//! 3. **批量处理**：委托 BatchOrchestrator 顺序处理
//! 4. **报告输出**：把完整报告交给 ReportSink
//! 5. **全局统计**：输出最终统计
//!
//! 浏览器由外部启动和关闭，这里只持有连接。

use anyhow::Result;
use chromiumoxide::Browser;
use tracing::{error, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::{ChromiumPage, JsExecutor};
use crate::models::{load_documents_from_folder, Report};
use crate::orchestrator::batch_orchestrator::{BatchOrchestrator, StopHandle};
use crate::services::{report_sink, LogProgress, ProgressSink};
use crate::utils::logging::{log_documents_loaded, log_startup, print_final_stats};
use crate::workflow::SubmissionFlow;

/// 应用主结构
pub struct App {
    config: Config,
    _browser: Browser,
    page: ChromiumPage,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(config.browser_debug_port, &config.upload.trigger_command);

        // 连接浏览器
        let (browser, page) =
            browser::connect_to_browser_and_page(config.browser_debug_port, &config.target_url)
                .await?;

        // 创建 JsExecutor（持有 page）
        let executor = JsExecutor::new(page);
        let page = ChromiumPage::new(executor, config.selectors.clone(), &config.classifier);

        Ok(Self {
            config,
            _browser: browser,
            page,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self, stop: StopHandle) -> Result<Report> {
        self.run_with_progress(stop, LogProgress).await
    }

    /// 运行应用主逻辑，并把进度转发给指定接收方
    pub async fn run_with_progress(
        &self,
        stop: StopHandle,
        progress: impl ProgressSink + 'static,
    ) -> Result<Report> {
        let documents = load_documents_from_folder(&self.config.input_folder).await?;

        if documents.is_empty() {
            warn!("⚠️ 没有找到待处理的PDF文件，程序结束");
            return Ok(Report::new());
        }
        log_documents_loaded(documents.len());

        let orchestrator = BatchOrchestrator::new(SubmissionFlow::new(&self.config), &self.page, &self.page)
            .with_progress(progress)
            .with_stop_handle(stop);
        let report = orchestrator.run(documents).await;

        if report.has_auth_failure() {
            error!("❌ 本次运行出现认证失败，请重新登录后再处理失败的文档");
        }

        report_sink(self.config.report_format, &self.config.report_file)
            .write(&report)
            .await?;

        print_final_stats(&report, &self.config.report_file);

        Ok(report)
    }
}
