//! 报告写入服务 - 业务能力层
//!
//! 只负责把完整的 Report 落盘，不关心流程

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::ReportFormat;
use crate::models::Report;

/// 报告接收方
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn write(&self, report: &Report) -> Result<()>;
}

/// 按配置选择写入器
pub fn report_sink(format: ReportFormat, path: impl Into<PathBuf>) -> Box<dyn ReportSink> {
    match format {
        ReportFormat::Markdown => Box::new(MarkdownReportWriter::new(path)),
        ReportFormat::Json => Box::new(JsonReportWriter::new(path)),
    }
}

/// Markdown 报告：每个文档一个标题 + 正文，保持输入顺序
pub struct MarkdownReportWriter {
    path: PathBuf,
}

impl MarkdownReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 渲染报告内容
    pub fn render(report: &Report) -> String {
        let mut out = format!(
            "# 处理结果 - {}\n\n成功 {} / 共 {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            report.success_count(),
            report.len()
        );
        for (name, result) in report.iter() {
            out.push_str(&format!("## Arquivo: {}\n\n{}\n\n", name, result.render()));
        }
        out
    }
}

#[async_trait]
impl ReportSink for MarkdownReportWriter {
    async fn write(&self, report: &Report) -> Result<()> {
        debug!("写入 Markdown 报告: {} 条", report.len());
        let content = Self::render(report);
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("无法写入报告: {}", self.path.display()))?;
        info!("✓ 报告已保存至: {}", self.path.display());
        Ok(())
    }
}

/// JSON 报告
pub struct JsonReportWriter {
    path: PathBuf,
}

impl JsonReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReportSink for JsonReportWriter {
    async fn write(&self, report: &Report) -> Result<()> {
        debug!("写入 JSON 报告: {} 条", report.len());
        let content = serde_json::to_string_pretty(report)?;
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("无法写入报告: {}", self.path.display()))?;
        info!("✓ 报告已保存至: {}", self.path.display());
        Ok(())
    }
}
