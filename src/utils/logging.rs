/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::Report;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则 verbose 时为 debug，平时为 info。
/// 重复初始化会被忽略。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(port: u16, trigger_command: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 顺序文档提交模式");
    info!("🌐 浏览器调试端口: {}", port);
    info!("⌨️ 触发指令: {}", trigger_command);
    info!("{}", "=".repeat(60));
}

/// 记录文档加载信息
pub fn log_documents_loaded(total: usize) {
    info!("✓ 找到 {} 个待处理的文档", total);
    info!("📋 将按文件名尾部编号依次处理\n");
}

/// 打印最终统计信息
pub fn print_final_stats(report: &Report, report_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", report.success_count(), report.len());
    info!("❌ 失败: {}", report.failure_count());
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", report_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
