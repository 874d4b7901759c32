use anyhow::Result;
use pdf_batch_submit::utils::logging;
use pdf_batch_submit::{App, Config, StopHandle};
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // Ctrl-C：当前文档等待结束后不再开始新文档
    let stop = StopHandle::new();
    let stop_on_signal = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("⏹️ 收到停止信号，当前文档完成后结束");
            stop_on_signal.stop();
        }
    });

    // 初始化并运行应用
    let app = App::initialize(config).await?;
    app.run(stop).await?;

    Ok(())
}
