#![allow(dead_code)]

use pdf_batch_submit::models::Document;
use pdf_batch_submit::Config;

/// 所有等待都压缩到毫秒级的配置
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.guard.max_wait_secs = 0.01;
    config.guard.poll_interval_secs = 0.001;
    config.upload.settle_delay_secs = 0.0;
    config.upload.picker_timeout_secs = 0.01;
    config.stabilizer.max_wait_secs = 0.2;
    config.stabilizer.poll_interval_secs = 0.001;
    config.stabilizer.stable_cycles_required = 4;
    config
}

pub fn doc(name: &str) -> Document {
    Document::new(format!("/tmp/in/{}", name), name)
}
