//! 上传驱动 - 业务能力层
//!
//! 负责"附上一个文档并发出触发指令"。发送之后生成即已开始，无法回滚。

use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::{secs, MissingControlPolicy, UploadConfig};
use crate::error::BrowserError;
use crate::infrastructure::{is_upload_disabled, PageProbe, RemoteSession};
use crate::models::FailureKind;

/// 上传驱动
pub struct UploadDriver {
    settle_delay: Duration,
    picker_timeout: Duration,
    trigger_command: String,
    missing_control: MissingControlPolicy,
}

impl UploadDriver {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            settle_delay: secs(config.settle_delay_secs),
            picker_timeout: secs(config.picker_timeout_secs),
            trigger_command: config.trigger_command.clone(),
            missing_control: config.missing_control,
        }
    }

    /// 附上文档并触发生成
    ///
    /// 1. 控件已禁用则立即失败
    /// 2. 没有文件控件时先点上传按钮
    /// 3. 绑定文件
    /// 4. 等待页面确认上传
    /// 5. 再次检查控件，被禁用说明上传被静默拒绝
    /// 6. 键入触发指令并发送
    pub async fn attach(
        &self,
        probe: &dyn PageProbe,
        session: &dyn RemoteSession,
        document_path: &Path,
    ) -> Result<(), FailureKind> {
        if is_upload_disabled(probe, self.missing_control).await {
            warn!("⚠️ 上传控件不可用，跳过此文档");
            return Err(FailureKind::UploadDisabled);
        }

        self.ensure_file_input(session).await?;

        session
            .bind_file(document_path)
            .await
            .map_err(|e| match e {
                BrowserError::FileBindingFailed { .. } | BrowserError::ElementNotFound { .. } => {
                    warn!("⚠️ 绑定文件失败: {}", e);
                    FailureKind::SendFailed
                }
                other => unclassified(other),
            })?;
        debug!("文件已绑定: {}", document_path.display());

        sleep(self.settle_delay).await;

        if is_upload_disabled(probe, self.missing_control).await {
            warn!("⚠️ 上传后控件变为禁用，页面拒绝了该文件");
            return Err(FailureKind::UploadDisabled);
        }

        session
            .type_text(&self.trigger_command)
            .await
            .map_err(unclassified)?;
        session.submit().await.map_err(unclassified)?;

        info!("📤 已发送触发指令: {}", self.trigger_command);
        Ok(())
    }

    /// 确保页面上有文件控件
    async fn ensure_file_input(&self, session: &dyn RemoteSession) -> Result<(), FailureKind> {
        if session.has_file_input().await.map_err(unclassified)? {
            return Ok(());
        }

        debug!("文件控件不存在，尝试点击上传按钮");
        session
            .open_file_picker(self.picker_timeout)
            .await
            .map_err(|e| match e {
                BrowserError::ElementNotFound { .. } => {
                    warn!("⚠️ 找不到上传按钮: {}", e);
                    FailureKind::UploadButtonMissing
                }
                BrowserError::Timeout { .. } => {
                    warn!("⚠️ 文件选择框没有出现: {}", e);
                    FailureKind::SendFailed
                }
                other => unclassified(other),
            })
    }
}

fn unclassified(err: BrowserError) -> FailureKind {
    warn!("⚠️ 浏览器交互出现未归类错误: {}", err);
    FailureKind::UnknownError(err.to_string())
}
