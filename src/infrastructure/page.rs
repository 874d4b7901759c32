//! 页面能力抽象
//!
//! 引擎只通过这两个 trait 接触远端页面：
//! - [`PageProbe`]：只读探针，每次调用都重新查询当前状态
//! - [`RemoteSession`]：会改变页面状态的交互操作

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::config::MissingControlPolicy;
use crate::error::BrowserResult;

/// 上传控件的当前状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlState {
    #[default]
    Enabled,
    Disabled,
    /// 页面上找不到控件
    Missing,
}

impl ControlState {
    /// 按策略判断是否视为"已禁用"
    pub fn is_disabled(self, policy: MissingControlPolicy) -> bool {
        match self {
            ControlState::Enabled => false,
            ControlState::Disabled => true,
            ControlState::Missing => policy == MissingControlPolicy::FailClosed,
        }
    }
}

/// 页面探针
///
/// 所有方法都必须容忍元素尚不存在，此时返回 false / 空值而不是报错。
#[async_trait]
pub trait PageProbe: Send + Sync {
    /// 页面是否显示"停止生成"按钮
    async fn is_generating(&self) -> bool;

    /// 输入区是否还有附件
    async fn has_pending_attachment(&self) -> bool;

    /// 上传控件状态
    async fn upload_control_state(&self) -> ControlState;

    /// 是否显示错误元素或错误短语
    async fn has_visual_error(&self) -> bool;

    /// 当前地址是否为认证失败页
    async fn is_auth_error(&self) -> bool;

    /// 最新一条回复的文本，没有则为空
    async fn latest_response_text(&self) -> String;

    /// 当前地址
    async fn current_url(&self) -> Option<String>;
}

/// 上传控件是否视为禁用
pub async fn is_upload_disabled(probe: &dyn PageProbe, policy: MissingControlPolicy) -> bool {
    probe.upload_control_state().await.is_disabled(policy)
}

/// 页面交互
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// 页面上是否已有文件输入控件
    async fn has_file_input(&self) -> BrowserResult<bool>;

    /// 点击上传按钮，并等待文件输入控件出现
    ///
    /// 找不到按钮时返回 `BrowserError::ElementNotFound`，
    /// 控件迟迟不出现时返回 `BrowserError::Timeout`。
    async fn open_file_picker(&self, timeout: Duration) -> BrowserResult<()>;

    /// 把文件绑定到文件输入控件
    async fn bind_file(&self, path: &Path) -> BrowserResult<()>;

    /// 在输入框中键入文本
    async fn type_text(&self, text: &str) -> BrowserResult<()>;

    /// 发送
    async fn submit(&self) -> BrowserResult<()>;
}
