use std::time::Duration;

use thiserror::Error;

/// 浏览器自动化层错误
///
/// 只描述"与页面交互失败"这一类问题；单个文档的业务失败
/// 由 [`crate::models::FailureKind`] 表达，不走这里。
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 未找到元素
    #[error("未找到元素: {selector}")]
    ElementNotFound { selector: String },
    /// 等待元素出现超时
    #[error("等待元素超时 ({timeout:?}): {selector}")]
    Timeout { selector: String, timeout: Duration },
    /// 文件绑定失败
    #[error("文件绑定失败 ({path}): {reason}")]
    FileBindingFailed { path: String, reason: String },
    /// 执行脚本失败
    #[error("执行脚本失败: {0}")]
    ScriptExecutionFailed(String),
    /// 浏览器协议错误
    #[error("浏览器协议错误: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),
}

impl From<serde_json::Error> for BrowserError {
    fn from(err: serde_json::Error) -> Self {
        BrowserError::ScriptExecutionFailed(err.to_string())
    }
}

impl BrowserError {
    /// 创建元素缺失错误
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        BrowserError::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// 创建脚本执行错误
    pub fn script(message: impl Into<String>) -> Self {
        BrowserError::ScriptExecutionFailed(message.into())
    }
}

// ========== Result 类型别名 ==========

/// 浏览器操作结果类型
pub type BrowserResult<T> = Result<T, BrowserError>;
