//! 轮询结果与提交结果

use serde::{Deserialize, Serialize};
use std::fmt;

/// 单次轮询的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// 尚未完成（生成中或内容仍在变化）
    Busy,
    /// 内容已稳定
    Stable(String),
    /// 页面显示错误
    VisualError,
    /// 跳转到认证失败页面
    AuthError,
    /// 等待超时，携带最后一次观察到的内容
    Timeout(String),
}

/// 单个文档的失败类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message")]
pub enum FailureKind {
    AuthenticationError,
    RemoteError,
    ContentError,
    AttachmentStillPresent,
    UploadDisabled,
    UploadButtonMissing,
    SendFailed,
    /// 未归类的异常，携带原始信息
    UnknownError(String),
}

impl FailureKind {
    /// 稳定的短标签
    pub fn tag(&self) -> &'static str {
        match self {
            FailureKind::AuthenticationError => "AuthenticationError",
            FailureKind::RemoteError => "RemoteError",
            FailureKind::ContentError => "ContentError",
            FailureKind::AttachmentStillPresent => "AttachmentStillPresent",
            FailureKind::UploadDisabled => "UploadDisabled",
            FailureKind::UploadButtonMissing => "UploadButtonMissing",
            FailureKind::SendFailed => "SendFailed",
            FailureKind::UnknownError(_) => "UnknownError",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::UnknownError(message) => write!(f, "{}: {}", self.tag(), message),
            _ => f.write_str(self.tag()),
        }
    }
}

/// 单个文档的最终结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum SubmissionResult {
    Success(String),
    Failure(FailureKind),
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success(_))
    }

    pub fn failure(&self) -> Option<&FailureKind> {
        match self {
            SubmissionResult::Failure(kind) => Some(kind),
            SubmissionResult::Success(_) => None,
        }
    }

    /// 报告中使用的文本：成功为提取的内容，失败为稳定标签
    pub fn render(&self) -> String {
        match self {
            SubmissionResult::Success(text) => text.clone(),
            SubmissionResult::Failure(kind) => format!("[FAILED: {}]", kind),
        }
    }

    /// 进度回调中使用的简短摘要
    pub fn summary(&self) -> String {
        match self {
            SubmissionResult::Success(text) => format!("ok ({} chars)", text.chars().count()),
            SubmissionResult::Failure(kind) => kind.tag().to_string(),
        }
    }
}
