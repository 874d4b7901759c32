//! 脚本化页面
//!
//! 按预先写好的剧本回答探针和交互调用，用于测试和演练。
//! 每次 `submit()` 载入下一份回复剧本；每次 `is_auth_error()`
//! 视为新一轮轮询的开始，推进到剧本中的下一帧（最后一帧会一直保持）。

use async_trait::async_trait;
use chromiumoxide::error::CdpError;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::error::{BrowserError, BrowserResult};
use crate::infrastructure::page::{ControlState, PageProbe, RemoteSession};

/// 一帧页面状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub generating: bool,
    pub text: String,
    pub visual_error: bool,
    pub auth_error: bool,
}

impl Frame {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn busy() -> Self {
        Self {
            generating: true,
            ..Default::default()
        }
    }

    pub fn visual_error() -> Self {
        Self {
            visual_error: true,
            ..Default::default()
        }
    }

    pub fn auth_error() -> Self {
        Self {
            auth_error: true,
            ..Default::default()
        }
    }
}

/// 调用记录
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    pub attachment_checks: usize,
    pub picker_clicks: usize,
    pub bound_files: Vec<PathBuf>,
    pub typed: Vec<String>,
    pub submits: usize,
    pub poll_cycles: usize,
}

/// 交互失败注入
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// 页面上没有文件控件
    pub no_file_input: bool,
    /// 查询文件控件时连接出错
    pub file_input_query_fails: Option<String>,
    /// 页面上没有上传按钮
    pub no_upload_button: bool,
    /// 点击上传按钮后文件控件不出现
    pub picker_never_opens: bool,
    pub bind_fails: bool,
    /// 键入失败时的错误信息
    pub type_fails: Option<String>,
    /// 发送时 panic（模拟自动化层的意外崩溃）
    pub panic_on_submit: bool,
}

#[derive(Debug, Default)]
struct ScriptState {
    responses: VecDeque<Vec<Frame>>,
    frames: VecDeque<Frame>,
    current: Frame,
    /// 剩余多少次附件检查仍返回 true
    pending_attachment_checks: usize,
    upload_states: VecDeque<ControlState>,
    upload_state: ControlState,
    url: String,
    faults: Faults,
    calls: CallLog,
}

/// 脚本化页面，同时实现 [`PageProbe`] 和 [`RemoteSession`]
#[derive(Debug, Default)]
pub struct ScriptedPage {
    state: Mutex<ScriptState>,
}

impl ScriptedPage {
    pub fn new() -> Self {
        let page = Self::default();
        page.lock().url = "https://chat.example/".to_string();
        page
    }

    /// 追加一次提交后的回复剧本
    pub fn with_response(self, frames: Vec<Frame>) -> Self {
        self.lock().responses.push_back(frames);
        self
    }

    /// 直接载入当前剧本（不经过 `submit()`）
    pub fn with_frames(self, frames: Vec<Frame>) -> Self {
        self.lock().frames = frames.into();
        self
    }

    /// 附件在前 `checks` 次检查中仍然存在
    pub fn with_pending_attachment(self, checks: usize) -> Self {
        self.lock().pending_attachment_checks = checks;
        self
    }

    /// 附件永远不会消失
    pub fn with_sticky_attachment(self) -> Self {
        self.with_pending_attachment(usize::MAX)
    }

    /// 依次返回的上传控件状态，最后一个会一直保持
    pub fn with_upload_states(self, states: Vec<ControlState>) -> Self {
        {
            let mut state = self.lock();
            if let Some(first) = states.first().copied() {
                state.upload_state = first;
            }
            state.upload_states = states.into();
        }
        self
    }

    pub fn with_faults(self, faults: Faults) -> Self {
        self.lock().faults = faults;
        self
    }

    pub fn calls(&self) -> CallLog {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        // 测试中 panic 注入可能让锁中毒，状态本身仍然可用
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PageProbe for ScriptedPage {
    async fn is_generating(&self) -> bool {
        self.lock().current.generating
    }

    async fn has_pending_attachment(&self) -> bool {
        let mut state = self.lock();
        state.calls.attachment_checks += 1;
        if state.pending_attachment_checks > 0 {
            if state.pending_attachment_checks != usize::MAX {
                state.pending_attachment_checks -= 1;
            }
            true
        } else {
            false
        }
    }

    async fn upload_control_state(&self) -> ControlState {
        let mut state = self.lock();
        match state.upload_states.pop_front() {
            Some(next) => {
                state.upload_state = next;
                next
            }
            None => state.upload_state,
        }
    }

    async fn has_visual_error(&self) -> bool {
        self.lock().current.visual_error
    }

    async fn is_auth_error(&self) -> bool {
        let mut state = self.lock();
        state.calls.poll_cycles += 1;
        if let Some(next) = state.frames.pop_front() {
            state.current = next;
        }
        state.current.auth_error
    }

    async fn latest_response_text(&self) -> String {
        self.lock().current.text.clone()
    }

    async fn current_url(&self) -> Option<String> {
        let state = self.lock();
        if state.current.auth_error {
            Some(format!("{}api/auth/error", state.url))
        } else {
            Some(state.url.clone())
        }
    }
}

#[async_trait]
impl RemoteSession for ScriptedPage {
    async fn has_file_input(&self) -> BrowserResult<bool> {
        let state = self.lock();
        if let Some(message) = &state.faults.file_input_query_fails {
            return Err(BrowserError::Cdp(CdpError::msg(message.clone())));
        }
        Ok(!state.faults.no_file_input)
    }

    async fn open_file_picker(&self, timeout: Duration) -> BrowserResult<()> {
        let mut state = self.lock();
        if state.faults.no_upload_button {
            return Err(BrowserError::element_not_found("upload button"));
        }
        state.calls.picker_clicks += 1;
        if state.faults.picker_never_opens {
            return Err(BrowserError::Timeout {
                selector: "input[type='file']".to_string(),
                timeout,
            });
        }
        state.faults.no_file_input = false;
        Ok(())
    }

    async fn bind_file(&self, path: &Path) -> BrowserResult<()> {
        let mut state = self.lock();
        state.calls.bound_files.push(path.to_path_buf());
        if state.faults.bind_fails || state.faults.no_file_input {
            return Err(BrowserError::FileBindingFailed {
                path: path.display().to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }

    async fn type_text(&self, text: &str) -> BrowserResult<()> {
        let mut state = self.lock();
        if let Some(message) = state.faults.type_fails.clone() {
            return Err(BrowserError::script(message));
        }
        state.calls.typed.push(text.to_string());
        Ok(())
    }

    async fn submit(&self) -> BrowserResult<()> {
        let panic_on_submit = {
            let mut state = self.lock();
            state.calls.submits += 1;
            let frames = state.responses.pop_front().unwrap_or_default();
            state.frames = frames.into();
            state.current = Frame::default();
            state.faults.panic_on_submit
        };
        if panic_on_submit {
            panic!("scripted automation crash");
        }
        Ok(())
    }
}
