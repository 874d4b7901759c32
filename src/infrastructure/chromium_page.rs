//! 基于 chromiumoxide 的页面实现
//!
//! 探针全部通过 JS 查询 DOM，每次调用都重新查询，不缓存任何元素句柄。

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::config::{ClassifierConfig, SelectorConfig};
use crate::error::{BrowserError, BrowserResult};
use crate::infrastructure::js_executor::JsExecutor;
use crate::infrastructure::page::{ControlState, PageProbe, RemoteSession};

/// 等待文件控件出现时的检查间隔
const PICKER_CHECK_INTERVAL: Duration = Duration::from_millis(200);

/// 真实浏览器页面
pub struct ChromiumPage {
    executor: JsExecutor,
    selectors: SelectorConfig,
    visual_error_phrases: Vec<String>,
}

impl ChromiumPage {
    pub fn new(executor: JsExecutor, selectors: SelectorConfig, classifier: &ClassifierConfig) -> Self {
        Self {
            executor,
            selectors,
            visual_error_phrases: classifier
                .visual_error_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    /// 执行探针脚本，失败时记录日志并返回默认值
    async fn probe_or<T: DeserializeOwned>(&self, name: &str, js_code: String, fallback: T) -> T {
        match self.executor.eval_as::<T>(js_code).await {
            Ok(value) => value,
            Err(e) => {
                debug!("探针 {} 执行失败，按默认值处理: {}", name, e);
                fallback
            }
        }
    }

    async fn is_visible(&self, name: &str, selector: &str) -> bool {
        self.probe_or(name, visible_js(selector), false).await
    }

    /// 查找元素；元素不存在返回 `None`，连接类错误原样返回
    async fn query(&self, selector: &str) -> BrowserResult<Option<Element>> {
        match self.executor.page().find_element(selector).await {
            Ok(element) => Ok(Some(element)),
            Err(e) if is_missing_node(&e) => Ok(None),
            Err(e) => Err(BrowserError::Cdp(e)),
        }
    }

    async fn require(&self, selector: &str) -> BrowserResult<Element> {
        self.query(selector)
            .await?
            .ok_or_else(|| BrowserError::element_not_found(selector))
    }
}

/// querySelector 没有命中时返回 nodeId 0，随后的 describeNode 会报协议错误
fn is_missing_node(err: &CdpError) -> bool {
    match err {
        CdpError::NotFound => true,
        CdpError::Chrome(e) => e.message.to_lowercase().contains("node"),
        _ => false,
    }
}

#[async_trait]
impl PageProbe for ChromiumPage {
    async fn is_generating(&self) -> bool {
        self.is_visible("is_generating", &self.selectors.stop_button).await
    }

    async fn has_pending_attachment(&self) -> bool {
        self.is_visible("has_pending_attachment", &self.selectors.attachment_chip)
            .await
    }

    async fn upload_control_state(&self) -> ControlState {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({selector});
                if (!el) return "missing";
                const disabled = el.disabled || el.getAttribute('aria-disabled') === 'true';
                return disabled ? "disabled" : "enabled";
            }})()
            "#,
            selector = js_str(&self.selectors.file_input),
        );
        self.probe_or("upload_control_state", js_code, ControlState::Missing)
            .await
    }

    async fn has_visual_error(&self) -> bool {
        let js_code = format!(
            r#"
            (() => {{
                if (document.querySelectorAll({error_selector}).length > 0) return true;
                const scope = document.querySelector({scope}) || document.body;
                if (!scope) return false;
                const text = (scope.innerText || '').toLowerCase();
                return {phrases}.some(p => text.includes(p));
            }})()
            "#,
            error_selector = js_str(&self.selectors.error_element),
            scope = js_str(&self.selectors.error_phrase_scope),
            phrases = serde_json::to_string(&self.visual_error_phrases).unwrap_or_else(|_| "[]".into()),
        );
        self.probe_or("has_visual_error", js_code, false).await
    }

    async fn is_auth_error(&self) -> bool {
        self.current_url()
            .await
            .map(|url| url.ends_with(&self.selectors.auth_error_url_suffix))
            .unwrap_or(false)
    }

    async fn latest_response_text(&self) -> String {
        let js_code = format!(
            r#"
            (() => {{
                const blocks = document.querySelectorAll({selector});
                if (blocks.length === 0) return "";
                return blocks[blocks.length - 1].textContent || "";
            }})()
            "#,
            selector = js_str(&self.selectors.response_block),
        );
        self.probe_or("latest_response_text", js_code, String::new())
            .await
    }

    async fn current_url(&self) -> Option<String> {
        match self.executor.url().await {
            Ok(url) => url,
            Err(e) => {
                debug!("读取当前地址失败: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl RemoteSession for ChromiumPage {
    async fn has_file_input(&self) -> BrowserResult<bool> {
        Ok(self.query(&self.selectors.file_input).await?.is_some())
    }

    async fn open_file_picker(&self, timeout: Duration) -> BrowserResult<()> {
        let button = self.require(&self.selectors.upload_button).await?;
        button.click().await?;
        debug!("已点击上传按钮，等待文件控件出现");

        let selector = self.selectors.file_input.as_str();
        let appeared = tokio::time::timeout(timeout, async {
            while self.query(selector).await?.is_none() {
                sleep(PICKER_CHECK_INTERVAL).await;
            }
            Ok::<(), BrowserError>(())
        })
        .await;

        appeared.map_err(|_| BrowserError::Timeout {
            selector: selector.to_string(),
            timeout,
        })?
    }

    async fn bind_file(&self, path: &Path) -> BrowserResult<()> {
        let element = self.require(&self.selectors.file_input).await?;

        let path_str = path.to_string_lossy().to_string();
        let params = SetFileInputFilesParams::builder()
            .files(vec![path_str.clone()])
            .backend_node_id(element.backend_node_id)
            .build()
            .map_err(|reason| BrowserError::FileBindingFailed {
                path: path_str.clone(),
                reason,
            })?;

        self.executor
            .page()
            .execute(params)
            .await
            .map_err(|e| match e {
                CdpError::Chrome(e) => BrowserError::FileBindingFailed {
                    path: path_str,
                    reason: e.to_string(),
                },
                other => BrowserError::Cdp(other),
            })?;
        Ok(())
    }

    async fn type_text(&self, text: &str) -> BrowserResult<()> {
        let input = self.require(&self.selectors.prompt_input).await?;
        input.click().await?;
        input.type_str(text).await?;
        Ok(())
    }

    async fn submit(&self) -> BrowserResult<()> {
        let input = self.require(&self.selectors.prompt_input).await?;
        input.press_key("Enter").await?;
        Ok(())
    }
}

// ========== JS 片段 ==========

/// 把字符串转成 JS 字面量
fn js_str(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// 元素存在且可见
fn visible_js(selector: &str) -> String {
    format!(
        r#"
        (() => {{
            const el = document.querySelector({selector});
            if (!el) return false;
            const rect = el.getBoundingClientRect();
            const style = window.getComputedStyle(el);
            return rect.width > 0 && rect.height > 0
                && style.visibility !== 'hidden' && style.display !== 'none';
        }})()
        "#,
        selector = js_str(selector),
    )
}
