//! # PDF Batch Submit
//!
//! 把一批 PDF 依次提交到第三方对话网页，等待生成完成后提取回复文本，
//! 汇总为"文档 → 回复或失败原因"的报告。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageProbe` / `RemoteSession` - 引擎对页面的全部要求
//! - `ChromiumPage` - 基于 chromiumoxide 的实现
//! - `ScriptedPage` - 按剧本回答的实现，用于测试
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个文档
//! - `AttachmentGuard` / `UploadDriver` / `ResponseStabilizer` / `ErrorClassifier`
//! - `ReportSink` / `ProgressSink` - 对外输出
//!
//! ### ③ 流程层（Workflow）
//! - `SubmissionFlow` - 单个文档的完整流程（guard → upload → stabilize → classify）
//!
//! ### ④ 编排层（Orchestration）
//! - `BatchOrchestrator` - 顺序处理整批文档
//! - `App` - 连接浏览器、加载文档、写出报告

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::connect_to_browser_and_page;
pub use config::Config;
pub use error::{BrowserError, BrowserResult};
pub use infrastructure::{ChromiumPage, JsExecutor, PageProbe, RemoteSession, ScriptedPage};
pub use models::{Document, FailureKind, PollOutcome, Report, SubmissionResult};
pub use orchestrator::{App, BatchOrchestrator, StopHandle};
pub use workflow::{DocumentCtx, SubmissionFlow};
