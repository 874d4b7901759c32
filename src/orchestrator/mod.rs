//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 应用入口
//! - 连接浏览器、加载文档、写出报告
//! - 输出全局统计信息
//!
//! ### `batch_orchestrator` - 批量编排
//! - 按序号排序后顺序处理每个文档
//! - 汇总结果、回调进度、响应停止
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (App)
//!     ↓
//! batch_orchestrator (处理 Vec<Document>)
//!     ↓
//! workflow::SubmissionFlow (处理单个 Document)
//!     ↓
//! services (能力层：guard / upload / stabilize / classify)
//!     ↓
//! infrastructure (基础设施：PageProbe / RemoteSession)
//! ```

pub mod batch_orchestrator;
pub mod batch_processor;

// 重新导出主要类型
pub use batch_orchestrator::{BatchOrchestrator, StopHandle, NOT_STARTED_MESSAGE};
pub use batch_processor::App;
