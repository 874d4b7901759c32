//! 文档提交流程 - 流程层
//!
//! 核心职责：定义"一个文档"的完整处理流程
//!
//! 流程顺序：
//! 1. 等待旧附件消失
//! 2. 上传文档并发送触发指令
//! 3. 等待回复稳定
//! 4. 分类为最终结果

use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::{PageProbe, RemoteSession};
use crate::models::{Document, FailureKind, SubmissionResult};
use crate::services::{AttachmentGuard, ErrorClassifier, ResponseStabilizer, UploadDriver};
use crate::utils::logging::truncate_text;
use crate::workflow::document_ctx::DocumentCtx;

/// 文档提交流程
///
/// - 编排单个文档的处理步骤
/// - 任何一步失败都直接转换为结果，不向上抛错
/// - 不持有任何资源（page）
pub struct SubmissionFlow {
    guard: AttachmentGuard,
    driver: UploadDriver,
    stabilizer: ResponseStabilizer,
    classifier: ErrorClassifier,
    verbose_logging: bool,
}

impl SubmissionFlow {
    /// 创建新的提交流程
    pub fn new(config: &Config) -> Self {
        Self {
            guard: AttachmentGuard::new(&config.guard),
            driver: UploadDriver::new(&config.upload),
            stabilizer: ResponseStabilizer::new(&config.stabilizer),
            classifier: ErrorClassifier::new(&config.classifier),
            verbose_logging: config.verbose_logging,
        }
    }

    pub async fn run(
        &self,
        probe: &dyn PageProbe,
        session: &dyn RemoteSession,
        document: &Document,
        ctx: &DocumentCtx,
    ) -> SubmissionResult {
        // ========== 步骤 1: 附件守卫 ==========
        if let Err(kind) = self.guard.await_detachment(probe).await {
            warn!("{} ⚠️ 旧附件未消失，跳过", ctx);
            return SubmissionResult::Failure(kind);
        }

        // ========== 步骤 2: 上传并触发 ==========
        info!("{} 📎 正在上传...", ctx);
        if let Err(kind) = self.driver.attach(probe, session, &document.path).await {
            warn!("{} ⚠️ 上传失败: {}", ctx, kind);
            return SubmissionResult::Failure(kind);
        }

        // ========== 步骤 3: 等待回复 ==========
        info!("{} ⏳ 等待回复...", ctx);
        let outcome = self.stabilizer.await_stable(probe).await;

        // ========== 步骤 4: 分类 ==========
        let result = self.classifier.classify(&outcome);
        self.log_result(ctx, &result);
        result
    }

    fn log_result(&self, ctx: &DocumentCtx, result: &SubmissionResult) {
        match result {
            SubmissionResult::Success(text) => {
                info!("{} ✓ 处理成功 ({} 字符)", ctx, text.chars().count());
                if self.verbose_logging {
                    info!("{} 回复预览: {}", ctx, truncate_text(text, 80));
                }
            }
            SubmissionResult::Failure(FailureKind::AuthenticationError) => {
                error!("{}", "!".repeat(60));
                error!("{} ❌ 认证失败，后续文档大概率也会失败，请检查登录状态", ctx);
                error!("{}", "!".repeat(60));
            }
            SubmissionResult::Failure(kind) => {
                warn!("{} ❌ 处理失败: {}", ctx, kind);
            }
        }
    }
}
