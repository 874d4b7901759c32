//! 附件守卫 - 业务能力层
//!
//! 远端页面在上一个附件还挂着时会拒绝新附件，所以提交前必须等它消失。

use tracing::{debug, warn};

use crate::config::GuardConfig;
use crate::infrastructure::PageProbe;
use crate::models::FailureKind;
use crate::services::poller::{poll_until, PollPolicy};

/// 附件守卫
pub struct AttachmentGuard {
    policy: PollPolicy,
}

impl AttachmentGuard {
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            policy: PollPolicy::from_secs(config.poll_interval_secs, config.max_wait_secs),
        }
    }

    pub fn with_policy(policy: PollPolicy) -> Self {
        Self { policy }
    }

    /// 等待旧附件消失
    ///
    /// 超过上限仍存在时返回 `AttachmentStillPresent`。
    pub async fn await_detachment(&self, probe: &dyn PageProbe) -> Result<(), FailureKind> {
        let detached = poll_until(self.policy, || async move {
            !probe.has_pending_attachment().await
        })
        .await;

        if detached {
            debug!("输入区没有残留附件");
            Ok(())
        } else {
            warn!(
                "⚠️ 等待 {:?} 后旧附件仍然存在",
                self.policy.max_wait
            );
            Err(FailureKind::AttachmentStillPresent)
        }
    }
}
