//! 有界轮询
//!
//! 远端页面没有任何完成事件，只能"睡一会儿再看"。这里把间隔和上限
//! 收拢到一处，附件守卫和响应稳定检测共用。
//!
//! 已用时间按轮询间隔累加，不包含探针本身的耗时。

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// 轮询参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        Self { interval, max_wait }
    }

    pub fn from_secs(interval_secs: f64, max_wait_secs: f64) -> Self {
        Self::new(
            crate::config::secs(interval_secs),
            crate::config::secs(max_wait_secs),
        )
    }
}

/// 单次等待过程中的计时器
#[derive(Debug)]
pub struct Poller {
    policy: PollPolicy,
    elapsed: Duration,
    cycles: u32,
}

impl Poller {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            elapsed: Duration::ZERO,
            cycles: 0,
        }
    }

    /// 是否已经用完等待时间
    pub fn expired(&self) -> bool {
        self.elapsed >= self.policy.max_wait
    }

    /// 睡一个间隔
    pub async fn tick(&mut self) {
        sleep(self.policy.interval).await;
        self.elapsed += self.policy.interval;
        self.cycles += 1;
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }
}

/// 反复检查直到条件成立；超时返回 false
///
/// 首次检查不等待，最后一次检查发生在上限到达的那一刻。
pub async fn poll_until<F, Fut>(policy: PollPolicy, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let mut poller = Poller::new(policy);
    loop {
        if check().await {
            return true;
        }
        if poller.expired() {
            return false;
        }
        poller.tick().await;
    }
}
