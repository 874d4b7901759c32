//! 响应稳定检测 - 业务能力层
//!
//! 页面不提供"生成完毕"信号。只能反复采样最新回复，
//! 连续若干次内容不变即视为完成。

use tracing::{debug, info, warn};

use crate::config::StabilizerConfig;
use crate::infrastructure::PageProbe;
use crate::models::PollOutcome;
use crate::services::poller::{PollPolicy, Poller};

/// 稳定计数
///
/// 基线从空字符串开始；生成中的轮次不会调用 `sample`，
/// 所以既不计数也不清零。
#[derive(Debug)]
pub struct StabilityTracker {
    baseline: String,
    stable_cycles: u32,
    required: u32,
}

impl StabilityTracker {
    /// `required` 至少为 1
    pub fn new(required: u32) -> Self {
        Self {
            baseline: String::new(),
            stable_cycles: 0,
            required: required.max(1),
        }
    }

    /// 记录一次采样；达到稳定次数时返回稳定内容
    pub fn sample(&mut self, text: String) -> Option<String> {
        if text == self.baseline {
            self.stable_cycles += 1;
        } else {
            self.stable_cycles = 0;
            self.baseline = text;
        }

        if self.stable_cycles >= self.required {
            Some(self.baseline.clone())
        } else {
            None
        }
    }

    pub fn stable_cycles(&self) -> u32 {
        self.stable_cycles
    }

    /// 最近一次观察到的内容
    pub fn last_text(&self) -> &str {
        &self.baseline
    }

    pub fn into_last_text(self) -> String {
        self.baseline
    }
}

/// 响应稳定检测器
pub struct ResponseStabilizer {
    policy: PollPolicy,
    stable_cycles_required: u32,
}

impl ResponseStabilizer {
    pub fn new(config: &StabilizerConfig) -> Self {
        Self {
            policy: PollPolicy::from_secs(config.poll_interval_secs, config.max_wait_secs),
            stable_cycles_required: config.stable_cycles_required.max(1),
        }
    }

    /// 等待回复稳定
    ///
    /// 返回 `Stable` / `AuthError` / `VisualError` / `Timeout` 之一，不会返回 `Busy`。
    pub async fn await_stable(&self, probe: &dyn PageProbe) -> PollOutcome {
        let mut poller = Poller::new(self.policy);
        let mut tracker = StabilityTracker::new(self.stable_cycles_required);

        while !poller.expired() {
            match observe(probe, &mut tracker).await {
                PollOutcome::Busy => {}
                terminal => {
                    log_terminal(&terminal, &poller);
                    return terminal;
                }
            }
            poller.tick().await;
        }

        warn!(
            "⏱️ 等待回复超时 ({:?})，最后内容 {} 字符",
            self.policy.max_wait,
            tracker.last_text().chars().count()
        );
        PollOutcome::Timeout(tracker.into_last_text())
    }
}

/// 执行一轮轮询
///
/// 检查顺序：认证失败 → 页面错误 → 生成中 → 内容采样。
/// 每一轮都重新查询页面，不复用上一轮的任何结果。
pub async fn observe(probe: &dyn PageProbe, tracker: &mut StabilityTracker) -> PollOutcome {
    if probe.is_auth_error().await {
        return PollOutcome::AuthError;
    }
    if probe.has_visual_error().await {
        return PollOutcome::VisualError;
    }
    if probe.is_generating().await {
        debug!("生成中...");
        return PollOutcome::Busy;
    }

    let text = probe.latest_response_text().await;
    match tracker.sample(text) {
        Some(stable) => PollOutcome::Stable(stable),
        None => {
            debug!("内容采样: 连续稳定 {} 次", tracker.stable_cycles());
            PollOutcome::Busy
        }
    }
}

fn log_terminal(outcome: &PollOutcome, poller: &Poller) {
    match outcome {
        PollOutcome::Stable(text) => info!(
            "✓ 回复已稳定 ({} 字符, 轮询 {} 次)",
            text.chars().count(),
            poller.cycles() + 1
        ),
        PollOutcome::AuthError => warn!("⚠️ 页面跳转到认证失败地址"),
        PollOutcome::VisualError => warn!("⚠️ 页面显示错误提示"),
        _ => {}
    }
}
