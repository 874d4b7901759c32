//! 程序配置
//!
//! 加载顺序：默认值 → TOML 文件（可选）→ 环境变量

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "batch_submit.toml";

/// 程序配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 目标页面URL（找不到已打开的页面时导航到这里）
    pub target_url: String,
    /// 待处理 PDF 所在目录
    pub input_folder: String,
    /// 结果报告文件
    pub report_file: String,
    /// 结果报告格式
    pub report_format: ReportFormat,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    pub guard: GuardConfig,
    pub upload: UploadConfig,
    pub stabilizer: StabilizerConfig,
    pub selectors: SelectorConfig,
    pub classifier: ClassifierConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            target_url: "https://chatgpt.com/".to_string(),
            input_folder: "input_pdfs".to_string(),
            report_file: "report.md".to_string(),
            report_format: ReportFormat::Markdown,
            verbose_logging: false,
            guard: GuardConfig::default(),
            upload: UploadConfig::default(),
            stabilizer: StabilizerConfig::default(),
            selectors: SelectorConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

/// 报告格式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Markdown,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => bail!("未知的报告格式: {}", other),
        }
    }
}

/// 附件守卫配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub max_wait_secs: f64,
    pub poll_interval_secs: f64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_wait_secs: 45.0,
            poll_interval_secs: 1.5,
        }
    }
}

/// 上传控件缺失时的判定策略
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingControlPolicy {
    /// 找不到控件视为"未禁用"
    FailOpen,
    /// 找不到控件视为"已禁用"
    FailClosed,
}

/// 上传驱动配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// 绑定文件后等待页面确认上传的时间
    pub settle_delay_secs: f64,
    /// 点击上传按钮后等待文件控件出现的时间
    pub picker_timeout_secs: f64,
    /// 触发生成的指令
    pub trigger_command: String,
    pub missing_control: MissingControlPolicy,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            settle_delay_secs: 4.0,
            picker_timeout_secs: 5.0,
            trigger_command: "T2".to_string(),
            missing_control: MissingControlPolicy::FailOpen,
        }
    }
}

/// 响应稳定检测配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    pub max_wait_secs: f64,
    pub poll_interval_secs: f64,
    /// 连续多少次采样内容不变才算完成
    pub stable_cycles_required: u32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            max_wait_secs: 180.0,
            poll_interval_secs: 1.5,
            stable_cycles_required: 4,
        }
    }
}

/// 页面选择器
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub stop_button: String,
    pub attachment_chip: String,
    pub file_input: String,
    pub upload_button: String,
    pub response_block: String,
    pub error_element: String,
    pub prompt_input: String,
    /// 错误短语的搜索范围
    pub error_phrase_scope: String,
    /// URL 以此结尾时视为认证失败
    pub auth_error_url_suffix: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            stop_button: "button:has(svg[aria-label='Stop generating']), button[data-testid='stop-button']".to_string(),
            attachment_chip: "div[role='listitem']".to_string(),
            file_input: "input[type='file']".to_string(),
            upload_button: "button:has(svg[aria-label='Upload a file'])".to_string(),
            response_block: ".markdown".to_string(),
            error_element: ".text-token-text-error".to_string(),
            prompt_input: "#prompt-textarea".to_string(),
            error_phrase_scope: "main".to_string(),
            auth_error_url_suffix: "/api/auth/error".to_string(),
        }
    }
}

/// 错误判定短语
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// 页面上出现即视为远端错误
    pub visual_error_phrases: Vec<String>,
    /// 出现在回复正文中即视为内容错误
    pub content_error_phrases: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            visual_error_phrases: [
                "try again",
                "too many requests",
                "please wait a few minutes",
                "error loading",
                "something went wrong",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            content_error_phrases: [
                "aguarde",
                "tente novamente",
                "espera",
                "erro",
                "carregar mais tarde",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// 秒数转 Duration，非法值按 0 处理（`validate` 会提前拦截）
pub fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

impl Config {
    /// 加载配置：TOML 文件（如果存在）+ 环境变量覆盖
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let base = if path.exists() {
            Self::from_toml_file(&path)?
        } else {
            Self::default()
        };

        let config = base.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 只使用默认值 + 环境变量
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件读取配置
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn with_env_overrides(self) -> Self {
        let mut config = self;
        if let Some(v) = env_parse("BROWSER_DEBUG_PORT") {
            config.browser_debug_port = v;
        }
        if let Ok(v) = std::env::var("TARGET_URL") {
            config.target_url = v;
        }
        if let Ok(v) = std::env::var("INPUT_FOLDER") {
            config.input_folder = v;
        }
        if let Ok(v) = std::env::var("REPORT_FILE") {
            config.report_file = v;
        }
        if let Some(v) = env_parse("REPORT_FORMAT") {
            config.report_format = v;
        }
        if let Some(v) = env_parse("VERBOSE_LOGGING") {
            config.verbose_logging = v;
        }
        if let Ok(v) = std::env::var("TRIGGER_COMMAND") {
            config.upload.trigger_command = v;
        }
        if let Some(v) = env_parse("STABILIZER_MAX_WAIT_SECS") {
            config.stabilizer.max_wait_secs = v;
        }
        if let Some(v) = env_parse("STABLE_CYCLES_REQUIRED") {
            config.stabilizer.stable_cycles_required = v;
        }
        config
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        let durations = [
            ("guard.max_wait_secs", self.guard.max_wait_secs),
            ("guard.poll_interval_secs", self.guard.poll_interval_secs),
            ("upload.settle_delay_secs", self.upload.settle_delay_secs),
            ("upload.picker_timeout_secs", self.upload.picker_timeout_secs),
            ("stabilizer.max_wait_secs", self.stabilizer.max_wait_secs),
            ("stabilizer.poll_interval_secs", self.stabilizer.poll_interval_secs),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                bail!("配置项 {} 必须是非负数，当前值: {}", name, value);
            }
        }
        // 间隔为 0 时按间隔累加的等待永远到不了上限
        let intervals = [
            ("guard.poll_interval_secs", self.guard.poll_interval_secs),
            ("stabilizer.poll_interval_secs", self.stabilizer.poll_interval_secs),
        ];
        for (name, value) in intervals {
            if value <= 0.0 {
                bail!("配置项 {} 必须大于 0，当前值: {}", name, value);
            }
        }
        if self.stabilizer.stable_cycles_required == 0 {
            bail!("配置项 stabilizer.stable_cycles_required 必须大于 0");
        }
        if self.upload.trigger_command.is_empty() {
            bail!("配置项 upload.trigger_command 不能为空");
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            browser_debug_port = 9333
            report_format = "json"

            [upload]
            trigger_command = "T1 - R2"
            missing_control = "fail_closed"

            [stabilizer]
            stable_cycles_required = 6
            "#,
        )
        .unwrap();

        assert_eq!(config.browser_debug_port, 9333);
        assert_eq!(config.report_format, ReportFormat::Json);
        assert_eq!(config.upload.trigger_command, "T1 - R2");
        assert_eq!(config.upload.missing_control, MissingControlPolicy::FailClosed);
        assert_eq!(config.upload.settle_delay_secs, 4.0);
        assert_eq!(config.stabilizer.stable_cycles_required, 6);
        assert_eq!(config.stabilizer.max_wait_secs, 180.0);
        assert_eq!(config.guard.max_wait_secs, 45.0);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.stabilizer.stable_cycles_required = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.guard.poll_interval_secs = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.stabilizer.max_wait_secs = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_poll_intervals() {
        let mut config = Config::default();
        config.guard.poll_interval_secs = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.stabilizer.poll_interval_secs = 0.0;
        assert!(config.validate().is_err());

        // 其他等待允许为 0
        let mut config = Config::default();
        config.upload.settle_delay_secs = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn report_format_parses_aliases() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("docx".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn secs_handles_fractions() {
        assert_eq!(secs(1.5), Duration::from_millis(1500));
        assert_eq!(secs(-3.0), Duration::ZERO);
    }
}
