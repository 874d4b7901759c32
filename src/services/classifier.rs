//! 错误分类 - 业务能力层
//!
//! 两层判断：先看页面结构信号，再看回复正文里有没有错误短语。
//! 远端有时会把限流提示直接写进正常回复区域，只看结构会漏掉。

use crate::config::ClassifierConfig;
use crate::models::{FailureKind, PollOutcome, SubmissionResult};

/// 错误分类器
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    content_error_phrases: Vec<String>,
}

impl ErrorClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self::with_phrases(config.content_error_phrases.iter().map(String::as_str))
    }

    pub fn with_phrases<'a>(phrases: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            content_error_phrases: phrases
                .into_iter()
                .map(|p| p.to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// 把轮询结果转换为最终结果
    pub fn classify(&self, outcome: &PollOutcome) -> SubmissionResult {
        match outcome {
            PollOutcome::AuthError => SubmissionResult::Failure(FailureKind::AuthenticationError),
            PollOutcome::VisualError => SubmissionResult::Failure(FailureKind::RemoteError),
            // 超时也尽量保留已生成的部分内容
            PollOutcome::Stable(text) | PollOutcome::Timeout(text) => self.classify_text(text),
            PollOutcome::Busy => SubmissionResult::Failure(FailureKind::UnknownError(
                "回复仍在生成中".to_string(),
            )),
        }
    }

    fn classify_text(&self, text: &str) -> SubmissionResult {
        if text.trim().is_empty() {
            return SubmissionResult::Failure(FailureKind::RemoteError);
        }
        if self.contains_error_phrase(text) {
            return SubmissionResult::Failure(FailureKind::ContentError);
        }
        SubmissionResult::Success(text.to_string())
    }

    /// 正文是否包含错误短语（不区分大小写）
    pub fn contains_error_phrase(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.content_error_phrases
            .iter()
            .any(|phrase| lowered.contains(phrase.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ErrorClassifier {
        ErrorClassifier::new(&ClassifierConfig::default())
    }

    #[test]
    fn structural_signals_win() {
        let c = classifier();
        assert_eq!(
            c.classify(&PollOutcome::AuthError),
            SubmissionResult::Failure(FailureKind::AuthenticationError)
        );
        assert_eq!(
            c.classify(&PollOutcome::VisualError),
            SubmissionResult::Failure(FailureKind::RemoteError)
        );
    }

    #[test]
    fn empty_stable_text_is_remote_error() {
        let c = classifier();
        assert_eq!(
            c.classify(&PollOutcome::Stable(String::new())),
            SubmissionResult::Failure(FailureKind::RemoteError)
        );
        assert_eq!(
            c.classify(&PollOutcome::Timeout("  \n".into())),
            SubmissionResult::Failure(FailureKind::RemoteError)
        );
    }

    #[test]
    fn error_phrases_are_case_insensitive() {
        let c = classifier();
        assert_eq!(
            c.classify(&PollOutcome::Stable("Por favor, AGUARDE alguns minutos".into())),
            SubmissionResult::Failure(FailureKind::ContentError)
        );
        assert_eq!(
            c.classify(&PollOutcome::Stable("Tente novamente mais tarde".into())),
            SubmissionResult::Failure(FailureKind::ContentError)
        );
    }

    #[test]
    fn clean_text_succeeds() {
        let c = classifier();
        assert_eq!(
            c.classify(&PollOutcome::Stable("Texto revisado.".into())),
            SubmissionResult::Success("Texto revisado.".into())
        );
    }

    #[test]
    fn timeout_keeps_partial_text_unless_it_looks_like_an_error() {
        let c = classifier();
        assert_eq!(
            c.classify(&PollOutcome::Timeout("parcial".into())),
            SubmissionResult::Success("parcial".into())
        );
        assert_eq!(
            c.classify(&PollOutcome::Timeout("Ocorreu um erro".into())),
            SubmissionResult::Failure(FailureKind::ContentError)
        );
    }

    #[test]
    fn classification_is_idempotent() {
        let c = classifier();
        let outcomes = [
            PollOutcome::Stable("ok".into()),
            PollOutcome::Timeout("aguarde".into()),
            PollOutcome::AuthError,
            PollOutcome::VisualError,
            PollOutcome::Busy,
        ];
        for outcome in &outcomes {
            assert_eq!(c.classify(outcome), c.classify(outcome));
        }
    }

    #[test]
    fn custom_phrases_replace_defaults() {
        let c = ErrorClassifier::with_phrases(["rate limit"]);
        assert!(c.contains_error_phrase("RATE LIMIT reached"));
        assert!(!c.contains_error_phrase("aguarde"));
    }
}
