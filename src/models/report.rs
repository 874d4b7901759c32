use serde::{Deserialize, Serialize};

use crate::models::outcome::{FailureKind, SubmissionResult};

/// 报告中的一条记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub display_name: String,
    pub result: SubmissionResult,
}

/// 按插入顺序保存的"文档名 → 结果"映射
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// 插入一条结果，返回实际使用的名称
    ///
    /// 名称重复时追加 ` (n)` 后缀，保证每个文档各占一条。
    pub fn insert(&mut self, display_name: &str, result: SubmissionResult) -> String {
        let mut name = display_name.to_string();
        let mut n = 2;
        while self.get(&name).is_some() {
            name = format!("{} ({})", display_name, n);
            n += 1;
        }
        self.entries.push(ReportEntry {
            display_name: name.clone(),
            result,
        });
        name
    }

    pub fn get(&self, display_name: &str) -> Option<&SubmissionResult> {
        self.entries
            .iter()
            .find(|e| e.display_name == display_name)
            .map(|e| &e.result)
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubmissionResult)> {
        self.entries
            .iter()
            .map(|e| (e.display_name.as_str(), &e.result))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }

    pub fn has_auth_failure(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.result.failure() == Some(&FailureKind::AuthenticationError))
    }
}
