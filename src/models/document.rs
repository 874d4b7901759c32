use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

/// 形如 `xxx-12.pdf` 的文件名尾部编号
static SEQUENCE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-(\d+)\.[A-Za-z0-9]+$").expect("序号正则无效")
});

/// 待提交的文档
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub path: PathBuf,
    pub display_name: String,
    /// 从文件名尾部提取的序号，没有则为 0
    pub sequence_key: u64,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let sequence_key = sequence_key(&display_name);
        Self {
            path: path.into(),
            display_name,
            sequence_key,
        }
    }

    /// 使用文件名作为显示名
    pub fn from_path(path: &Path) -> Self {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self::new(path, display_name)
    }
}

/// 提取显示名尾部的数字序号
///
/// 超出 `u64` 的序号按最大值处理，排在最后。
pub fn sequence_key(display_name: &str) -> u64 {
    let Some(digits) = SEQUENCE_SUFFIX.captures(display_name).and_then(|cap| cap.get(1)) else {
        return 0;
    };
    digits.as_str().parse().unwrap_or_else(|_| {
        debug!("序号超出范围，排在最后: {}", display_name);
        u64::MAX
    })
}

/// 按序号升序排列（稳定排序，序号相同保持原顺序）
pub fn order_documents(mut documents: Vec<Document>) -> Vec<Document> {
    documents.sort_by_key(|d| d.sequence_key);
    documents
}
