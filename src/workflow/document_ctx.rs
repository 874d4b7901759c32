//! 文档处理上下文
//!
//! 封装"我正在处理第几个文档"这一信息

use std::fmt::Display;

/// 文档处理上下文
#[derive(Debug, Clone)]
pub struct DocumentCtx {
    /// 文档在本次运行中的序号（从1开始）
    pub index: usize,

    /// 文档总数
    pub total: usize,

    /// 显示名
    pub display_name: String,
}

impl DocumentCtx {
    pub fn new(index: usize, total: usize, display_name: impl Into<String>) -> Self {
        Self {
            index,
            total,
            display_name: display_name.into(),
        }
    }
}

impl Display for DocumentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文档 {}/{} {}]", self.index, self.total, self.display_name)
    }
}
