use crate::models::document::Document;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从文件夹中加载所有 PDF 文档
///
/// 返回目录枚举顺序；排序交给编排层
pub async fn load_documents_from_folder(folder_path: &str) -> Result<Vec<Document>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut documents = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_pdf(&path) && entry.file_type().await?.is_file() {
            let document = Document::from_path(&path);
            tracing::debug!(
                "发现文档: {} (序号 {})",
                document.display_name,
                document.sequence_key
            );
            documents.push(document);
        }
    }

    tracing::info!("✓ 在 {} 中找到 {} 个 PDF", folder_path, documents.len());

    Ok(documents)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
