use anyhow::Result;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::BrowserError;

/// 连接到浏览器并获取页面
///
/// 优先复用地址匹配 `target_url` 的已打开页面，其次复用第一个页面，
/// 都没有时才新建页面并导航过去。
pub async fn connect_to_browser_and_page(port: u16, target_url: &str) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);
    debug!("目标 URL: {}", target_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        BrowserError::ConnectionFailed { port, source: e }
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("获取到 {} 个页面", pages.len());

    let host = host_of(target_url);
    for p in pages.iter() {
        if let Ok(Some(url)) = p.url().await {
            debug!("检查页面地址: {}", url);
            if !host.is_empty() && url.contains(host) {
                info!("✓ 找到目标页面: {}", url);
                return Ok((browser, p.clone()));
            }
        }
    }

    if let Some(first) = pages.first() {
        info!("未找到匹配的页面，使用第一个已打开的页面");
        return Ok((browser, first.clone()));
    }

    debug!("创建新页面并导航到: {}", target_url);
    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        e
    })?;
    page.goto(target_url).await.map_err(|e| {
        error!("导航到 {} 失败: {}", target_url, e);
        e
    })?;
    info!("已导航到: {}", target_url);

    Ok((browser, page))
}

/// 取出 URL 中的主机部分
fn host_of(url: &str) -> &str {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    without_scheme.split(['/', '?', '#']).next().unwrap_or("")
}
