use crate::error::FileError;
use crate::models::backlog::BacklogItem;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// CSV 中的一行，只关心 url 和 priority_score 两列
#[derive(Debug, Deserialize)]
struct BacklogRow {
    #[serde(default)]
    url: String,
    #[serde(default)]
    priority_score: String,
}

/// 从 URL 优先级列表（CSV）加载待提交 URL
///
/// 文件不存在视为启动错误；单行数据有问题时跳过该行并记录警告。
pub async fn load_backlog(csv_path: &Path) -> Result<Vec<BacklogItem>> {
    if !fs::try_exists(csv_path).await.unwrap_or(false) {
        return Err(FileError::NotFound {
            path: csv_path.display().to_string(),
        })
        .context("请先运行 URL 优先级生成器");
    }

    let content = fs::read_to_string(csv_path)
        .await
        .map_err(|e| FileError::read_failed(csv_path.display().to_string(), e))?;

    let items = parse_backlog(&content)
        .with_context(|| format!("无法解析URL列表: {}", csv_path.display()))?;

    tracing::info!("📋 URL 列表加载完成: {} 个", items.len());
    Ok(items)
}

/// 解析 CSV 文本（支持 UTF-8 BOM，忽略多余列）
pub fn parse_backlog(content: &str) -> Result<Vec<BacklogItem>> {
    let content = content.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers().context("CSV 缺少表头")?.clone();
    if !headers.iter().any(|h| h == "url") {
        anyhow::bail!("CSV 表头中没有 url 列");
    }

    let mut items = Vec::new();
    for (index, record) in reader.deserialize::<BacklogRow>().enumerate() {
        // 表头占第 1 行
        let line = index + 2;
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("跳过第 {} 行: {}", line, e);
                continue;
            }
        };

        if row.url.is_empty() {
            tracing::warn!("跳过第 {} 行: url 为空", line);
            continue;
        }

        let priority_score = if row.priority_score.is_empty() {
            0.0
        } else {
            match row.priority_score.parse::<f64>() {
                Ok(score) => score,
                Err(_) => {
                    tracing::warn!(
                        "跳过第 {} 行: priority_score '{}' 不是数字",
                        line,
                        row.priority_score
                    );
                    continue;
                }
            }
        };

        items.push(BacklogItem::new(row.url, priority_score));
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generator_output() {
        let content = "\u{feff}url,title,priority,priority_score,category,last_modified,status\n\
            https://www.koreaners.co/,Home,high,1.0,main,2026-01-01,pending\n\
            https://www.koreaners.co/portfolio,\"Portfolio, all\",medium,0.9,main,2026-01-01,pending\n";
        let items = parse_backlog(content).unwrap();
        assert_eq!(
            items,
            vec![
                BacklogItem::new("https://www.koreaners.co/", 1.0),
                BacklogItem::new("https://www.koreaners.co/portfolio", 0.9),
            ]
        );
    }

    #[test]
    fn test_missing_score_defaults_to_zero() {
        let items = parse_backlog("url,priority_score\nhttps://x/a,\n").unwrap();
        assert_eq!(items, vec![BacklogItem::new("https://x/a", 0.0)]);

        let items = parse_backlog("url\nhttps://x/b\n").unwrap();
        assert_eq!(items, vec![BacklogItem::new("https://x/b", 0.0)]);
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let content = "url,priority_score\nhttps://x/a,high\n,0.5\nhttps://x/c,0.3\n";
        let items = parse_backlog(content).unwrap();
        assert_eq!(items, vec![BacklogItem::new("https://x/c", 0.3)]);
    }

    #[test]
    fn test_header_only_is_empty_backlog() {
        let items = parse_backlog("url,priority_score\n").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_missing_url_column_is_error() {
        assert!(parse_backlog("link,priority_score\nhttps://x/a,1\n").is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_backlog(&dir.path().join("url_priority_list.csv")).await;
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<FileError>().is_some());
    }
}
