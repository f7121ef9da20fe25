use std::path::{Path, PathBuf};
use std::time::Duration;

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use tracing::{info, warn};
use url::Url;

use super::error::DownloadError;
use crate::browser::CourseBrowser;
use crate::common::client::client::CourseClient;

const COVER_META: &str = "meta[property='og:image']";

lazy_static! {
    static ref OG_IMAGE: Selector = Selector::parse(COVER_META).unwrap();
}

pub fn find_cover_url(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&OG_IMAGE)
        .find_map(|meta| meta.value().attr("content"))
        .map(str::to_string)
}

// 扩展名取自 URL 路径，忽略查询参数
pub fn cover_extension(cover_url: &str) -> String {
    let path = match Url::parse(cover_url) {
        Ok(url) => url.path().to_string(),
        Err(_) => cover_url.split('?').next().unwrap_or_default().to_string(),
    };
    Path::new(&path)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .unwrap_or("jpg")
        .to_string()
}

/// 下载课程封面到 `<save_dir>/cover.<ext>`，失败只给出警告
pub async fn download_cover_image(
    session: &dyn CourseBrowser,
    client: &CourseClient,
    save_dir: &Path,
    timeout: Duration,
) -> Option<PathBuf> {
    match fetch_cover(session, client, save_dir, timeout).await {
        Ok(path) => {
            info!("封面下载完成: {:?}", path);
            Some(path)
        }
        Err(e) => {
            warn!("无法下载课程封面: {}", e);
            None
        }
    }
}

async fn fetch_cover(
    session: &dyn CourseBrowser,
    client: &CourseClient,
    save_dir: &Path,
    timeout: Duration,
) -> Result<PathBuf, DownloadError> {
    session.wait_for(COVER_META, timeout).await?;
    let html = session.page_source().await?;
    let cover_url = find_cover_url(&html)
        .ok_or_else(|| DownloadError::NotFound("封面地址".to_string()))?;

    let image_path = save_dir.join(format!("cover.{}", cover_extension(&cover_url)));
    client
        .download_to_file(&cover_url, &image_path)
        .await
        .map_err(|source| DownloadError::ResourceFetchError {
            name: "cover".to_string(),
            source,
        })?;
    Ok(image_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_og_image() {
        let html = r#"<head><meta property="og:image" content="https://cdn.example/c/portada.png?v=3"></head>"#;
        assert_eq!(
            find_cover_url(html).as_deref(),
            Some("https://cdn.example/c/portada.png?v=3")
        );
        assert!(find_cover_url("<head></head>").is_none());
    }

    #[test]
    fn extension_ignores_query() {
        assert_eq!(cover_extension("https://cdn.example/c/portada.png?v=3"), "png");
        assert_eq!(cover_extension("https://cdn.example/c/portada.JPEG"), "JPEG");
        assert_eq!(cover_extension("https://cdn.example/c/portada"), "jpg");
    }
}
