use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use tracing::{error, info, warn};
use url::Url;

use super::error::DownloadError;
use crate::browser::{BrowserError, CourseBrowser};
use crate::common::client::client::CourseClient;
use crate::common::sanitize::sanitize_filename;

lazy_static! {
    static ref DOWNLOAD_LINK: Selector = Selector::parse("a.download").unwrap();
    static ref LECTURE_TEXT: Selector = Selector::parse("div.lecture-text-container").unwrap();
    static ref HREF_LINK: Selector = Selector::parse("a[href]").unwrap();
}

const ORIGIN_NAME_ATTR: &str = "data-x-origin-download-name";

// 课时页面上的附件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResourceReport {
    pub downloaded: usize,
    pub failed: usize,
    pub links_file: Option<PathBuf>,
}

/// 找出页面上所有附件链接，文件名优先取原始文件名属性
pub fn collect_attachments(html: &str, base: &Url) -> Vec<Attachment> {
    let document = Html::parse_document(html);
    document
        .select(&DOWNLOAD_LINK)
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            let url = match base.join(href) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    warn!("附件链接 {} 无效: {}", href, e);
                    return None;
                }
            };
            let raw_name = link
                .value()
                .attr(ORIGIN_NAME_ATTR)
                .map(str::to_string)
                .unwrap_or_else(|| link.text().collect::<String>().trim().to_string());
            let filename = sanitize_filename(&raw_name);
            if filename.is_empty() {
                warn!("附件 {} 没有可用的文件名，已跳过", url);
                return None;
            }
            Some(Attachment { url, filename })
        })
        .collect()
}

/// 课时正文里的所有外部链接
pub fn collect_extra_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Some(container) = document.select(&LECTURE_TEXT).next() else {
        return Vec::new();
    };
    container
        .select(&HREF_LINK)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// 下载当前课时页面的附件，并把正文中的链接写入 `enlaces_adicionales_<n>.txt`
///
/// 单个附件失败只记录日志；只有读取页面失败才返回错误。
pub async fn download_lesson_resources(
    session: &dyn CourseBrowser,
    client: &CourseClient,
    base: &Url,
    save_path: &Path,
) -> Result<ResourceReport, BrowserError> {
    let html = session.page_source().await?;
    let mut report = ResourceReport::default();

    for attachment in collect_attachments(&html, base) {
        let file_path = save_path.join(&attachment.filename);
        match client.download_to_file(&attachment.url, &file_path).await {
            Ok(_) => {
                info!("资源 '{}' 下载完成", attachment.filename);
                report.downloaded += 1;
            }
            Err(source) => {
                let err = DownloadError::ResourceFetchError {
                    name: attachment.filename.clone(),
                    source,
                };
                error!("{}", err);
                report.failed += 1;
            }
        }
    }

    // 计数器在每次调用时从 0 开始，所以每个课时写的都是 _1
    let mut count = 0;
    let links = collect_extra_links(&html);
    if !links.is_empty() {
        count += 1;
        let links_path = save_path.join(format!("enlaces_adicionales_{}.txt", count));
        match tokio::fs::write(&links_path, links.join("\n")).await {
            Ok(()) => {
                info!("附加链接已保存到 {:?}", links_path);
                report.links_file = Some(links_path);
            }
            Err(e) => error!("写入附加链接失败 {:?}: {}", links_path, e),
        }
    }

    Ok(report)
}
