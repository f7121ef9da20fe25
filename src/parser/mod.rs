pub mod course_parser;
pub mod errors;

use tracing::{error, info};
use url::Url;

use crate::auth::{BrowserKind, CookieSource};
use crate::common::client::client::CourseClient;
use crate::common::models::CourseStructure;
use crate::config::DownloaderConfig;
use errors::ScrapeError;

/// 抓取课程首页并解析出章节/课时结构
///
/// 只发一次普通 HTTP 请求，登录态来自所选浏览器的 Cookie。
/// 任一步失败都返回错误，调用方此时不应继续下载。
pub async fn scrape_course_structure(
    course_url: &str,
    browser: BrowserKind,
    cookie_source: &dyn CookieSource,
    config: &DownloaderConfig,
) -> Result<CourseStructure, ScrapeError> {
    info!("获取课程结构...");
    fetch_structure(course_url, browser, cookie_source, config)
        .await
        .inspect(|course| {
            info!(
                "课程结构 '{}' 提取成功: {} 个章节, {} 个课时",
                course.title,
                course.sections.len(),
                course.total_lessons()
            )
        })
        .inspect_err(|e| error!("{}", e))
}

async fn fetch_structure(
    course_url: &str,
    browser: BrowserKind,
    cookie_source: &dyn CookieSource,
    config: &DownloaderConfig,
) -> Result<CourseStructure, ScrapeError> {
    let base_origin = Url::parse(&config.base_origin)
        .map_err(|e| ScrapeError::ExtractionFailure(format!("无效的站点地址: {}", e)))?;
    let site = Url::parse(course_url)
        .map_err(|e| ScrapeError::ExtractionFailure(format!("无效的课程链接: {}", e)))?;

    let cookies = cookie_source
        .get_cookies(&config.cookie_domain, browser)
        .await?;
    if cookies.is_empty() {
        return Err(ScrapeError::CookieUnavailable { browser });
    }

    let client = CourseClient::new(&config.user_agent)?;
    client.load_browser_cookies(&cookies, &site);

    let html = client.get_text(course_url).await?;
    course_parser::parse_course_page(&html, &base_origin)
}
