use std::path::Path;

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use serde_derive::Deserialize;
use tracing::{info, warn};

use super::error::DownloadError;
use super::ytdlp::VideoFetcher;
use crate::browser::{BrowserError, CourseBrowser};
use crate::config::Timeouts;

const PLAYER_FRAME: &str = "iframe[data-testid='embed-player']";
const NEXT_DATA: &str = "script#__NEXT_DATA__";

lazy_static! {
    static ref NEXT_DATA_SCRIPT: Selector = Selector::parse(NEXT_DATA).unwrap();
}

// 播放器页内嵌数据：props.pageProps.applicationData.mediaAssets
// 每一层都可能缺失，缺失时视为没有视频
#[derive(Debug, Default, Deserialize)]
struct NextData {
    props: Option<Props>,
}

#[derive(Debug, Default, Deserialize)]
struct Props {
    #[serde(rename = "pageProps")]
    page_props: Option<PageProps>,
}

#[derive(Debug, Default, Deserialize)]
struct PageProps {
    #[serde(rename = "applicationData")]
    application_data: Option<ApplicationData>,
}

#[derive(Debug, Default, Deserialize)]
struct ApplicationData {
    #[serde(rename = "mediaAssets", default)]
    media_assets: Option<Vec<MediaAsset>>,
}

/// 一个候选视频流
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediaAsset {
    #[serde(rename = "qualityLabel", default)]
    pub quality_label: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoOutcome {
    Downloaded,
    // 页面上没有播放器或内嵌数据
    NoVideo,
    // 有内嵌数据但没有可用的地址
    NoManifest,
}

/// 解析内嵌 JSON，返回 mediaAssets 列表
pub fn parse_media_assets(payload: &str) -> Result<Vec<MediaAsset>, DownloadError> {
    let data: NextData = serde_json::from_str(payload)?;
    Ok(data
        .props
        .and_then(|p| p.page_props)
        .and_then(|p| p.application_data)
        .and_then(|a| a.media_assets)
        .unwrap_or_default())
}

/// 选择规则：优先 qualityLabel 为 "auto" 的自适应清单，否则取第一个
pub fn select_manifest_url(assets: &[MediaAsset]) -> Option<&str> {
    assets
        .iter()
        .find(|a| a.quality_label.as_deref() == Some("auto") && a.url.is_some())
        .or_else(|| assets.first())
        .and_then(|a| a.url.as_deref())
}

pub fn extract_next_data(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&NEXT_DATA_SCRIPT)
        .next()
        .map(|script| script.text().collect::<String>())
}

/// 在当前课时页面里找到播放器，取出视频清单并交给外部工具下载
///
/// 无论结果如何，返回前都会切回顶层页面。
pub async fn download_lesson_video(
    session: &dyn CourseBrowser,
    fetcher: &dyn VideoFetcher,
    save_path: &Path,
    output_name: &str,
    timeouts: &Timeouts,
) -> Result<VideoOutcome, DownloadError> {
    let result = locate_and_dispatch(session, fetcher, save_path, output_name, timeouts).await;
    if let Err(e) = session.leave_frame().await {
        warn!("切回主页面失败: {}", e);
    }
    result
}

async fn locate_and_dispatch(
    session: &dyn CourseBrowser,
    fetcher: &dyn VideoFetcher,
    save_path: &Path,
    output_name: &str,
    timeouts: &Timeouts,
) -> Result<VideoOutcome, DownloadError> {
    match session.enter_frame(PLAYER_FRAME, timeouts.player_frame).await {
        Ok(()) => {}
        Err(BrowserError::Timeout { .. }) => {
            info!("本课时没有视频");
            return Ok(VideoOutcome::NoVideo);
        }
        Err(e) => return Err(e.into()),
    }

    match session.wait_for(NEXT_DATA, timeouts.embedded_data).await {
        Ok(()) => {}
        Err(BrowserError::Timeout { .. }) => {
            info!("播放器中没有视频数据");
            return Ok(VideoOutcome::NoVideo);
        }
        Err(e) => return Err(e.into()),
    }

    let html = session.page_source().await?;
    let Some(payload) = extract_next_data(&html) else {
        info!("播放器中没有视频数据");
        return Ok(VideoOutcome::NoVideo);
    };

    let assets = parse_media_assets(&payload)?;
    if assets.is_empty() {
        warn!("视频数据中没有 mediaAssets");
        return Ok(VideoOutcome::NoManifest);
    }

    let Some(manifest_url) = select_manifest_url(&assets) else {
        warn!("mediaAssets 中没有有效的视频地址");
        return Ok(VideoOutcome::NoManifest);
    };

    info!("下载视频: {}", output_name);
    fetcher.fetch(manifest_url, save_path, output_name).await?;
    Ok(VideoOutcome::Downloaded)
}
