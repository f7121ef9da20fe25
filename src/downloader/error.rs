use thiserror::Error;

use crate::browser::BrowserError;
use crate::common::client::error::HttpError;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("下载资源 '{name}' 失败: {source}")]
    ResourceFetchError {
        name: String,
        #[source]
        source: HttpError,
    },

    #[error("视频数据解析失败: {0}")]
    ManifestParseError(String),

    #[error("yt-dlp 下载失败: {0}")]
    ExternalDownloadFailure(String),

    #[error("页面中未找到 {0}")]
    NotFound(String),

    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

// 内嵌数据不是合法 JSON 时只保留错误描述
impl From<serde_json::Error> for DownloadError {
    fn from(error: serde_json::Error) -> Self {
        DownloadError::ManifestParseError(error.to_string())
    }
}
