use thiserror::Error;

use crate::auth::{BrowserKind, CookieError};
use crate::common::client::error::HttpError;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("未能从 {browser} 获取 Cookie，请先在该浏览器中登录")]
    CookieUnavailable { browser: BrowserKind },

    #[error("获取课程页面失败: {0}")]
    FetchError(#[from] HttpError),

    #[error("课程页面解析失败: {0}")]
    ParseError(String),

    #[error("课程结构提取失败: {0}")]
    ExtractionFailure(String),
}

impl From<CookieError> for ScrapeError {
    fn from(err: CookieError) -> Self {
        ScrapeError::ExtractionFailure(err.to_string())
    }
}
