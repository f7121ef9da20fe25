use thiserror::Error;

use crate::browser::{BrowserError, SessionError};
use crate::common::client::error::HttpError;

#[derive(Debug, Error)]
pub enum CourseError {
    #[error("课时 '{lesson}' 页面在 {secs} 秒内没有加载完成")]
    LessonLoadTimeout { lesson: String, secs: u64 },

    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("WebDriver 出错: {0}")]
    WebDriverFailure(#[from] BrowserError),

    #[error("HTTP 客户端初始化失败: {0}")]
    Http(#[from] HttpError),

    #[error("无效的站点地址 {0}")]
    InvalidUrl(String),

    #[error("创建目录失败: {0}")]
    Io(#[from] std::io::Error),
}
