use thiserror::Error;

use crate::auth::CookieError;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("等待元素 {selector} 超时 ({secs} 秒)")]
    Timeout { selector: String, secs: u64 },

    #[error("WebDriver 错误: {0}")]
    WebDriverFailure(String),
}

impl From<thirtyfour::error::WebDriverError> for BrowserError {
    fn from(err: thirtyfour::error::WebDriverError) -> Self {
        BrowserError::WebDriverFailure(err.to_string())
    }
}

// 建立受控浏览器会话时的错误，全部视为致命
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("浏览器会话失败: {0}")]
    Browser(#[from] BrowserError),

    #[error("无法读取登录 Cookie: {0}")]
    Cookies(#[from] CookieError),

    #[error("{browser} 中没有找到登录 Cookie")]
    NoCookies { browser: crate::auth::BrowserKind },
}
