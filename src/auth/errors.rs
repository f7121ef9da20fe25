use thiserror::Error;

use super::BrowserKind;

#[derive(Debug, Error)]
pub enum CookieError {
    #[error("读取 {browser} 的 Cookie 数据库失败: {message}")]
    Store { browser: BrowserKind, message: String },

    #[error("Cookie 读取任务异常退出: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, CookieError>;
