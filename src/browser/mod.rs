pub mod error;
pub mod session;
pub mod webdriver;

use std::time::Duration;

use async_trait::async_trait;

use crate::auth::BrowserCookie;
pub use error::{BrowserError, SessionError};
pub use session::bootstrap_session;
pub use webdriver::{ChromeLauncher, WebDriverBrowser};

pub type Result<T> = std::result::Result<T, BrowserError>;

/// 受控浏览器会话
///
/// 所有等待都有上限，超时返回 [`BrowserError::Timeout`]，调用方可以据此跳过当前页面。
#[async_trait]
pub trait CourseBrowser: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;

    async fn refresh(&self) -> Result<()>;

    // 等待 CSS 选择器对应的元素出现
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()>;

    // 等待 iframe 出现并切换进去
    async fn enter_frame(&self, selector: &str, timeout: Duration) -> Result<()>;

    // 切回顶层页面
    async fn leave_frame(&self) -> Result<()>;

    // 当前上下文（顶层页面或 iframe）的 HTML
    async fn page_source(&self) -> Result<String>;

    async fn add_cookies(&self, cookies: &[BrowserCookie]) -> Result<()>;

    async fn quit(&self) -> Result<()>;
}

/// 打开新的受控浏览器会话
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn CourseBrowser>>;
}
