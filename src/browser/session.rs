use tracing::{info, warn};

use super::{CourseBrowser, SessionError, SessionLauncher};
use crate::auth::{BrowserKind, CookieSource};
use crate::config::DownloaderConfig;

/// 启动受控浏览器，注入桌面浏览器里的登录 Cookie 后刷新课程页
///
/// 失败时会先关闭已经打开的会话再返回错误。
pub async fn bootstrap_session(
    launcher: &dyn SessionLauncher,
    cookie_source: &dyn CookieSource,
    course_url: &str,
    browser: BrowserKind,
    config: &DownloaderConfig,
) -> Result<Box<dyn CourseBrowser>, SessionError> {
    let session = launcher.open_session().await?;

    match authenticate(session.as_ref(), cookie_source, course_url, browser, config).await {
        Ok(()) => Ok(session),
        Err(e) => {
            if let Err(quit_err) = session.quit().await {
                warn!("关闭浏览器失败: {}", quit_err);
            }
            Err(e)
        }
    }
}

async fn authenticate(
    session: &dyn CourseBrowser,
    cookie_source: &dyn CookieSource,
    course_url: &str,
    browser: BrowserKind,
    config: &DownloaderConfig,
) -> Result<(), SessionError> {
    // 先进入目标站点，Cookie 才能写到对应域名下
    session.goto(course_url).await?;

    let cookies = cookie_source
        .get_cookies(&config.cookie_domain, browser)
        .await?;
    if cookies.is_empty() {
        return Err(SessionError::NoCookies { browser });
    }

    session.add_cookies(&cookies).await?;
    session.refresh().await?;
    info!("已向浏览器注入 {} 条 Cookie", cookies.len());
    Ok(())
}
