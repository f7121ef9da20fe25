use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::{ChromiumLikeCapabilities, Cookie};
use thirtyfour::prelude::*;
use tracing::{debug, info, warn};

use super::{BrowserError, CourseBrowser, Result, SessionLauncher};
use crate::auth::BrowserCookie;
use crate::config::DownloaderConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

// 基于 WebDriver 协议的浏览器会话（chromedriver 等）
pub struct WebDriverBrowser {
    driver: WebDriver,
}

impl WebDriverBrowser {
    pub fn new(driver: WebDriver) -> Self {
        Self { driver }
    }

    async fn find(&self, selector: &str, timeout: Duration) -> Result<WebElement> {
        self.driver
            .query(By::Css(selector))
            .wait(timeout, POLL_INTERVAL)
            .first_opt()
            .await?
            .ok_or_else(|| BrowserError::Timeout {
                selector: selector.to_string(),
                secs: timeout.as_secs(),
            })
    }
}

#[async_trait]
impl CourseBrowser for WebDriverBrowser {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!("打开页面: {}", url);
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        self.driver.refresh().await?;
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        self.find(selector, timeout).await.map(|_| ())
    }

    async fn enter_frame(&self, selector: &str, timeout: Duration) -> Result<()> {
        let frame = self.find(selector, timeout).await?;
        frame.enter_frame().await?;
        Ok(())
    }

    async fn leave_frame(&self) -> Result<()> {
        self.driver.enter_default_frame().await?;
        Ok(())
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.driver.source().await?)
    }

    async fn add_cookies(&self, cookies: &[BrowserCookie]) -> Result<()> {
        for c in cookies {
            let mut cookie = Cookie::new(c.name.clone(), c.value.clone());
            if !c.domain.is_empty() {
                cookie.set_domain(c.domain.clone());
            }
            if !c.path.is_empty() {
                cookie.set_path(c.path.clone());
            }
            // 单条 Cookie 被拒绝（比如域名不匹配）不影响其它 Cookie
            if let Err(e) = self.driver.add_cookie(cookie).await {
                warn!("注入 Cookie {} 失败: {}", c.name, e);
            }
        }
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        self.driver.clone().quit().await?;
        Ok(())
    }
}

/// 通过 WebDriver 服务启动 Chrome
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    webdriver_url: String,
    headless: bool,
}

impl ChromeLauncher {
    pub fn new(config: &DownloaderConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            headless: config.headless,
        }
    }
}

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    async fn open_session(&self) -> Result<Box<dyn CourseBrowser>> {
        info!("启动浏览器 (WebDriver: {})...", self.webdriver_url);
        let mut caps = DesiredCapabilities::chrome();
        if self.headless {
            caps.set_headless()?;
        }

        let driver = WebDriver::new(&self.webdriver_url, caps).await?;
        if let Err(e) = driver.maximize_window().await {
            // 无界面模式下最大化可能不被支持
            warn!("窗口最大化失败: {}", e);
        }

        Ok(Box::new(WebDriverBrowser::new(driver)))
    }
}
