mod errors;

use std::fmt;

use async_trait::async_trait;
use clap::ValueEnum;
use tracing::debug;

pub use errors::{CookieError, Result};

// 可以读取 Cookie 的桌面浏览器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BrowserKind {
    #[default]
    Firefox,
    Chrome,
    Edge,
    Brave,
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrowserKind::Firefox => "firefox",
            BrowserKind::Chrome => "chrome",
            BrowserKind::Edge => "edge",
            BrowserKind::Brave => "brave",
        };
        f.write_str(name)
    }
}

// 从浏览器取出的一条 Cookie，只保留注入会话需要的字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
}

/// Cookie 来源：按域名读取某个浏览器里已登录的 Cookie
#[async_trait]
pub trait CookieSource: Send + Sync {
    async fn get_cookies(&self, domain: &str, browser: BrowserKind) -> Result<Vec<BrowserCookie>>;
}

/// 读取本机浏览器 Cookie 数据库
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserCookieStore;

impl BrowserCookieStore {
    fn read_store(domain: String, browser: BrowserKind) -> Result<Vec<BrowserCookie>> {
        let domains = Some(vec![domain]);
        let cookies = match browser {
            BrowserKind::Firefox => rookie::firefox(domains),
            BrowserKind::Chrome => rookie::chrome(domains),
            BrowserKind::Edge => rookie::edge(domains),
            BrowserKind::Brave => rookie::brave(domains),
        }
        .map_err(|e| CookieError::Store {
            browser,
            message: e.to_string(),
        })?;

        Ok(cookies
            .into_iter()
            .map(|c| BrowserCookie {
                name: c.name,
                value: c.value,
                domain: c.domain,
                path: c.path,
            })
            .collect())
    }
}

#[async_trait]
impl CookieSource for BrowserCookieStore {
    async fn get_cookies(&self, domain: &str, browser: BrowserKind) -> Result<Vec<BrowserCookie>> {
        // 读取 sqlite 数据库是阻塞操作
        let domain = domain.to_string();
        let cookies =
            tokio::task::spawn_blocking(move || Self::read_store(domain, browser)).await??;
        debug!("从 {} 读取到 {} 条 Cookie", browser, cookies.len());
        Ok(cookies)
    }
}
