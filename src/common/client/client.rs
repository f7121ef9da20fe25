use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use cookie::Cookie;
use cookie_store::CookieStore;
use reqwest::{
    Client, ClientBuilder, Response, Url,
    header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT},
};
use reqwest_cookie_store::CookieStoreMutex;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::error::HttpError;
use crate::auth::BrowserCookie;

// 携带浏览器登录态的 HTTP 客户端
#[derive(Debug, Clone)]
pub struct CourseClient {
    pub inner: Client,
    pub cookie_store: Arc<CookieStoreMutex>,
}

impl CourseClient {
    pub fn new(user_agent: &str) -> Result<Self, HttpError> {
        let cookie_store = Arc::new(CookieStoreMutex::new(CookieStore::default()));

        let inner = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .cookie_provider(Arc::clone(&cookie_store))
            .default_headers(Self::get_default_headers(user_agent))
            .build()?;

        Ok(Self {
            inner,
            cookie_store,
        })
    }

    pub fn get_default_headers(user_agent: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("es-ES,es;q=0.9"));
        if let Ok(ua) = HeaderValue::from_str(user_agent) {
            headers.insert(USER_AGENT, ua);
        }
        headers
    }

    // 把浏览器里的 Cookie 放进客户端的 CookieStore，返回成功写入的条数
    pub fn load_browser_cookies(&self, cookies: &[BrowserCookie], site: &Url) -> usize {
        let mut store = match self.cookie_store.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut loaded = 0;
        for c in cookies {
            let mut builder = Cookie::build((c.name.clone(), c.value.clone()));
            let domain = c.domain.trim_start_matches('.');
            if !domain.is_empty() {
                builder = builder.domain(domain.to_string());
            }
            if !c.path.is_empty() {
                builder = builder.path(c.path.clone());
            }
            let cookie = builder.build();

            if let Err(e) = store.insert_raw(&cookie, site) {
                // 域名与课程站点不符（如 sso 子域），改为挂在站点自身域名下
                warn!("Cookie {} 的域名 {} 不适用于 {}: {}，改用站点域名", c.name, c.domain, site, e);
                let mut host_only = cookie.clone();
                host_only.unset_domain();
                if let Err(e) = store.insert_raw(&host_only, site) {
                    warn!("忽略 Cookie {}: {}", c.name, e);
                    continue;
                }
            }
            loaded += 1;
        }
        debug!("已载入 {}/{} 条 Cookie", loaded, cookies.len());
        loaded
    }

    async fn send_get(&self, url: &str) -> Result<Response, HttpError> {
        let resp = self.inner.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(resp)
    }

    /// GET 页面并返回正文
    pub async fn get_text(&self, url: &str) -> Result<String, HttpError> {
        let resp = self.send_get(url).await?;
        Ok(resp.text().await?)
    }

    /// 流式下载到文件，返回写入的字节数
    pub async fn download_to_file(&self, url: &str, path: &Path) -> Result<u64, HttpError> {
        let mut resp = self.send_get(url).await?;
        let mut file = tokio::fs::File::create(path).await?;

        let mut written = 0u64;
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!("下载完成 {} ({} 字节) -> {:?}", url, written, path);
        Ok(written)
    }
}
