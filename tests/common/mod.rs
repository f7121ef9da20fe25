#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use a2_downloader::auth::{BrowserCookie, BrowserKind, CookieError, CookieSource};
use a2_downloader::browser::{BrowserError, CourseBrowser, SessionLauncher};
use a2_downloader::config::{DownloaderConfig, Timeouts};
use a2_downloader::downloader::{DownloadError, VideoFetcher};
use async_trait::async_trait;
use scraper::{Html, Selector};

/// 一个脚本化的页面：顶层 HTML，以及可选的播放器 iframe 内容
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub html: String,
    pub frame: Option<String>,
}

#[derive(Debug, Default)]
pub struct BrowserState {
    pub current: Option<String>,
    pub in_frame: bool,
    pub quit: bool,
    pub visited: Vec<String>,
    pub cookies_added: usize,
    pub refreshed: usize,
}

/// 不启动真实浏览器的会话：页面内容按 URL 预先写好，等待元素时直接检查 HTML
#[derive(Clone, Default)]
pub struct FakeBrowser {
    pages: Arc<HashMap<String, FakePage>>,
    failing: Arc<HashSet<String>>,
    pub state: Arc<Mutex<BrowserState>>,
}

impl FakeBrowser {
    pub fn new(pages: HashMap<String, FakePage>) -> Self {
        Self {
            pages: Arc::new(pages),
            ..Default::default()
        }
    }

    /// 打开这些地址时返回 WebDriver 错误
    pub fn failing_on(mut self, urls: &[&str]) -> Self {
        self.failing = Arc::new(urls.iter().map(|u| u.to_string()).collect());
        self
    }

    pub fn snapshot(&self) -> BrowserState {
        let state = self.state.lock().unwrap();
        BrowserState {
            current: state.current.clone(),
            in_frame: state.in_frame,
            quit: state.quit,
            visited: state.visited.clone(),
            cookies_added: state.cookies_added,
            refreshed: state.refreshed,
        }
    }

    fn current_html(&self) -> String {
        let state = self.state.lock().unwrap();
        let page = state.current.as_ref().and_then(|url| self.pages.get(url));
        match (page, state.in_frame) {
            (Some(page), true) => page.frame.clone().unwrap_or_default(),
            (Some(page), false) => page.html.clone(),
            (None, _) => "<html></html>".to_string(),
        }
    }

    fn current_page(&self) -> Option<FakePage> {
        let state = self.state.lock().unwrap();
        state.current.as_ref().and_then(|url| self.pages.get(url)).cloned()
    }
}

fn has_match(html: &str, selector: &str) -> bool {
    let selector = Selector::parse(selector).unwrap();
    Html::parse_document(html).select(&selector).next().is_some()
}

fn timeout(selector: &str, timeout: Duration) -> BrowserError {
    BrowserError::Timeout {
        selector: selector.to_string(),
        secs: timeout.as_secs(),
    }
}

#[async_trait]
impl CourseBrowser for FakeBrowser {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        if self.failing.contains(url) {
            return Err(BrowserError::WebDriverFailure(format!("无法打开 {}", url)));
        }
        let mut state = self.state.lock().unwrap();
        state.current = Some(url.to_string());
        state.in_frame = false;
        state.visited.push(url.to_string());
        Ok(())
    }

    async fn refresh(&self) -> Result<(), BrowserError> {
        self.state.lock().unwrap().refreshed += 1;
        Ok(())
    }

    async fn wait_for(&self, selector: &str, limit: Duration) -> Result<(), BrowserError> {
        if has_match(&self.current_html(), selector) {
            Ok(())
        } else {
            Err(timeout(selector, limit))
        }
    }

    async fn enter_frame(&self, selector: &str, limit: Duration) -> Result<(), BrowserError> {
        match self.current_page() {
            Some(page) if page.frame.is_some() && has_match(&page.html, selector) => {
                self.state.lock().unwrap().in_frame = true;
                Ok(())
            }
            _ => Err(timeout(selector, limit)),
        }
    }

    async fn leave_frame(&self) -> Result<(), BrowserError> {
        self.state.lock().unwrap().in_frame = false;
        Ok(())
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        Ok(self.current_html())
    }

    async fn add_cookies(&self, cookies: &[BrowserCookie]) -> Result<(), BrowserError> {
        self.state.lock().unwrap().cookies_added += cookies.len();
        Ok(())
    }

    async fn quit(&self) -> Result<(), BrowserError> {
        self.state.lock().unwrap().quit = true;
        Ok(())
    }
}

pub struct FakeLauncher {
    pub browser: FakeBrowser,
    pub fail_open: bool,
}

impl FakeLauncher {
    pub fn new(browser: FakeBrowser) -> Self {
        Self {
            browser,
            fail_open: false,
        }
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    async fn open_session(&self) -> Result<Box<dyn CourseBrowser>, BrowserError> {
        if self.fail_open {
            return Err(BrowserError::WebDriverFailure(
                "无法连接 WebDriver".to_string(),
            ));
        }
        Ok(Box::new(self.browser.clone()))
    }
}

pub struct FakeCookies(pub Vec<BrowserCookie>);

impl FakeCookies {
    pub fn logged_in() -> Self {
        FakeCookies(vec![BrowserCookie {
            name: "_session_id".to_string(),
            value: "abc123".to_string(),
            domain: String::new(),
            path: "/".to_string(),
        }])
    }

    pub fn empty() -> Self {
        FakeCookies(Vec::new())
    }
}

#[async_trait]
impl CookieSource for FakeCookies {
    async fn get_cookies(
        &self,
        _domain: &str,
        _browser: BrowserKind,
    ) -> Result<Vec<BrowserCookie>, CookieError> {
        Ok(self.0.clone())
    }
}

/// 记录每次调用并写出一个占位视频文件；`failing` 中的课时返回下载失败
#[derive(Default)]
pub struct RecordingFetcher {
    pub calls: Mutex<Vec<(String, PathBuf, String)>>,
    pub failing: HashSet<String>,
}

impl RecordingFetcher {
    pub fn failing_on(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoFetcher for RecordingFetcher {
    async fn fetch(
        &self,
        manifest_url: &str,
        save_dir: &Path,
        output_name: &str,
    ) -> Result<(), DownloadError> {
        if self.failing.contains(output_name) {
            return Err(DownloadError::ExternalDownloadFailure(format!(
                "'{}' 退出状态 1",
                output_name
            )));
        }
        tokio::fs::write(save_dir.join(format!("{}.mp4", output_name)), b"video").await?;
        self.calls.lock().unwrap().push((
            manifest_url.to_string(),
            save_dir.to_path_buf(),
            output_name.to_string(),
        ));
        Ok(())
    }
}

pub fn test_config(output_dir: &Path, base_origin: &str) -> DownloaderConfig {
    DownloaderConfig {
        base_origin: base_origin.to_string(),
        cookie_domain: String::new(),
        output_dir: output_dir.to_path_buf(),
        timeouts: Timeouts {
            lesson_ready: Duration::from_secs(1),
            player_frame: Duration::from_secs(1),
            embedded_data: Duration::from_secs(1),
            cover: Duration::from_secs(1),
        },
        ..Default::default()
    }
}

/// 课时页面：带标题标记，可选附件链接和正文链接
pub fn lesson_page(attachments: &[(&str, &str)], links: &[&str], with_player: bool) -> String {
    let mut html = String::from("<html><body><h2 id=\"lecture_heading\">Clase</h2>");
    for (href, name) in attachments {
        html.push_str(&format!(
            "<a class=\"download\" href=\"{}\" data-x-origin-download-name=\"{}\">Descargar</a>",
            href, name
        ));
    }
    html.push_str("<div class=\"lecture-text-container\">");
    for link in links {
        html.push_str(&format!("<a href=\"{}\">enlace</a>", link));
    }
    html.push_str("</div>");
    if with_player {
        html.push_str("<iframe data-testid=\"embed-player\" src=\"https://player.example/embed\"></iframe>");
    }
    html.push_str("</body></html>");
    html
}

pub fn player_frame(manifest_url: &str) -> String {
    format!(
        r#"<html><body><script id="__NEXT_DATA__" type="application/json">{{"props":{{"pageProps":{{"applicationData":{{"mediaAssets":[{{"qualityLabel":"720p","url":"{0}/720.m3u8"}},{{"qualityLabel":"auto","url":"{0}"}}]}}}}}}}}</script></body></html>"#,
        manifest_url
    )
}

/// 本地 HTTP 服务：按路径返回固定内容，并记录收到的 User-Agent 和 Cookie
pub struct StubServer {
    pub base_url: String,
    pub user_agents: Arc<Mutex<Vec<String>>>,
    pub cookie_headers: Arc<Mutex<Vec<String>>>,
    shutdown: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl StubServer {
    pub fn start(routes: Vec<(&str, u16, Vec<u8>)>) -> Self {
        let routes: HashMap<String, (u16, Vec<u8>)> = routes
            .into_iter()
            .map(|(path, status, body)| (path.to_string(), (status, body)))
            .collect();

        let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
        let base_url = format!("http://{}", server.server_addr());
        let user_agents = Arc::new(Mutex::new(Vec::new()));
        let cookie_headers = Arc::new(Mutex::new(Vec::new()));
        let (shutdown, shutdown_rx) = mpsc::channel::<()>();

        let seen = Arc::clone(&user_agents);
        let seen_cookies = Arc::clone(&cookie_headers);
        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }
                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                if let Some(ua) = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("User-Agent"))
                {
                    seen.lock().unwrap().push(ua.value.to_string());
                }
                if let Some(cookie) = request.headers().iter().find(|h| h.field.equiv("Cookie")) {
                    seen_cookies.lock().unwrap().push(cookie.value.to_string());
                }

                let path = request.url().split('?').next().unwrap_or("").to_string();
                let response = match routes.get(&path) {
                    Some((status, body)) => {
                        tiny_http::Response::from_data(body.clone()).with_status_code(*status)
                    }
                    None => tiny_http::Response::from_data(b"not found".to_vec())
                        .with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            user_agents,
            cookie_headers,
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
