use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;

pub const BASE_ORIGIN: &str = "https://cursos.a2capacitacion.com";
pub const COOKIE_DOMAIN: &str = "a2capacitacion.com";
pub const PLAYER_REFERER: &str = "https://player.hotmart.com/";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";

// 各类等待的超时时间
#[derive(Debug, Clone)]
pub struct Timeouts {
    pub lesson_ready: Duration,
    pub player_frame: Duration,
    pub embedded_data: Duration,
    pub cover: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            lesson_ready: Duration::from_secs(20),
            player_frame: Duration::from_secs(15),
            embedded_data: Duration::from_secs(10),
            cover: Duration::from_secs(10),
        }
    }
}

/// 一次下载运行需要的全部配置
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    pub base_origin: String,
    pub cookie_domain: String,
    pub user_agent: String,
    pub webdriver_url: String,
    pub headless: bool,
    pub ytdlp_path: String,
    pub ytdlp_backend: String,
    pub player_referer: String,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub timeouts: Timeouts,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            base_origin: BASE_ORIGIN.to_string(),
            cookie_domain: COOKIE_DOMAIN.to_string(),
            user_agent: USER_AGENT.to_string(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: false,
            ytdlp_path: "yt-dlp".to_string(),
            ytdlp_backend: "aria2c".to_string(),
            player_referer: PLAYER_REFERER.to_string(),
            output_dir: PathBuf::from("."),
            log_dir: PathBuf::from("logs"),
            timeouts: Timeouts::default(),
        }
    }
}

impl DownloaderConfig {
    /// 命令行参数优先，其次是环境变量（WEBDRIVER_URL、YTDLP_PATH）
    pub fn from_cli(args: &Cli) -> Self {
        let defaults = Self::default();
        let webdriver_url = args
            .webdriver
            .clone()
            .or_else(|| std::env::var("WEBDRIVER_URL").ok())
            .unwrap_or(defaults.webdriver_url.clone());
        let ytdlp_path = std::env::var("YTDLP_PATH").unwrap_or(defaults.ytdlp_path.clone());

        Self {
            webdriver_url,
            ytdlp_path,
            headless: args.headless,
            output_dir: args.output_dir.clone(),
            ..defaults
        }
    }
}
