use clap::Parser;
use std::path::PathBuf;

use crate::auth::BrowserKind;

/// A2 课程下载器
#[derive(Parser, Debug)]
#[command(name = "a2dl")]
#[command(version = "1.0")]
#[command(author = "rpeng252@gmail.com")]
#[command(about = "A2 Downloader: 下载 A2 Capacitación 课程的课时视频与附件", long_about = None)]
pub struct Cli {
    /// 课程完整链接
    #[arg(value_name = "URL")]
    #[arg(value_hint = clap::ValueHint::Url)]
    pub url: String,

    /// 读取 Cookie 的浏览器 (需要事先在该浏览器中登录)
    #[arg(long, value_enum, default_value_t = BrowserKind::Firefox)]
    pub browser: BrowserKind,

    /// 课程保存目录
    #[arg(long, value_name = "DIR")]
    #[arg(default_value = ".")]
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub output_dir: PathBuf,

    /// WebDriver 服务地址 (如 chromedriver)
    #[arg(long, value_name = "URL")]
    #[arg(help = "WebDriver 地址，默认读取 WEBDRIVER_URL 或 http://localhost:9515")]
    pub webdriver: Option<String>,

    /// 无界面模式运行浏览器
    #[arg(long)]
    pub headless: bool,
}
