use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use colored::*;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_DATE_FORMAT: &str = "%d-%m-%Y %H:%M:%S";
const LOG_FILE_FORMAT: &str = "%d-%m-%Y_%H-%M-%S";

// 日志时间戳：本地时间 日-月-年 时:分:秒
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format(LOG_DATE_FORMAT))
    }
}

/// 初始化日志：终端彩色输出 + `log_dir/<时间戳>.log` 文件，返回日志文件路径
pub fn init_logging(log_dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(format!("{}.log", Local::now().format(LOG_FILE_FORMAT)));
    let file = std::fs::File::create(&log_path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer().with_timer(LocalTimer).with_target(false);
    let file_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(false)
        .with_writer(Arc::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(std::io::Error::other)?;

    Ok(log_path)
}

/// 漂亮的终端输出工具
pub struct PrettyLogger;

impl PrettyLogger {
    /// 启动横幅
    pub fn banner() {
        let title = r"
    ___   ___        ____                      __                __
   /   | |__ \      / __ \____ _      ______  / /___  ____ _____/ /__  _____
  / /| | __/ /_____/ / / / __ \ | /| / / __ \/ / __ \/ __ `/ __  / _ \/ ___/
 / ___ |/ __/_____/ /_/ / /_/ / |/ |/ / / / / / /_/ / /_/ / /_/ /  __/ /
/_/  |_/____/    /_____/\____/|__/|__/_/ /_/_/\____/\__,_/\__,_/\___/_/
";
        println!("{}", title.green());
        println!("{}", " Created by alphaDRM ".on_green().black());
        println!();
    }

    /// 显示分割线
    pub fn separator() {
        println!("{}", "─".repeat(50).bright_black());
    }

    /// 显示标题
    pub fn title(text: impl AsRef<str>) {
        let text = text.as_ref();
        let width = text.chars().count().min(48);
        let padding = (48 - width) / 2;
        println!(
            "{} {} {}",
            "─".repeat(padding).bright_black(),
            text.bold(),
            "─".repeat(48 - padding - width).bright_black()
        );
    }

    /// 显示完成总结
    pub fn completion_summary(processed: usize, skipped: usize, total: usize, elapsed: Duration) {
        println!("\n{}", "🎉 下载结束！".green().bold());
        println!("  {} {}/{}", "已处理课时:".bold(), processed, total);
        if skipped > 0 {
            println!("  {} {}", "跳过课时:".yellow().bold(), skipped);
        }
        println!("  {} {}", "总耗时:".bold(), format_elapsed(elapsed));
    }
}

/// 把耗时格式化为 `HH:MM:SS`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
