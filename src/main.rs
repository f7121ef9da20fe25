use clap::Parser;
use colored::Colorize;
use tracing::{error, info, warn};

use a2_downloader::auth::BrowserCookieStore;
use a2_downloader::browser::ChromeLauncher;
use a2_downloader::cli::Cli;
use a2_downloader::common::logger::{PrettyLogger, init_logging};
use a2_downloader::config::DownloaderConfig;
use a2_downloader::course::process_course;
use a2_downloader::downloader::YtDlp;
use a2_downloader::parser::scrape_course_structure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let args = Cli::parse();
    let config = DownloaderConfig::from_cli(&args);

    // 初始化日志
    let log_path = init_logging(&config.log_dir)?;
    PrettyLogger::banner();
    info!("日志文件: {:?}", log_path);
    info!("开始下载课程: {}", args.url);

    // 先用普通 HTTP 请求拿到课程结构
    let cookie_source = BrowserCookieStore;
    let course =
        match scrape_course_structure(&args.url, args.browser, &cookie_source, &config).await {
            Ok(course) => course,
            Err(_) => {
                // 错误已经记录在日志里
                error!("{}", "无法获取课程结构，退出".red());
                return Ok(());
            }
        };

    PrettyLogger::title(&course.title);
    tokio::fs::create_dir_all(&config.output_dir).await?;
    let artifact = course.artifact_path(&config.output_dir);
    match course.save_to_json(&artifact).await {
        Ok(()) => info!("课程结构已保存到 {:?}", artifact),
        Err(e) => warn!("保存课程结构失败 {:?}: {}", artifact, e),
    }
    PrettyLogger::separator();

    let launcher = ChromeLauncher::new(&config);
    let fetcher = YtDlp::from_config(&config);
    let summary = process_course(
        &launcher,
        &cookie_source,
        &fetcher,
        &args.url,
        args.browser,
        &course,
        &config,
    )
    .await;

    PrettyLogger::completion_summary(
        summary.processed,
        summary.skipped,
        summary.total,
        summary.elapsed,
    );
    if let Some(fatal) = &summary.fatal {
        warn!("下载提前结束: {}", fatal);
    }
    Ok(())
}
