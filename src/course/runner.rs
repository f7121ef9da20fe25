use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};
use url::Url;

use super::error::CourseError;
use super::layout::{course_root, lesson_display_name, section_dir};
use crate::auth::{BrowserKind, CookieSource};
use crate::browser::{BrowserError, CourseBrowser, SessionLauncher, bootstrap_session};
use crate::common::client::client::CourseClient;
use crate::common::logger::format_elapsed;
use crate::common::models::{CourseStructure, Lesson, Section};
use crate::config::DownloaderConfig;
use crate::downloader::{
    VideoFetcher, VideoOutcome, download_cover_image, download_lesson_resources,
    download_lesson_video,
};

// 课时页面加载完成的标志
const LESSON_READY: &str = "#lecture_heading";

/// 一次运行的统计
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub videos: usize,
    pub lesson_errors: usize,
    pub fatal: Option<String>,
    pub elapsed: Duration,
}

// 运行上下文：持有浏览器会话和下载所需的客户端
struct CourseRunner<'a> {
    config: &'a DownloaderConfig,
    client: CourseClient,
    base_origin: Url,
    session: Box<dyn CourseBrowser>,
    fetcher: &'a dyn VideoFetcher,
}

/// 按章节、课时顺序下载整个课程
///
/// 单个课时的失败只记录日志；会话级别的错误会终止运行。
/// 任何情况下返回前都会关闭浏览器。
pub async fn process_course(
    launcher: &dyn SessionLauncher,
    cookie_source: &dyn CookieSource,
    fetcher: &dyn VideoFetcher,
    course_url: &str,
    browser: BrowserKind,
    course: &CourseStructure,
    config: &DownloaderConfig,
) -> RunSummary {
    let start = Instant::now();
    let mut summary = RunSummary {
        total: course.total_lessons(),
        ..Default::default()
    };

    match CourseRunner::open(launcher, cookie_source, fetcher, course_url, browser, config).await {
        Ok(runner) => {
            if let Err(e) = runner.download_course(course, &mut summary).await {
                error!("下载过程中出现致命错误: {}", e);
                summary.fatal = Some(e.to_string());
            }
            runner.close().await;
        }
        Err(e) => {
            error!("无法建立浏览器会话: {}", e);
            summary.fatal = Some(e.to_string());
        }
    }

    summary.elapsed = start.elapsed();
    info!(
        "下载结束: {}/{} 个课时已处理, {} 个跳过, 总耗时 {}",
        summary.processed,
        summary.total,
        summary.skipped,
        format_elapsed(summary.elapsed)
    );
    summary
}

impl<'a> CourseRunner<'a> {
    async fn open(
        launcher: &dyn SessionLauncher,
        cookie_source: &dyn CookieSource,
        fetcher: &'a dyn VideoFetcher,
        course_url: &str,
        browser: BrowserKind,
        config: &'a DownloaderConfig,
    ) -> Result<CourseRunner<'a>, CourseError> {
        // 先准备好不依赖浏览器的部分，避免会话打开后再失败
        let client = CourseClient::new(&config.user_agent)?;
        let base_origin = Url::parse(&config.base_origin)
            .map_err(|e| CourseError::InvalidUrl(format!("{}: {}", config.base_origin, e)))?;

        info!("启动浏览器...");
        let session =
            bootstrap_session(launcher, cookie_source, course_url, browser, config).await?;
        info!("浏览器已就绪");

        Ok(Self {
            config,
            client,
            base_origin,
            session,
            fetcher,
        })
    }

    async fn close(self) {
        match self.session.quit().await {
            Ok(()) => info!("浏览器已关闭"),
            Err(e) => warn!("关闭浏览器失败: {}", e),
        }
    }

    async fn download_course(
        &self,
        course: &CourseStructure,
        summary: &mut RunSummary,
    ) -> Result<(), CourseError> {
        let root = course_root(&self.config.output_dir, course);
        tokio::fs::create_dir_all(&root).await?;

        download_cover_image(
            self.session.as_ref(),
            &self.client,
            &root,
            self.config.timeouts.cover,
        )
        .await;

        // 先建好整棵目录树，空章节也保留目录
        for section in &course.sections {
            tokio::fs::create_dir_all(section_dir(&root, section)).await?;
        }

        let mut current = 0;
        for section in &course.sections {
            let dir = section_dir(&root, section);
            info!("--- 处理章节: {} ---", section.title);

            for (i, lesson) in section.lessons.iter().enumerate() {
                current += 1;
                let display_name = lesson_display_name(i + 1, &lesson.name);
                info!("处理课时 {}/{}: {}", current, summary.total, lesson.name);

                match self
                    .process_lesson(section, lesson, &dir, &display_name, summary)
                    .await
                {
                    Ok(()) => summary.processed += 1,
                    Err(e @ CourseError::LessonLoadTimeout { .. }) => {
                        error!("{}，跳过", e);
                        summary.skipped += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(())
    }

    async fn process_lesson(
        &self,
        section: &Section,
        lesson: &Lesson,
        dir: &Path,
        display_name: &str,
        summary: &mut RunSummary,
    ) -> Result<(), CourseError> {
        let session = self.session.as_ref();
        session.goto(&lesson.url).await?;

        let ready_timeout = self.config.timeouts.lesson_ready;
        match session.wait_for(LESSON_READY, ready_timeout).await {
            Ok(()) => {}
            Err(BrowserError::Timeout { .. }) => {
                return Err(CourseError::LessonLoadTimeout {
                    lesson: display_name.to_string(),
                    secs: ready_timeout.as_secs(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        if let Err(e) =
            download_lesson_resources(session, &self.client, &self.base_origin, dir).await
        {
            error!(
                "课时 '{}' (章节 '{}') 资源下载失败: {}",
                display_name, section.title, e
            );
            summary.lesson_errors += 1;
        }

        match download_lesson_video(
            session,
            self.fetcher,
            dir,
            display_name,
            &self.config.timeouts,
        )
        .await
        {
            Ok(VideoOutcome::Downloaded) => summary.videos += 1,
            Ok(VideoOutcome::NoVideo | VideoOutcome::NoManifest) => {}
            Err(e) => {
                error!(
                    "课时 '{}' (章节 '{}') 视频处理失败: {}",
                    display_name, section.title, e
                );
                summary.lesson_errors += 1;
            }
        }

        Ok(())
    }
}
