use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, info};

use super::error::DownloadError;
use crate::config::DownloaderConfig;

/// 把视频清单地址交给外部下载工具
#[async_trait]
pub trait VideoFetcher: Send + Sync {
    async fn fetch(
        &self,
        manifest_url: &str,
        save_dir: &Path,
        output_name: &str,
    ) -> Result<(), DownloadError>;
}

// 调用系统中的 yt-dlp，阻塞直到进程退出，没有超时
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
    referer: String,
    backend: String,
}

impl YtDlp {
    pub fn new(program: impl Into<String>, referer: impl Into<String>, backend: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            referer: referer.into(),
            backend: backend.into(),
        }
    }

    pub fn from_config(config: &DownloaderConfig) -> Self {
        Self::new(
            config.ytdlp_path.clone(),
            config.player_referer.clone(),
            config.ytdlp_backend.clone(),
        )
    }

    pub fn build_args(&self, manifest_url: &str, save_dir: &Path, output_name: &str) -> Vec<OsString> {
        vec![
            "--add-headers".into(),
            format!("Referer: {}", self.referer).into(),
            "--downloader".into(),
            self.backend.clone().into(),
            "-P".into(),
            save_dir.as_os_str().to_os_string(),
            "-o".into(),
            format!("{}.%(ext)s", output_name).into(),
            manifest_url.into(),
        ]
    }
}

#[async_trait]
impl VideoFetcher for YtDlp {
    async fn fetch(
        &self,
        manifest_url: &str,
        save_dir: &Path,
        output_name: &str,
    ) -> Result<(), DownloadError> {
        let args = self.build_args(manifest_url, save_dir, output_name);
        debug!("执行: {} {:?}", self.program, args);

        // 输出直接交给终端，便于查看下载进度
        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                error!("❌ 无法启动 {}，请确认已安装或设置 YTDLP_PATH", self.program);
                DownloadError::ExternalDownloadFailure(format!("无法启动 {}: {}", self.program, e))
            })?;

        if !status.success() {
            return Err(DownloadError::ExternalDownloadFailure(format!(
                "'{}' 退出状态 {}",
                output_name, status
            )));
        }

        info!("✅ 视频 '{}' 下载完成", output_name);
        Ok(())
    }
}
