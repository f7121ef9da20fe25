use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("网络请求失败: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("服务器返回 {status}: {url}")]
    Status { url: String, status: StatusCode },

    #[error("写入文件失败: {0}")]
    Io(#[from] std::io::Error),
}
