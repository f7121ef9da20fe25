pub mod cover;
pub mod error;
pub mod resources;
pub mod video;
pub mod ytdlp;

pub use cover::download_cover_image;
pub use error::DownloadError;
pub use resources::{ResourceReport, download_lesson_resources};
pub use video::{VideoOutcome, download_lesson_video};
pub use ytdlp::{VideoFetcher, YtDlp};
