pub mod error;
pub mod layout;
pub mod runner;

pub use error::CourseError;
pub use runner::{RunSummary, process_course};
