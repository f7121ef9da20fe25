use std::path::{Path, PathBuf};

use crate::common::models::{CourseStructure, Section};
use crate::common::sanitize::sanitize_filename;

/// 课程根目录：`<output_dir>/<course_title>`
pub fn course_root(output_dir: &Path, course: &CourseStructure) -> PathBuf {
    output_dir.join(&course.title)
}

pub fn section_dir(course_root: &Path, section: &Section) -> PathBuf {
    course_root.join(&section.title)
}

/// 课时文件名：两位序号 + 名称，如 `01 - Bienvenida`
pub fn lesson_display_name(ordinal: usize, name: &str) -> String {
    sanitize_filename(&format!("{:02} - {}", ordinal, name))
}
