use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_derive::Deserialize;

// 课程结构，由结构解析器一次性生成，之后只读
// 序列化字段名沿用旧版工具输出的 JSON 格式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseStructure {
    #[serde(rename = "course_title")]
    pub title: String, // 课程标题（已清洗），同时作为根目录名
    #[serde(rename = "secciones")]
    pub sections: Vec<Section>, // 章节，顺序与页面一致
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "titulo_seccion")]
    pub title: String,
    #[serde(rename = "lecciones", default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub name: String, // 已去除时长标注
    pub url: String,  // 绝对地址
}

impl CourseStructure {
    pub fn total_lessons(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }

    /// 结构文件的默认位置：`<dir>/<course_title>.json`
    pub fn artifact_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.json", self.title))
    }

    /// 以 4 空格缩进写出 UTF-8 JSON，便于人工检查和复用
    pub async fn save_to_json(&self, path: &Path) -> std::io::Result<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        tokio::fs::write(path, buf).await
    }

    pub async fn load_from_json(path: &Path) -> std::io::Result<Self> {
        let raw = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }
}
