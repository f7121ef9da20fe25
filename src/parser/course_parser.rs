use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::common::models::{CourseStructure, Lesson, Section};
use crate::common::sanitize::{sanitize_filename, strip_duration_suffix};
use crate::parser::errors::ScrapeError;

lazy_static! {
    static ref COURSE_TITLE: Selector = Selector::parse("div.course-sidebar-head h2").unwrap();
    static ref SECTION: Selector = Selector::parse("div.course-section").unwrap();
    static ref SECTION_TITLE: Selector = Selector::parse("div.section-title").unwrap();
    static ref LESSON_LINK: Selector = Selector::parse("li.section-item a.item").unwrap();
    static ref LESSON_NAME: Selector = Selector::parse("span.lecture-name").unwrap();
}

// 拼接元素内所有文本节点（各自去掉首尾空白）
fn stripped_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<String>()
}

/// 把课程首页 HTML 解析成章节/课时结构
pub fn parse_course_page(html: &str, base_origin: &Url) -> Result<CourseStructure, ScrapeError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&COURSE_TITLE)
        .next()
        .map(|el| sanitize_filename(&stripped_text(el)))
        .ok_or_else(|| {
            ScrapeError::ParseError("未找到课程标题，页面结构不符或没有访问权限".to_string())
        })?;
    if title.is_empty() {
        return Err(ScrapeError::ParseError("课程标题为空".to_string()));
    }

    let mut sections = Vec::new();
    for section_el in document.select(&SECTION) {
        let Some(title_el) = section_el.select(&SECTION_TITLE).next() else {
            debug!("跳过没有标题的章节块");
            continue;
        };
        let section_title = sanitize_filename(&strip_duration_suffix(&stripped_text(title_el)));

        let lessons = section_el
            .select(&LESSON_LINK)
            .filter_map(|item| parse_lesson(item, base_origin, &section_title))
            .collect::<Vec<_>>();

        debug!("章节 {} 共 {} 个课时", section_title, lessons.len());
        sections.push(Section {
            title: section_title,
            lessons,
        });
    }

    Ok(CourseStructure { title, sections })
}

// 单个课时解析失败只跳过该课时
fn parse_lesson(item: ElementRef<'_>, base_origin: &Url, section: &str) -> Option<Lesson> {
    let Some(name_el) = item.select(&LESSON_NAME).next() else {
        warn!("章节 {} 中有课时缺少名称，已跳过", section);
        return None;
    };
    let name = sanitize_filename(&strip_duration_suffix(&stripped_text(name_el)));

    let Some(href) = item.value().attr("href") else {
        warn!("课时 {} 缺少链接，已跳过", name);
        return None;
    };

    match base_origin.join(href) {
        Ok(url) => Some(Lesson {
            name,
            url: url.to_string(),
        }),
        Err(e) => {
            warn!("课时 {} 的链接 {} 无效: {}", name, href, e);
            None
        }
    }
}
