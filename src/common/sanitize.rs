use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RESERVED_CHARS: Regex = Regex::new(r#"[<>:"/\\|?*]"#).unwrap();
    // (1:23) 或 (12:34) 这类时长标注，连续多个一起匹配
    static ref DURATION_SUFFIX: Regex =
        Regex::new(r"(?:\s*\(\d{1,2}:\d{2}\))+\s*").unwrap();
}

/// 把任意文本变成可用作文件名/目录名的片段
pub fn sanitize_filename(raw: &str) -> String {
    RESERVED_CHARS.replace_all(raw, "_").trim().to_string()
}

/// 去掉课时标题里的时长标注，如 `Intro (1:23)` -> `Intro`
pub fn strip_duration_suffix(raw: &str) -> String {
    DURATION_SUFFIX.replace_all(raw, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_every_reserved_char() {
        for c in ['<', '>', ':', '"', '/', '\\', '|', '?', '*'] {
            let out = sanitize_filename(&format!("a{}b", c));
            assert_eq!(out, "a_b", "字符 {} 没有被替换", c);
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(sanitize_filename("  Módulo 1: Intro  "), "Módulo 1_ Intro");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let inputs = [
            "",
            "   ",
            "plain",
            " a<b>c:d\"e/f\\g|h?i*j ",
            "¿Qué es? / parte 2",
            "\t tabs\tinside \n",
        ];
        for input in inputs {
            let once = sanitize_filename(input);
            assert_eq!(sanitize_filename(&once), once);
            assert!(!once.contains(['<', '>', ':', '"', '/', '\\', '|', '?', '*']));
        }
    }

    #[test]
    fn strips_trailing_duration() {
        assert_eq!(strip_duration_suffix("Intro (1:23)"), "Intro");
        assert_eq!(strip_duration_suffix("Intro (12:34)"), "Intro");
    }

    #[test]
    fn keeps_names_without_duration() {
        assert_eq!(strip_duration_suffix("No duration here"), "No duration here");
        assert_eq!(strip_duration_suffix("Tema (123:45)"), "Tema (123:45)");
        assert_eq!(strip_duration_suffix("Tema (1:2)"), "Tema (1:2)");
    }

    #[test]
    fn collapses_whitespace_around_inner_duration() {
        assert_eq!(strip_duration_suffix("Lesson (12:34) extra"), "Lesson extra");
        assert_eq!(strip_duration_suffix("Lesson(1:05)extra"), "Lesson extra");
    }

    #[test]
    fn adjacent_durations_leave_single_space() {
        assert_eq!(strip_duration_suffix("A (1:23) (2:34) B"), "A B");
        assert_eq!(strip_duration_suffix("A (1:23)(2:34)"), "A");
    }
}
