//! Saving generated text to dated output files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

const PATH_UNSAFE: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Spaces become underscores, path-unsafe and control characters are dropped,
/// and an emptied name falls back to `test`.
pub fn sanitize_test_name(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| !PATH_UNSAFE.contains(c) && !c.is_control())
        .collect();

    if cleaned.is_empty() {
        "test".to_string()
    } else {
        cleaned
    }
}

fn dated_name(raw_name: &str, suffix: &str, ext: &str, date: &str) -> String {
    format!("{}_{}_{}.{}", sanitize_test_name(raw_name), suffix, date, ext)
}

fn today() -> String {
    Local::now().format("%Y%m%d").to_string()
}

pub fn scenario_path(raw_name: &str) -> PathBuf {
    PathBuf::from(dated_name(raw_name, "test_scenarios", "txt", &today()))
}

pub fn automation_path(raw_name: &str) -> PathBuf {
    PathBuf::from(dated_name(raw_name, "playwright_automation", "ts", &today()))
}

/// Writes the text verbatim as UTF-8.
pub fn save_text(path: &Path, text: &str) -> Result<(), String> {
    fs::write(path, text).map_err(|e| format!("could not write {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(sanitize_test_name("login flow"), "login_flow");
    }

    #[test]
    fn empty_name_defaults_to_test() {
        assert_eq!(sanitize_test_name(""), "test");
        assert_eq!(sanitize_test_name("   "), "test");
        assert_eq!(sanitize_test_name("///"), "test");
    }

    #[test]
    fn path_unsafe_characters_are_stripped() {
        assert_eq!(sanitize_test_name("a/b\\c:d*e?f\"g<h>i|j"), "abcdefghij");
        assert_eq!(sanitize_test_name("tab\there"), "tabhere");
    }

    #[test]
    fn dated_names_follow_the_fixed_format() {
        assert_eq!(
            dated_name("checkout flow", "test_scenarios", "txt", "20260829"),
            "checkout_flow_test_scenarios_20260829.txt"
        );
        assert_eq!(
            dated_name("", "playwright_automation", "ts", "20260829"),
            "test_playwright_automation_20260829.ts"
        );
    }

    #[test]
    fn save_text_writes_verbatim() {
        let path = std::env::temp_dir().join(format!(
            "scengen_output_test_{}.txt",
            std::process::id()
        ));

        save_text(&path, "1. Test happy path").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1. Test happy path");

        let _ = fs::remove_file(path);
    }
}
