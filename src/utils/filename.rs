//! Filename sanitizing for saved artifacts

use regex::Regex;
use std::sync::LazyLock;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("valid disallowed-chars regex"));

/// Strip `\ / * ? : " < > |` and replace every space with `_`
pub fn sanitize(name: &str) -> String {
    DISALLOWED.replace_all(name, "").replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_and_replaces() {
        assert_eq!(sanitize("Test Video: Title"), "Test_Video_Title");
        assert_eq!(sanitize(r#"a\b/c*d?e:f"g<h>i|j"#), "abcdefghij");
        assert_eq!(sanitize("My Song.mp3"), "My_Song.mp3");
        assert_eq!(sanitize("  two  spaces "), "__two__spaces_");
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_sanitize_keeps_other_characters() {
        assert_eq!(sanitize("Déjà vu (live) [4K] #1"), "Déjà_vu_(live)_[4K]_#1");
        assert_eq!(sanitize("tab\tstays"), "tab\tstays");
    }

    #[test]
    fn test_sanitize_output_is_clean_and_idempotent() {
        let inputs = [
            "",
            " ",
            "plain",
            r#"<<>>||""::??**//\\"#,
            "What? Is: this/that \"thing\" <ok> | no*",
            "ends with space ",
            "日本語 タイトル: 1/2",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert!(!DISALLOWED.is_match(&once), "reserved character left: {once:?}");
            assert!(!once.contains(' '), "space left: {once:?}");
            assert_eq!(sanitize(&once), once);
        }
    }
}
