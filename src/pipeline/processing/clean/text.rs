use once_cell::sync::Lazy;
use regex::Regex;

// Non-greedy: each opening bracket runs to the first closing one
static CITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\[\(].*?[\)\]]").expect("static citation regex"));
static TRAILING_NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\[\(].*").expect("static trailing note regex"));
static FOOTNOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*?\]").expect("static footnote regex"));
// Unicode-aware so that non-ASCII digit runs surface instead of splitting text
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("static digit regex"));

/// Remove every `[..]`/`(..)` marker and trailing whitespace
pub fn strip_citations(text: &str) -> String {
    CITATION.replace_all(text, "").trim_end().to_string()
}

/// Remove everything from the first `[` or `(` on, then trailing whitespace
pub fn strip_trailing_note(text: &str) -> String {
    TRAILING_NOTE.replace(text, "").trim_end().to_string()
}

/// Remove `[..]` footnotes only; surrounding text is left untouched
pub fn strip_footnotes(text: &str) -> String {
    FOOTNOTE.replace_all(text, "").into_owned()
}

pub fn first_token(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

/// Every run of digits in `text`, as numbers. `None` when a run is not
/// made of ASCII digits.
pub fn numeric_tokens(text: &str) -> Option<Vec<f64>> {
    DIGIT_RUN
        .find_iter(text)
        .map(|run| run.as_str().parse::<f64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_citations() {
        assert_eq!(strip_citations("Ozark[12]"), "Ozark");
        assert_eq!(strip_citations("Kaleidoscope (miniseries) [a]"), "Kaleidoscope");
        assert_eq!(strip_citations("30–60 (varies)[3]"), "30–60");
    }

    #[test]
    fn test_strip_trailing_note() {
        assert_eq!(strip_trailing_note("March 3, 2022[a]"), "March 3, 2022");
        assert_eq!(strip_trailing_note("2022 (announced) [4]"), "2022");
    }

    #[test]
    fn test_strip_footnotes_keeps_parentheses() {
        assert_eq!(strip_footnotes("Ended (cancelled)[5]"), "Ended (cancelled)");
    }

    #[test]
    fn test_numeric_tokens() {
        assert_eq!(numeric_tokens("22–30 "), Some(vec![22.0, 30.0]));
        assert_eq!(numeric_tokens("45"), Some(vec![45.0]));
        assert_eq!(numeric_tokens("varies"), Some(vec![]));
    }

    #[test]
    fn test_non_ascii_digits_are_rejected() {
        assert_eq!(numeric_tokens("２２–90"), None);
    }

    #[test]
    fn test_first_token() {
        assert_eq!(first_token("3 seasons"), "3");
        assert_eq!(first_token(""), "");
    }
}
