//! Text utilities shared by every extractor.
//!
//! Whitespace and line-break normalization, HTML flattening, and the two
//! small parsers every section heading goes through: the section number
//! (`"4. Starting a Conversation"`) and the time box (`"(3 min.)"`).

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node};

use crate::{MidweekError, Result};

static SECTION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.").expect("section number pattern"));

static TIME_BOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\s*mins?\.\)").expect("time box pattern"));

static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

const BLOCK_ELEMENTS: [&str; 16] = [
    "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "header", "blockquote", "br", "tr", "section",
];

/// Collapse every run of whitespace, line breaks included, into one space.
pub fn collapse_whitespace(text: &str) -> String {
    SPACES.replace_all(text.trim(), " ").into_owned()
}

/// Collapse whitespace inside each line, drop blank lines.
///
/// Consecutive line breaks therefore end up as a single one.
pub fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text of an element with whitespace collapsed to single spaces.
pub fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Flatten an element to text, breaking lines at block elements.
pub fn flatten_element(element: &ElementRef<'_>) -> String {
    let mut out = String::new();
    push_flattened(element, &mut out);
    normalize_lines(&out)
}

/// Flatten an HTML snippet to text, breaking lines at block elements.
pub fn flatten_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    flatten_element(&fragment.root_element())
}

/// Whether `tag` starts a new line when flattened.
pub(crate) fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

fn push_flattened(element: &ElementRef<'_>, out: &mut String) {
    let is_block = is_block(element.value().name());
    if is_block {
        out.push('\n');
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&text.replace(['\n', '\r'], " ")),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    push_flattened(&child, out);
                }
            }
            _ => {}
        }
    }
    if is_block {
        out.push('\n');
    }
}

/// Parse the leading `<digits>.` of a section heading.
pub fn section_number(heading: &str) -> Result<u32> {
    let heading = heading.trim();
    let caps = SECTION_NUMBER
        .captures(heading)
        .ok_or_else(|| MidweekError::Format(format!("heading \"{}\" does not start with a section number", heading)))?;
    caps[1]
        .parse()
        .map_err(|_| MidweekError::Format(format!("section number in \"{}\" is out of range", heading)))
}

/// Heading text with its section number prefix removed.
pub fn strip_section_number(heading: &str) -> String {
    SECTION_NUMBER.replace(heading.trim(), "").trim().to_string()
}

/// Parse a `(N min.)` or `(N mins.)` time box anywhere in `line`.
pub fn time_box_minutes(line: &str) -> Result<u32> {
    let caps = TIME_BOX
        .captures(line)
        .ok_or_else(|| MidweekError::Format(format!("no time box found in \"{}\"", collapse_whitespace(line))))?;
    let minutes: u32 = caps[1]
        .parse()
        .map_err(|_| MidweekError::Format(format!("time box in \"{}\" is out of range", line.trim())))?;
    if minutes == 0 {
        return Err(MidweekError::Format(format!("time box in \"{}\" is zero", line.trim())));
    }
    Ok(minutes)
}

/// Remove the first time box from `line`.
pub fn strip_time_box(line: &str) -> String {
    collapse_whitespace(&TIME_BOX.replace(line, ""))
}

/// Remove the first time box from multi-line `text`, keeping its line breaks.
pub fn remove_time_box(text: &str) -> String {
    normalize_lines(&TIME_BOX.replace(text, ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("(7 mins.)", 7)]
    #[case("(10 min.)", 10)]
    #[case("Opening Comments (1 min.)", 1)]
    #[case("(3 min.) Use the sample conversation (th study 1)", 3)]
    #[case("(15\u{a0}min.)", 15)]
    fn test_time_box(#[case] line: &str, #[case] expected: u32) {
        assert_eq!(time_box_minutes(line).unwrap(), expected);
    }

    #[rstest]
    #[case("no minutes here")]
    #[case("(ten min.)")]
    #[case("(5 minutes)")]
    #[case("(0 min.)")]
    fn test_time_box_rejects(#[case] line: &str) {
        assert!(matches!(time_box_minutes(line), Err(MidweekError::Format(_))));
    }

    #[test]
    fn test_section_number() {
        assert_eq!(section_number("  4. Starting a Conversation").unwrap(), 4);
        assert_eq!(section_number("10. Congregation Bible Study").unwrap(), 10);
        assert!(section_number("Spiritual Gems").is_err());
        assert!(section_number("4 Starting").is_err());
    }

    #[test]
    fn test_strip_section_number() {
        assert_eq!(strip_section_number("2. Spiritual Gems"), "Spiritual Gems");
        assert_eq!(strip_section_number("Song 2"), "Song 2");
    }

    #[test]
    fn test_normalize_lines() {
        let text = "  first   line \n\n\n   \nsecond\tline  \n";
        assert_eq!(normalize_lines(text), "first line\nsecond line");
    }

    #[test]
    fn test_flatten_html_breaks_blocks() {
        let html = "<div><p>One <strong>bold</strong> word</p><ul><li>A</li><li>B</li></ul>tail</div>";
        assert_eq!(flatten_html(html), "One bold word\nA\nB\ntail");
    }

    #[test]
    fn test_strip_time_box() {
        assert_eq!(strip_time_box("(5 min.) Play the video."), "Play the video.");
    }

    #[test]
    fn test_remove_time_box_keeps_lines() {
        assert_eq!(remove_time_box("(15 min.)\nFirst line\nSecond line"), "First line\nSecond line");
    }
}
