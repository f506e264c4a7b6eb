use crate::parse::{Fragment, selector};
use crate::text::element_text;
use crate::{MidweekError, Result};

fn header_line(fragment: &Fragment, id: &'static str, what: &'static str) -> Result<String> {
    let html = fragment.parse();
    let sel = selector(id)?;
    html.select(&sel)
        .next()
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
        .ok_or_else(|| MidweekError::missing("introduction", what))
}

/// The week label from `#p1`, lower-cased.
pub(crate) fn week_date_span(introduction: &Fragment) -> Result<String> {
    Ok(header_line(introduction, "#p1", "week date span (#p1)")?.to_lowercase())
}

/// The week's Bible chapters from `#p2`, as printed.
pub(crate) fn weekly_bible_chapters(introduction: &Fragment) -> Result<String> {
    header_line(introduction, "#p2", "weekly Bible chapters (#p2)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_date_span_lower_cased() {
        let intro = Fragment::from_html([
            r#"<header><h1 id="p1">WEEK 1: 2022-01-01 -   2022-01-07</h1><h2 id="p2"><a href="/x">GENESIS 1-2</a></h2></header>"#,
        ]);
        assert_eq!(week_date_span(&intro).unwrap(), "week 1: 2022-01-01 - 2022-01-07");
        assert_eq!(weekly_bible_chapters(&intro).unwrap(), "GENESIS 1-2");
    }

    #[test]
    fn test_missing_week_line() {
        let intro = Fragment::from_html(["<header><h2 id=\"p2\">GENESIS 1-2</h2></header>"]);
        let err = week_date_span(&intro).unwrap_err();
        assert!(matches!(err, MidweekError::MissingElement { context: "introduction", .. }));
    }
}
