//! Section extractors.
//!
//! One module per program segment. Extractors that cite references work in
//! two phases: a synchronous draft parses the segment's [`Fragment`] and
//! copies out everything it needs (numbers, text, anchor hrefs), then the
//! async phase resolves the anchors. No parsed tree lives across a fetch.
//!
//! The helpers below are the primitives every extractor shares.
//!
//! [`Fragment`]: crate::parse::Fragment

pub(crate) mod footnotes;
pub(crate) mod gems;
pub(crate) mod living;
pub(crate) mod ministry;
pub(crate) mod reading;
pub(crate) mod songs;
pub(crate) mod study;
pub(crate) mod talk;
pub(crate) mod week;

use scraper::ElementRef;

use crate::parse::selector;
use crate::text::{element_text, flatten_element, normalize_lines, section_number, strip_section_number, time_box_minutes};
use crate::{MidweekError, Result};

const SUBDUED: &str = ".du-color--textSubdued";

/// An anchor copied out of a parsed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub text: String,
    pub href: String,
}

/// Every `a[href]` under `element`, in document order.
pub(crate) fn anchors(element: &ElementRef<'_>) -> Result<Vec<Anchor>> {
    let sel = selector("a[href]")?;
    Ok(element
        .select(&sel)
        .filter_map(|a| {
            a.value()
                .attr("href")
                .map(|href| Anchor { text: element_text(&a), href: href.trim().to_string() })
        })
        .collect())
}

/// Anchors across several sibling elements.
pub(crate) fn anchors_in(elements: &[ElementRef<'_>]) -> Result<Vec<Anchor>> {
    let mut all = Vec::new();
    for element in elements {
        all.extend(anchors(element)?);
    }
    Ok(all)
}

/// Time box read from the first subdued-text line among `elements`.
pub(crate) fn time_box(elements: &[ElementRef<'_>], context: &'static str) -> Result<u32> {
    let sel = selector(SUBDUED)?;
    let line = elements
        .iter()
        .find_map(|el| el.select(&sel).next())
        .ok_or_else(|| MidweekError::missing(context, "time box line"))?;
    time_box_minutes(&element_text(&line))
}

/// Section number and headline of an `h3` section heading.
pub(crate) fn section_heading(heading: &ElementRef<'_>, context: &'static str) -> Result<(u32, String)> {
    if heading.value().name() != "h3" {
        return Err(MidweekError::missing(context, format!("h3 heading, found <{}>", heading.value().name())));
    }
    let text = element_text(heading);
    Ok((section_number(&text)?, strip_section_number(&text)))
}

/// The heading and single body element of a two-element segment.
pub(crate) fn heading_and_body<'a>(
    elements: &[ElementRef<'a>],
    region: &'static str,
) -> Result<(ElementRef<'a>, ElementRef<'a>)> {
    match elements {
        [heading, body] => Ok((*heading, *body)),
        _ => Err(MidweekError::RangeShape { region, expected: 2, actual: elements.len() }),
    }
}

/// A heading and the elements that follow it up to the next heading.
#[derive(Debug)]
pub(crate) struct HeadingGroup<'a> {
    pub heading: ElementRef<'a>,
    pub content: Vec<ElementRef<'a>>,
}

/// Rebuild heading + body pairs from a flat sibling list.
///
/// Each `h3` opens a new group. Elements before the first heading belong to
/// no group and are dropped.
pub(crate) fn group_by_heading<'a>(elements: impl IntoIterator<Item = ElementRef<'a>>) -> Vec<HeadingGroup<'a>> {
    let mut groups: Vec<HeadingGroup<'a>> = Vec::new();
    for element in elements {
        if element.value().name() == "h3" {
            groups.push(HeadingGroup { heading: element, content: Vec::new() });
        } else if let Some(group) = groups.last_mut() {
            group.content.push(element);
        }
    }
    groups
}

/// Items of the lists directly inside `body`.
///
/// Only `ul > li` and `ol > li` children count; items of nested lists stay
/// part of the item that contains them.
pub(crate) fn list_items<'a>(body: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    body.children()
        .filter_map(ElementRef::wrap)
        .filter(|list| matches!(list.value().name(), "ul" | "ol"))
        .flat_map(|list| list.children().filter_map(ElementRef::wrap))
        .filter(|item| item.value().name() == "li")
        .collect()
}

/// Flattened text of several elements, one line per block.
pub(crate) fn content_text(elements: &[ElementRef<'_>]) -> String {
    let text: Vec<String> = elements.iter().map(flatten_element).collect();
    normalize_lines(&text.join("\n"))
}

/// Collapsed single-line text of several elements.
pub(crate) fn inline_text(elements: &[ElementRef<'_>]) -> String {
    let text: Vec<String> = elements.iter().map(element_text).collect();
    crate::text::collapse_whitespace(&text.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::top_level_elements;
    use scraper::Html;

    const FLAT: &str = r#"<h3>4. Starting a Conversation</h3>
        <div><p class="du-color--textSubdued">(3 min.) <a href="/en/wol/a">th study 1</a></p></div>
        <h3>5. Following Up</h3>
        <div><p>Intro</p></div><div><p class="du-color--textSubdued">(4 mins.)</p></div>"#;

    #[test]
    fn test_group_by_heading() {
        let html = Html::parse_fragment(FLAT);
        let tops = top_level_elements(&html);
        let groups = group_by_heading(tops.iter().copied());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].content.len(), 1);
        assert_eq!(groups[1].content.len(), 2);
        assert_eq!(section_heading(&groups[1].heading, "test").unwrap(), (5, "Following Up".to_string()));
        assert_eq!(time_box(&groups[1].content, "test").unwrap(), 4);
    }

    #[test]
    fn test_group_by_heading_drops_leading_content() {
        let html = Html::parse_fragment("<p>stray</p><h3>1. Talk</h3><div>body</div>");
        let groups = group_by_heading(top_level_elements(&html));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].content.len(), 1);
    }

    #[test]
    fn test_time_box_requires_subdued_line() {
        let html = Html::parse_fragment("<div><p>(3 min.)</p></div>");
        let err = time_box(&top_level_elements(&html), "field ministry").unwrap_err();
        assert!(matches!(err, MidweekError::MissingElement { context: "field ministry", .. }));
    }

    #[test]
    fn test_anchors() {
        let html = Html::parse_fragment(FLAT);
        let tops = top_level_elements(&html);
        let found = anchors_in(&tops).unwrap();
        assert_eq!(found, vec![Anchor { text: "th study 1".to_string(), href: "/en/wol/a".to_string() }]);
    }

    #[test]
    fn test_list_items_direct_children_only() {
        let html = Html::parse_fragment(
            "<div><p>(10 min.)</p><ul><li>One<ul><li>One.a</li></ul></li><li>Two</li></ul><ol><li>Three</li></ol></div>",
        );
        let items = list_items(&top_level_elements(&html)[0]);
        let text: Vec<String> = items.iter().map(element_text).collect();
        assert_eq!(text.len(), 3);
        assert!(text[0].starts_with("One"));
        assert_eq!(text[1], "Two");
        assert_eq!(text[2], "Three");
    }

    #[test]
    fn test_heading_and_body_shape() {
        let html = Html::parse_fragment("<h3>2. Spiritual Gems</h3>");
        let err = heading_and_body(&top_level_elements(&html), "spiritual gems").unwrap_err();
        assert!(err.to_string().contains("expected 2, got 1"));
    }

    #[test]
    fn test_section_heading_requires_h3() {
        let html = Html::parse_fragment("<p>3. Bible Reading</p>");
        assert!(section_heading(&top_level_elements(&html)[0], "bible reading").is_err());
    }
}
