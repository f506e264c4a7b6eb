//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! workbook pages and navigating them with CSS selectors and sibling walks,
//! plus [`Fragment`], an owned snapshot of a run of sibling elements.
//!
//! # Example
//!
//! ```rust
//! use midweek_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1 id="p1">WEEK 1</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::{MidweekError, Result};

/// Compiles a CSS selector, mapping failures to [`MidweekError::HtmlParseError`].
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| MidweekError::HtmlParseError(format!("Invalid selector {}: {}", css, e)))
}

/// Represents a parsed workbook page.
///
/// # Example
///
/// ```rust
/// use midweek_core::parse::Document;
///
/// let html = "<html><head><title>Week</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html).unwrap();
/// assert_eq!(doc.title(), Some("Week".to_string()));
/// ```
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html })
    }

    /// Gets the underlying `scraper::Html`.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`MidweekError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use midweek_core::parse::Document;
    ///
    /// let html = r#"<h3 class="dc-icon--music">Song 2</h3><h3>1. Talk</h3>"#;
    /// let doc = Document::parse(html).unwrap();
    /// assert_eq!(doc.select("h3").unwrap().len(), 2);
    /// ```
    pub fn select(&'_ self, css: &str) -> Result<Vec<Element<'_>>> {
        let sel = selector(css)?;
        Ok(self.html.select(&sel).map(Element::new).collect())
    }

    /// Gets the title of the document.
    pub fn title(&self) -> Option<String> {
        let sel = Selector::parse("title").ok()?;
        self.html
            .select(&sel)
            .next()
            .map(|el| crate::text::element_text(&el))
    }
}

/// A wrapper around scraper's ElementRef with sibling navigation.
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.element.id() == other.element.id()
    }
}

impl Eq for Element<'_> {}

impl<'a> Element<'a> {
    pub(crate) fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Gets the outer HTML of this element.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Gets the text content with whitespace collapsed.
    pub fn text(&self) -> String {
        crate::text::element_text(&self.element)
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Whether two elements hang off the same parent node.
    pub fn is_sibling_of(&self, other: &Element<'_>) -> bool {
        match (self.element.parent(), other.element.parent()) {
            (Some(a), Some(b)) => a.id() == b.id(),
            _ => false,
        }
    }

    /// Following sibling elements in document order.
    pub fn next_element_siblings(&self) -> impl Iterator<Item = Element<'a>> + 'a {
        self.element.next_siblings().filter_map(ElementRef::wrap).map(Element::new)
    }

    /// Preceding sibling elements, nearest first.
    pub fn prev_element_siblings(&self) -> impl Iterator<Item = Element<'a>> + 'a {
        self.element.prev_siblings().filter_map(ElementRef::wrap).map(Element::new)
    }

    /// Short description used in error messages, e.g. `<h3 id="p6">`.
    pub fn describe(&self) -> String {
        match self.attr("id") {
            Some(id) => format!("<{} id=\"{}\">", self.tag_name(), id),
            None => format!("<{}>", self.tag_name()),
        }
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`MidweekError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, css: &str) -> Result<Vec<Element<'a>>> {
        let sel = selector(css)?;
        Ok(self.element.select(&sel).map(Element::new).collect())
    }
}

/// An owned run of sibling elements cut out of a page.
///
/// Parsed trees are tied to the thread that built them, so the selection
/// builder snapshots every range into a `Fragment`. Extractors re-parse it
/// with [`Fragment::parse`] inside a synchronous scope and never hold the
/// tree across a network fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    elements: Vec<String>,
}

impl Fragment {
    /// Snapshot the outer HTML of each element.
    pub fn from_elements<'a>(elements: impl IntoIterator<Item = Element<'a>>) -> Self {
        Self { elements: elements.into_iter().map(|el| el.outer_html()).collect() }
    }

    /// Build a fragment from raw HTML snippets, one per top-level element.
    pub fn from_html<S: Into<String>>(elements: impl IntoIterator<Item = S>) -> Self {
        Self { elements: elements.into_iter().map(Into::into).collect() }
    }

    /// Number of top-level elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the fragment holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Split into the first `at` elements and the rest.
    pub fn split_at(&self, at: usize) -> (Fragment, Fragment) {
        let at = at.min(self.elements.len());
        let (head, tail) = self.elements.split_at(at);
        (Fragment { elements: head.to_vec() }, Fragment { elements: tail.to_vec() })
    }

    /// The concatenated HTML.
    pub fn html(&self) -> String {
        self.elements.concat()
    }

    /// Parse the fragment; its elements become children of the root element.
    pub fn parse(&self) -> Html {
        Html::parse_fragment(&self.html())
    }
}

/// Top-level elements of a parsed fragment, in order.
pub(crate) fn top_level_elements(html: &Html) -> Vec<ElementRef<'_>> {
    html.root_element().children().filter_map(ElementRef::wrap).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <title>January 3-9</title>
        </head>
        <body>
            <div class="bodyTxt">
                <h3 id="p3" class="dc-icon--music">Song 2</h3>
                <h3 id="p6">1. Talk</h3>
                <div id="tt7"><p>Body</p></div>
                <h3 id="p8">2. Spiritual Gems</h3>
            </div>
            <a href="/en/wol/dx/r1/lp-e/1102016801/2">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.title(), Some("January 3-9".to_string()));
    }

    #[test]
    fn test_sibling_navigation() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let talk = doc.select("#p6").unwrap()[0];
        let next: Vec<String> = talk.next_element_siblings().map(|e| e.tag_name()).collect();
        assert_eq!(next, vec!["div", "h3"]);
        let prev: Vec<_> = talk.prev_element_siblings().collect();
        assert_eq!(prev.len(), 1);
        assert_eq!(prev[0].attr("id"), Some("p3"));
        assert!(talk.is_sibling_of(&prev[0]));
        assert_eq!(talk.describe(), "<h3 id=\"p6\">");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert!(matches!(doc.select("[[invalid"), Err(MidweekError::HtmlParseError(_))));
    }

    #[test]
    fn test_fragment_round_trip() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let talk = doc.select("#p6").unwrap()[0];
        let fragment = Fragment::from_elements(std::iter::once(talk).chain(talk.next_element_siblings()));
        assert_eq!(fragment.len(), 3);

        let (head, tail) = fragment.split_at(2);
        assert_eq!(head.len(), 2);
        assert_eq!(tail.len(), 1);

        let parsed = fragment.parse();
        let tops: Vec<_> = top_level_elements(&parsed).iter().map(|e| e.value().name().to_string()).collect();
        assert_eq!(tops, vec!["h3", "div", "h3"]);
    }
}
