use std::collections::BTreeMap;

use futures::future::try_join_all;
use scraper::{ElementRef, Node};

use crate::Result;
use crate::reference::Resolver;
use crate::text::{collapse_whitespace, is_block};

/// Display text with `[n]` markers, plus the ids it cites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WovenText {
    pub text: String,
    pub footnote_ids: Vec<u32>,
}

/// Numbers reference anchors within one extractor's scope.
///
/// Ids start at 1 and increase by one per anchor, across every element woven
/// by the same weaver.
#[derive(Debug)]
pub(crate) struct FootnoteWeaver {
    next_id: u32,
    pending: Vec<(u32, String)>,
}

impl FootnoteWeaver {
    pub fn new() -> Self {
        Self { next_id: 1, pending: Vec::new() }
    }

    /// Text of `element` with a marker spliced in after each anchor's text.
    pub fn weave(&mut self, element: &ElementRef<'_>) -> WovenText {
        let mut text = String::new();
        let mut footnote_ids = Vec::new();
        self.push_woven(element, &mut text, &mut footnote_ids);
        WovenText { text: collapse_whitespace(&text), footnote_ids }
    }

    fn push_woven(&mut self, element: &ElementRef<'_>, text: &mut String, ids: &mut Vec<u32>) {
        for child in element.children() {
            match child.value() {
                Node::Text(t) => text.push_str(t),
                Node::Element(_) => {
                    let Some(child) = ElementRef::wrap(child) else { continue };
                    let href = child.value().attr("href").filter(|_| child.value().name() == "a");
                    match href {
                        Some(href) => {
                            let id = self.next_id;
                            self.next_id += 1;
                            text.push_str(&child.text().collect::<String>());
                            text.push_str(&format!("[{}]", id));
                            ids.push(id);
                            self.pending.push((id, href.trim().to_string()));
                        }
                        None => {
                            let block = is_block(child.value().name());
                            if block {
                                text.push(' ');
                            }
                            self.push_woven(&child, text, ids);
                            if block {
                                text.push(' ');
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Resolve every recorded anchor concurrently into id-keyed footnotes.
    pub async fn resolve(self, resolver: &Resolver) -> Result<BTreeMap<u32, String>> {
        let (ids, hrefs): (Vec<u32>, Vec<String>) = self.pending.into_iter().unzip();
        let resolved = try_join_all(hrefs.iter().map(|href| resolver.resolve(href))).await?;
        Ok(ids.into_iter().zip(resolved.into_iter().map(|r| r.normalized_text)).collect())
    }
}

impl Default for FootnoteWeaver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::top_level_elements;
    use scraper::Html;

    #[test]
    fn test_weave_numbers_across_elements() {
        let html = Html::parse_fragment(
            r#"<li><p>God created (<a href="/en/wol/bc/1">Ge 1:1</a>; <a href="/en/wol/it/2">it-1 527</a>)</p></li>
               <li><p>Light came first (<a href="/en/wol/bc/3">Ge 1:3-5</a>)</p></li>"#,
        );
        let items = top_level_elements(&html);
        let mut weaver = FootnoteWeaver::new();

        let first = weaver.weave(&items[0]);
        let second = weaver.weave(&items[1]);

        assert_eq!(first.text, "God created (Ge 1:1[1]; it-1 527[2])");
        assert_eq!(first.footnote_ids, vec![1, 2]);
        assert_eq!(second.text, "Light came first (Ge 1:3-5[3])");
        assert_eq!(second.footnote_ids, vec![3]);
        assert_eq!(weaver.pending.len(), 3);
        assert_eq!(weaver.pending[2].1, "/en/wol/bc/3");
    }

    #[test]
    fn test_weave_without_anchors() {
        let html = Html::parse_fragment("<li><p>Plain   point</p></li>");
        let mut weaver = FootnoteWeaver::new();
        let woven = weaver.weave(&top_level_elements(&html)[0]);
        assert_eq!(woven.text, "Plain point");
        assert!(woven.footnote_ids.is_empty());
    }
}
