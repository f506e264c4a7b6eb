//! Landmark location and selection grouping.
//!
//! A workbook page is a flat run of sibling elements. A fixed table of
//! markers finds seven landmark elements in it (the three songs, the
//! treasures talk, the two section headlines and the introduction header);
//! the ranges between landmarks are then cut into named [`Fragment`]s, one per
//! program segment. Every count and shape is checked: the extractors assume
//! exact shapes, so a template change must fail here with a clear message.
//!
//! # Example
//!
//! ```rust
//! use midweek_core::{Document, SelectionGroups};
//!
//! # fn run(html: &str) -> midweek_core::Result<()> {
//! let doc = Document::parse(html)?;
//! let groups = SelectionGroups::build(&doc)?;
//! assert_eq!(groups.spiritual_gems.len(), 2);
//! # Ok(())
//! # }
//! ```

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::parse::{Document, Element, Fragment};
use crate::{MidweekError, Result};

/// A structural role located by one marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Landmark {
    Introduction,
    StartingSong,
    TreasuresTalk,
    FieldMinistry,
    ChristianLiving,
    MiddleSong,
    ClosingSong,
}

impl Landmark {
    /// Every landmark, in document order.
    pub const ALL: [Landmark; 7] = [
        Landmark::Introduction,
        Landmark::StartingSong,
        Landmark::TreasuresTalk,
        Landmark::FieldMinistry,
        Landmark::ChristianLiving,
        Landmark::MiddleSong,
        Landmark::ClosingSong,
    ];

    /// The marker row for this landmark.
    pub fn marker(self) -> &'static Marker {
        // ALL and MARKERS share an order.
        &MARKERS[self as usize]
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Landmark::Introduction => "introduction",
            Landmark::StartingSong => "starting song",
            Landmark::TreasuresTalk => "treasures talk",
            Landmark::FieldMinistry => "field ministry headline",
            Landmark::ChristianLiving => "christian living headline",
            Landmark::MiddleSong => "middle song",
            Landmark::ClosingSong => "closing song",
        };
        f.write_str(name)
    }
}

/// How a landmark is recognised: a CSS selector and the tag it must land on.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    pub landmark: Landmark,
    pub selector: &'static str,
    pub tag: &'static str,
}

/// Structural markers of the page template.
pub const MARKERS: [Marker; 7] = [
    Marker { landmark: Landmark::Introduction, selector: "article > header", tag: "header" },
    Marker { landmark: Landmark::StartingSong, selector: ".bodyTxt > .dc-icon--music:first-child", tag: "h3" },
    Marker { landmark: Landmark::TreasuresTalk, selector: ".bodyTxt > .du-color--teal-700 + * + *", tag: "div" },
    Marker { landmark: Landmark::FieldMinistry, selector: ".bodyTxt > .du-color--gold-700", tag: "h2" },
    Marker { landmark: Landmark::ChristianLiving, selector: ".bodyTxt > .du-color--maroon-600", tag: "h2" },
    Marker {
        landmark: Landmark::MiddleSong,
        selector: ".bodyTxt > .du-color--maroon-600 + .dc-icon--music",
        tag: "h3",
    },
    Marker { landmark: Landmark::ClosingSong, selector: ".bodyTxt > .dc-icon--music:last-child", tag: "h3" },
];

/// Elements in the four-element span after the treasures talk.
const TREASURES_SPAN_LEN: usize = 4;

/// Tree-selection capability the selection builder is written against.
pub trait TreeSelection {
    /// Locate the single element playing `landmark`, checking its tag.
    fn find_one(&self, landmark: Landmark) -> Result<Element<'_>>;

    /// Sibling elements strictly after `from` and strictly before `to`.
    fn range_between<'a>(&'a self, from: Element<'a>, to: Element<'a>) -> Result<Vec<Element<'a>>>;
}

impl TreeSelection for Document {
    fn find_one(&self, landmark: Landmark) -> Result<Element<'_>> {
        let marker = landmark.marker();
        let found = self.select(marker.selector)?;
        if found.len() != 1 {
            return Err(MidweekError::LandmarkCount { landmark, found: found.len() });
        }
        let element = found[0];
        let tag = element.tag_name();
        if tag != marker.tag {
            return Err(MidweekError::LandmarkMismatch { landmark, expected: marker.tag, actual: tag });
        }
        Ok(element)
    }

    fn range_between<'a>(&'a self, from: Element<'a>, to: Element<'a>) -> Result<Vec<Element<'a>>> {
        if !from.is_sibling_of(&to) {
            return Err(MidweekError::RangeOrder {
                from: from.describe(),
                to: to.describe(),
                reason: "elements are not siblings".to_string(),
            });
        }
        let mut range = Vec::new();
        for element in from.next_element_siblings() {
            if element == to {
                return Ok(range);
            }
            range.push(element);
        }
        Err(MidweekError::RangeOrder {
            from: from.describe(),
            to: to.describe(),
            reason: "end does not follow start".to_string(),
        })
    }
}

/// Named sub-trees of one workbook page.
///
/// Built once per page by [`SelectionGroups::build`]; every extractor takes
/// the fragment it needs from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionGroups {
    /// The page header holding the week date span and chapters.
    pub introduction: Fragment,
    pub starting_song: Fragment,
    pub middle_song: Fragment,
    pub closing_song: Fragment,
    /// Talk heading and talk body.
    pub treasures_talk: Fragment,
    /// Gems heading and gems body.
    pub spiritual_gems: Fragment,
    /// Reading heading and reading body.
    pub bible_reading: Fragment,
    /// Flat heading/body pairs of the field ministry section.
    pub field_ministry: Fragment,
    /// Flat heading/body pairs between the middle song and the bible study.
    pub christian_living: Fragment,
    /// Bible study heading and body.
    pub bible_study: Fragment,
}

impl SelectionGroups {
    /// Locate every landmark in `doc` and cut the content ranges.
    ///
    /// # Errors
    ///
    /// Structural errors when a landmark is missing, repeated or of the wrong
    /// kind, when landmarks are out of order, or when a range has the wrong
    /// number of elements.
    pub fn build(doc: &Document) -> Result<Self> {
        Self::build_from(doc)
    }

    /// Build against any [`TreeSelection`] implementation.
    pub fn build_from<T: TreeSelection>(tree: &T) -> Result<Self> {
        let introduction = tree.find_one(Landmark::Introduction)?;
        let starting_song = tree.find_one(Landmark::StartingSong)?;
        let treasures_talk = tree.find_one(Landmark::TreasuresTalk)?;
        let field_ministry = tree.find_one(Landmark::FieldMinistry)?;
        let christian_living = tree.find_one(Landmark::ChristianLiving)?;
        let middle_song = tree.find_one(Landmark::MiddleSong)?;
        let closing_song = tree.find_one(Landmark::ClosingSong)?;

        let talk_heading = treasures_talk
            .prev_element_siblings()
            .next()
            .filter(|el| el.tag_name() == "h3")
            .ok_or_else(|| MidweekError::missing("treasures talk", "h3 heading before the talk body"))?;

        let span = tree.range_between(treasures_talk, field_ministry)?;
        if span.len() != TREASURES_SPAN_LEN {
            return Err(MidweekError::RangeShape {
                region: "treasures span",
                expected: TREASURES_SPAN_LEN,
                actual: span.len(),
            });
        }
        let (gems, reading) = span.split_at(TREASURES_SPAN_LEN / 2);

        let ministry = tree.range_between(field_ministry, christian_living)?;
        if christian_living.next_element_siblings().next() != Some(middle_song) {
            return Err(MidweekError::RangeOrder {
                from: Landmark::ChristianLiving.to_string(),
                to: Landmark::MiddleSong.to_string(),
                reason: "middle song does not open the christian living section".to_string(),
            });
        }

        let study = bible_study_range(closing_song)?;
        let study_heading = study[0];
        let living = tree.range_between(middle_song, study_heading)?;

        debug!(
            ministry = ministry.len(),
            living = living.len(),
            study = study.len(),
            "located program landmarks"
        );

        Ok(Self {
            introduction: Fragment::from_elements([introduction]),
            starting_song: Fragment::from_elements([starting_song]),
            middle_song: Fragment::from_elements([middle_song]),
            closing_song: Fragment::from_elements([closing_song]),
            treasures_talk: Fragment::from_elements([talk_heading, treasures_talk]),
            spiritual_gems: Fragment::from_elements(gems.iter().copied()),
            bible_reading: Fragment::from_elements(reading.iter().copied()),
            field_ministry: Fragment::from_elements(ministry),
            christian_living: Fragment::from_elements(living),
            bible_study: Fragment::from_elements(study),
        })
    }
}

/// The closing song's preceding siblings back to the nearest `h3`, inclusive,
/// in document order.
fn bible_study_range(closing_song: Element<'_>) -> Result<Vec<Element<'_>>> {
    let mut range = Vec::new();
    for element in closing_song.prev_element_siblings() {
        let is_heading = element.tag_name() == "h3";
        range.push(element);
        if is_heading {
            range.reverse();
            return Ok(range);
        }
    }
    Err(MidweekError::missing("bible study", "h3 heading before the closing song"))
}

/// One row of a landmark check.
#[derive(Debug, Clone, Serialize)]
pub struct LandmarkStatus {
    pub landmark: Landmark,
    pub selector: &'static str,
    /// Description of the located element, when found.
    pub element: Option<String>,
    /// Why the landmark failed, when it did.
    pub error: Option<String>,
}

/// Result of checking a page against the template without any network.
#[derive(Debug, Clone, Serialize)]
pub struct LandmarkReport {
    pub landmarks: Vec<LandmarkStatus>,
    /// Error from building the selection groups, if any landmark or range failed.
    pub error: Option<String>,
}

impl LandmarkReport {
    /// Whether the page matches the template.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Check every landmark and range in `doc` and report each outcome.
pub fn validate_landmarks(doc: &Document) -> LandmarkReport {
    let landmarks = Landmark::ALL
        .iter()
        .map(|&landmark| match doc.find_one(landmark) {
            Ok(element) => LandmarkStatus {
                landmark,
                selector: landmark.marker().selector,
                element: Some(element.describe()),
                error: None,
            },
            Err(e) => LandmarkStatus {
                landmark,
                selector: landmark.marker().selector,
                element: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    let error = SelectionGroups::build(doc).err().map(|e| e.to_string());
    LandmarkReport { landmarks, error }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> String {
        format!(
            r#"<html><body><article id="article">
                <header><h1 id="p1">WEEK 1</h1><h2 id="p2">GENESIS 1-2</h2></header>
                <div class="bodyTxt">{}</div>
            </article></body></html>"#,
            body
        )
    }

    const OPENING: &str = r#"<h3 class="dc-icon--music">Song 2</h3><div class="dc-icon--comment"><p>Opening Comments (1 min.)</p></div>
        <h2 class="du-color--teal-700">TREASURES</h2><h3>1. Talk</h3><div id="tt7"><p>(10 min.)</p></div>"#;

    const CLOSING: &str = r#"<h2 class="du-color--gold-700">FIELD MINISTRY</h2>
        <h3>4. Starting</h3><div><p>(3 min.)</p></div>
        <h2 class="du-color--maroon-600">LIVING</h2>
        <h3 class="dc-icon--music">Song 134</h3>
        <h3>5. Local Needs</h3><div><p>(15 min.)</p></div>
        <h3>6. Congregation Bible Study</h3><div><p>(30 min.)</p></div>
        <h3 class="dc-icon--music">Song 28 and Prayer</h3>"#;

    const SPAN: &str = r#"<h3>2. Spiritual Gems</h3><div><p>(10 min.)</p></div>
        <h3>3. Bible Reading</h3><div><p>(4 min.)</p></div>"#;

    fn full_page() -> String {
        page(&format!("{}{}{}", OPENING, SPAN, CLOSING))
    }

    #[test]
    fn test_build_groups() {
        let doc = Document::parse(&full_page()).unwrap();
        let groups = SelectionGroups::build(&doc).unwrap();

        assert_eq!(groups.treasures_talk.len(), 2);
        assert_eq!(groups.spiritual_gems.len(), 2);
        assert_eq!(groups.bible_reading.len(), 2);
        assert_eq!(groups.field_ministry.len(), 2);
        assert_eq!(groups.christian_living.len(), 2);
        assert_eq!(groups.bible_study.len(), 2);
        assert!(groups.bible_study.html().contains("Congregation Bible Study"));
        assert!(groups.closing_song.html().contains("Song 28"));
        assert!(groups.middle_song.html().contains("Song 134"));
        assert!(groups.introduction.html().contains("WEEK 1"));
    }

    #[test]
    fn test_short_span_fails() {
        let short_span = r#"<h3>2. Spiritual Gems</h3><div><p>(10 min.)</p></div><h3>3. Bible Reading</h3>"#;
        let doc = Document::parse(&page(&format!("{}{}{}", OPENING, short_span, CLOSING))).unwrap();
        let err = SelectionGroups::build(&doc).unwrap_err();
        assert!(err.to_string().contains("expected 4, got 3"), "{}", err);
        assert_eq!(err.kind(), crate::ErrorKind::Structural);
    }

    #[test]
    fn test_missing_landmark_count() {
        let doc = Document::parse(&page(&format!("{}{}", OPENING, SPAN))).unwrap();
        let err = SelectionGroups::build(&doc).unwrap_err();
        assert!(matches!(err, MidweekError::LandmarkCount { landmark: Landmark::FieldMinistry, found: 0 }));
    }

    #[test]
    fn test_duplicate_landmark_count() {
        let headline = r#"<h2 class="du-color--gold-700">FIELD MINISTRY</h2>"#;
        let body = full_page().replace(headline, &format!("{}{}", headline, headline));
        let doc = Document::parse(&body).unwrap();

        assert!(matches!(
            doc.find_one(Landmark::FieldMinistry),
            Err(MidweekError::LandmarkCount { landmark: Landmark::FieldMinistry, found: 2 })
        ));
        let err = SelectionGroups::build(&doc).unwrap_err();
        assert!(matches!(err, MidweekError::LandmarkCount { landmark: Landmark::FieldMinistry, found: 2 }), "{}", err);
    }

    #[test]
    fn test_landmark_tag_mismatch() {
        let body = full_page().replace(
            r#"<h3 class="dc-icon--music">Song 28 and Prayer</h3>"#,
            r#"<p class="dc-icon--music">Song 28 and Prayer</p>"#,
        );
        let doc = Document::parse(&body).unwrap();
        let err = doc.find_one(Landmark::ClosingSong).unwrap_err();
        assert!(matches!(
            err,
            MidweekError::LandmarkMismatch { landmark: Landmark::ClosingSong, expected: "h3", .. }
        ));
    }

    #[test]
    fn test_range_between_requires_order() {
        let doc = Document::parse(&full_page()).unwrap();
        let ministry = doc.find_one(Landmark::FieldMinistry).unwrap();
        let talk = doc.find_one(Landmark::TreasuresTalk).unwrap();
        assert!(matches!(doc.range_between(ministry, talk), Err(MidweekError::RangeOrder { .. })));
        assert_eq!(doc.range_between(talk, ministry).unwrap().len(), 4);
    }

    #[test]
    fn test_validate_landmarks_report() {
        let doc = Document::parse(&full_page()).unwrap();
        let report = validate_landmarks(&doc);
        assert!(report.is_valid());
        assert_eq!(report.landmarks.len(), 7);
        assert!(report.landmarks.iter().all(|s| s.element.is_some()));

        let doc = Document::parse(&page(OPENING)).unwrap();
        let report = validate_landmarks(&doc);
        assert!(!report.is_valid());
        assert!(report.landmarks.iter().any(|s| s.error.is_some()));
    }

    #[test]
    fn test_marker_table_matches_landmarks() {
        for landmark in Landmark::ALL {
            assert_eq!(landmark.marker().landmark, landmark);
        }
    }
}
