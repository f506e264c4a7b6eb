use tracing::debug;

use crate::parse::{Fragment, top_level_elements};
use crate::program::{CitedText, ReadingAssignment};
use crate::reference::{Resolver, resolve_chapter_range};
use crate::sections::{Anchor, anchors, heading_and_body, section_heading, time_box};
use crate::{MidweekError, Result};

const CONTEXT: &str = "bible reading";

#[derive(Debug)]
struct ReadingDraft {
    section_number: u32,
    time_box_minutes: u32,
    scriptures: Vec<Anchor>,
    study_point: Anchor,
}

fn draft(fragment: &Fragment) -> Result<ReadingDraft> {
    let html = fragment.parse();
    let tops = top_level_elements(&html);
    let (heading, body) = heading_and_body(&tops, CONTEXT)?;
    let (section_number, _) = section_heading(&heading, CONTEXT)?;
    let time_box_minutes = time_box(&[body], CONTEXT)?;

    // The last anchor of the line is the study point, every other one a scripture.
    let mut scriptures = anchors(&body)?;
    let study_point = scriptures.pop().ok_or_else(|| MidweekError::missing(CONTEXT, "study point anchor"))?;
    if scriptures.is_empty() {
        return Err(MidweekError::missing(CONTEXT, "scripture anchor"));
    }

    Ok(ReadingDraft { section_number, time_box_minutes, scriptures, study_point })
}

/// The bible reading.
///
/// Scripture anchors resolve in order to build the chapter range; the study
/// point resolves alongside them.
pub(crate) async fn extract(fragment: &Fragment, resolver: &Resolver) -> Result<ReadingAssignment> {
    let ReadingDraft { section_number, time_box_minutes, scriptures, study_point } = draft(fragment)?;

    let hrefs: Vec<&str> = scriptures.iter().map(|a| a.href.as_str()).collect();
    let ((resolved, chapters), study) = futures::try_join!(
        resolve_chapter_range(resolver, hrefs.as_slice()),
        resolver.resolve(&study_point.href),
    )?;
    debug!(section_number, chapters = chapters.links.len(), "extracted bible reading");

    let scripture_mnemonic = scriptures.iter().map(|a| a.text.as_str()).collect::<Vec<_>>().join("; ");
    let scripture_text = resolved.into_iter().map(|r| r.normalized_text).collect::<Vec<_>>().join("\n");

    Ok(ReadingAssignment {
        section_number,
        time_box_minutes,
        scripture_mnemonic,
        scripture_text,
        study_point: CitedText { mnemonic: study_point.text, text: study.normalized_text },
        chapters,
    })
}
