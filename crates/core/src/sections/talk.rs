use tracing::debug;

use crate::parse::{Fragment, top_level_elements};
use crate::program::{Talk, TalkPoint};
use crate::reference::Resolver;
use crate::sections::footnotes::FootnoteWeaver;
use crate::sections::{heading_and_body, list_items, section_heading, time_box};
use crate::{MidweekError, Result};

const CONTEXT: &str = "treasures talk";

struct TalkDraft {
    section_number: u32,
    time_box_minutes: u32,
    heading: String,
    points: Vec<TalkPoint>,
    weaver: FootnoteWeaver,
}

fn draft(fragment: &Fragment) -> Result<TalkDraft> {
    let html = fragment.parse();
    let tops = top_level_elements(&html);
    let (heading, body) = heading_and_body(&tops, CONTEXT)?;
    let (section_number, heading) = section_heading(&heading, CONTEXT)?;
    let time_box_minutes = time_box(&[body], CONTEXT)?;

    let mut weaver = FootnoteWeaver::new();
    let points: Vec<TalkPoint> = list_items(&body)
        .iter()
        .map(|item| weaver.weave(item))
        .filter(|woven| !woven.text.is_empty())
        .map(|woven| TalkPoint { text: woven.text, footnote_ids: woven.footnote_ids })
        .collect();
    if points.is_empty() {
        return Err(MidweekError::missing(CONTEXT, "talk points"));
    }

    Ok(TalkDraft { section_number, time_box_minutes, heading, points, weaver })
}

/// The treasures talk, footnotes resolved concurrently.
pub(crate) async fn extract(fragment: &Fragment, resolver: &Resolver) -> Result<Talk> {
    let TalkDraft { section_number, time_box_minutes, heading, points, weaver } = draft(fragment)?;
    let footnotes = weaver.resolve(resolver).await?;
    debug!(section_number, footnotes = footnotes.len(), "extracted treasures talk");
    Ok(Talk { section_number, time_box_minutes, heading, points, footnotes })
}
