use tracing::debug;

use crate::parse::{Fragment, top_level_elements};
use crate::program::{CitedText, Gems, PrintedQuestion};
use crate::reference::Resolver;
use crate::sections::{Anchor, anchors, heading_and_body, list_items, section_heading, time_box};
use crate::text::{collapse_whitespace, element_text};
use crate::{MidweekError, Result};

const CONTEXT: &str = "spiritual gems";

struct GemsDraft {
    section_number: u32,
    time_box_minutes: u32,
    question: String,
    scripture: Anchor,
    sources: Vec<Anchor>,
    open_ended_question: String,
}

/// The printed question without its leading scripture and trailing sources.
///
/// `"Ge 1:26—Why were humans made in God's image? (it-2 52)"` becomes
/// `"Why were humans made in God's image?"`.
pub(crate) fn printed_question_text(line: &str, scripture_mnemonic: &str) -> String {
    let line = line.trim();
    let rest = line.strip_prefix(scripture_mnemonic).unwrap_or(line);
    let rest = rest.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '—' | '–' | '-' | ':'));
    let rest = rest.trim_end();
    let rest = match rest.rfind('(') {
        Some(open) if rest.ends_with(')') => &rest[..open],
        _ => rest,
    };
    collapse_whitespace(rest)
}

fn draft(fragment: &Fragment) -> Result<GemsDraft> {
    let html = fragment.parse();
    let tops = top_level_elements(&html);
    let (heading, body) = heading_and_body(&tops, CONTEXT)?;
    let (section_number, _) = section_heading(&heading, CONTEXT)?;
    let time_box_minutes = time_box(&[body], CONTEXT)?;

    let items = list_items(&body);
    let [printed, open_ended] = items[..] else {
        return Err(MidweekError::RangeShape { region: "spiritual gems questions", expected: 2, actual: items.len() });
    };

    let mut cited = anchors(&printed)?.into_iter();
    let scripture = cited.next().ok_or_else(|| MidweekError::missing(CONTEXT, "scripture anchor"))?;
    let question = printed_question_text(&element_text(&printed), &scripture.text);
    if question.is_empty() {
        return Err(MidweekError::missing(CONTEXT, "printed question text"));
    }

    let open_ended_question = element_text(&open_ended);
    if open_ended_question.is_empty() {
        return Err(MidweekError::missing(CONTEXT, "open-ended question text"));
    }

    Ok(GemsDraft {
        section_number,
        time_box_minutes,
        question,
        scripture,
        sources: cited.collect(),
        open_ended_question,
    })
}

/// The spiritual gems segment; scripture and answer sources resolve concurrently.
pub(crate) async fn extract(fragment: &Fragment, resolver: &Resolver) -> Result<Gems> {
    let GemsDraft { section_number, time_box_minutes, question, scripture, sources, open_ended_question } =
        draft(fragment)?;

    let hrefs: Vec<&str> = sources.iter().map(|a| a.href.as_str()).collect();
    let (scripture_text, resolved_sources) =
        futures::try_join!(resolver.resolve(&scripture.href), resolver.resolve_all(hrefs.as_slice()))?;
    debug!(section_number, sources = resolved_sources.len(), "extracted spiritual gems");

    let answer_sources = sources
        .into_iter()
        .zip(resolved_sources)
        .map(|(anchor, resolved)| CitedText { mnemonic: anchor.text, text: resolved.normalized_text })
        .collect();

    Ok(Gems {
        section_number,
        time_box_minutes,
        printed_question: PrintedQuestion {
            question,
            scripture_mnemonic: scripture.text,
            scripture_text: scripture_text.normalized_text,
            answer_sources,
        },
        open_ended_question,
    })
}
