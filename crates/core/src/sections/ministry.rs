use std::sync::LazyLock;

use futures::future::try_join_all;
use regex::Regex;
use tracing::debug;

use crate::parse::{Fragment, top_level_elements};
use crate::program::{Assignment, CitedText};
use crate::reference::Resolver;
use crate::sections::{Anchor, anchors_in, group_by_heading, inline_text, section_heading, time_box};
use crate::text::{collapse_whitespace, strip_time_box};
use crate::{MidweekError, Result};

const CONTEXT: &str = "field ministry";

/// A time box and a study-point group in sequence; the body sits between them.
static STUDENT_TASK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\d+\s*mins?\.\)\s*(?P<body>[^()]*?)\s*\([^()]+\)").expect("student task pattern")
});

/// Body of a student task, or `None` when `text` is not one.
///
/// `"(3 min.) Do thing (lesson 5)"` gives `Some("Do thing")`.
pub(crate) fn student_task_body(text: &str) -> Option<String> {
    STUDENT_TASK.captures(text).map(|caps| collapse_whitespace(&caps["body"]))
}

#[derive(Debug)]
struct AssignmentDraft {
    section_number: u32,
    time_box_minutes: u32,
    headline: String,
    body: String,
    study_point: Option<Anchor>,
}

fn drafts(fragment: &Fragment) -> Result<Vec<AssignmentDraft>> {
    let html = fragment.parse();
    let groups = group_by_heading(top_level_elements(&html));
    if groups.is_empty() {
        return Err(MidweekError::missing(CONTEXT, "assignment headings"));
    }

    groups
        .iter()
        .map(|group| {
            let (section_number, headline) = section_heading(&group.heading, CONTEXT)?;
            if group.content.is_empty() {
                return Err(MidweekError::missing(CONTEXT, format!("body of \"{}\"", headline)));
            }
            let time_box_minutes = time_box(&group.content, CONTEXT)?;
            let text = inline_text(&group.content);

            let (body, study_point) = match student_task_body(&text) {
                Some(body) => {
                    let study_point = anchors_in(&group.content)?
                        .pop()
                        .ok_or_else(|| MidweekError::missing(CONTEXT, format!("study point anchor of \"{}\"", headline)))?;
                    (body, Some(study_point))
                }
                None => (strip_time_box(&text), None),
            };

            Ok(AssignmentDraft { section_number, time_box_minutes, headline, body, study_point })
        })
        .collect()
}

/// The field ministry assignments; study points resolve concurrently.
pub(crate) async fn extract(fragment: &Fragment, resolver: &Resolver) -> Result<Vec<Assignment>> {
    let drafts = drafts(fragment)?;

    let assignments = try_join_all(drafts.into_iter().map(|draft| async move {
        let study_point = match draft.study_point {
            Some(anchor) => {
                let resolved = resolver.resolve(&anchor.href).await?;
                Some(CitedText { mnemonic: anchor.text, text: resolved.normalized_text })
            }
            None => None,
        };
        Ok::<_, MidweekError>(Assignment {
            section_number: draft.section_number,
            time_box_minutes: draft.time_box_minutes,
            is_student_task: study_point.is_some(),
            headline: draft.headline,
            body: draft.body,
            study_point,
        })
    }))
    .await?;

    debug!(assignments = assignments.len(), "extracted field ministry");
    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("(3 min.) Do thing (lesson 5)", Some("Do thing"))]
    #[case("(4 mins.) Start a conversation using the sample.  (th study 3)", Some("Start a conversation using the sample."))]
    #[case("(5 min.) Play the video.", None)]
    #[case("Discuss the video. (th study 1)", None)]
    fn test_student_task_body(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(student_task_body(text).as_deref(), expected);
    }

    const SECTION: &str = r#"<h3>4. Starting a Conversation</h3>
        <div><p class="du-color--textSubdued">(3 min.) Use the sample conversation. (<a href="/en/wol/th1">th study 1</a>)</p></div>
        <h3>5. Making Disciples</h3>
        <div><p class="du-color--textSubdued">(5 min.) Discussion. Play the video.</p></div>"#;

    #[test]
    fn test_drafts() {
        let drafts = drafts(&Fragment::from_html([SECTION])).unwrap();
        assert_eq!(drafts.len(), 2);

        assert_eq!(drafts[0].section_number, 4);
        assert_eq!(drafts[0].headline, "Starting a Conversation");
        assert_eq!(drafts[0].body, "Use the sample conversation.");
        assert_eq!(drafts[0].study_point.as_ref().map(|a| a.href.as_str()), Some("/en/wol/th1"));

        assert_eq!(drafts[1].time_box_minutes, 5);
        assert_eq!(drafts[1].body, "Discussion. Play the video.");
        assert!(drafts[1].study_point.is_none());
    }

    #[test]
    fn test_student_task_needs_anchor() {
        let section = r#"<h3>4. Starting</h3><div><p class="du-color--textSubdued">(3 min.) Talk. (th study 1)</p></div>"#;
        let err = drafts(&Fragment::from_html([section])).unwrap_err();
        assert!(matches!(err, MidweekError::MissingElement { context: CONTEXT, .. }));
    }
}
