use tracing::debug;

use crate::parse::{Fragment, top_level_elements};
use crate::program::LivingSection;
use crate::sections::{content_text, group_by_heading, section_heading, time_box};
use crate::text::remove_time_box;
use crate::{MidweekError, Result};

const CONTEXT: &str = "christian living";

/// The items between the middle song and the bible study.
pub(crate) fn extract(fragment: &Fragment) -> Result<Vec<LivingSection>> {
    let html = fragment.parse();
    let groups = group_by_heading(top_level_elements(&html));
    if groups.is_empty() {
        return Err(MidweekError::missing(CONTEXT, "section headings"));
    }

    let sections = groups
        .iter()
        .map(|group| {
            let (section_number, headline) = section_heading(&group.heading, CONTEXT)?;
            let time_box_minutes = time_box(&group.content, CONTEXT)?;
            let body = remove_time_box(&content_text(&group.content));
            Ok(LivingSection { section_number, time_box_minutes, headline, body })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(sections = sections.len(), "extracted christian living");
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_living() {
        let fragment = Fragment::from_html([
            "<h3>7. Local Needs</h3>",
            r#"<div><p class="du-color--textSubdued">(15 min.)</p><p>Elders discuss local needs.</p></div>"#,
            "<h3>8. Annual Service Report</h3>",
            r#"<div><p class="du-color--textSubdued">(5 mins.) Talk by an elder.</p></div>"#,
        ]);
        let sections = extract(&fragment).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].section_number, 7);
        assert_eq!(sections[0].headline, "Local Needs");
        assert_eq!(sections[0].body, "Elders discuss local needs.");
        assert_eq!(sections[1].time_box_minutes, 5);
        assert_eq!(sections[1].body, "Talk by an elder.");
    }

    #[test]
    fn test_extract_living_requires_headings() {
        let fragment = Fragment::from_html(["<div><p>loose</p></div>"]);
        assert!(matches!(extract(&fragment), Err(MidweekError::MissingElement { context: CONTEXT, .. })));
    }
}
