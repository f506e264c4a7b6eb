use tracing::debug;

use crate::parse::{Fragment, top_level_elements};
use crate::program::StudySection;
use crate::reference::Resolver;
use crate::sections::{anchors_in, content_text, section_heading, time_box};
use crate::text::remove_time_box;
use crate::{MidweekError, Result};

const CONTEXT: &str = "bible study";

/// The congregation bible study; its links become absolute references.
pub(crate) fn extract(fragment: &Fragment, resolver: &Resolver) -> Result<StudySection> {
    let html = fragment.parse();
    let tops = top_level_elements(&html);
    let Some((heading, content)) = tops.split_first() else {
        return Err(MidweekError::missing(CONTEXT, "heading"));
    };
    let (section_number, headline) = section_heading(heading, CONTEXT)?;
    if content.is_empty() {
        return Err(MidweekError::missing(CONTEXT, "body"));
    }

    let time_box_minutes = time_box(content, CONTEXT)?;
    let body = remove_time_box(&content_text(content));
    let references = anchors_in(content)?
        .iter()
        .map(|anchor| resolver.absolute_url(&anchor.href))
        .collect::<Result<Vec<_>>>()?;

    debug!(section_number, references = references.len(), "extracted bible study");
    Ok(StudySection { section_number, time_box_minutes, headline, body, references })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::fetch::StaticFetcher;

    fn resolver() -> Resolver {
        Resolver::new(Arc::new(StaticFetcher::new()), "https://wol.jw.org", "https://wol.jw.org/wol/api/v1").unwrap()
    }

    #[test]
    fn test_extract_study() {
        let fragment = Fragment::from_html([
            "<h3>9. Congregation Bible Study</h3>",
            r#"<div><p class="du-color--textSubdued">(30 min.) <a href="/en/wol/d/r1/lp-e/1102016201">lfb lessons 1-2</a></p>
               <p>Study the <a href="https://wol.jw.org/en/wol/d/r1/lp-e/1102016202">introduction</a>.</p></div>"#,
        ]);
        let study = extract(&fragment, &resolver()).unwrap();
        assert_eq!(study.section_number, 9);
        assert_eq!(study.headline, "Congregation Bible Study");
        assert_eq!(study.time_box_minutes, 30);
        assert_eq!(study.body, "lfb lessons 1-2\nStudy the introduction.");
        assert_eq!(
            study.references,
            vec![
                "https://wol.jw.org/en/wol/d/r1/lp-e/1102016201".to_string(),
                "https://wol.jw.org/en/wol/d/r1/lp-e/1102016202".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_study_requires_body() {
        let fragment = Fragment::from_html(["<h3>9. Congregation Bible Study</h3>"]);
        assert!(extract(&fragment, &resolver()).is_err());
    }
}
