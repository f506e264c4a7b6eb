use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use tracing::debug;

use crate::landmarks::SelectionGroups;
use crate::parse::{Fragment, selector, top_level_elements};
use crate::program::{SongReference, Songs};
use crate::reference::Resolver;
use crate::sections::anchors;
use crate::text::{element_text, flatten_element};
use crate::{MidweekError, Result};

static SONG_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("song number pattern"));

/// Href of the song page cited by a song heading: its last anchor.
fn song_href(fragment: &Fragment, context: &'static str) -> Result<String> {
    let html = fragment.parse();
    let heading = top_level_elements(&html)
        .into_iter()
        .next()
        .ok_or_else(|| MidweekError::missing(context, "song heading"))?;
    anchors(&heading)?
        .pop()
        .map(|anchor| anchor.href)
        .ok_or_else(|| MidweekError::missing(context, "song link"))
}

/// Read a song record out of a song page's raw content.
pub(crate) fn parse_song(content: &str) -> Result<SongReference> {
    let html = Html::parse_fragment(content);
    let text_of = |css: &str, what: &'static str| -> Result<String> {
        let sel = selector(css)?;
        html.select(&sel)
            .next()
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
            .ok_or_else(|| MidweekError::missing("song page", what))
    };

    let number_line = text_of("h1", "song number heading")?;
    let song_number: u32 = SONG_NUMBER
        .find(&number_line)
        .and_then(|m| m.as_str().parse().ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| MidweekError::Format(format!("no song number in \"{}\"", number_line)))?;

    let lyrics_sel = selector(".bodyTxt")?;
    let lyrics = html
        .select(&lyrics_sel)
        .next()
        .map(|el| flatten_element(&el))
        .filter(|text| !text.is_empty())
        .ok_or_else(|| MidweekError::missing("song page", "lyrics"))?;

    Ok(SongReference {
        song_number,
        title: text_of("h2", "song title")?,
        theme_scripture: text_of("p.themeScrp", "theme scripture")?,
        lyrics,
        closing_reference: text_of("p.closingRef", "closing reference")?,
    })
}

async fn resolve_song(href: &str, resolver: &Resolver) -> Result<SongReference> {
    let item = resolver.fetch_item(href).await?;
    let song = parse_song(&item.content)?;
    debug!(song = song.song_number, "resolved song");
    Ok(song)
}

/// One song from its heading fragment.
pub(crate) async fn extract_song(fragment: &Fragment, context: &'static str, resolver: &Resolver) -> Result<SongReference> {
    let href = song_href(fragment, context)?;
    resolve_song(&href, resolver).await
}

/// The three songs, fetched concurrently.
pub(crate) async fn extract(groups: &SelectionGroups, resolver: &Resolver) -> Result<Songs> {
    let (starting_song, middle_song, closing_song) = futures::try_join!(
        extract_song(&groups.starting_song, "starting song", resolver),
        extract_song(&groups.middle_song, "middle song", resolver),
        extract_song(&groups.closing_song, "closing song", resolver),
    )?;
    Ok(Songs { starting_song, middle_song, closing_song })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SONG_PAGE: &str = r#"<header><h1>Song 2</h1><h2>Jehovah Is Your Name</h2>
        <p class="themeScrp">(Psalm 83:18)</p></header>
        <div class="bodyTxt"><p>1. O Jehovah, our God,<br>You are the Most High.</p>
        <p>(CHORUS)<br>Jehovah is your name.</p></div>
        <p class="closingRef">(See also Ex. 6:3.)</p>"#;

    #[test]
    fn test_parse_song() {
        let song = parse_song(SONG_PAGE).unwrap();
        assert_eq!(song.song_number, 2);
        assert_eq!(song.title, "Jehovah Is Your Name");
        assert_eq!(song.theme_scripture, "(Psalm 83:18)");
        assert_eq!(song.lyrics, "1. O Jehovah, our God,\nYou are the Most High.\n(CHORUS)\nJehovah is your name.");
        assert_eq!(song.closing_reference, "(See also Ex. 6:3.)");
    }

    #[test]
    fn test_parse_song_requires_number() {
        let page = SONG_PAGE.replace("<h1>Song 2</h1>", "<h1>Song</h1>");
        assert!(matches!(parse_song(&page), Err(MidweekError::Format(_))));
    }

    #[test]
    fn test_parse_song_requires_parts() {
        let page = SONG_PAGE.replace(r#"<p class="closingRef">(See also Ex. 6:3.)</p>"#, "");
        assert!(matches!(parse_song(&page), Err(MidweekError::MissingElement { context: "song page", .. })));
    }

    #[test]
    fn test_song_href_takes_last_anchor() {
        let heading = Fragment::from_html([
            r#"<h3 class="dc-icon--music"><a href="/en/wol/dx/r1/lp-e/1">Song 2</a> and Prayer <a href="/en/wol/dx/r1/lp-e/2">|</a></h3>"#,
        ]);
        assert_eq!(song_href(&heading, "starting song").unwrap(), "/en/wol/dx/r1/lp-e/2");

        let bare = Fragment::from_html([r#"<h3 class="dc-icon--music">Song 2</h3>"#]);
        assert!(song_href(&bare, "starting song").is_err());
    }
}
