use tracing::debug;
use url::Url;

use crate::program::ChapterRange;
use crate::reference::{PublicationKind, ResolvedReference, Resolver};
use crate::{MidweekError, Result};

/// Resolve the scripture anchors of a reading and rebuild its chapter links.
///
/// Anchors are resolved one after another: the first fixes the book and the
/// initial bounds, each later one can only widen them. Every anchor must
/// resolve to a scripture range that carries chapter bounds.
///
/// Returns the resolved references in anchor order together with the range.
pub async fn resolve_chapter_range<S: AsRef<str>>(
    resolver: &Resolver,
    hrefs: &[S],
) -> Result<(Vec<ResolvedReference>, ChapterRange)> {
    let mut resolved = Vec::with_capacity(hrefs.len());
    let mut bounds: Option<(u32, u32, u32)> = None;

    for href in hrefs {
        let href = href.as_ref();
        let reference = resolver.resolve_expecting(href, PublicationKind::Scripture).await?;
        let span = reference.chapters.ok_or_else(|| {
            MidweekError::payload(href, "scripture item has no book and chapter bounds")
        })?;
        if span.first_chapter == 0 || span.first_chapter > span.last_chapter {
            return Err(MidweekError::payload(
                href,
                format!("chapter bounds {}-{} are not a valid range", span.first_chapter, span.last_chapter),
            ));
        }

        bounds = Some(match bounds {
            None => (span.book, span.first_chapter, span.last_chapter),
            Some((book, first, last)) => (book, first.min(span.first_chapter), last.max(span.last_chapter)),
        });
        resolved.push(reference);
    }

    let (book, first_chapter, last_chapter) =
        bounds.ok_or_else(|| MidweekError::missing("bible reading", "scripture anchor"))?;
    let base = resolved
        .first()
        .and_then(|r| r.url.as_deref())
        .ok_or_else(|| MidweekError::missing("bible reading", "URL of the first scripture reference"))?;
    let links = chapter_links(base, first_chapter, last_chapter)?;
    debug!(book, first_chapter, last_chapter, links = links.len(), "resolved reading range");

    Ok((resolved, ChapterRange { book, first_chapter, last_chapter, links }))
}

/// One URL per chapter, substituting the chapter into the last path segment.
fn chapter_links(base: &str, first: u32, last: u32) -> Result<Vec<String>> {
    let base = Url::parse(base).map_err(|e| MidweekError::InvalidUrl(format!("{}: {}", base, e)))?;
    (first..=last)
        .map(|chapter| {
            let mut link = base.clone();
            link.path_segments_mut()
                .map_err(|_| MidweekError::InvalidUrl(format!("{} has no path", base)))?
                .pop()
                .push(&chapter.to_string());
            Ok(link.to_string())
        })
        .collect()
}
