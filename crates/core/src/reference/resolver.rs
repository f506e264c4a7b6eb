use std::sync::{Arc, LazyLock};

use futures::future::try_join_all;
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::fetch::Fetcher;
use crate::reference::{ChapterSpan, PayloadItem, PublicationKind, ReferenceItem, ReferencePayload, ResolvedReference};
use crate::{MidweekError, Result};

static REFERENCE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?P<lang>[a-z]{2,3}(?:-[a-z]+)?)/wol/(?P<rest>.+)$").expect("reference path pattern")
});

/// Fetches, validates and normalizes the targets of reference anchors.
///
/// Cheap to clone; clones share the fetcher.
#[derive(Clone)]
pub struct Resolver {
    fetcher: Arc<dyn Fetcher>,
    site_root: Url,
    api_root: String,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("site_root", &self.site_root.as_str())
            .field("api_root", &self.api_root)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Create a resolver for anchors found on pages of `site_root`.
    ///
    /// # Errors
    ///
    /// Returns [`MidweekError::InvalidUrl`] if either root is not an absolute URL.
    pub fn new(fetcher: Arc<dyn Fetcher>, site_root: &str, api_root: &str) -> Result<Self> {
        let site_root = Url::parse(site_root).map_err(|e| MidweekError::InvalidUrl(format!("{}: {}", site_root, e)))?;
        Url::parse(api_root).map_err(|e| MidweekError::InvalidUrl(format!("{}: {}", api_root, e)))?;
        Ok(Self { fetcher, site_root, api_root: api_root.trim_end_matches('/').to_string() })
    }

    /// The fetcher every resolution goes through.
    pub fn fetcher(&self) -> &Arc<dyn Fetcher> {
        &self.fetcher
    }

    /// Map an anchor href to its API URL and language segment.
    ///
    /// Accepts `/<lang>/wol/<rest>` paths and absolute URLs on the site root.
    pub fn api_url(&self, href: &str) -> Result<(String, String)> {
        let href = href.trim();
        let path = if href.starts_with('/') {
            href.split(['#', '?']).next().unwrap_or(href).to_string()
        } else {
            let url = Url::parse(href).map_err(|e| MidweekError::InvalidUrl(format!("{}: {}", href, e)))?;
            if url.host_str() != self.site_root.host_str() {
                return Err(MidweekError::InvalidUrl(format!("reference {} is not on {}", href, self.site_root)));
            }
            url.path().to_string()
        };

        let caps = REFERENCE_PATH
            .captures(&path)
            .ok_or_else(|| MidweekError::InvalidUrl(format!("invalid reference path: {}", href)))?;
        Ok((format!("{}/{}", self.api_root, &caps["rest"]), caps["lang"].to_string()))
    }

    /// Absolute URL of `href` on the site root.
    pub fn absolute_url(&self, href: &str) -> Result<String> {
        self.site_root
            .join(href.trim())
            .map(String::from)
            .map_err(|e| MidweekError::InvalidUrl(format!("{}: {}", href, e)))
    }

    /// Fetch the payload behind `href` and validate its single item.
    ///
    /// # Errors
    ///
    /// [`MidweekError::InvalidPayload`] when the payload is not of the
    /// expected shape, holds zero or several items, or its item has blank
    /// content or class tag. Fetch errors pass through unchanged.
    pub async fn fetch_item(&self, href: &str) -> Result<ReferenceItem> {
        let (url, _) = self.api_url(href)?;
        self.fetch_item_at(&url).await
    }

    async fn fetch_item_at(&self, url: &str) -> Result<ReferenceItem> {
        let value = self.fetcher.fetch_json(url).await?;
        let payload: ReferencePayload =
            serde_json::from_value(value).map_err(|e| MidweekError::payload(url, e.to_string()))?;

        let mut items = payload.items;
        if items.len() != 1 {
            return Err(MidweekError::payload(url, format!("expected exactly one item, got {}", items.len())));
        }
        let PayloadItem { title, url: item_url, content, article_classes, book, first_chapter, last_chapter } =
            items.remove(0);

        let content = content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| MidweekError::payload(url, "item has no content"))?;
        let class_tag = article_classes
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| MidweekError::payload(url, "item has no class tag"))?;

        Ok(ReferenceItem {
            title: title.unwrap_or_default(),
            url: item_url,
            content,
            class_tag,
            book,
            first_chapter,
            last_chapter,
        })
    }

    /// Fetch, classify and normalize the target of `href`.
    pub async fn resolve(&self, href: &str) -> Result<ResolvedReference> {
        self.resolve_as(href, None).await
    }

    /// Like [`Resolver::resolve`], but the item must classify as `expected`.
    ///
    /// The class is checked before the item's content is normalized, so a
    /// publication of the wrong kind always surfaces as
    /// [`MidweekError::UnexpectedPublication`].
    pub async fn resolve_expecting(&self, href: &str, expected: PublicationKind) -> Result<ResolvedReference> {
        self.resolve_as(href, Some(expected)).await
    }

    async fn resolve_as(&self, href: &str, expected: Option<PublicationKind>) -> Result<ResolvedReference> {
        let (url, language) = self.api_url(href)?;
        let item = self.fetch_item_at(&url).await?;

        let kind = PublicationKind::classify(&item.class_tag);
        debug!(%url, kind = kind.name(), "resolved reference");
        if let Some(expected) = expected.filter(|&expected| expected != kind) {
            return Err(MidweekError::UnexpectedPublication { expected: expected.name(), url, class_tag: item.class_tag });
        }
        let normalized_text = (kind.normalizer())(&item.content)?;

        let chapters = match (kind, item.book, item.first_chapter, item.last_chapter) {
            (PublicationKind::Scripture, Some(book), Some(first_chapter), Some(last_chapter)) => {
                Some(ChapterSpan { book, first_chapter, last_chapter })
            }
            _ => None,
        };
        let target = item.url.as_deref().map(|u| self.absolute_url(u)).transpose()?;

        Ok(ResolvedReference {
            kind,
            class_tag: item.class_tag,
            normalized_text,
            language,
            title: item.title,
            url: target,
            chapters,
        })
    }

    /// Resolve independent references concurrently, in input order.
    ///
    /// The first failure aborts the whole batch.
    pub async fn resolve_all<S: AsRef<str>>(&self, hrefs: &[S]) -> Result<Vec<ResolvedReference>> {
        try_join_all(hrefs.iter().map(|href| self.resolve(href.as_ref()))).await
    }
}
