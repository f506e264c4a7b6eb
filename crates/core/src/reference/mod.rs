//! Reference resolution.
//!
//! Program pages cite scriptures and publications through anchors whose
//! targets live behind a JSON API. The [`Resolver`] turns an anchor path into
//! an API URL, fetches the payload, checks it holds exactly one usable item,
//! classifies the item by its class tag and normalizes its content with the
//! normalizer for that [`PublicationKind`].
//!
//! The bible reading needs more than text: [`resolve_chapter_range`] resolves
//! every scripture anchor of the reading in order and rebuilds the full list
//! of chapter links.

mod classify;
pub mod normalize;
mod range;
mod resolver;

use serde::{Deserialize, Serialize};

pub use classify::{Normalizer, PublicationKind};
pub use range::resolve_chapter_range;
pub use resolver::Resolver;

/// Wire shape of a reference payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ReferencePayload {
    #[serde(default)]
    pub items: Vec<PayloadItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PayloadItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, rename = "articleClasses")]
    pub article_classes: Option<String>,
    #[serde(default)]
    pub book: Option<u32>,
    #[serde(default)]
    pub first_chapter: Option<u32>,
    #[serde(default)]
    pub last_chapter: Option<u32>,
}

/// The single item of a validated payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceItem {
    pub title: String,
    /// Site-relative or absolute URL of the cited page, when given.
    pub url: Option<String>,
    /// Raw HTML content, never blank.
    pub content: String,
    /// Class tag used for classification, never blank.
    pub class_tag: String,
    pub book: Option<u32>,
    pub first_chapter: Option<u32>,
    pub last_chapter: Option<u32>,
}

/// Book and chapter bounds carried by a scripture payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSpan {
    pub book: u32,
    pub first_chapter: u32,
    pub last_chapter: u32,
}

/// A reference after fetch, classification and normalization.
///
/// Transient: extractors copy what they need out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedReference {
    pub kind: PublicationKind,
    pub class_tag: String,
    pub normalized_text: String,
    /// Language segment of the anchor path, e.g. `en`.
    pub language: String,
    pub title: String,
    /// Absolute URL of the cited page.
    pub url: Option<String>,
    pub chapters: Option<ChapterSpan>,
}

impl ResolvedReference {
    pub fn is_talk_publication(&self) -> bool {
        self.kind == PublicationKind::Talk
    }

    pub fn is_scripture_publication(&self) -> bool {
        self.kind == PublicationKind::Scripture
    }
}
