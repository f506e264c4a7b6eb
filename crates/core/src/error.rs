//! Error types for program extraction.
//!
//! Every operation in this crate returns [`Result`], an explicit success or
//! failure value. Failures are never defaulted or swallowed: a failure in any
//! section aborts the whole program extraction and is handed to the caller
//! unchanged.
//!
//! Failures fall into three families, reported by [`MidweekError::kind`]:
//!
//! - [`ErrorKind::Structural`]: a landmark, count or shape did not match the
//!   page template. The template changed; retrying will not help.
//! - [`ErrorKind::Retrieval`]: a secondary fetch failed or returned a payload
//!   that could not be understood.
//! - [`ErrorKind::Format`]: a piece of text did not match an expected pattern.
//!
//! # Example
//!
//! ```rust
//! use midweek_core::{ErrorKind, MidweekError, Result};
//!
//! fn minutes(text: &str) -> Result<u32> {
//!     if text.is_empty() {
//!         return Err(MidweekError::Format("no time box".to_string()));
//!     }
//!     # Ok(1)
//! }
//!
//! assert_eq!(minutes("").unwrap_err().kind(), ErrorKind::Format);
//! ```

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::landmarks::Landmark;

/// Coarse classification of a [`MidweekError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The page no longer matches the expected template.
    Structural,
    /// A network fetch or its payload failed.
    Retrieval,
    /// Text did not match an expected pattern.
    Format,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Structural => write!(f, "structural"),
            ErrorKind::Retrieval => write!(f, "retrieval"),
            ErrorKind::Format => write!(f, "format"),
        }
    }
}

/// Main error type for program extraction.
///
/// # Example
///
/// ```rust
/// use midweek_core::{MidweekError, Workbook};
///
/// # async fn run(workbook: Workbook, html: &str) {
/// match workbook.extract_full_program(html).await {
///     Ok(program) => println!("{}", program.week_date_span),
///     Err(MidweekError::RangeShape { region, expected, actual }) => {
///         println!("{region}: expected {expected}, got {actual}");
///     }
///     Err(e) => println!("Error ({}): {}", e.kind(), e),
/// }
/// # }
/// ```
#[derive(Error, Debug)]
pub enum MidweekError {
    /// HTTP request errors from reqwest.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL or reference path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A reference payload could not be used.
    ///
    /// Returned when the payload is not JSON of the expected shape, holds zero
    /// or several items, or its item lacks content or a class tag.
    #[error("Invalid reference payload from {url}: {reason}")]
    InvalidPayload { url: String, reason: String },

    /// A fetch collaborator had nothing for the requested URL.
    #[error("Fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O errors while reading input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A landmark marker matched zero or several elements.
    #[error("Expected exactly one {landmark} landmark, found {found}")]
    LandmarkCount { landmark: Landmark, found: usize },

    /// A landmark marker matched an element of the wrong kind.
    #[error("Landmark {landmark} should be a <{expected}> element, found <{actual}>")]
    LandmarkMismatch { landmark: Landmark, expected: &'static str, actual: String },

    /// A range between landmarks did not hold the expected number of elements.
    #[error("Unexpected shape for {region}: expected {expected}, got {actual}")]
    RangeShape { region: &'static str, expected: usize, actual: usize },

    /// Two landmarks are not ordered siblings, so no range can be taken.
    #[error("Cannot take range from {from} to {to}: {reason}")]
    RangeOrder { from: String, to: String, reason: String },

    /// An element required by an extractor is absent.
    #[error("Missing {what} in {context}")]
    MissingElement { context: &'static str, what: String },

    /// A reference resolved to a publication of an unexpected type.
    ///
    /// For the bible reading this means the page no longer links directly to
    /// a scripture range.
    #[error("Expected a {expected} publication at {url}, found class tag \"{class_tag}\"")]
    UnexpectedPublication { expected: &'static str, url: String, class_tag: String },

    /// Text did not match an expected pattern.
    #[error("Format error: {0}")]
    Format(String),

    /// Invalid CSS selector or HTML rewrite failure.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),
}

impl MidweekError {
    /// Returns the family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            #[cfg(feature = "fetch")]
            MidweekError::HttpError(_) => ErrorKind::Retrieval,
            MidweekError::Timeout { .. }
            | MidweekError::InvalidUrl(_)
            | MidweekError::InvalidPayload { .. }
            | MidweekError::FetchFailed { .. }
            | MidweekError::FileNotFound(_)
            | MidweekError::Io(_) => ErrorKind::Retrieval,
            MidweekError::LandmarkCount { .. }
            | MidweekError::LandmarkMismatch { .. }
            | MidweekError::RangeShape { .. }
            | MidweekError::RangeOrder { .. }
            | MidweekError::MissingElement { .. }
            | MidweekError::UnexpectedPublication { .. } => ErrorKind::Structural,
            MidweekError::Format(_) | MidweekError::HtmlParseError(_) => ErrorKind::Format,
        }
    }

    pub(crate) fn missing(context: &'static str, what: impl Into<String>) -> Self {
        MidweekError::MissingElement { context, what: what.into() }
    }

    pub(crate) fn payload(url: &str, reason: impl Into<String>) -> Self {
        MidweekError::InvalidPayload { url: url.to_string(), reason: reason.into() }
    }
}

/// Result type alias for MidweekError.
pub type Result<T> = std::result::Result<T, MidweekError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_shape_message() {
        let err = MidweekError::RangeShape { region: "treasures span", expected: 4, actual: 3 };
        assert!(err.to_string().contains("expected 4, got 3"));
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_landmark_mismatch_names_roles() {
        let err = MidweekError::LandmarkMismatch { landmark: Landmark::StartingSong, expected: "h3", actual: "p".into() };
        let msg = err.to_string();
        assert!(msg.contains("starting song"));
        assert!(msg.contains("<h3>"));
        assert!(msg.contains("<p>"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(MidweekError::Format("x".into()).kind(), ErrorKind::Format);
        assert_eq!(MidweekError::payload("u", "empty").kind(), ErrorKind::Retrieval);
        assert_eq!(MidweekError::Timeout { timeout: 30 }.kind(), ErrorKind::Retrieval);
        assert_eq!(
            MidweekError::UnexpectedPublication { expected: "scripture", url: "u".into(), class_tag: "pub-w".into() }
                .kind(),
            ErrorKind::Structural
        );
    }

    #[test]
    fn test_timeout_error() {
        let err = MidweekError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
    }
}
