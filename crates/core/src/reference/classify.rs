use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::Result;
use crate::reference::normalize;

static SCRIPTURE_PUBLICATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpub-nwt(sty)?\b").expect("scripture publication pattern"));

static TALK_PUBLICATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bpub-(w|g|wp|it|lff|lfb|th|jy|bhs|lv|kr|rr)\b").expect("talk publication pattern")
});

/// Publication type of a reference payload, read from its class tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationKind {
    /// A talk, article or study publication.
    Talk,
    /// A scripture range.
    Scripture,
    /// Anything else.
    Generic,
}

/// Text normalizer for one publication kind.
pub type Normalizer = fn(&str) -> Result<String>;

impl PublicationKind {
    /// Classify a class tag. Scripture is checked first.
    pub fn classify(class_tag: &str) -> Self {
        if SCRIPTURE_PUBLICATION.is_match(class_tag) {
            PublicationKind::Scripture
        } else if TALK_PUBLICATION.is_match(class_tag) {
            PublicationKind::Talk
        } else {
            PublicationKind::Generic
        }
    }

    /// The normalizer for payloads of this kind.
    pub fn normalizer(self) -> Normalizer {
        match self {
            PublicationKind::Talk => normalize::talk_text,
            PublicationKind::Scripture => normalize::scripture_text,
            PublicationKind::Generic => normalize::generic_text,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PublicationKind::Talk => "talk",
            PublicationKind::Scripture => "scripture",
            PublicationKind::Generic => "generic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("bibleCitation pub-nwtsty docClass-1", PublicationKind::Scripture)]
    #[case("PUB-NWT jwac", PublicationKind::Scripture)]
    #[case("pub-w docClass-40", PublicationKind::Talk)]
    #[case("pub-it-1 docClass-0", PublicationKind::Talk)]
    #[case("pub-th", PublicationKind::Talk)]
    #[case("pub-sjj docClass-3", PublicationKind::Generic)]
    #[case("pub-wp22", PublicationKind::Generic)]
    #[case("pub-nwtstyx", PublicationKind::Generic)]
    #[case("", PublicationKind::Generic)]
    fn test_classify(#[case] class_tag: &str, #[case] expected: PublicationKind) {
        assert_eq!(PublicationKind::classify(class_tag), expected);
    }

    #[test]
    fn test_scripture_wins_over_talk() {
        assert_eq!(PublicationKind::classify("pub-w pub-nwtsty"), PublicationKind::Scripture);
    }
}
