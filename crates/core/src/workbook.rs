//! Main program extraction API.
//!
//! [`Workbook`] ties the pieces together: it builds the [`SelectionGroups`]
//! for a page, runs each section extractor and resolves references through
//! its [`Fetcher`]. Every extractor can be called on its own with raw HTML, a
//! parsed [`Document`] or prebuilt groups.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use midweek_core::{FetchConfig, HttpFetcher, Workbook, WorkbookConfig};
//!
//! # async fn example() -> midweek_core::Result<()> {
//! let fetcher = HttpFetcher::new(FetchConfig::default())?;
//! let workbook = Workbook::new(WorkbookConfig::default(), Arc::new(fetcher))?;
//!
//! let url = workbook.program_url(2022, 1)?;
//! let program = workbook.fetch_and_extract(&url).await?;
//! println!("{}", program.week_date_span);
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use tracing::info;
use url::Url;

#[cfg(feature = "fetch")]
use crate::fetch::{FetchConfig, HttpFetcher};
use crate::fetch::Fetcher;
use crate::landmarks::SelectionGroups;
use crate::parse::Document;
use crate::program::{Assignment, Gems, LivingSection, ReadingAssignment, Songs, StudySection, Talk, WeeklyProgram};
use crate::reference::Resolver;
use crate::sections;
use crate::{MidweekError, Result};

/// Configuration for the Workbook engine.
///
/// # Example
///
/// ```rust
/// use midweek_core::WorkbookConfig;
///
/// let config = WorkbookConfig::builder()
///     .site_root("https://wol.jw.org")
///     .meetings_path("/es/wol/meetings/r4/lp-s/{year}/{week}")
///     .build();
/// assert_eq!(config.api_root, "https://wol.jw.org/wol/api/v1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookConfig {
    /// Site the program pages and their anchors live on (default: `https://wol.jw.org`).
    pub site_root: String,

    /// Root that anchor paths are rewritten onto for reference payloads
    /// (default: `https://wol.jw.org/wol/api/v1`).
    pub api_root: String,

    /// Path of a week's program page, with `{year}` and `{week}` placeholders
    /// (default: `/en/wol/meetings/r1/lp-e/{year}/{week}`).
    pub meetings_path: String,
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        Self {
            site_root: "https://wol.jw.org".to_string(),
            api_root: "https://wol.jw.org/wol/api/v1".to_string(),
            meetings_path: "/en/wol/meetings/r1/lp-e/{year}/{week}".to_string(),
        }
    }
}

impl WorkbookConfig {
    /// Creates a new builder for WorkbookConfig.
    pub fn builder() -> WorkbookConfigBuilder {
        WorkbookConfigBuilder::new()
    }
}

/// Builder for WorkbookConfig.
pub struct WorkbookConfigBuilder {
    config: WorkbookConfig,
}

impl WorkbookConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: WorkbookConfig::default() }
    }

    /// Sets the site root.
    pub fn site_root(mut self, value: impl Into<String>) -> Self {
        self.config.site_root = value.into();
        self
    }

    /// Sets the reference API root.
    pub fn api_root(mut self, value: impl Into<String>) -> Self {
        self.config.api_root = value.into();
        self
    }

    /// Sets the program page path template.
    pub fn meetings_path(mut self, value: impl Into<String>) -> Self {
        self.config.meetings_path = value.into();
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> WorkbookConfig {
        self.config
    }
}

impl Default for WorkbookConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What an extractor runs on.
///
/// Raw HTML and parsed documents are grouped on the way in; prebuilt groups
/// are used as they are.
#[derive(Clone, Copy)]
pub enum ProgramSource<'a> {
    Html(&'a str),
    Document(&'a Document),
    Groups(&'a SelectionGroups),
}

impl<'a> From<&'a str> for ProgramSource<'a> {
    fn from(html: &'a str) -> Self {
        ProgramSource::Html(html)
    }
}

impl<'a> From<&'a String> for ProgramSource<'a> {
    fn from(html: &'a String) -> Self {
        ProgramSource::Html(html.as_str())
    }
}

impl<'a> From<&'a Document> for ProgramSource<'a> {
    fn from(doc: &'a Document) -> Self {
        ProgramSource::Document(doc)
    }
}

impl<'a> From<&'a SelectionGroups> for ProgramSource<'a> {
    fn from(groups: &'a SelectionGroups) -> Self {
        ProgramSource::Groups(groups)
    }
}

impl<'a> ProgramSource<'a> {
    /// Selection groups for this source, built if needed.
    pub fn into_groups(self) -> Result<Cow<'a, SelectionGroups>> {
        match self {
            ProgramSource::Html(html) => {
                let doc = Document::parse(html)?;
                Ok(Cow::Owned(SelectionGroups::build(&doc)?))
            }
            ProgramSource::Document(doc) => Ok(Cow::Owned(SelectionGroups::build(doc)?)),
            ProgramSource::Groups(groups) => Ok(Cow::Borrowed(groups)),
        }
    }
}

/// The program extraction engine.
///
/// Holds no per-call state: every extraction builds fresh values, so one
/// `Workbook` can serve concurrent callers.
///
/// Futures returned for [`ProgramSource::Document`] inputs are not `Send`,
/// since parsed trees are not. Pass HTML text or [`SelectionGroups`] when the
/// extraction has to run on a multi-threaded executor.
#[derive(Clone, Debug)]
pub struct Workbook {
    config: WorkbookConfig,
    resolver: Resolver,
}

impl Workbook {
    /// Creates an engine resolving references through `fetcher`.
    ///
    /// # Errors
    ///
    /// Returns [`MidweekError::InvalidUrl`] if the configured roots are not
    /// absolute URLs.
    pub fn new(config: WorkbookConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        let resolver = Resolver::new(fetcher, &config.site_root, &config.api_root)?;
        Ok(Self { config, resolver })
    }

    /// Creates an engine backed by an [`HttpFetcher`].
    #[cfg(feature = "fetch")]
    pub fn with_http(config: WorkbookConfig, fetch_config: FetchConfig) -> Result<Self> {
        Self::new(config, Arc::new(HttpFetcher::new(fetch_config)?))
    }

    pub fn config(&self) -> &WorkbookConfig {
        &self.config
    }

    /// The reference resolver used by every extractor.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// URL of the program page for an ISO `week` of `year`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use midweek_core::{StaticFetcher, Workbook, WorkbookConfig};
    ///
    /// let workbook = Workbook::new(WorkbookConfig::default(), Arc::new(StaticFetcher::new())).unwrap();
    /// assert_eq!(
    ///     workbook.program_url(2022, 1).unwrap(),
    ///     "https://wol.jw.org/en/wol/meetings/r1/lp-e/2022/1"
    /// );
    /// assert!(workbook.program_url(2022, 54).is_err());
    /// ```
    pub fn program_url(&self, year: i32, week: u32) -> Result<String> {
        if !(1..=53).contains(&week) {
            return Err(MidweekError::InvalidUrl(format!("week {} is outside 1-53", week)));
        }
        if year < 1 {
            return Err(MidweekError::InvalidUrl(format!("year {} is out of range", year)));
        }
        let path = self
            .config
            .meetings_path
            .replace("{year}", &year.to_string())
            .replace("{week}", &week.to_string());
        let root = Url::parse(&self.config.site_root)
            .map_err(|e| MidweekError::InvalidUrl(format!("{}: {}", self.config.site_root, e)))?;
        root.join(&path)
            .map(String::from)
            .map_err(|e| MidweekError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Fetch a program page through the engine's fetcher.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        self.resolver.fetcher().fetch_text(url).await
    }

    /// Fetch a program page and extract the whole program.
    pub async fn fetch_and_extract(&self, url: &str) -> Result<WeeklyProgram> {
        let html = self.fetch_page(url).await?;
        self.extract_full_program(html.as_str()).await
    }

    /// Extract every section of a program.
    ///
    /// Sections without references are read first; the rest run
    /// concurrently and the first failure aborts the whole extraction.
    pub async fn extract_full_program<'a>(&self, source: impl Into<ProgramSource<'a>>) -> Result<WeeklyProgram> {
        let groups = source.into().into_groups()?;
        let resolver = &self.resolver;

        let week_date_span = sections::week::week_date_span(&groups.introduction)?;
        let weekly_bible_chapters = sections::week::weekly_bible_chapters(&groups.introduction)?;
        let christian_living_items = sections::living::extract(&groups.christian_living)?;
        let bible_study = sections::study::extract(&groups.bible_study, resolver)?;

        let (songs, treasures_talk, spiritual_gems, bible_reading, field_ministry_items) = futures::try_join!(
            sections::songs::extract(&groups, resolver),
            sections::talk::extract(&groups.treasures_talk, resolver),
            sections::gems::extract(&groups.spiritual_gems, resolver),
            sections::reading::extract(&groups.bible_reading, resolver),
            sections::ministry::extract(&groups.field_ministry, resolver),
        )?;

        info!(week = %week_date_span, "extracted weekly program");
        Ok(WeeklyProgram {
            week_date_span,
            weekly_bible_chapters,
            starting_song: songs.starting_song,
            middle_song: songs.middle_song,
            closing_song: songs.closing_song,
            treasures_talk,
            spiritual_gems,
            bible_reading,
            field_ministry_items,
            christian_living_items,
            bible_study,
        })
    }

    /// The week label, lower-cased.
    pub fn extract_week_date_span<'a>(&self, source: impl Into<ProgramSource<'a>>) -> Result<String> {
        let groups = source.into().into_groups()?;
        sections::week::week_date_span(&groups.introduction)
    }

    /// The week's Bible chapters as printed.
    pub fn extract_weekly_bible_chapters<'a>(&self, source: impl Into<ProgramSource<'a>>) -> Result<String> {
        let groups = source.into().into_groups()?;
        sections::week::weekly_bible_chapters(&groups.introduction)
    }

    /// The three songs, fetched concurrently.
    pub async fn extract_songs<'a>(&self, source: impl Into<ProgramSource<'a>>) -> Result<Songs> {
        let groups = source.into().into_groups()?;
        sections::songs::extract(&groups, &self.resolver).await
    }

    /// The treasures talk with its footnotes.
    pub async fn extract_treasures_talk<'a>(&self, source: impl Into<ProgramSource<'a>>) -> Result<Talk> {
        let groups = source.into().into_groups()?;
        sections::talk::extract(&groups.treasures_talk, &self.resolver).await
    }

    /// The spiritual gems questions.
    pub async fn extract_spiritual_gems<'a>(&self, source: impl Into<ProgramSource<'a>>) -> Result<Gems> {
        let groups = source.into().into_groups()?;
        sections::gems::extract(&groups.spiritual_gems, &self.resolver).await
    }

    /// The bible reading with its chapter links.
    pub async fn extract_bible_reading<'a>(&self, source: impl Into<ProgramSource<'a>>) -> Result<ReadingAssignment> {
        let groups = source.into().into_groups()?;
        sections::reading::extract(&groups.bible_reading, &self.resolver).await
    }

    /// The field ministry assignments.
    pub async fn extract_field_ministry<'a>(&self, source: impl Into<ProgramSource<'a>>) -> Result<Vec<Assignment>> {
        let groups = source.into().into_groups()?;
        sections::ministry::extract(&groups.field_ministry, &self.resolver).await
    }

    /// The christian living items.
    pub fn extract_christian_living<'a>(&self, source: impl Into<ProgramSource<'a>>) -> Result<Vec<LivingSection>> {
        let groups = source.into().into_groups()?;
        sections::living::extract(&groups.christian_living)
    }

    /// The congregation bible study.
    pub fn extract_bible_study<'a>(&self, source: impl Into<ProgramSource<'a>>) -> Result<StudySection> {
        let groups = source.into().into_groups()?;
        sections::study::extract(&groups.bible_study, &self.resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::StaticFetcher;

    fn workbook(config: WorkbookConfig) -> Workbook {
        Workbook::new(config, Arc::new(StaticFetcher::new())).unwrap()
    }

    #[test]
    fn test_config_builder() {
        let config = WorkbookConfig::builder()
            .site_root("http://localhost:8080")
            .api_root("http://localhost:8080/api")
            .meetings_path("/fr/wol/meetings/r30/lp-f/{year}/{week}")
            .build();
        assert_eq!(config.site_root, "http://localhost:8080");

        let workbook = workbook(config);
        assert_eq!(workbook.program_url(2023, 12).unwrap(), "http://localhost:8080/fr/wol/meetings/r30/lp-f/2023/12");
    }

    #[test]
    fn test_invalid_roots() {
        let config = WorkbookConfig::builder().api_root("not a url").build();
        let err = Workbook::new(config, Arc::new(StaticFetcher::new())).unwrap_err();
        assert!(matches!(err, MidweekError::InvalidUrl(_)));
    }

    #[test]
    fn test_program_url_bounds() {
        let workbook = workbook(WorkbookConfig::default());
        assert!(workbook.program_url(2022, 0).is_err());
        assert!(workbook.program_url(0, 1).is_err());
        assert!(workbook.program_url(2022, 53).is_ok());
    }

    #[test]
    fn test_structural_failure_skips_network() {
        let workbook = workbook(WorkbookConfig::default());
        let err = workbook.extract_week_date_span("<html><body><p>no program</p></body></html>").unwrap_err();
        assert!(matches!(err, MidweekError::LandmarkCount { .. }));
    }
}
