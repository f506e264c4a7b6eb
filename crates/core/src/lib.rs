//! Structured extraction of weekly meeting programs.
//!
//! A program page is partitioned into named regions by a fixed table of
//! landmarks ([`SelectionGroups`]); each region is read by its own section
//! extractor, and the scriptures and publications it cites are fetched and
//! normalized by the reference [`Resolver`]. [`Workbook`] runs the whole
//! pipeline or any single section.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use midweek_core::{StaticFetcher, Workbook, WorkbookConfig};
//!
//! # async fn example(html: &str) -> midweek_core::Result<()> {
//! let fetcher = StaticFetcher::from_file("replay.json")?;
//! let workbook = Workbook::new(WorkbookConfig::default(), Arc::new(fetcher))?;
//! let program = workbook.extract_full_program(html).await?;
//! println!("{}", program.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fetch;
pub mod formatters;
pub mod landmarks;
pub mod parse;
pub mod program;
pub mod reference;
mod sections;
pub mod text;
pub mod workbook;

pub use error::{ErrorKind, MidweekError, Result};
pub use fetch::{FetchConfig, Fetcher, StaticFetcher, fetch_file, fetch_stdin};
#[cfg(feature = "fetch")]
pub use fetch::{HttpFetcher, fetch_url};
pub use formatters::{JsonConfig, JsonError, JsonFormatter, TextConfig, TextFormatter, ToText};
pub use formatters::{convert_to_json, convert_to_text};
pub use landmarks::{Landmark, LandmarkReport, LandmarkStatus, SelectionGroups, TreeSelection, validate_landmarks};
pub use parse::{Document, Element, Fragment};
pub use program::{
    Assignment, ChapterRange, CitedText, Gems, LivingSection, PrintedQuestion, ReadingAssignment, SongReference,
    Songs, StudySection, Talk, TalkPoint, WeeklyProgram,
};
pub use reference::{PublicationKind, ResolvedReference, Resolver};
pub use workbook::{ProgramSource, Workbook, WorkbookConfig, WorkbookConfigBuilder};
