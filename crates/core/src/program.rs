//! Program output types.
//!
//! [`WeeklyProgram`] is the aggregate returned by a full extraction. Every
//! record is a plain value built fresh per call; the JSON shape uses
//! camelCase field names.

use std::collections::BTreeMap;

use serde::Serialize;

/// One week's meeting program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgram {
    /// Lower-cased week label, e.g. `"week 1: 2022-01-03 - 2022-01-09"`.
    pub week_date_span: String,
    /// The week's Bible chapters as printed under the date span.
    pub weekly_bible_chapters: String,
    pub starting_song: SongReference,
    pub middle_song: SongReference,
    pub closing_song: SongReference,
    pub treasures_talk: Talk,
    pub spiritual_gems: Gems,
    pub bible_reading: ReadingAssignment,
    pub field_ministry_items: Vec<Assignment>,
    pub christian_living_items: Vec<LivingSection>,
    pub bible_study: StudySection,
}

/// The three songs of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Songs {
    pub starting_song: SongReference,
    pub middle_song: SongReference,
    pub closing_song: SongReference,
}

/// A song, read from its own page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongReference {
    pub song_number: u32,
    pub title: String,
    pub theme_scripture: String,
    /// Verses, one line per printed line.
    pub lyrics: String,
    pub closing_reference: String,
}

/// The opening treasures talk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Talk {
    pub section_number: u32,
    pub time_box_minutes: u32,
    pub heading: String,
    pub points: Vec<TalkPoint>,
    /// Resolved reference text keyed by footnote id. Ids start at 1 and are
    /// unique within this talk only.
    pub footnotes: BTreeMap<u32, String>,
}

/// One bullet of a talk, with `[n]` markers after each reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkPoint {
    pub text: String,
    pub footnote_ids: Vec<u32>,
}

/// The spiritual gems segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gems {
    pub section_number: u32,
    pub time_box_minutes: u32,
    pub printed_question: PrintedQuestion,
    pub open_ended_question: String,
}

/// The printed gems question with its scripture and answer sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintedQuestion {
    pub question: String,
    pub scripture_mnemonic: String,
    pub scripture_text: String,
    pub answer_sources: Vec<CitedText>,
}

/// A citation as printed (`mnemonic`) and its resolved text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitedText {
    pub mnemonic: String,
    pub text: String,
}

/// The assigned Bible reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingAssignment {
    pub section_number: u32,
    pub time_box_minutes: u32,
    pub scripture_mnemonic: String,
    pub scripture_text: String,
    pub study_point: CitedText,
    pub chapters: ChapterRange,
}

/// The chapters a reading spans, with one link per chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRange {
    pub book: u32,
    pub first_chapter: u32,
    pub last_chapter: u32,
    pub links: Vec<String>,
}

/// One field ministry item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub section_number: u32,
    pub time_box_minutes: u32,
    pub is_student_task: bool,
    pub headline: String,
    pub body: String,
    /// Present exactly when `is_student_task`.
    pub study_point: Option<CitedText>,
}

/// One item of the living-as-christians section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LivingSection {
    pub section_number: u32,
    pub time_box_minutes: u32,
    pub headline: String,
    pub body: String,
}

/// The congregation bible study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySection {
    pub section_number: u32,
    pub time_box_minutes: u32,
    pub headline: String,
    pub body: String,
    /// Absolute URLs of the study material.
    pub references: Vec<String>,
}

impl WeeklyProgram {
    /// Section numbers in document order.
    pub fn section_numbers(&self) -> Vec<u32> {
        let mut numbers =
            vec![self.treasures_talk.section_number, self.spiritual_gems.section_number, self.bible_reading.section_number];
        numbers.extend(self.field_ministry_items.iter().map(|a| a.section_number));
        numbers.extend(self.christian_living_items.iter().map(|l| l.section_number));
        numbers.push(self.bible_study.section_number);
        numbers
    }

    /// Serialize to a JSON value.
    pub fn to_json(&self) -> crate::Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| crate::MidweekError::Format(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::formatters::sample_program;

    #[test]
    fn test_section_numbers_in_page_order() {
        assert_eq!(sample_program().section_numbers(), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_to_json_keeps_null_study_point() {
        let json = sample_program().to_json().unwrap();
        assert!(json["fieldMinistryItems"][1]["studyPoint"].is_null());
        assert_eq!(json["treasuresTalk"]["footnotes"]["1"].as_str().map(|s| s.starts_with("In the beginning")), Some(true));
    }
}
