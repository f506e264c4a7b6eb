pub mod json;
pub mod text;

pub use json::{JsonConfig, JsonError, JsonFormatter, convert_to_json};
pub use text::{TextConfig, TextFormatter, ToText, convert_to_text};

#[cfg(test)]
pub(crate) fn sample_program() -> crate::program::WeeklyProgram {
    use std::collections::BTreeMap;

    use crate::program::*;

    let song = |song_number: u32, title: &str| SongReference {
        song_number,
        title: title.to_string(),
        theme_scripture: "(Psalm 83:18)".to_string(),
        lyrics: "First line\nSecond line".to_string(),
        closing_reference: "(See also Ex. 6:3.)".to_string(),
    };

    WeeklyProgram {
        week_date_span: "week 1: 2022-01-03 - 2022-01-09".to_string(),
        weekly_bible_chapters: "GENESIS 1-2".to_string(),
        starting_song: song(2, "Jehovah Is Your Name"),
        middle_song: song(134, "Children Are a Trust From God"),
        closing_song: song(28, "Gaining Jehovah’s Friendship"),
        treasures_talk: Talk {
            section_number: 1,
            time_box_minutes: 10,
            heading: "“Be Fruitful and Become Many”".to_string(),
            points: vec![TalkPoint { text: "God created life (Ge 1:1[1])".to_string(), footnote_ids: vec![1] }],
            footnotes: BTreeMap::from([(1, "In the beginning God created the heavens and the earth.".to_string())]),
        },
        spiritual_gems: Gems {
            section_number: 2,
            time_box_minutes: 10,
            printed_question: PrintedQuestion {
                question: "What does it mean?".to_string(),
                scripture_mnemonic: "Ge 1:26".to_string(),
                scripture_text: "Let us make man in our image.".to_string(),
                answer_sources: vec![CitedText { mnemonic: "it-2 52".to_string(), text: "Image.".to_string() }],
            },
            open_ended_question: "What gems have you found?".to_string(),
        },
        bible_reading: ReadingAssignment {
            section_number: 3,
            time_box_minutes: 4,
            scripture_mnemonic: "Ge 1:1-19".to_string(),
            scripture_text: "1 In the beginning.".to_string(),
            study_point: CitedText { mnemonic: "th study 2".to_string(), text: "Be accurate.".to_string() },
            chapters: ChapterRange {
                book: 1,
                first_chapter: 1,
                last_chapter: 1,
                links: vec!["https://wol.jw.org/en/wol/b/r1/lp-e/nwtsty/1/1".to_string()],
            },
        },
        field_ministry_items: vec![
            Assignment {
                section_number: 4,
                time_box_minutes: 3,
                is_student_task: true,
                headline: "Starting a Conversation".to_string(),
                body: "Use the sample conversation.".to_string(),
                study_point: Some(CitedText { mnemonic: "th study 1".to_string(), text: "Be natural.".to_string() }),
            },
            Assignment {
                section_number: 5,
                time_box_minutes: 5,
                is_student_task: false,
                headline: "Making Disciples".to_string(),
                body: "Play the video.".to_string(),
                study_point: None,
            },
        ],
        christian_living_items: vec![LivingSection {
            section_number: 6,
            time_box_minutes: 15,
            headline: "Local Needs".to_string(),
            body: "Elders discuss local needs.".to_string(),
        }],
        bible_study: StudySection {
            section_number: 7,
            time_box_minutes: 30,
            headline: "Congregation Bible Study".to_string(),
            body: "lfb lessons 1-2".to_string(),
            references: vec!["https://wol.jw.org/en/wol/d/r1/lp-e/1102016201".to_string()],
        },
    }
}
