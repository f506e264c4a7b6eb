use crate::program::{
    Assignment, CitedText, Gems, LivingSection, ReadingAssignment, SongReference, Songs, StudySection, Talk,
    WeeklyProgram,
};

/// Configuration for plain text output
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    /// Wrap lines at specified width (0 = no wrapping)
    pub line_width: usize,

    /// Print song lyrics under each song
    pub include_lyrics: bool,
}

/// A program record that renders as plain text.
pub trait ToText {
    /// Append the record's lines to `out`.
    fn write_text(&self, out: &mut Vec<String>, config: &TextConfig);
}

/// Plain text formatter for program records
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn convert<T: ToText + ?Sized>(&self, value: &T) -> String {
        convert_to_text(value, &self.config)
    }
}

/// Render a program record as plain text with specified configuration
pub fn convert_to_text<T: ToText + ?Sized>(value: &T, config: &TextConfig) -> String {
    let mut lines = Vec::new();
    value.write_text(&mut lines, config);

    let text = lines.join("\n");
    let final_text = if config.line_width > 0 { wrap_text(&text, config.line_width) } else { text };
    final_text.trim().to_string()
}

fn section_line(number: u32, title: &str, minutes: u32) -> String {
    format!("{}. {} ({} min.)", number, title, minutes)
}

fn cited_line(prefix: &str, cited: &CitedText) -> String {
    format!("{}{}: {}", prefix, cited.mnemonic, cited.text.replace('\n', " "))
}

impl ToText for String {
    fn write_text(&self, out: &mut Vec<String>, _config: &TextConfig) {
        out.push(self.clone());
    }
}

impl ToText for SongReference {
    fn write_text(&self, out: &mut Vec<String>, config: &TextConfig) {
        out.push(format!("Song {}: {} {}", self.song_number, self.title, self.theme_scripture));
        if config.include_lyrics {
            out.extend(self.lyrics.lines().map(|line| format!("    {}", line)));
            out.push(format!("    {}", self.closing_reference));
        }
    }
}

impl ToText for Songs {
    fn write_text(&self, out: &mut Vec<String>, config: &TextConfig) {
        for song in [&self.starting_song, &self.middle_song, &self.closing_song] {
            song.write_text(out, config);
        }
    }
}

impl ToText for Talk {
    fn write_text(&self, out: &mut Vec<String>, _config: &TextConfig) {
        out.push(section_line(self.section_number, &self.heading, self.time_box_minutes));
        out.extend(self.points.iter().map(|point| format!("  - {}", point.text)));
        if !self.footnotes.is_empty() {
            out.push(String::new());
            out.extend(self.footnotes.iter().map(|(id, text)| format!("  [{}] {}", id, text.replace('\n', " "))));
        }
    }
}

impl ToText for Gems {
    fn write_text(&self, out: &mut Vec<String>, _config: &TextConfig) {
        let printed = &self.printed_question;
        out.push(section_line(self.section_number, "Spiritual Gems", self.time_box_minutes));
        out.push(format!("  {}: {}", printed.scripture_mnemonic, printed.question));
        out.push(format!("    {}", printed.scripture_text.replace('\n', " ")));
        out.extend(printed.answer_sources.iter().map(|source| cited_line("    ", source)));
        out.push(format!("  {}", self.open_ended_question));
    }
}

impl ToText for ReadingAssignment {
    fn write_text(&self, out: &mut Vec<String>, _config: &TextConfig) {
        out.push(section_line(self.section_number, "Bible Reading", self.time_box_minutes));
        out.push(format!("  {}", self.scripture_mnemonic));
        out.extend(self.scripture_text.lines().map(|line| format!("    {}", line)));
        out.push(cited_line("  Study point ", &self.study_point));
        out.extend(self.chapters.links.iter().map(|link| format!("  {}", link)));
    }
}

impl ToText for Assignment {
    fn write_text(&self, out: &mut Vec<String>, _config: &TextConfig) {
        out.push(section_line(self.section_number, &self.headline, self.time_box_minutes));
        out.push(format!("  {}", self.body));
        if let Some(study_point) = &self.study_point {
            out.push(cited_line("  Study point ", study_point));
        }
    }
}

impl ToText for LivingSection {
    fn write_text(&self, out: &mut Vec<String>, _config: &TextConfig) {
        out.push(section_line(self.section_number, &self.headline, self.time_box_minutes));
        out.extend(self.body.lines().map(|line| format!("  {}", line)));
    }
}

impl ToText for StudySection {
    fn write_text(&self, out: &mut Vec<String>, _config: &TextConfig) {
        out.push(section_line(self.section_number, &self.headline, self.time_box_minutes));
        out.extend(self.body.lines().map(|line| format!("  {}", line)));
        out.extend(self.references.iter().map(|link| format!("  {}", link)));
    }
}

impl<T: ToText> ToText for [T] {
    fn write_text(&self, out: &mut Vec<String>, config: &TextConfig) {
        for item in self {
            item.write_text(out, config);
        }
    }
}

impl<T: ToText> ToText for Vec<T> {
    fn write_text(&self, out: &mut Vec<String>, config: &TextConfig) {
        self.as_slice().write_text(out, config);
    }
}

impl ToText for WeeklyProgram {
    fn write_text(&self, out: &mut Vec<String>, config: &TextConfig) {
        out.push(self.week_date_span.clone());
        out.push(self.weekly_bible_chapters.clone());
        out.push("=".repeat(self.week_date_span.chars().count()));

        let blocks: [&dyn ToText; 9] = [
            &self.starting_song,
            &self.treasures_talk,
            &self.spiritual_gems,
            &self.bible_reading,
            &self.field_ministry_items,
            &self.middle_song,
            &self.christian_living_items,
            &self.bible_study,
            &self.closing_song,
        ];
        for block in blocks {
            out.push(String::new());
            block.write_text(out, config);
        }
    }
}

/// Wrap each line to the specified width, keeping its indentation
fn wrap_text(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| {
            let indent_len = line.len() - line.trim_start().len();
            let indent = &line[..indent_len];
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.is_empty() {
                String::new()
            } else {
                wrap_words(&words, width.saturating_sub(indent_len).max(1))
                    .lines()
                    .map(|wrapped| format!("{}{}", indent, wrapped))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap a slice of words to specified width
fn wrap_words(words: &[&str], width: usize) -> String {
    let mut lines = Vec::new();
    let mut current_line = Vec::new();
    let mut current_length = 0;

    for &word in words {
        let word_len = word.chars().count();

        if current_length == 0 {
            current_line.push(word);
            current_length = word_len;
        } else if current_length + 1 + word_len <= width {
            current_length += 1 + word_len;
            current_line.push(word);
        } else {
            lines.push(current_line.join(" "));
            current_line = vec![word];
            current_length = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line.join(" "));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatters::sample_program;

    #[test]
    fn test_program_text_order() {
        let text = convert_to_text(&sample_program(), &TextConfig::default());
        assert!(text.starts_with("week 1: 2022-01-03 - 2022-01-09\nGENESIS 1-2\n==="));

        let positions: Vec<usize> = [
            "Song 2: Jehovah Is Your Name",
            "1. “Be Fruitful and Become Many” (10 min.)",
            "2. Spiritual Gems (10 min.)",
            "3. Bible Reading (4 min.)",
            "4. Starting a Conversation (3 min.)",
            "Song 134",
            "6. Local Needs (15 min.)",
            "7. Congregation Bible Study (30 min.)",
            "Song 28",
        ]
        .iter()
        .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {}", needle)))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_talk_footnotes_listed() {
        let text = convert_to_text(&sample_program().treasures_talk, &TextConfig::default());
        assert!(text.contains("  - God created life (Ge 1:1[1])"));
        assert!(text.contains("  [1] In the beginning"));
    }

    #[test]
    fn test_lyrics_toggle() {
        let program = sample_program();
        let without = convert_to_text(&program.starting_song, &TextConfig::default());
        assert!(!without.contains("First line"));

        let with = convert_to_text(&program.starting_song, &TextConfig { include_lyrics: true, ..Default::default() });
        assert!(with.contains("    First line\n    Second line"));
    }

    #[test]
    fn test_assignments_list() {
        let program = sample_program();
        let text = TextFormatter::new(TextConfig::default()).convert(&program.field_ministry_items);
        assert!(text.contains("Study point th study 1: Be natural."));
        assert_eq!(text.matches("Study point").count(), 1);
    }

    #[test]
    fn test_wrap_words() {
        let words = vec!["hello", "world", "this", "is", "a", "test"];
        let wrapped = wrap_words(&words, 10);
        assert!(wrapped.contains('\n'));
    }

    #[test]
    fn test_wrap_text_keeps_indent() {
        let wrapped = wrap_text("  - This is a long line that should be wrapped", 20);
        assert!(wrapped.lines().count() > 1);
        assert!(wrapped.lines().all(|line| line.starts_with("  ")));
    }
}
