use owo_colors::OwoColorize;

use midweek_core::{LandmarkReport, WeeklyProgram};

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "Midweek".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Extract weekly meeting programs from workbook pages\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: std::time::Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);
    if ms < 500.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 2000.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print one line per landmark, then the selection outcome
pub fn print_landmark_report(report: &LandmarkReport) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Landmarks".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for status in &report.landmarks {
        match (&status.element, &status.error) {
            (Some(element), _) => {
                eprintln!("  {} {:<26} {}", "✓".green(), status.landmark.to_string(), element.bright_white())
            }
            (None, Some(error)) => eprintln!("  {} {:<26} {}", "✗".red(), status.landmark.to_string(), error.bright_red()),
            (None, None) => eprintln!("  {} {:<26}", "?".yellow(), status.landmark.to_string()),
        }
    }
    eprintln!();

    match &report.error {
        None => print_success("Selection groups built"),
        Some(error) => print_error(error),
    }
}

/// Print a short summary of an extracted program
pub fn print_program_details(program: &WeeklyProgram) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Program Details".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("  {} {}", "Week:".dimmed(), program.week_date_span.bright_white());
    eprintln!("  {} {}", "Reading:".dimmed(), program.weekly_bible_chapters.bright_white());
    eprintln!(
        "  {} {}",
        "Sections:".dimmed(),
        program.section_numbers().len().to_string().bright_white()
    );
    eprintln!(
        "  {} {}\n",
        "Footnotes:".dimmed(),
        program.treasures_talk.footnotes.len().to_string().bright_white()
    );
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
