mod echo;

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use midweek_core::{
    Document, FetchConfig, Fetcher, HttpFetcher, JsonConfig, SelectionGroups, StaticFetcher, TextConfig, ToText,
    Workbook, WorkbookConfig, convert_to_json, convert_to_text, fetch_file, fetch_stdin, validate_landmarks,
};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::echo::{
    format_size, print_banner, print_info, print_landmark_report, print_program_details, print_step, print_success,
    print_timing,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for extracted records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(format!("Invalid format: {}. Valid options: json, text", s)),
        }
    }
}

/// Which part of the program to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Program,
    Week,
    Chapters,
    Songs,
    Treasures,
    Gems,
    Reading,
    FieldMinistry,
    Living,
    Study,
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "program" | "all" => Ok(Self::Program),
            "week" => Ok(Self::Week),
            "chapters" => Ok(Self::Chapters),
            "songs" => Ok(Self::Songs),
            "treasures" | "talk" => Ok(Self::Treasures),
            "gems" => Ok(Self::Gems),
            "reading" => Ok(Self::Reading),
            "field-ministry" | "ministry" => Ok(Self::FieldMinistry),
            "living" => Ok(Self::Living),
            "study" => Ok(Self::Study),
            _ => Err(format!(
                "Invalid section: {}. Valid options: program, week, chapters, songs, treasures, gems, reading, \
                 field-ministry, living, study",
                s
            )),
        }
    }
}

/// Extract a weekly meeting program from a workbook page as JSON or text
#[derive(Parser, Debug)]
#[command(name = "midweek")]
#[command(author = "Midweek Contributors")]
#[command(version)]
#[command(about = "Extract weekly meeting programs from workbook pages", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT", required_unless_present_any = ["year", "completions"])]
    input: Option<String>,

    /// Program year; with --week, builds the page URL instead of INPUT
    #[arg(long, requires = "week", conflicts_with = "input")]
    year: Option<i32>,

    /// Program week (1-53); used with --year
    #[arg(long, requires = "year")]
    week: Option<u32>,

    /// Section to extract (program, week, chapters, songs, treasures, gems, reading, field-ministry, living, study)
    #[arg(short, long, default_value = "program", value_name = "SECTION")]
    section: Section,

    /// Output format (json, text)
    #[arg(short, long, default_value = "json", value_name = "FORMAT")]
    format: OutputFormat,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print song lyrics (text only)
    #[arg(long)]
    lyrics: bool,

    /// Wrap text output at this width (0 = no wrapping)
    #[arg(long, default_value = "0", value_name = "COLS")]
    width: usize,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Site root that reference links resolve against
    #[arg(long, value_name = "URL")]
    site_root: Option<String>,

    /// Root of the reference API
    #[arg(long, value_name = "URL")]
    api_root: Option<String>,

    /// Serve every fetch from a JSON map of URL to body instead of the network
    #[arg(long, value_name = "FILE")]
    replay: Option<String>,

    /// Only check the page's landmarks; no references are fetched
    #[arg(long)]
    check: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn build_workbook(args: &Args) -> anyhow::Result<Workbook> {
    let mut config = WorkbookConfig::default();
    if let Some(site_root) = &args.site_root {
        config.site_root = site_root.clone();
    }
    if let Some(api_root) = &args.api_root {
        config.api_root = api_root.clone();
    }

    let fetcher: Arc<dyn Fetcher> = match &args.replay {
        Some(path) => {
            let fetcher =
                StaticFetcher::from_file(path).with_context(|| format!("Failed to load replay file: {}", path))?;
            if args.verbose {
                print_info(&format!("Replaying {} recorded responses", fetcher.len()));
            }
            Arc::new(fetcher)
        }
        None => {
            let mut fetch_config = FetchConfig { timeout: args.timeout, ..Default::default() };
            if let Some(user_agent) = &args.user_agent {
                fetch_config.user_agent = user_agent.clone();
            }
            Arc::new(HttpFetcher::new(fetch_config).context("Failed to build HTTP client")?)
        }
    };

    Workbook::new(config, fetcher).context("Invalid workbook configuration")
}

fn render<T: Serialize + ToText + ?Sized>(value: &T, args: &Args) -> anyhow::Result<String> {
    match args.format {
        OutputFormat::Json => {
            let json = convert_to_json(value, &JsonConfig { pretty: args.pretty }).context("Failed to serialize JSON")?;
            Ok(format!("{}\n", json))
        }
        OutputFormat::Text => {
            let config = TextConfig { line_width: args.width, include_lyrics: args.lyrics };
            Ok(format!("{}\n", convert_to_text(value, &config)))
        }
    }
}

async fn extract_section(workbook: &Workbook, groups: &SelectionGroups, args: &Args) -> anyhow::Result<String> {
    let output = match args.section {
        Section::Program => {
            let program = workbook.extract_full_program(groups).await.context("Failed to extract program")?;
            if args.verbose {
                print_program_details(&program);
            }
            render(&program, args)?
        }
        Section::Week => render(&workbook.extract_week_date_span(groups)?, args)?,
        Section::Chapters => render(&workbook.extract_weekly_bible_chapters(groups)?, args)?,
        Section::Songs => render(&workbook.extract_songs(groups).await.context("Failed to extract songs")?, args)?,
        Section::Treasures => render(
            &workbook.extract_treasures_talk(groups).await.context("Failed to extract treasures talk")?,
            args,
        )?,
        Section::Gems => render(
            &workbook.extract_spiritual_gems(groups).await.context("Failed to extract spiritual gems")?,
            args,
        )?,
        Section::Reading => render(
            &workbook.extract_bible_reading(groups).await.context("Failed to extract bible reading")?,
            args,
        )?,
        Section::FieldMinistry => render(
            &workbook.extract_field_ministry(groups).await.context("Failed to extract field ministry")?,
            args,
        )?,
        Section::Living => render(
            &workbook.extract_christian_living(groups).context("Failed to extract christian living")?,
            args,
        )?,
        Section::Study => {
            render(&workbook.extract_bible_study(groups).context("Failed to extract bible study")?, args)?
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "midweek", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let workbook = build_workbook(&args)?;
    let input = match (&args.input, args.year, args.week) {
        (Some(input), _, _) => input.clone(),
        (None, Some(year), Some(week)) => workbook.program_url(year, week).context("Invalid program week")?,
        _ => bail!("Either INPUT or --year with --week is required"),
    };

    debug!(input = %input, section = ?args.section, "starting extraction");

    let html = if input == "-" {
        if args.verbose {
            print_step(1, 4, "Reading from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")?
    } else if input.starts_with("http://") || input.starts_with("https://") {
        if args.verbose {
            print_step(1, 4, &format!("Fetching from {}", input.bright_white().underline()));
        }
        workbook.fetch_page(&input).await.context("Failed to fetch URL")?
    } else {
        if args.verbose {
            print_step(1, 4, &format!("Reading from file {}", input.bright_white()));
        }
        fetch_file(&input).with_context(|| format!("Failed to read file: {}", input))?
    };

    if args.verbose {
        eprintln!("  {} {}", "Size:".dimmed(), format_size(html.len()).bright_white());
        eprintln!();
        print_step(2, 4, "Parsing HTML document");
    }

    let doc = Document::parse(&html).context("Failed to parse HTML")?;

    if args.verbose {
        if let Some(title) = doc.title() {
            eprintln!("  {} {}", "Title:".dimmed(), title.bright_white());
        }
        eprintln!();
    }

    if args.check {
        let report = validate_landmarks(&doc);
        print_landmark_report(&report);
        if args.format == OutputFormat::Json {
            println!("{}", convert_to_json(&report, &JsonConfig { pretty: args.pretty })?);
        }
        if let Some(error) = report.error {
            bail!("Landmark check failed: {}", error);
        }
        return Ok(());
    }

    if args.verbose {
        print_step(3, 4, "Locating program sections");
    }

    let groups = SelectionGroups::build(&doc).context("Page does not match the workbook template")?;

    let started = Instant::now();
    let output = extract_section(&workbook, &groups, &args).await?;

    if args.verbose {
        print_timing("Extraction", started.elapsed());
        eprintln!();
        print_step(4, 4, "Writing output");
        eprintln!("  {} {}", "Format:".dimmed(), format!("{:?}", args.format).bright_white());
        eprintln!();
    }

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}
