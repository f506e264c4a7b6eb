use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("midweek")
        .version("1.0.0")
        .author("Midweek Contributors")
        .about("Extract weekly meeting programs from workbook pages")
        .arg(clap::arg!([INPUT] "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(clap::arg!(--year <YEAR> "Program year; with --week, builds the page URL instead of INPUT"))
        .arg(clap::arg!(--week <WEEK> "Program week (1-53); used with --year"))
        .arg(
            clap::arg!(-s --section <SECTION> "Section to extract")
                .value_name("SECTION")
                .default_value("program")
                .value_parser([
                    "program",
                    "week",
                    "chapters",
                    "songs",
                    "treasures",
                    "gems",
                    "reading",
                    "field-ministry",
                    "living",
                    "study",
                ]),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (json, text)")
                .value_name("FORMAT")
                .default_value("json")
                .value_parser(["json", "text"]),
        )
        .arg(clap::arg!(--pretty "Pretty print JSON output"))
        .arg(clap::arg!(--lyrics "Print song lyrics (text only)"))
        .arg(clap::arg!(--width <COLS> "Wrap text output at this width (0 = no wrapping)").default_value("0"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(--site_root <URL> "Site root that reference links resolve against"))
        .arg(clap::arg!(--api_root <URL> "Root of the reference API"))
        .arg(
            clap::arg!(--replay <FILE> "Serve every fetch from a JSON map of URL to body")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--check "Only check the page's landmarks"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"))
        .arg(
            clap::arg!(--completions <SHELL> "Generate shell completion script")
                .value_name("SHELL")
                .value_parser(["bash", "zsh", "fish", "powershell"]),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "midweek", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "midweek", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "midweek", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "midweek", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
