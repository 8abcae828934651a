use clap::Parser;
use std::path::PathBuf;

/// Command line surface of the check tool. Auto-help is disabled so the
/// tool owns the `--help(-?)` / zero-args / parse-error contract (all of
/// them display usage and exit 0).
#[derive(Parser)]
#[command(name = "doccheck", version, about = "DOCCHECK CLI", disable_help_flag = true)]
pub struct CliArgs {
    /// Displays this help
    #[arg(short = '?', long)]
    pub help: bool,

    /// Location of the scenario definition file, e.g. scenarios.xml
    #[arg(short, long, value_parser = parse_pathbuf_allow_empty)]
    pub scenarios: Option<PathBuf>,

    /// Directory containing scenario content
    #[arg(short, long)]
    pub repository: Option<PathBuf>,

    /// Prints the check result to stdout
    #[arg(short, long, default_value_t = false)]
    pub print: bool,

    /// Defines the output directory for results. Defaults to cwd
    #[arg(short = 'o', long = "output-directory")]
    pub output_directory: Option<PathBuf>,

    /// Extract and save any html content within the result as a separate file
    #[arg(short = 'h', long, default_value_t = false)]
    pub html: bool,

    /// Prints some more debug information
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,

    /// Serializes the report input to the output directory
    #[arg(long = "serialize-report-input", default_value_t = false)]
    pub serialize_report_input: bool,

    /// Check the result using defined assertions
    #[arg(short = 'c', long = "check-assertions", value_name = "assertions-file")]
    pub check_assertions: Option<PathBuf>,

    /// Starts a daemon listening for validation requests
    #[arg(short = 'D', long, default_value_t = false)]
    pub daemon: bool,

    /// The hostname / IP address to bind the daemon. Default is localhost
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// The port to bind the daemon. Default is 8080
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Number of threads processing validation requests
    #[arg(short = 'T', long)]
    pub threads: Option<usize>,

    /// Disables the GUI of the daemon mode
    #[arg(short = 'G', long = "disable-gui", default_value_t = false)]
    pub disable_gui: bool,

    /// Prefix of the generated report name
    #[arg(long = "report-prefix")]
    pub report_prefix: Option<String>,

    /// Postfix of the generated report name
    #[arg(long = "report-postfix")]
    pub report_postfix: Option<String>,

    /// Prints some memory stats
    #[arg(short = 'm', long = "memory-stats", default_value_t = false)]
    pub memory_stats: bool,

    /// Test target files or directories to check (batch mode)
    #[arg(value_name = "FILE")]
    pub targets: Vec<PathBuf>,
}

/// clap's default `PathBuf` parser rejects empty values before they reach the
/// application; this parser accepts them so `option_value`'s uniform blank-value
/// validation can run (per SPEC_FULL.md: present-but-blank values are a fatal
/// configuration error, not a grammar error).
fn parse_pathbuf_allow_empty(s: &str) -> Result<PathBuf, std::convert::Infallible> {
    Ok(PathBuf::from(s))
}
