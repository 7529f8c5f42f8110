use chrono::NaiveDateTime;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::render::ColorMode;

/// hen: turns a Vietnamese event sentence into a calendar record
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Prints the config file locations, in the order they are tried.
    #[arg(long, exclusive = true)]
    pub paths: bool,
    /// Prints the record as JSON instead of a Markdown card.
    #[arg(long, short)]
    pub json: bool,
    /// Resolves relative dates from this moment instead of the wall clock
    /// (e.g., `--now "2025-11-07 09:00"`).
    #[arg(long, value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,
    /// Reads this config file instead of the standard locations.
    #[arg(long, env = "HEN_CONFIG")]
    pub config: Option<PathBuf>,
    /// Control ANSI colors in output.
    /// By default, colors are disabled when output is redirected (e.g with `>` or `|`).
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
    /// Logs each extraction step on stderr (`-v` debug, `-vv` trace).
    #[arg(long, short, action = ArgAction::Count)]
    pub verbose: u8,

    /// The sentence to parse (e.g., `hen Họp nhóm 10h sáng mai ở phòng 302`).
    /// Without it, $VISUAL or $EDITOR is opened to write one.
    #[arg()]
    pub text: Vec<String>,
}

impl Cli {
    pub fn new() -> Self {
        Cli::parse()
    }
}

const NOW_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    NOW_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DD HH:MM, got {s:?}"))
}
