mod cli;
mod cli_modes;
mod render;

use anyhow::Result;
use cli::Cli;
use cli_modes::HenCli;
use hen_core::{Config, Hen};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("hen: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::new();
    init_logging(cli.verbose);

    if cli.paths {
        for path in Config::config_file_paths() {
            println!("{}", path.display());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if cli.now.is_some() {
        config.reference_datetime = cli.now;
    }
    let hen = Hen::with_config(config)?;

    HenCli::new(cli, hen).run()
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // Only fails if a logger is already set, and then that one is used.
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}
