mod cli;
mod commands;
mod paths;
mod render;
mod session;
mod settings;

use std::fs::File;

use clap::Parser;
use simplelog::ColorChoice;
use simplelog::CombinedLogger;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::SharedLogger;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::cli::Opts;

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Logs to stderr at the requested level and, when possible, everything
/// from debug up to `latest.log` in the cache directory.
fn init_logging(verbosity: u8) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level_for(verbosity),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));

    paths::rotate_logs();
    if let Some(path) = paths::log_file()
        && let Some(dir) = path.parent()
        && std::fs::create_dir_all(dir).is_ok()
        && let Ok(file) = File::create(&path)
    {
        loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file));
    }

    let _ = CombinedLogger::init(loggers);
}

#[tokio::main]
async fn main() {
    let opts = Opts::parse();
    init_logging(opts.verbose);

    if let Err(e) = commands::run(opts).await {
        log::debug!("command failed: {e:?}");
        eprintln!("error: {}", commands::report(&e));
        std::process::exit(1);
    }
}
