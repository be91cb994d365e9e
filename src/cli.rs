//! Command-line interface for switch-sound
//!
//! Handles argument parsing and logging configuration.

use crate::settings::Settings;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

/// Switch the audio output and move playing streams along
#[derive(Parser, Debug)]
#[command(name = "switch-sound")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Increase logging verbosity
    /// -v = info, -vv = debug, -vvv = trace, -vvvv = all deps
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Audio server control program
    #[arg(long, value_name = "PATH", global = true)]
    pub pactl: Option<PathBuf>,

    /// How long a device listing stays fresh, in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    pub cache_ttl_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List output devices matching a filter (the default)
    Query {
        /// Print results as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Words to match against device labels and names
        filter: Vec<String>,
    },

    /// Switch to an output device and move playing streams to it
    Switch {
        /// Stable device name, as shown under each query result
        name: String,
    },

    /// Answer launcher requests read line by line from stdin
    Serve,

    /// Print plugin metadata as JSON
    Info,
}

impl Args {
    /// Subcommand to run, listing every device when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Query {
            json: false,
            filter: Vec::new(),
        })
    }

    /// Override settings with any flags given on the command line
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(pactl) = &self.pactl {
            settings.pactl = pactl.clone();
        }
        if let Some(ms) = self.cache_ttl_ms {
            settings.cache_ttl = Duration::from_millis(ms);
        }
    }

    /// Get the log level filter based on verbosity flags
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else {
            match self.verbose {
                0 => LevelFilter::Warn,
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }
}

/// Initialize the logging system based on CLI arguments
///
/// Logs go to stderr; stdout is reserved for launcher output.
pub fn init_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    // Base level for all modules - keep at warn to suppress noisy deps
    builder.filter_level(LevelFilter::Warn);

    builder.filter_module("switch_sound", args.log_level());

    // Runtime internals only at -vvvv
    if args.verbose >= 4 {
        builder.filter_level(args.log_level());
    }

    builder.format_timestamp_millis().init();
}
