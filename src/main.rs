//! switch-sound - switch the audio output from a launcher
//!
//! Lists PulseAudio/PipeWire output devices, filters them against a query
//! and switches the default output, moving playing streams along.

mod audio;
mod cli;
mod error;
mod models;
mod plugin;
mod query;
mod settings;
mod state;
mod tokio_runtime;

use anyhow::{Context, Result};
use audio::{AudioControl, DeviceLister, Pactl, Switcher};
use clap::Parser;
use cli::Command;
use log::{debug, info};
use models::ResultItem;
use plugin::{Plugin, METADATA};
use query::QueryHandler;
use settings::Settings;
use state::DeviceCache;
use std::sync::Arc;
use tokio::io::BufReader;

fn main() -> Result<()> {
    // Parse command-line arguments and initialize logging
    let args = cli::Args::parse();
    cli::init_logging(&args);

    let mut settings = Settings::load();
    args.apply(&mut settings);
    debug!("Using {:?}", settings);

    let runtime = tokio_runtime::build().context("Failed to create Tokio runtime")?;
    runtime.block_on(run(args.command(), settings))
}

async fn run(command: Command, settings: Settings) -> Result<()> {
    let control: Arc<dyn AudioControl> = Arc::new(
        Pactl::new(&settings.pactl).with_timeouts(settings.list_timeout, settings.control_timeout),
    );
    let cache = Arc::new(DeviceCache::new(
        DeviceLister::new(control.clone()),
        settings.cache_ttl,
    ));
    let switcher = Switcher::new(control, cache.clone());
    let plugin = Plugin::new(QueryHandler::new(cache.clone(), switcher.clone()), switcher);

    match command {
        Command::Query { json, filter } => {
            let results = plugin.query(&filter.join(" ")).await;
            if json {
                let out = serde_json::to_string_pretty(&results)
                    .context("Failed to encode results")?;
                println!("{}", out);
            } else {
                print_results(&results);
            }
        }
        Command::Switch { name } => {
            plugin.activate_and_wait(&name).await;
            info!("Switched to {}", name);
        }
        Command::Serve => {
            // Warm up so the first keystroke does not pay for the listing
            if let Err(e) = cache.maybe_refresh().await {
                debug!("Initial device listing failed: {}", e);
            }
            plugin
                .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await?;
        }
        Command::Info => {
            let out =
                serde_json::to_string_pretty(&METADATA).context("Failed to encode metadata")?;
            println!("{}", out);
        }
    }

    Ok(())
}

fn print_results(results: &[ResultItem]) {
    for item in results {
        println!("{}\t{}", item.text, item.subtext);
    }
}
