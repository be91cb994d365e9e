//! Launcher-facing side of the plugin
//!
//! Besides the one-shot CLI commands, launchers can keep a `serve` process
//! around and talk to it over stdin/stdout, one request per line and one JSON
//! reply per line:
//!
//! ```text
//! query <text>        -> [ResultItem, ...]
//! activate <name>     -> {"ok":true}
//! info                -> Metadata
//! ```

use crate::audio::Switcher;
use crate::models::ResultItem;
use crate::query::QueryHandler;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Static description of the plugin for launcher registration
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Metadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub default_trigger: &'static str,
    pub synopsis: &'static str,
}

pub const METADATA: Metadata = Metadata {
    id: "switch-sound",
    name: "Switch Sound Output",
    description: "Switch audio output and move active streams",
    version: env!("CARGO_PKG_VERSION"),
    default_trigger: "sound ",
    synopsis: "<output name>",
};

/// One line of the `serve` protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Query(String),
    Activate(String),
    Info,
}

impl Request {
    /// Parse a request line; blank lines yield `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Request>, String> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }

        let (verb, rest) = line
            .trim_start()
            .split_once(' ')
            .unwrap_or((line.trim_start(), ""));
        match verb {
            "query" => Ok(Some(Request::Query(rest.to_string()))),
            "activate" if !rest.trim().is_empty() => {
                Ok(Some(Request::Activate(rest.trim().to_string())))
            }
            "activate" => Err("activate needs a device name".to_string()),
            "info" => Ok(Some(Request::Info)),
            other => Err(format!("unknown request: {}", other)),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Reply<'a> {
    Results(&'a [ResultItem]),
    Metadata(&'a Metadata),
    Done { ok: bool },
    Failed { error: String },
}

/// Query handling plus switching, as seen by a launcher
pub struct Plugin {
    handler: QueryHandler,
    switcher: Switcher,
}

impl Plugin {
    pub fn new(handler: QueryHandler, switcher: Switcher) -> Self {
        Self { handler, switcher }
    }

    /// Results for `filter`, which the host passes with its trigger removed
    pub async fn query(&self, filter: &str) -> Vec<ResultItem> {
        debug!("Query {:?}", filter);
        self.handler.handle(filter).await
    }

    /// Switch to `target_name` without waiting
    pub fn activate(&self, target_name: &str) {
        self.handler.activate(target_name);
    }

    /// Switch to `target_name` and wait until streams have been moved
    pub async fn activate_and_wait(&self, target_name: &str) {
        self.switcher.apply(target_name).await;
    }

    /// Answer requests from `input` until it is exhausted
    ///
    /// Switches still running at end of input are waited for before
    /// returning.
    pub async fn serve<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Serving launcher requests on stdin");
        let mut lines = input.lines();

        while let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read request")?
        {
            let reply = match Request::parse(&line) {
                Ok(None) => continue,
                Ok(Some(Request::Query(text))) => {
                    let results = self.query(&text).await;
                    serde_json::to_string(&Reply::Results(&results))
                }
                Ok(Some(Request::Activate(name))) => {
                    self.activate(&name);
                    serde_json::to_string(&Reply::Done { ok: true })
                }
                Ok(Some(Request::Info)) => serde_json::to_string(&Reply::Metadata(&METADATA)),
                Err(error) => serde_json::to_string(&Reply::Failed { error }),
            }
            .context("Failed to encode reply")?;

            output
                .write_all(reply.as_bytes())
                .await
                .context("Failed to write reply")?;
            output
                .write_all(b"\n")
                .await
                .context("Failed to write reply")?;
            output.flush().await.context("Failed to flush reply")?;
        }

        debug!("End of input, waiting for pending switches");
        self.switcher.drain().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::control::fake::FakeControl;
    use crate::audio::DeviceLister;
    use crate::state::{DeviceCache, DEFAULT_TTL};
    use std::sync::Arc;

    const SINKS: &str = "\
Sink #0
\tName: alsa_output.analog
\tDescription: Built-in Audio
Sink #1
\tName: bluez_output.headset
\tDescription: Bluetooth Headset
";

    fn plugin_over(fake: &Arc<FakeControl>) -> Plugin {
        let cache = Arc::new(DeviceCache::new(DeviceLister::new(fake.clone()), DEFAULT_TTL));
        let switcher = Switcher::new(fake.clone(), cache.clone());
        Plugin::new(QueryHandler::new(cache, switcher.clone()), switcher)
    }

    #[test]
    fn test_parse_requests() {
        assert_eq!(Request::parse(""), Ok(None));
        assert_eq!(Request::parse("   \r\n"), Ok(None));
        assert_eq!(Request::parse("query"), Ok(Some(Request::Query(String::new()))));
        assert_eq!(
            Request::parse("query usb headset"),
            Ok(Some(Request::Query("usb headset".to_string())))
        );
        assert_eq!(
            Request::parse("activate bluez_output.headset\n"),
            Ok(Some(Request::Activate("bluez_output.headset".to_string())))
        );
        assert_eq!(Request::parse("info"), Ok(Some(Request::Info)));
        assert!(Request::parse("activate").is_err());
        assert!(Request::parse("mute everything").is_err());
    }

    #[tokio::test]
    async fn test_trigger_word_is_an_ordinary_filter() {
        let sinks = "\
Sink #0
\tName: alsa_output.analog
\tDescription: Built-in Audio
Sink #3
\tName: alsa_output.usb-generic
\tDescription: USB Sound Device
";
        let fake = Arc::new(FakeControl::new(sinks, ""));
        let plugin = plugin_over(&fake);

        let results = plugin.query("sound").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "USB Sound Device");

        assert!(plugin.query("sound blue").await.is_empty());
    }

    #[tokio::test]
    async fn test_serve_round_trip() {
        let fake = Arc::new(FakeControl::new(SINKS, "alsa_output.analog"));
        let plugin = plugin_over(&fake);
        let input: &[u8] = b"info\nquery blue\n\nactivate bluez_output.headset\nbogus\n";
        let mut output = Vec::new();

        plugin.serve(input, &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        let replies: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(replies.len(), 4);
        assert_eq!(replies[0]["id"], "switch-sound");
        assert_eq!(replies[1][0]["text"], "Bluetooth Headset");
        assert_eq!(replies[1][0]["category"], "bluetooth");
        assert_eq!(replies[1][0]["action"]["target"], "bluez_output.headset");
        assert_eq!(replies[2]["ok"], true);
        assert_eq!(replies[3]["error"], "unknown request: bogus");

        // serve drains pending switches before returning
        assert_eq!(fake.count("set_default bluez_output.headset"), 1);
    }

    #[tokio::test]
    async fn test_serve_reports_unreachable_server() {
        let fake = Arc::new(FakeControl::unreachable());
        let plugin = plugin_over(&fake);
        let mut output = Vec::new();

        plugin.serve(&b"query\n"[..], &mut output).await.unwrap();

        let reply: serde_json::Value =
            serde_json::from_str(String::from_utf8(output).unwrap().trim()).unwrap();
        assert_eq!(reply[0]["category"], "service-unreachable");
        assert!(reply[0].get("action").is_none());
    }
}
