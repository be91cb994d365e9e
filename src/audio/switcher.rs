//! Switching the default output and moving playback along with it

use super::control::AudioControl;
use crate::state::DeviceCache;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio_util::task::TaskTracker;

/// Sets the default output and relocates active streams to it
///
/// Switches run on detached tasks and report nothing back. Failures are
/// logged and otherwise dropped; the user re-runs the query to see the
/// resulting state.
#[derive(Clone)]
pub struct Switcher {
    control: Arc<dyn AudioControl>,
    cache: Arc<DeviceCache>,
    tasks: TaskTracker,
}

impl Switcher {
    pub fn new(control: Arc<dyn AudioControl>, cache: Arc<DeviceCache>) -> Self {
        Self {
            control,
            cache,
            tasks: TaskTracker::new(),
        }
    }

    /// Start switching to `target_name` and return immediately
    ///
    /// Must be called from within a Tokio runtime.
    pub fn switch(&self, target_name: &str) {
        let this = self.clone();
        let target = target_name.to_string();
        self.tasks.spawn(async move { this.apply(&target).await });
    }

    /// Switch to `target_name` and wait for the whole sequence to finish
    pub async fn apply(&self, target_name: &str) {
        info!("Switching audio output to {}", target_name);

        if let Err(e) = self.control.set_default(target_name).await {
            warn!("Failed to set default output to {}: {}", target_name, e);
        }

        match self.control.enumerate_streams().await {
            Ok(text) => {
                let streams = parse_stream_ids(&text);
                debug!("Relocating {} active streams", streams.len());
                for stream_id in streams {
                    // One stuck stream must not keep the others on the old output
                    if let Err(e) = self.control.relocate_stream(stream_id, target_name).await {
                        warn!("Failed to move stream {} to {}: {}", stream_id, target_name, e);
                    }
                }
            }
            Err(e) => warn!("Failed to list active streams: {}", e),
        }

        self.cache.invalidate().await;
    }

    /// Wait for every switch started so far to finish
    pub async fn drain(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }
}

/// Stream ids from `pactl list short sink-inputs` output
pub fn parse_stream_ids(text: &str) -> Vec<&str> {
    text.lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect()
}
