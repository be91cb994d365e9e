//! Control interface of the audio server
//!
//! Everything the crate needs from PulseAudio/PipeWire goes through the
//! [`AudioControl`] trait. The production implementation shells out to
//! `pactl`; tests swap in a scripted fake.

use crate::error::{ControlError, Result};
use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Default budget for enumeration commands
pub const DEFAULT_LIST_TIMEOUT: Duration = Duration::from_secs(2);

/// Default budget for short queries and control commands
pub const DEFAULT_CONTROL_TIMEOUT: Duration = Duration::from_secs(1);

/// Narrow view of the audio server's control CLI
///
/// Query operations return the raw text printed by the server so that
/// parsing stays with the callers.
#[async_trait]
pub trait AudioControl: Send + Sync {
    /// Verbose per-device text blocks for every output device
    async fn enumerate_devices(&self) -> Result<String>;

    /// Stable name of the current default output, possibly empty
    async fn get_default(&self) -> Result<String>;

    /// Make `name` the default output
    async fn set_default(&self, name: &str) -> Result<()>;

    /// Active playback streams, one per line, stream id first
    async fn enumerate_streams(&self) -> Result<String>;

    /// Move playback stream `stream_id` to output `name`
    async fn relocate_stream(&self, stream_id: &str, name: &str) -> Result<()>;
}

/// [`AudioControl`] backed by the `pactl` command
#[derive(Debug, Clone)]
pub struct Pactl {
    program: PathBuf,
    list_timeout: Duration,
    control_timeout: Duration,
}

impl Pactl {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            list_timeout: DEFAULT_LIST_TIMEOUT,
            control_timeout: DEFAULT_CONTROL_TIMEOUT,
        }
    }

    /// Set the per-invocation timeouts
    pub fn with_timeouts(mut self, list: Duration, control: Duration) -> Self {
        self.list_timeout = list;
        self.control_timeout = control;
        self
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut command = self.program.display().to_string();
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }

    /// Run the program once and return its stdout
    async fn run(&self, args: &[&str], timeout: Duration) -> Result<String> {
        let command = self.describe(args);
        debug!("Running `{}`", command);

        let mut cmd = Command::new(&self.program);
        // Keep block headers and keys in English regardless of the user's locale
        cmd.args(args)
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => return Err(ControlError::Launch { command, source }),
            Err(_) => return Err(ControlError::Timeout { command, timeout }),
        };

        if !output.status.success() {
            return Err(ControlError::Exit {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| ControlError::InvalidOutput {
            command,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl AudioControl for Pactl {
    async fn enumerate_devices(&self) -> Result<String> {
        self.run(&["list", "sinks"], self.list_timeout).await
    }

    async fn get_default(&self) -> Result<String> {
        self.run(&["get-default-sink"], self.control_timeout).await
    }

    async fn set_default(&self, name: &str) -> Result<()> {
        self.run(&["set-default-sink", name], self.list_timeout)
            .await
            .map(|_| ())
    }

    async fn enumerate_streams(&self) -> Result<String> {
        self.run(&["list", "short", "sink-inputs"], self.control_timeout)
            .await
    }

    async fn relocate_stream(&self, stream_id: &str, name: &str) -> Result<()> {
        self.run(&["move-sink-input", stream_id, name], self.control_timeout)
            .await
            .map(|_| ())
    }
}
