//! Output device enumeration
//!
//! Turns the verbose `pactl list sinks` text into [`Device`] records.

use super::control::AudioControl;
use crate::error::ListingFailure;
use crate::models::Device;
use log::debug;
use std::sync::Arc;

const BLOCK_HEADER: &str = "Sink #";
const NAME_KEY: &str = "Name:";
const DESCRIPTION_KEY: &str = "Description:";

/// Lists output devices through the control interface
#[derive(Clone)]
pub struct DeviceLister {
    control: Arc<dyn AudioControl>,
}

impl DeviceLister {
    pub fn new(control: Arc<dyn AudioControl>) -> Self {
        Self { control }
    }

    /// All output devices, in the order the audio server reports them
    pub async fn list_devices(&self) -> Result<Vec<Device>, ListingFailure> {
        let text = self.control.enumerate_devices().await?;
        Ok(parse_devices(&text))
    }

    /// Stable name of the default output, empty when none is known
    pub async fn get_default(&self) -> Result<String, ListingFailure> {
        let text = self.control.get_default().await?;
        Ok(parse_default(&text))
    }
}

/// Device record under construction
#[derive(Default)]
struct PartialDevice {
    id: String,
    name: Option<String>,
    description: Option<String>,
}

impl PartialDevice {
    fn finish(self) -> Option<Device> {
        let Some(name) = self.name else {
            debug!("Dropping sink #{} without a name", self.id);
            return None;
        };
        Some(Device {
            id: self.id,
            name,
            description: self.description,
        })
    }
}

fn value_of<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.strip_prefix(key).map(str::trim)
}

/// Parse `pactl list sinks` output
///
/// Blocks start at a `Sink #<id>` header. Within a block the last `Name:` and
/// `Description:` lines win. Lines before the first header are ignored.
pub fn parse_devices(text: &str) -> Vec<Device> {
    let mut devices = Vec::new();
    let mut current: Option<PartialDevice> = None;

    for line in text.lines().map(str::trim) {
        if let Some(id) = line.strip_prefix(BLOCK_HEADER) {
            if let Some(device) = current.take().and_then(PartialDevice::finish) {
                devices.push(device);
            }
            current = Some(PartialDevice {
                id: id.trim().to_string(),
                ..Default::default()
            });
            continue;
        }

        let Some(partial) = current.as_mut() else {
            continue;
        };
        if let Some(name) = value_of(line, NAME_KEY) {
            partial.name = Some(name.to_string());
        } else if let Some(description) = value_of(line, DESCRIPTION_KEY) {
            partial.description = Some(description.to_string());
        }
    }

    if let Some(device) = current.and_then(PartialDevice::finish) {
        devices.push(device);
    }

    devices
}

/// Parse `pactl get-default-sink` output
pub fn parse_default(text: &str) -> String {
    text.lines().next().unwrap_or_default().trim().to_string()
}
