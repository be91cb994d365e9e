//! Turning a free-text query into launcher results

use crate::audio::Switcher;
use crate::models::{Action, Category, Device, DeviceDirectory, ResultItem};
use crate::state::DeviceCache;
use log::warn;
use std::sync::Arc;

const ITEM_PREFIX: &str = "switch-sound";
const ERROR_ITEM_ID: &str = "switch-sound-error";

/// Answers launcher queries from the device cache
pub struct QueryHandler {
    cache: Arc<DeviceCache>,
    switcher: Switcher,
}

impl QueryHandler {
    pub fn new(cache: Arc<DeviceCache>, switcher: Switcher) -> Self {
        Self { cache, switcher }
    }

    /// Results for `filter`, never an error
    ///
    /// A failed or empty listing yields a single diagnostic item so the user
    /// always gets feedback.
    pub async fn handle(&self, filter: &str) -> Vec<ResultItem> {
        let directory = match self.cache.get_snapshot().await {
            Ok(directory) => directory,
            Err(e) => {
                warn!("{}", e);
                return vec![diagnostic(Category::ServiceUnreachable)];
            }
        };

        if directory.devices.is_empty() {
            return vec![diagnostic(Category::NoDevicesFound)];
        }

        build_results(&directory, filter)
    }

    /// Run the switch action bound to the result for `target_name`
    pub fn activate(&self, target_name: &str) {
        self.switcher.switch(target_name);
    }
}

/// Filter and present a directory, keeping the server's order
pub fn build_results(directory: &DeviceDirectory, filter: &str) -> Vec<ResultItem> {
    let needle = filter.trim().to_lowercase();
    directory
        .devices
        .iter()
        .filter(|device| matches(device, &needle))
        .map(|device| present(device, directory.is_default(device)))
        .collect()
}

/// `needle` must already be lowercase
fn matches(device: &Device, needle: &str) -> bool {
    needle.is_empty()
        || device.label().to_lowercase().contains(needle)
        || device.name.to_lowercase().contains(needle)
}

/// Category from the transport named in the device's stable name
pub fn categorize(name: &str, is_default: bool) -> Category {
    let name = name.to_lowercase();
    match (name.contains("bluez"), name.contains("usb"), is_default) {
        (true, _, false) => Category::Bluetooth,
        (true, _, true) => Category::BluetoothActive,
        (false, true, false) => Category::Usb,
        (false, true, true) => Category::UsbActive,
        (false, false, false) => Category::OutputDevice,
        (false, false, true) => Category::ActiveOutput,
    }
}

/// Launcher item for one device
pub fn present(device: &Device, is_default: bool) -> ResultItem {
    let label = device.label();
    let text = if is_default {
        format!("{} (active)", label)
    } else {
        label.to_string()
    };
    let category = categorize(&device.name, is_default);

    ResultItem {
        id: format!("{}-{}", ITEM_PREFIX, device.id),
        text,
        subtext: device.name.clone(),
        icon: category.icon(),
        category,
        action: Some(Action {
            id: "switch",
            text: format!("Switch to {}", label),
            target: device.name.clone(),
        }),
    }
}

fn diagnostic(category: Category) -> ResultItem {
    let (text, subtext) = match category {
        Category::NoDevicesFound => (
            "No audio outputs found",
            "Make sure PulseAudio/PipeWire is running",
        ),
        _ => (
            "Error loading audio outputs",
            "Check if PulseAudio/PipeWire is running",
        ),
    };
    ResultItem {
        id: ERROR_ITEM_ID.to_string(),
        text: text.to_string(),
        subtext: subtext.to_string(),
        icon: category.icon(),
        category,
        action: None,
    }
}
