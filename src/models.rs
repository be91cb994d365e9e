use serde::Serialize;
use tokio::time::Instant;

/// An audio output device (a "sink" in pactl terms)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Numeric block id as printed by the audio server
    pub id: String,
    /// Stable identifier used when talking to the audio server
    pub name: String,
    /// Human-readable label, when the server provides one
    pub description: Option<String>,
}

impl Device {
    /// Label to show the user, falling back to the stable name
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }
}

/// One fetch of the audio server's output devices
#[derive(Debug, Clone)]
pub struct DeviceDirectory {
    /// Devices in the order the audio server listed them
    pub devices: Vec<Device>,
    /// Stable name of the default device, empty when unknown
    pub default_name: String,
    pub fetched_at: Instant,
}

impl DeviceDirectory {
    pub fn is_default(&self, device: &Device) -> bool {
        !self.default_name.is_empty() && device.name == self.default_name
    }
}

/// Presentation category of a result, mapped to a theme icon by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    OutputDevice,
    ActiveOutput,
    Bluetooth,
    BluetoothActive,
    Usb,
    UsbActive,
    ServiceUnreachable,
    NoDevicesFound,
}

impl Category {
    /// Freedesktop icon theme name for this category
    pub fn icon(&self) -> &'static str {
        match self {
            Category::OutputDevice => "audio-card",
            Category::ActiveOutput => "audio-volume-high",
            Category::Bluetooth => "bluetooth",
            Category::BluetoothActive => "bluetooth-active",
            Category::Usb => "audio-headphones",
            Category::UsbActive => "audio-headset",
            Category::ServiceUnreachable | Category::NoDevicesFound => "dialog-error",
        }
    }
}

/// Action bound to a result item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub id: &'static str,
    pub text: String,
    /// Stable device name to switch to
    pub target: String,
}

/// A single entry for the launcher to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    pub id: String,
    pub text: String,
    pub subtext: String,
    pub icon: &'static str,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}
