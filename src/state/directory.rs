//! Short-lived cache of the device directory
//!
//! Launchers re-run the query on every keystroke. The cache collapses those
//! into at most one enumeration per TTL window.

use crate::audio::DeviceLister;
use crate::error::ListingFailure;
use crate::models::DeviceDirectory;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// How long a fetched directory stays fresh by default
pub const DEFAULT_TTL: Duration = Duration::from_secs(2);

/// Process-wide holder of the latest [`DeviceDirectory`]
///
/// The mutex is held across a refresh, so concurrent readers share one fetch
/// and an invalidate issued mid-refresh applies once that refresh lands.
pub struct DeviceCache {
    lister: DeviceLister,
    ttl: Duration,
    snapshot: Mutex<Option<Arc<DeviceDirectory>>>,
}

impl DeviceCache {
    pub fn new(lister: DeviceLister, ttl: Duration) -> Self {
        Self {
            lister,
            ttl,
            snapshot: Mutex::new(None),
        }
    }

    /// Current directory, refreshed first if stale
    pub async fn get_snapshot(&self) -> Result<Arc<DeviceDirectory>, ListingFailure> {
        let mut slot = self.snapshot.lock().await;
        if let Some(snapshot) = slot.as_ref() {
            if snapshot.fetched_at.elapsed() < self.ttl {
                return Ok(snapshot.clone());
            }
        }

        let fresh = Arc::new(self.fetch().await?);
        *slot = Some(fresh.clone());
        Ok(fresh)
    }

    /// Refresh now if the snapshot is missing or older than the TTL
    pub async fn maybe_refresh(&self) -> Result<(), ListingFailure> {
        self.get_snapshot().await.map(|_| ())
    }

    /// Force the next read to go back to the audio server
    pub async fn invalidate(&self) {
        debug!("Invalidating device directory");
        *self.snapshot.lock().await = None;
    }

    async fn fetch(&self) -> Result<DeviceDirectory, ListingFailure> {
        debug!("Refreshing device directory");
        let devices = self.lister.list_devices().await?;
        // Older PulseAudio has no get-default-sink; the devices are still usable
        let default_name = match self.lister.get_default().await {
            Ok(name) => name,
            Err(e) => {
                warn!("Default output unknown: {}", e);
                String::new()
            }
        };
        debug!(
            "Found {} output devices, default {:?}",
            devices.len(),
            default_name
        );
        Ok(DeviceDirectory {
            devices,
            default_name,
            fetched_at: Instant::now(),
        })
    }
}
