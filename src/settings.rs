//! Plugin settings
//!
//! Defaults can be overridden in dconf under `/org/switch-sound/`, and
//! command-line flags override both.

use crate::audio::control::{DEFAULT_CONTROL_TIMEOUT, DEFAULT_LIST_TIMEOUT};
use crate::state::DEFAULT_TTL;
use log::{debug, warn};
use std::path::PathBuf;
use std::time::Duration;

const DCONF_PATH: &str = "/org/switch-sound/";

/// Keys for dconf settings
mod keys {
    pub const PACTL_PATH: &str = "pactl-path";
    pub const CACHE_TTL_MS: &str = "cache-ttl-ms";
    pub const LIST_TIMEOUT_MS: &str = "list-timeout-ms";
    pub const CONTROL_TIMEOUT_MS: &str = "control-timeout-ms";
}

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Audio server control program
    pub pactl: PathBuf,
    pub cache_ttl: Duration,
    /// Budget for `pactl list sinks` and `set-default-sink`
    pub list_timeout: Duration,
    /// Budget for every other pactl call
    pub control_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pactl: PathBuf::from("pactl"),
            cache_ttl: DEFAULT_TTL,
            list_timeout: DEFAULT_LIST_TIMEOUT,
            control_timeout: DEFAULT_CONTROL_TIMEOUT,
        }
    }
}

impl Settings {
    /// Defaults with any values stored in dconf applied
    pub fn load() -> Self {
        let mut settings = Self::default();
        settings.apply(read_dconf);
        settings
    }

    /// Apply overrides from `lookup`, which maps a key to its raw value
    fn apply(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(keys::PACTL_PATH) {
            self.pactl = PathBuf::from(path);
        }
        if let Some(ttl) = millis(&lookup, keys::CACHE_TTL_MS) {
            self.cache_ttl = ttl;
        }
        if let Some(timeout) = millis(&lookup, keys::LIST_TIMEOUT_MS) {
            self.list_timeout = timeout;
        }
        if let Some(timeout) = millis(&lookup, keys::CONTROL_TIMEOUT_MS) {
            self.control_timeout = timeout;
        }
    }
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(e) => {
            warn!("Ignoring dconf key {}{}={:?}: {}", DCONF_PATH, key, raw, e);
            None
        }
    }
}

/// Read a string key from dconf, treating unset and empty keys alike
fn read_dconf(key: &str) -> Option<String> {
    let path = format!("{}{}", DCONF_PATH, key);
    match dconf_rs::get_string(&path) {
        Ok(value) if !value.is_empty() => {
            debug!("dconf {} = {:?}", path, value);
            Some(value)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.pactl, PathBuf::from("pactl"));
        assert_eq!(settings.cache_ttl, Duration::from_secs(2));
        assert_eq!(settings.list_timeout, Duration::from_secs(2));
        assert_eq!(settings.control_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_overrides_applied() {
        let mut settings = Settings::default();
        settings.apply(lookup_from(&[
            ("pactl-path", "/usr/local/bin/pactl"),
            ("cache-ttl-ms", "500"),
            ("control-timeout-ms", " 250 "),
        ]));
        assert_eq!(settings.pactl, PathBuf::from("/usr/local/bin/pactl"));
        assert_eq!(settings.cache_ttl, Duration::from_millis(500));
        assert_eq!(settings.list_timeout, DEFAULT_LIST_TIMEOUT);
        assert_eq!(settings.control_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_bad_numbers_ignored() {
        let mut settings = Settings::default();
        settings.apply(lookup_from(&[("cache-ttl-ms", "soon"), ("list-timeout-ms", "-1")]));
        assert_eq!(settings, Settings::default());
    }
}
