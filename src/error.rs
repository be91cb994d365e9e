//! Error types for talking to the audio server

use std::time::Duration;
use thiserror::Error;

/// Result type alias for control interface calls
pub type Result<T> = std::result::Result<T, ControlError>;

/// A single invocation of the control program failed
#[derive(Debug, Error)]
pub enum ControlError {
    /// The program could not be started at all
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The program did not finish within its budget
    #[error("`{command}` timed out after {}ms", .timeout.as_millis())]
    Timeout { command: String, timeout: Duration },

    /// The program exited with a non-zero status
    #[error("`{command}` exited with {status}: {stderr}")]
    Exit {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The program printed something we cannot read
    #[error("`{command}` returned unparsable output: {reason}")]
    InvalidOutput { command: String, reason: String },
}

/// Enumerating output devices (or the default one) failed
#[derive(Debug, Error)]
#[error("listing audio outputs failed: {0}")]
pub struct ListingFailure(#[from] pub ControlError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = ControlError::Timeout {
            command: "pactl list sinks".to_string(),
            timeout: Duration::from_secs(2),
        };
        assert_eq!(err.to_string(), "`pactl list sinks` timed out after 2000ms");
    }

    #[test]
    fn test_listing_failure_wraps_source() {
        let failure = ListingFailure::from(ControlError::InvalidOutput {
            command: "pactl get-default-sink".to_string(),
            reason: "not UTF-8".to_string(),
        });
        assert!(failure.to_string().starts_with("listing audio outputs failed: "));
        assert!(failure.to_string().ends_with("not UTF-8"));
    }
}
