//! Error types for catalog resolution and interface configuration

use thiserror::Error;

/// Errors raised while resolving configuration at setup time
///
/// All of these indicate a deployment mistake. They abort initialization;
/// nothing in the runtime path retries or recovers from them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The named mode-set profile does not exist
    #[error("unknown mode set: {0}")]
    UnknownModeSet(String),

    /// No mode in the catalog has the requested bitrate
    #[error("no mode with bitrate {bitrate} bps in mode set {set}")]
    UnknownBitrate {
        /// Requested bitrate in bits per second
        bitrate: u64,
        /// Name of the catalog that was searched
        set: String,
    },

    /// A mode set must contain at least one mode
    #[error("mode set {0} is empty")]
    EmptyModeSet(String),

    /// A mode set must contain at least one mandatory mode
    #[error("mode set {0} has no mandatory mode")]
    NoMandatoryMode(String),

    /// MAC address string could not be parsed
    #[error("invalid MAC address: {0}")]
    InvalidAddress(String),

    /// Stop time earlier than start time
    #[error("invalid time bounds: stop {stop_ms}ms precedes start {start_ms}ms")]
    InvalidTimeBounds {
        /// Configured start bound in milliseconds
        start_ms: u64,
        /// Configured stop bound in milliseconds
        stop_ms: u64,
    },
}
