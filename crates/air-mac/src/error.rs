//! Error types for the MAC engine

use thiserror::Error;

use crate::timer::TimerId;

/// Errors that can occur in the MAC engine
///
/// Apart from [`MacError::Config`], these mark integration bugs between the
/// engine and its collaborators: they are surfaced loudly instead of being
/// absorbed as dropped traffic.
#[derive(Debug, Error)]
pub enum MacError {
    /// Frame traffic requested while the interface is not up
    #[error("interface not running (state: {state})")]
    NotRunning {
        /// Name of the state the interface was in
        state: &'static str,
    },

    /// Acknowledgment rate derivation needs the mode the frame arrived at
    #[error("received frame carries no reception indication")]
    MissingReceptionTag,

    /// Response rate derivation needs the mode the request was sent at
    #[error("request frame carries no transmission request")]
    MissingTransmissionTag,

    /// A timer fired that is no longer armed
    #[error("stale timer fired: {0:?}")]
    StaleTimer(TimerId),

    /// Setup-time configuration error
    #[error(transparent)]
    Config(#[from] air_protocol::ConfigError),
}
