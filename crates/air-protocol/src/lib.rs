//! Link-Layer Protocol Primitives
//!
//! This crate provides the shared vocabulary of the airlink MAC model:
//!
//! - **Mode catalogs**: named, immutable sets of transmission modes
//!   (bitrate + modulation + mandatory flag), queried by bitrate or by
//!   fastest/slowest-mandatory rules
//! - **Frame metadata**: link addresses, frame kinds, and the mode tags
//!   exchanged with the transmitting and receiving layers
//! - **The radio contract**: the command and notification types spoken
//!   between the MAC and an externally-owned radio
//!
//! # Example
//!
//! ```rust
//! use air_protocol::ModeSet;
//!
//! let modes = ModeSet::resolve("802.11b").unwrap();
//!
//! // 11 Mbps is an optional rate in the b catalog; acknowledging a frame
//! // received at it steps down to the nearest mandatory rate below.
//! let eleven = modes.mode_for_bitrate(11_000_000).unwrap();
//! assert!(!modes.is_mandatory(eleven));
//! assert_eq!(modes.next_slower_mandatory(eleven).unwrap().bitrate_bps, 2_000_000);
//! ```

pub mod error;
pub mod frame;
pub mod modes;
pub mod radio;

pub use error::ConfigError;
pub use frame::{
    Frame, FrameClass, FrameKind, MacAddress, ReceptionIndication, TransmissionRequest,
};
pub use modes::{ModeSet, Modulation, TransmissionMode};
pub use radio::{
    RadioCommand, RadioMode, RadioNotification, ReceptionState, SignalPart, TransmissionState,
};
