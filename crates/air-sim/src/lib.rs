//! Link-Layer Simulation Library
//!
//! This crate provides a simulation layer for exercising the airlink MAC
//! without radio hardware:
//!
//! - **VirtualRadio**: a radio front end that applies queued commands and
//!   raises the same state-change notifications a real radio would
//!
//! # Example
//!
//! ```rust
//! use air_sim::VirtualRadio;
//! use air_protocol::{RadioCommand, RadioMode};
//!
//! let mut radio = VirtualRadio::new("sim0");
//! radio.apply(RadioCommand::SetMode { mode: RadioMode::Receiver });
//!
//! // Deliver what the radio raised back to the observing side
//! while let Some(notification) = radio.take_notification() {
//!     println!("radio raised {:?}", notification);
//! }
//! ```

pub mod radio;

pub use radio::{VirtualRadio, VirtualRadioConfig};
