//! Link-Layer MAC Engine
//!
//! This crate provides the MAC policy core of the airlink model: for every
//! outgoing frame it picks the transmission mode by frame class, and for
//! the interface as a whole it runs the operational lifecycle (bring-up,
//! shutdown, crash) while staying consistent with an independently-clocked
//! radio.
//!
//! # Architecture
//!
//! [`LinkInterface`] is a plain single-threaded state machine in the
//! engine-and-queues style: callers mutate it through typed entry points
//! (lifecycle commands, radio notifications, frame stamping, timer
//! firings), and the host drains two queues in return — a unified
//! [`LinkEvent`] stream for observers and the outgoing [`RadioCommand`]
//! queue for the radio. The radio itself is owned elsewhere; the engine
//! only observes its notifications and enqueues mode changes.
//!
//! For async hosts, [`run_link_actor`] wraps the engine in a task fed by a
//! single mpsc channel, which is exactly the serialization the engine
//! expects.
//!
//! # Example
//!
//! ```rust
//! use air_mac::{InterfaceConfig, LifecycleCommand, LinkInterface, StartStage};
//!
//! let mut iface = LinkInterface::with_config(InterfaceConfig {
//!     mode_set: "802.11b".to_string(),
//!     ..Default::default()
//! }).unwrap();
//!
//! iface.apply_lifecycle(LifecycleCommand::Start(StartStage::Local));
//! iface.apply_lifecycle(LifecycleCommand::Start(StartStage::LinkLayer));
//! assert!(iface.is_operational());
//! ```

pub mod actor;
pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod rate;
pub mod timer;

// Re-export actor types
pub use actor::{run_link_actor, LinkActorCommand};

// Re-export engine types
pub use engine::LinkInterface;
pub use error::MacError;
pub use events::LinkEvent;

// Re-export policy and lifecycle types
pub use bridge::RadioEventBridge;
pub use config::{InterfaceConfig, RateOverrides};
pub use lifecycle::{
    InterfaceState, LifecycleCommand, LifecycleController, ShutdownStage, StartStage,
};
pub use rate::{FixedRate, RateControl, RateSelection};
pub use timer::{TimerId, TimerKind};

// Re-export the radio contract alongside the engine that speaks it
pub use air_protocol::{RadioCommand, RadioNotification};
