//! Unified event stream for the MAC engine
//!
//! Everything observable about the interface (lifecycle transitions, radio
//! commands, forwarded radio activity, frame handling, timer sweeps) is
//! emitted through a single event enum. Observers drain one stream instead
//! of subscribing to per-signal identifiers.

use air_protocol::{FrameKind, RadioCommand, RadioNotification, TransmissionMode};

use crate::lifecycle::InterfaceState;
use crate::timer::TimerId;

/// Unified event enum for all interface activity
#[derive(Debug, Clone)]
pub enum LinkEvent {
    /// The interface changed lifecycle state
    StateChanged {
        /// Previous state
        from: InterfaceState,
        /// New state
        to: InterfaceState,
    },

    /// A command was queued for the radio
    RadioCommandIssued {
        /// The queued command
        command: RadioCommand,
    },

    /// The radio finished transmitting the pending frame
    TransmissionFinished,

    /// A radio notification, forwarded verbatim
    RadioActivity {
        /// The notification as the radio raised it
        notification: RadioNotification,
    },

    /// An outgoing frame was stamped with its transmission mode
    FrameStamped {
        /// Kind of the stamped frame
        kind: FrameKind,
        /// Mode chosen for it
        mode: TransmissionMode,
    },

    /// An inbound frame was accepted
    FrameReceived {
        /// Kind of the received frame
        kind: FrameKind,
        /// Mode it was received at, when indicated
        mode: Option<TransmissionMode>,
    },

    /// Teardown swept the armed self-timers
    TimersCanceled {
        /// How many timers were pending
        count: usize,
    },

    /// A timer fired after it was canceled or already consumed
    StaleTimerFired {
        /// The stale handle
        id: TimerId,
    },

    /// An error occurred in the engine
    Error {
        /// Source of the error
        source: String,
        /// Error message
        message: String,
    },
}

impl LinkEvent {
    /// Check if this is a lifecycle event
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, LinkEvent::StateChanged { .. })
    }

    /// Check if this event reflects radio-side activity
    pub fn is_radio(&self) -> bool {
        matches!(
            self,
            LinkEvent::RadioCommandIssued { .. }
                | LinkEvent::RadioActivity { .. }
                | LinkEvent::TransmissionFinished
        )
    }

    /// Check if this event reflects frame traffic
    pub fn is_traffic(&self) -> bool {
        matches!(
            self,
            LinkEvent::FrameStamped { .. } | LinkEvent::FrameReceived { .. }
        )
    }
}
