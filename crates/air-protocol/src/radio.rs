//! The radio contract
//!
//! The radio is an independently-owned component with its own state machine.
//! The MAC never mutates it directly: it enqueues [`RadioCommand`]s which the
//! radio applies in its own event order, and it observes [`RadioNotification`]s
//! the radio raises on each of its state transitions. Both sides of that
//! contract live here so the MAC engine and any radio implementation (real or
//! simulated) agree on the types.

/// Operating mode of the radio front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RadioMode {
    /// Powered off
    Off,
    /// Powered but neither receiving nor transmitting
    Sleep,
    /// Listening for incoming transmissions
    Receiver,
    /// Actively transmitting
    Transmitter,
    /// Full-duplex capable front end
    Transceiver,
}

impl RadioMode {
    /// Get a human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            RadioMode::Off => "off",
            RadioMode::Sleep => "sleep",
            RadioMode::Receiver => "receiver",
            RadioMode::Transmitter => "transmitter",
            RadioMode::Transceiver => "transceiver",
        }
    }
}

/// Transmission-side state of the radio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransmissionState {
    /// No transmission state observed yet
    Undefined,
    /// Transmitter idle
    Idle,
    /// Frame going out
    Transmitting,
}

/// Reception-side state of the radio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReceptionState {
    /// No reception state observed yet
    Undefined,
    /// Channel clear
    Idle,
    /// Energy on the channel that is not a decodable frame
    Busy,
    /// Frame coming in
    Receiving,
}

/// Part of the incoming signal currently being received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalPart {
    /// Synchronization preamble
    Preamble,
    /// PHY header
    Header,
    /// Payload portion
    Data,
}

/// Command addressed to the radio
///
/// Commands are queued as outgoing control messages and applied by the radio
/// in its own event order; they are never applied in-place from within a
/// notification handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RadioCommand {
    /// Switch the radio front end to the given mode
    SetMode {
        /// Desired operating mode
        mode: RadioMode,
    },
}

/// Notification raised by the radio on one of its state transitions
///
/// Notifications are delivered synchronously, in the order the radio raises
/// them, before any frame-level effect they gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RadioNotification {
    /// The radio's operating mode changed
    RadioModeChanged {
        /// Previous mode
        from: RadioMode,
        /// New mode
        to: RadioMode,
    },
    /// The reception-side state changed
    ReceptionStateChanged {
        /// Previous state
        from: ReceptionState,
        /// New state
        to: ReceptionState,
    },
    /// The transmission-side state changed
    TransmissionStateChanged {
        /// Previous state
        from: TransmissionState,
        /// New state
        to: TransmissionState,
    },
    /// Reception progressed to another part of the incoming signal
    ReceivedSignalPartChanged {
        /// Part now being received
        part: SignalPart,
    },
}

impl RadioNotification {
    /// Whether this notification marks a completed transmission
    /// (transmitter fell back from Transmitting to Idle)
    pub fn is_transmission_finished(&self) -> bool {
        matches!(
            self,
            RadioNotification::TransmissionStateChanged {
                from: TransmissionState::Transmitting,
                to: TransmissionState::Idle,
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transmission_finished_edge() {
        let finished = RadioNotification::TransmissionStateChanged {
            from: TransmissionState::Transmitting,
            to: TransmissionState::Idle,
        };
        assert!(finished.is_transmission_finished());

        let started = RadioNotification::TransmissionStateChanged {
            from: TransmissionState::Idle,
            to: TransmissionState::Transmitting,
        };
        assert!(!started.is_transmission_finished());

        let mode = RadioNotification::RadioModeChanged {
            from: RadioMode::Off,
            to: RadioMode::Receiver,
        };
        assert!(!mode.is_transmission_finished());
    }
}
