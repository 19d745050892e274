//! Virtual radio simulation
//!
//! Provides a simulated radio that raises the same notifications a real
//! radio front end would, edge by edge, as its state changes. The MAC side
//! stays identical whether it is wired to this or to hardware: it applies
//! queued commands and observes the resulting notifications.

use std::collections::VecDeque;

use air_protocol::{
    RadioCommand, RadioMode, RadioNotification, ReceptionState, SignalPart, TransmissionState,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A simulated radio front end
#[derive(Debug)]
pub struct VirtualRadio {
    /// Unique identifier for this virtual radio
    id: String,
    /// Current operating mode
    mode: RadioMode,
    /// Transmission-side state
    transmission_state: TransmissionState,
    /// Reception-side state
    reception_state: ReceptionState,
    /// Notifications raised but not yet delivered
    pending: VecDeque<RadioNotification>,
}

/// Configuration for creating a virtual radio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualRadioConfig {
    /// Display name/identifier
    pub id: String,
    /// Operating mode the radio powers up in
    pub initial_mode: RadioMode,
}

impl Default for VirtualRadioConfig {
    fn default() -> Self {
        Self {
            id: "Virtual Radio".to_string(),
            initial_mode: RadioMode::Off,
        }
    }
}

impl VirtualRadio {
    /// Create a new virtual radio, powered off
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mode: RadioMode::Off,
            transmission_state: TransmissionState::Undefined,
            reception_state: ReceptionState::Undefined,
            pending: VecDeque::new(),
        }
    }

    /// Create a virtual radio from configuration
    pub fn from_config(config: VirtualRadioConfig) -> Self {
        let mut radio = Self::new(config.id);
        radio.set_mode(config.initial_mode);
        radio.pending.clear();
        radio
    }

    /// Get the radio's unique identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current operating mode
    pub fn mode(&self) -> RadioMode {
        self.mode
    }

    /// Current transmission-side state
    pub fn transmission_state(&self) -> TransmissionState {
        self.transmission_state
    }

    /// Current reception-side state
    pub fn reception_state(&self) -> ReceptionState {
        self.reception_state
    }

    /// Apply a command from the MAC's outgoing queue
    pub fn apply(&mut self, command: RadioCommand) {
        match command {
            RadioCommand::SetMode { mode } => self.set_mode(mode),
        }
    }

    /// Switch the operating mode, raising the matching notification edges
    pub fn set_mode(&mut self, mode: RadioMode) {
        if self.mode == mode {
            return;
        }
        let from = self.mode;
        self.mode = mode;
        debug!("{}: mode {} -> {}", self.id, from.name(), mode.name());
        self.pending
            .push_back(RadioNotification::RadioModeChanged { from, to: mode });

        match mode {
            RadioMode::Receiver | RadioMode::Transceiver => {
                self.set_reception_state(ReceptionState::Idle);
                if mode == RadioMode::Transceiver {
                    self.set_transmission_state(TransmissionState::Idle);
                }
            }
            RadioMode::Transmitter => {
                self.set_transmission_state(TransmissionState::Idle);
            }
            RadioMode::Off | RadioMode::Sleep => {
                self.set_transmission_state(TransmissionState::Undefined);
                self.set_reception_state(ReceptionState::Undefined);
            }
        }
    }

    /// Start transmitting a frame; true if the radio could
    pub fn begin_transmission(&mut self) -> bool {
        if !matches!(self.mode, RadioMode::Transmitter | RadioMode::Transceiver) {
            return false;
        }
        self.set_transmission_state(TransmissionState::Transmitting);
        true
    }

    /// Finish the in-flight transmission; true if one was in flight
    pub fn finish_transmission(&mut self) -> bool {
        if self.transmission_state != TransmissionState::Transmitting {
            return false;
        }
        self.set_transmission_state(TransmissionState::Idle);
        true
    }

    /// Start receiving an incoming frame; true if the radio could
    pub fn begin_reception(&mut self) -> bool {
        if !matches!(self.mode, RadioMode::Receiver | RadioMode::Transceiver) {
            return false;
        }
        self.set_reception_state(ReceptionState::Receiving);
        true
    }

    /// Report progress into another part of the incoming signal
    pub fn signal_part(&mut self, part: SignalPart) {
        self.pending
            .push_back(RadioNotification::ReceivedSignalPartChanged { part });
    }

    /// Finish the in-flight reception; true if one was in flight
    pub fn finish_reception(&mut self) -> bool {
        if self.reception_state != ReceptionState::Receiving {
            return false;
        }
        self.set_reception_state(ReceptionState::Idle);
        true
    }

    /// Take the oldest pending notification
    pub fn take_notification(&mut self) -> Option<RadioNotification> {
        self.pending.pop_front()
    }

    /// Drain all pending notifications, oldest first
    pub fn drain_notifications(&mut self) -> Vec<RadioNotification> {
        self.pending.drain(..).collect()
    }

    fn set_transmission_state(&mut self, to: TransmissionState) {
        if self.transmission_state == to {
            return;
        }
        let from = self.transmission_state;
        self.transmission_state = to;
        self.pending
            .push_back(RadioNotification::TransmissionStateChanged { from, to });
    }

    fn set_reception_state(&mut self, to: ReceptionState) {
        if self.reception_state == to {
            return;
        }
        let from = self.reception_state;
        self.reception_state = to;
        self.pending
            .push_back(RadioNotification::ReceptionStateChanged { from, to });
    }
}
