//! Radio event bridge
//!
//! Observes the notifications the radio raises on its own state transitions
//! and keeps a cache of the last observed radio state. The radio is owned
//! elsewhere; this side never mutates it, and never answers a notification
//! with an in-place call back into it. Mode changes always travel as queued
//! commands.

use air_protocol::{RadioMode, RadioNotification, ReceptionState, TransmissionState};
use tracing::debug;

/// What the engine should do about one observed notification
#[derive(Debug, Default)]
pub(crate) struct BridgeObservation {
    /// The pending transmission completed on this notification
    pub transmission_finished: bool,
}

/// Observer of the radio's state transitions
#[derive(Debug)]
pub struct RadioEventBridge {
    radio_mode: RadioMode,
    transmission_state: TransmissionState,
    reception_state: ReceptionState,
}

impl RadioEventBridge {
    /// Create a bridge that has observed nothing yet
    pub fn new() -> Self {
        Self {
            radio_mode: RadioMode::Off,
            transmission_state: TransmissionState::Undefined,
            reception_state: ReceptionState::Undefined,
        }
    }

    /// Last observed radio mode
    pub fn radio_mode(&self) -> RadioMode {
        self.radio_mode
    }

    /// Last observed transmission state
    pub fn transmission_state(&self) -> TransmissionState {
        self.transmission_state
    }

    /// Last observed reception state
    pub fn reception_state(&self) -> ReceptionState {
        self.reception_state
    }

    /// Record one notification and report what it means
    pub(crate) fn observe(&mut self, notification: &RadioNotification) -> BridgeObservation {
        let mut observation = BridgeObservation::default();

        match *notification {
            RadioNotification::RadioModeChanged { to, .. } => {
                self.radio_mode = to;
            }
            RadioNotification::TransmissionStateChanged { from, to } => {
                // The finished edge is keyed on the radio's reported
                // previous state, not our cache, so a missed notification
                // cannot fabricate a completion.
                if from == TransmissionState::Transmitting && to == TransmissionState::Idle {
                    observation.transmission_finished = true;
                }
                self.transmission_state = to;
            }
            RadioNotification::ReceptionStateChanged { to, .. } => {
                self.reception_state = to;
            }
            RadioNotification::ReceivedSignalPartChanged { part } => {
                debug!("Receiving signal part {:?}", part);
            }
        }

        observation
    }
}

impl Default for RadioEventBridge {
    fn default() -> Self {
        Self::new()
    }
}
