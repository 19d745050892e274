//! Transmission rate selection
//!
//! Picks the mode for each outgoing frame by frame class. Data, multicast
//! and control frames each get a fixed mode resolved once at setup;
//! acknowledgments and other response control frames follow the classic
//! convention: respond at the eliciting frame's rate when that rate is
//! mandatory, otherwise step down to the nearest slower mandatory rate,
//! never below the configured control-frame floor.

use std::sync::Arc;

use air_protocol::{Frame, FrameKind, ModeSet, RadioNotification, TransmissionMode};
use tracing::debug;

use crate::config::RateOverrides;
use crate::error::MacError;

/// Adaptive rate control capability
///
/// The selection path always goes through one of these; deployments without
/// adaptive control get [`FixedRate`], which simply echoes the configured
/// data mode. Implementations may maintain whatever success/failure state
/// they like off the feedback hooks.
pub trait RateControl: Send {
    /// Prime the controller with the catalog and the configured data mode
    ///
    /// Called once when the controller is attached; the catalog is what the
    /// controller explores when it decides to move off the initial rate.
    fn init(&mut self, modes: &ModeSet, data_mode: TransmissionMode);

    /// The rate to use for the next unicast data or management frame
    fn current_rate(&self) -> TransmissionMode;

    /// Feedback: a pending transmission completed
    fn transmission_finished(&mut self) {}

    /// Feedback: channel activity observed at the radio
    fn channel_activity(&mut self, _notification: &RadioNotification) {}
}

/// Trivial rate control: always the fixed data mode
#[derive(Debug, Clone, Copy)]
pub struct FixedRate {
    mode: TransmissionMode,
}

impl FixedRate {
    /// Create a fixed-rate controller pinned to the given mode
    pub fn new(mode: TransmissionMode) -> Self {
        Self { mode }
    }
}

impl RateControl for FixedRate {
    fn init(&mut self, _modes: &ModeSet, data_mode: TransmissionMode) {
        self.mode = data_mode;
    }

    fn current_rate(&self) -> TransmissionMode {
        self.mode
    }
}

/// Per-interface rate selection policy
pub struct RateSelection {
    modes: Arc<ModeSet>,
    control_mode: TransmissionMode,
    multicast_mode: TransmissionMode,
    data_mode: TransmissionMode,
    slowest_mandatory: TransmissionMode,
    rate_control: Box<dyn RateControl>,
}

impl std::fmt::Debug for RateSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateSelection")
            .field("control_mode", &self.control_mode)
            .field("multicast_mode", &self.multicast_mode)
            .field("data_mode", &self.data_mode)
            .field("slowest_mandatory", &self.slowest_mandatory)
            .field("rate_control", &"<dyn RateControl>")
            .finish()
    }
}

impl RateSelection {
    /// Resolve the fixed modes against the catalog
    ///
    /// Every configured bitrate must exist in the catalog exactly; failures
    /// happen here, at setup, never on the send path.
    pub fn new(modes: Arc<ModeSet>, rates: &RateOverrides) -> Result<Self, MacError> {
        let control_mode = match rates.control_bitrate {
            Some(bps) => modes.mode_for_bitrate(bps)?,
            None => modes.slowest_mandatory(),
        };
        let multicast_mode = match rates.multicast_bitrate {
            Some(bps) => modes.mode_for_bitrate(bps)?,
            None => modes.fastest_mandatory(),
        };
        let data_mode = match rates.data_bitrate {
            Some(bps) => modes.mode_for_bitrate(bps)?,
            None => modes.fastest(),
        };
        let slowest_mandatory = modes.slowest_mandatory();

        debug!(
            "Rate selection over {}: control {}, multicast {}, data {}",
            modes.name(),
            control_mode,
            multicast_mode,
            data_mode
        );

        Ok(Self {
            modes,
            control_mode,
            multicast_mode,
            data_mode,
            slowest_mandatory,
            rate_control: Box::new(FixedRate::new(data_mode)),
        })
    }

    /// The catalog this selector resolves against
    pub fn modes(&self) -> &ModeSet {
        &self.modes
    }

    /// The slowest mandatory mode of the catalog
    pub fn slowest_mandatory(&self) -> TransmissionMode {
        self.slowest_mandatory
    }

    /// The fixed control-frame mode
    pub fn control_mode(&self) -> TransmissionMode {
        self.control_mode
    }

    /// The fixed multicast mode
    pub fn multicast_mode(&self) -> TransmissionMode {
        self.multicast_mode
    }

    /// The fixed data mode
    pub fn data_mode(&self) -> TransmissionMode {
        self.data_mode
    }

    /// Replace the rate-control capability and prime it
    pub fn attach_rate_control(&mut self, mut control: Box<dyn RateControl>) {
        control.init(&self.modes, self.data_mode);
        self.rate_control = control;
    }

    /// Mode for a unicast data or management frame
    pub fn mode_for_unicast(&self, _frame: &Frame) -> TransmissionMode {
        self.rate_control.current_rate()
    }

    /// Mode for a multicast data or management frame
    pub fn mode_for_multicast(&self, _frame: &Frame) -> TransmissionMode {
        self.multicast_mode
    }

    /// Mode for a control frame
    ///
    /// An acknowledgment to a received frame answers at that frame's
    /// reception rate when the rate is mandatory, else at the nearest slower
    /// mandatory rate, else at the fixed control mode. Every other control
    /// frame uses the fixed control mode.
    pub fn mode_for_control(
        &self,
        data_frame: Option<&Frame>,
        control_frame: &Frame,
    ) -> Result<TransmissionMode, MacError> {
        if control_frame.kind == FrameKind::Ack {
            if let Some(data_frame) = data_frame {
                let indication = data_frame
                    .reception_indication()
                    .ok_or(MacError::MissingReceptionTag)?;
                return Ok(self.respond_at(indication.mode));
            }
        }
        Ok(self.control_mode)
    }

    /// Mode for a control frame sent in response to a frame we transmit
    ///
    /// Same mandatory/step-down/floor rule as [`Self::mode_for_control`],
    /// keyed off the outgoing frame's transmission-request tag.
    pub fn mode_for_response(
        &self,
        request_frame: Option<&Frame>,
    ) -> Result<TransmissionMode, MacError> {
        match request_frame {
            Some(frame) => {
                let request = frame
                    .transmission_request()
                    .ok_or(MacError::MissingTransmissionTag)?;
                Ok(self.respond_at(request.mode))
            }
            None => Ok(self.control_mode),
        }
    }

    /// The response-rate rule shared by acknowledgments and other responses
    fn respond_at(&self, eliciting: TransmissionMode) -> TransmissionMode {
        if self.modes.is_mandatory(eliciting) {
            eliciting
        } else {
            self.modes
                .next_slower_mandatory(eliciting)
                .unwrap_or(self.control_mode)
        }
    }

    /// Forward a transmission-finished feedback event to the rate control
    pub fn notify_transmission_finished(&mut self) {
        self.rate_control.transmission_finished();
    }

    /// Forward observed channel activity to the rate control
    pub fn notify_channel_activity(&mut self, notification: &RadioNotification) {
        self.rate_control.channel_activity(notification);
    }
}
