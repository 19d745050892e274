//! The link interface engine
//!
//! `LinkInterface` ties the pieces together: it owns the resolved catalog,
//! the rate-selection policy, the lifecycle state machine and the radio
//! event bridge, routes between them, and exposes the two queues the host
//! drains — a unified event stream and the outgoing radio command queue.
//!
//! The engine is a plain single-threaded state machine: every entry point
//! runs to completion before the next event is processed, and the radio is
//! only ever influenced through queued commands.

use std::collections::VecDeque;
use std::sync::Arc;

use air_protocol::{
    Frame, FrameClass, MacAddress, ModeSet, RadioCommand, RadioMode, RadioNotification,
    TransmissionMode, TransmissionRequest,
};
use tracing::{debug, info, warn};

use crate::bridge::RadioEventBridge;
use crate::config::InterfaceConfig;
use crate::error::MacError;
use crate::events::LinkEvent;
use crate::lifecycle::{InterfaceState, LifecycleCommand, LifecycleController};
use crate::rate::{RateControl, RateSelection};
use crate::timer::{TimerId, TimerKind};

/// The MAC engine for one link-layer interface
pub struct LinkInterface {
    config: InterfaceConfig,
    address: MacAddress,
    modes: Arc<ModeSet>,
    rates: RateSelection,
    lifecycle: LifecycleController,
    bridge: RadioEventBridge,
    events: Vec<LinkEvent>,
    radio_commands: VecDeque<RadioCommand>,
}

impl LinkInterface {
    /// Build an interface from its configuration
    ///
    /// All configuration is resolved here: the catalog profile, the three
    /// fixed rates, the MAC address and the time bounds. Any failure aborts
    /// construction; a constructed interface cannot fail a fixed-mode lookup.
    pub fn with_config(config: InterfaceConfig) -> Result<Self, MacError> {
        config.validate_time_bounds()?;
        let modes = Arc::new(ModeSet::resolve(&config.mode_set)?);
        let rates = RateSelection::new(Arc::clone(&modes), &config.rates)?;
        let address = MacAddress::resolve(&config.address)?;

        info!(
            "Interface {} configured over {} ({} modes)",
            address,
            modes.name(),
            modes.len()
        );

        Ok(Self {
            config,
            address,
            modes,
            rates,
            lifecycle: LifecycleController::new(),
            bridge: RadioEventBridge::new(),
            events: Vec::new(),
            radio_commands: VecDeque::new(),
        })
    }

    /// Get the configuration the interface was built from
    pub fn config(&self) -> &InterfaceConfig {
        &self.config
    }

    /// The interface's link address
    pub fn address(&self) -> MacAddress {
        self.address
    }

    /// The resolved mode catalog
    pub fn modes(&self) -> &ModeSet {
        &self.modes
    }

    /// Current lifecycle state
    pub fn state(&self) -> InterfaceState {
        self.lifecycle.state()
    }

    /// Whether frame traffic may flow
    pub fn is_operational(&self) -> bool {
        self.lifecycle.is_operational()
    }

    /// Last radio mode observed by the bridge
    pub fn observed_radio_mode(&self) -> RadioMode {
        self.bridge.radio_mode()
    }

    /// Replace the adaptive rate-control capability
    pub fn attach_rate_control(&mut self, control: Box<dyn RateControl>) {
        self.rates.attach_rate_control(control);
    }

    // -------------------------------------------------------------------
    // Lifecycle surface
    // -------------------------------------------------------------------

    /// Apply a lifecycle command; true if it transitioned state
    ///
    /// Re-delivered or out-of-sequence commands are accepted no-ops.
    pub fn apply_lifecycle(&mut self, command: LifecycleCommand) -> bool {
        let outcome = self.lifecycle.apply(command);

        if let Some((from, to)) = outcome.transitioned {
            self.events.push(LinkEvent::StateChanged { from, to });
        }
        if let Some(count) = outcome.canceled_timers {
            self.events.push(LinkEvent::TimersCanceled { count });
        }
        if let Some(desired) = outcome.desired_radio_mode {
            // Commands are idempotent against the observed radio state:
            // a radio already in the desired mode gets nothing.
            if self.bridge.radio_mode() != desired {
                self.queue_radio_command(RadioCommand::SetMode { mode: desired });
            }
        }

        outcome.transitioned.is_some()
    }

    // -------------------------------------------------------------------
    // Radio surface
    // -------------------------------------------------------------------

    /// Process one notification raised by the radio
    ///
    /// Runs synchronously in notification order. The transmission-finished
    /// edge completes the pending transmission and re-arms the receiver;
    /// everything else is forwarded verbatim to the event stream and the
    /// rate-control capability.
    pub fn radio_notification(&mut self, notification: RadioNotification) {
        let observation = self.bridge.observe(&notification);

        if observation.transmission_finished {
            debug!("Transmission finished, returning radio to receive");
            self.events.push(LinkEvent::TransmissionFinished);
            self.rates.notify_transmission_finished();
            if self.bridge.radio_mode() != RadioMode::Receiver {
                self.queue_radio_command(RadioCommand::SetMode {
                    mode: RadioMode::Receiver,
                });
            }
        }

        self.rates.notify_channel_activity(&notification);
        self.events.push(LinkEvent::RadioActivity { notification });
    }

    // -------------------------------------------------------------------
    // Frame surface (used by the relay layer above the transmit path)
    // -------------------------------------------------------------------

    /// Choose a mode for an outgoing frame and attach its request tag
    ///
    /// `in_response_to` carries the received frame an acknowledgment
    /// answers; it is ignored for other frame kinds. Rejected unless the
    /// interface is up.
    pub fn stamp_outgoing(
        &mut self,
        frame: &mut Frame,
        in_response_to: Option<&Frame>,
    ) -> Result<TransmissionMode, MacError> {
        self.ensure_operational()?;

        let mode = match frame.class() {
            FrameClass::Control => self.rates.mode_for_control(in_response_to, frame)?,
            FrameClass::MulticastDataOrMgmt => self.rates.mode_for_multicast(frame),
            FrameClass::UnicastDataOrMgmt => self.rates.mode_for_unicast(frame),
        };

        frame.set_transmission_request(TransmissionRequest { mode });
        debug!("Stamped {:?} frame to {} at {}", frame.kind, frame.dest, mode);
        self.events.push(LinkEvent::FrameStamped {
            kind: frame.kind,
            mode,
        });
        Ok(mode)
    }

    /// Mode a peer is expected to answer the given outgoing frame at
    ///
    /// Keyed off the frame's transmission-request tag; used to listen for
    /// the response at the right rate.
    pub fn expected_response_mode(&self, request: &Frame) -> Result<TransmissionMode, MacError> {
        self.rates.mode_for_response(Some(request))
    }

    /// Accept an inbound frame from the receive path
    ///
    /// Rejected unless the interface is up.
    pub fn handle_received(&mut self, frame: &Frame) -> Result<(), MacError> {
        self.ensure_operational()?;

        let mode = frame.reception_indication().map(|tag| tag.mode);
        debug!("Received {:?} frame from {}", frame.kind, frame.src);
        self.events.push(LinkEvent::FrameReceived {
            kind: frame.kind,
            mode,
        });
        Ok(())
    }

    /// Convenience: stamp an acknowledgment for a received frame
    pub fn acknowledge(&mut self, received: &Frame) -> Result<Frame, MacError> {
        let mut ack = Frame::ack(self.address, received.src);
        self.stamp_outgoing(&mut ack, Some(received))?;
        Ok(ack)
    }

    fn ensure_operational(&self) -> Result<(), MacError> {
        if self.lifecycle.is_operational() {
            Ok(())
        } else {
            warn!(
                "Frame traffic rejected: interface is {}",
                self.lifecycle.state().name()
            );
            Err(MacError::NotRunning {
                state: self.lifecycle.state().name(),
            })
        }
    }

    // -------------------------------------------------------------------
    // Timer surface
    // -------------------------------------------------------------------

    /// Arm a self-timer (the host schedules the actual deadline)
    pub fn schedule(&mut self, kind: TimerKind) -> Result<TimerId, MacError> {
        self.lifecycle.arm_timer(kind)
    }

    /// Cancel one self-timer; true if it was still armed
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.lifecycle.cancel_timer(id)
    }

    /// Deliver a timer firing from the host scheduler
    ///
    /// A stale handle (canceled, already fired, or swept by teardown) is an
    /// error and emits a [`LinkEvent::StaleTimerFired`].
    pub fn timer_fired(&mut self, id: TimerId) -> Result<TimerKind, MacError> {
        match self.lifecycle.timer_fired(id) {
            Ok(kind) => Ok(kind),
            Err(err) => {
                warn!("Timer {:?} fired but is no longer armed", id);
                self.events.push(LinkEvent::StaleTimerFired { id });
                Err(err)
            }
        }
    }

    /// Number of armed self-timers
    pub fn pending_timers(&self) -> usize {
        self.lifecycle.pending_timers()
    }

    // -------------------------------------------------------------------
    // Queues drained by the host
    // -------------------------------------------------------------------

    /// Drain pending events
    pub fn drain_events(&mut self) -> Vec<LinkEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drain queued radio commands, oldest first
    pub fn drain_radio_commands(&mut self) -> Vec<RadioCommand> {
        self.radio_commands.drain(..).collect()
    }

    /// Pop the oldest queued radio command
    pub fn next_radio_command(&mut self) -> Option<RadioCommand> {
        self.radio_commands.pop_front()
    }

    fn queue_radio_command(&mut self, command: RadioCommand) {
        info!("Queueing radio command {:?}", command);
        self.radio_commands.push_back(command);
        self.events.push(LinkEvent::RadioCommandIssued { command });
    }
}

impl std::fmt::Debug for LinkInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkInterface")
            .field("address", &self.address)
            .field("state", &self.lifecycle.state())
            .field("mode_set", &self.modes.name())
            .finish()
    }
}
