//! Interface actor
//!
//! Wraps a [`LinkInterface`] in an async task so the rest of the host can
//! talk to it over channels. The actor is the single-threaded event loop
//! the engine assumes: lifecycle commands, radio notifications, frame work
//! and timer firings all arrive through one receiver and are processed to
//! completion, in order, one at a time.
//!
//! # Example
//!
//! ```rust,ignore
//! use air_mac::actor::{run_link_actor, LinkActorCommand};
//! use tokio::sync::mpsc;
//!
//! let (cmd_tx, cmd_rx) = mpsc::channel(256);
//! let (event_tx, mut event_rx) = mpsc::channel(256);
//!
//! tokio::spawn(run_link_actor(interface, cmd_rx, event_tx, None));
//! ```

use air_protocol::{Frame, RadioCommand, RadioNotification};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::engine::LinkInterface;
use crate::error::MacError;
use crate::events::LinkEvent;
use crate::lifecycle::{InterfaceState, LifecycleCommand};
use crate::timer::{TimerId, TimerKind};

/// Commands sent to the interface actor
#[derive(Debug)]
pub enum LinkActorCommand {
    /// Apply a lifecycle command
    Lifecycle {
        /// The command to apply
        command: LifecycleCommand,
        /// Completion callback: whether the command transitioned state
        response: oneshot::Sender<bool>,
    },

    /// Deliver a notification raised by the radio
    Radio {
        /// The notification
        notification: RadioNotification,
    },

    /// Stamp an outgoing frame with its transmission mode
    StampFrame {
        /// The frame to stamp
        frame: Frame,
        /// Received frame an acknowledgment answers, if any
        in_response_to: Option<Frame>,
        /// The stamped frame, or why it was rejected
        response: oneshot::Sender<Result<Frame, MacError>>,
    },

    /// Deliver an inbound frame from the receive path
    FrameReceived {
        /// The received frame
        frame: Frame,
    },

    /// Arm a self-timer
    Schedule {
        /// Timer kind to arm
        kind: TimerKind,
        /// The armed handle, or why arming was rejected
        response: oneshot::Sender<Result<TimerId, MacError>>,
    },

    /// Deliver a timer firing from the host scheduler
    TimerFired {
        /// Handle of the firing timer
        id: TimerId,
    },

    /// Query the current lifecycle state
    QueryState {
        /// Channel to send back the state
        response: oneshot::Sender<InterfaceState>,
    },

    /// Shut down the actor
    Shutdown,
}

/// Run the interface actor
///
/// Processes commands until the channel closes or [`LinkActorCommand::Shutdown`]
/// arrives. Engine events are forwarded to `event_tx` after every command;
/// queued radio commands are forwarded to `radio_tx` when one is attached
/// (they also appear on the event stream as [`LinkEvent::RadioCommandIssued`]).
pub async fn run_link_actor(
    mut interface: LinkInterface,
    mut cmd_rx: mpsc::Receiver<LinkActorCommand>,
    event_tx: mpsc::Sender<LinkEvent>,
    radio_tx: Option<mpsc::Sender<RadioCommand>>,
) {
    info!("Interface actor started for {}", interface.address());

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            LinkActorCommand::Lifecycle { command, response } => {
                let transitioned = interface.apply_lifecycle(command);
                let _ = response.send(transitioned);
            }

            LinkActorCommand::Radio { notification } => {
                interface.radio_notification(notification);
            }

            LinkActorCommand::StampFrame {
                mut frame,
                in_response_to,
                response,
            } => {
                let result = interface
                    .stamp_outgoing(&mut frame, in_response_to.as_ref())
                    .map(|_| frame);
                let _ = response.send(result);
            }

            LinkActorCommand::FrameReceived { frame } => {
                if let Err(e) = interface.handle_received(&frame) {
                    warn!("Dropping inbound frame: {}", e);
                    let _ = event_tx
                        .send(LinkEvent::Error {
                            source: "receive".to_string(),
                            message: e.to_string(),
                        })
                        .await;
                }
            }

            LinkActorCommand::Schedule { kind, response } => {
                let _ = response.send(interface.schedule(kind));
            }

            LinkActorCommand::TimerFired { id } => {
                // Stale fires already emit an event; nothing else to do here
                let _ = interface.timer_fired(id);
            }

            LinkActorCommand::QueryState { response } => {
                let _ = response.send(interface.state());
            }

            LinkActorCommand::Shutdown => {
                info!("Interface actor shutting down");
                break;
            }
        }

        for command in interface.drain_radio_commands() {
            if let Some(ref tx) = radio_tx {
                if tx.send(command).await.is_err() {
                    warn!("Radio command channel closed");
                }
            }
        }
        for event in interface.drain_events() {
            if event_tx.send(event).await.is_err() {
                // Event consumer went away; keep applying commands anyway
                break;
            }
        }
    }

    info!("Interface actor stopped");
}
