//! Interface lifecycle state machine
//!
//! Tracks the operational state of one interface and applies lifecycle
//! commands to it. Bring-up and teardown are staged: local configuration
//! must complete before link-layer activation, and teardown unwinds in the
//! same order. Commands that do not apply to the current state are accepted
//! and ignored, because lifecycle requests may be re-delivered.

use air_protocol::RadioMode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::MacError;
use crate::timer::{TimerId, TimerKind, TimerSet};

/// Operational state of the interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterfaceState {
    /// Not configured, not running
    Down,
    /// Local configuration done, link layer not yet active
    Starting,
    /// Fully operational
    Up,
    /// Graceful teardown in progress
    ShuttingDown,
    /// Failed hard; no graceful teardown was performed
    Crashed,
}

impl InterfaceState {
    /// Get a human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            InterfaceState::Down => "down",
            InterfaceState::Starting => "starting",
            InterfaceState::Up => "up",
            InterfaceState::ShuttingDown => "shutting down",
            InterfaceState::Crashed => "crashed",
        }
    }
}

/// Stage of a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartStage {
    /// Parse configuration, subscribe to radio notifications
    Local,
    /// Register the link layer and activate the radio
    LinkLayer,
}

/// Stage of a shutdown request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStage {
    /// Deactivate the link layer
    LinkLayer,
    /// Release local resources
    Local,
}

/// A lifecycle command
///
/// The set of operations is closed; dispatch is an exhaustive match, so an
/// unsupported operation kind cannot reach the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleCommand {
    /// Advance the start sequence by one stage
    Start(StartStage),
    /// Advance the shutdown sequence by one stage
    Shutdown(ShutdownStage),
    /// Fail hard, skipping graceful teardown
    Crash,
}

/// Side effects of an applied lifecycle command, for the engine to act on
#[derive(Debug, Default)]
pub(crate) struct LifecycleOutcome {
    /// `(from, to)` when the command transitioned state
    pub transitioned: Option<(InterfaceState, InterfaceState)>,
    /// Timers canceled on teardown entry
    pub canceled_timers: Option<usize>,
    /// Radio mode the interface now wants, subject to the observed mode
    pub desired_radio_mode: Option<RadioMode>,
}

/// The lifecycle state machine for one interface
#[derive(Debug)]
pub struct LifecycleController {
    state: InterfaceState,
    timers: TimerSet,
}

impl LifecycleController {
    /// Create a controller in the initial Down state
    pub fn new() -> Self {
        Self {
            state: InterfaceState::Down,
            timers: TimerSet::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> InterfaceState {
        self.state
    }

    /// Whether frame traffic may flow
    pub fn is_operational(&self) -> bool {
        self.state == InterfaceState::Up
    }

    /// Number of armed self-timers
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Apply a lifecycle command
    ///
    /// Commands for a stage the controller is not expecting are no-ops, not
    /// errors. The returned outcome describes what actually happened.
    pub(crate) fn apply(&mut self, command: LifecycleCommand) -> LifecycleOutcome {
        let mut outcome = LifecycleOutcome::default();

        match (self.state, command) {
            (InterfaceState::Down, LifecycleCommand::Start(StartStage::Local))
            | (InterfaceState::Crashed, LifecycleCommand::Start(StartStage::Local)) => {
                self.transition(InterfaceState::Starting, &mut outcome);
            }
            (InterfaceState::Starting, LifecycleCommand::Start(StartStage::LinkLayer)) => {
                self.transition(InterfaceState::Up, &mut outcome);
                outcome.desired_radio_mode = Some(RadioMode::Receiver);
            }
            (InterfaceState::Up, LifecycleCommand::Shutdown(ShutdownStage::LinkLayer)) => {
                self.transition(InterfaceState::ShuttingDown, &mut outcome);
                outcome.canceled_timers = Some(self.timers.cancel_all());
                outcome.desired_radio_mode = Some(RadioMode::Off);
            }
            (InterfaceState::ShuttingDown, LifecycleCommand::Shutdown(ShutdownStage::Local)) => {
                self.transition(InterfaceState::Down, &mut outcome);
            }
            (
                InterfaceState::Starting | InterfaceState::Up | InterfaceState::ShuttingDown,
                LifecycleCommand::Crash,
            ) => {
                self.transition(InterfaceState::Crashed, &mut outcome);
                outcome.canceled_timers = Some(self.timers.cancel_all());
            }
            (state, command) => {
                debug!("Ignoring lifecycle command {:?} in state {}", command, state.name());
            }
        }

        outcome
    }

    fn transition(&mut self, to: InterfaceState, outcome: &mut LifecycleOutcome) {
        let from = self.state;
        self.state = to;
        outcome.transitioned = Some((from, to));
        info!("Interface state: {} -> {}", from.name(), to.name());
    }

    /// Arm a self-timer
    ///
    /// Requires the interface to be up, except for start-phase timer kinds,
    /// which may also be armed while starting.
    pub fn arm_timer(&mut self, kind: TimerKind) -> Result<TimerId, MacError> {
        let allowed = self.is_operational()
            || (self.state == InterfaceState::Starting && kind.allowed_while_starting());
        if !allowed {
            return Err(MacError::NotRunning {
                state: self.state.name(),
            });
        }
        Ok(self.timers.arm(kind))
    }

    /// Cancel one self-timer; true if it was still armed
    pub fn cancel_timer(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id).is_some()
    }

    /// Consume a firing timer
    ///
    /// A handle that is no longer armed (canceled, already fired, or swept
    /// by teardown) is a stale fire and reported as an error.
    pub fn timer_fired(&mut self, id: TimerId) -> Result<TimerKind, MacError> {
        self.timers.take(id).ok_or(MacError::StaleTimer(id))
    }
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bring_up(ctrl: &mut LifecycleController) {
        ctrl.apply(LifecycleCommand::Start(StartStage::Local));
        ctrl.apply(LifecycleCommand::Start(StartStage::LinkLayer));
    }

    #[test]
    fn staged_bring_up() {
        let mut ctrl = LifecycleController::new();
        assert_eq!(ctrl.state(), InterfaceState::Down);
        assert!(!ctrl.is_operational());

        let outcome = ctrl.apply(LifecycleCommand::Start(StartStage::Local));
        assert_eq!(
            outcome.transitioned,
            Some((InterfaceState::Down, InterfaceState::Starting))
        );
        assert!(outcome.desired_radio_mode.is_none());

        let outcome = ctrl.apply(LifecycleCommand::Start(StartStage::LinkLayer));
        assert_eq!(
            outcome.transitioned,
            Some((InterfaceState::Starting, InterfaceState::Up))
        );
        assert_eq!(outcome.desired_radio_mode, Some(RadioMode::Receiver));
        assert!(ctrl.is_operational());
    }

    #[test]
    fn link_layer_start_before_local_is_ignored() {
        let mut ctrl = LifecycleController::new();
        let outcome = ctrl.apply(LifecycleCommand::Start(StartStage::LinkLayer));
        assert!(outcome.transitioned.is_none());
        assert_eq!(ctrl.state(), InterfaceState::Down);
    }

    #[test]
    fn staged_shutdown_cancels_timers_once() {
        let mut ctrl = LifecycleController::new();
        bring_up(&mut ctrl);
        ctrl.arm_timer(TimerKind::AckTimeout).unwrap();
        ctrl.arm_timer(TimerKind::Housekeeping).unwrap();

        let outcome = ctrl.apply(LifecycleCommand::Shutdown(ShutdownStage::LinkLayer));
        assert_eq!(
            outcome.transitioned,
            Some((InterfaceState::Up, InterfaceState::ShuttingDown))
        );
        assert_eq!(outcome.canceled_timers, Some(2));
        assert_eq!(outcome.desired_radio_mode, Some(RadioMode::Off));

        // Re-delivered shutdown is an accepted no-op with no side effects
        let outcome = ctrl.apply(LifecycleCommand::Shutdown(ShutdownStage::LinkLayer));
        assert!(outcome.transitioned.is_none());
        assert!(outcome.canceled_timers.is_none());
        assert!(outcome.desired_radio_mode.is_none());

        let outcome = ctrl.apply(LifecycleCommand::Shutdown(ShutdownStage::Local));
        assert_eq!(
            outcome.transitioned,
            Some((InterfaceState::ShuttingDown, InterfaceState::Down))
        );
    }

    #[test]
    fn crash_from_non_down_states() {
        for setup in [
            &[LifecycleCommand::Start(StartStage::Local)][..],
            &[
                LifecycleCommand::Start(StartStage::Local),
                LifecycleCommand::Start(StartStage::LinkLayer),
            ][..],
            &[
                LifecycleCommand::Start(StartStage::Local),
                LifecycleCommand::Start(StartStage::LinkLayer),
                LifecycleCommand::Shutdown(ShutdownStage::LinkLayer),
            ][..],
        ] {
            let mut ctrl = LifecycleController::new();
            for &cmd in setup {
                ctrl.apply(cmd);
            }
            let outcome = ctrl.apply(LifecycleCommand::Crash);
            assert_eq!(ctrl.state(), InterfaceState::Crashed);
            assert!(outcome.transitioned.is_some());
            // Crash path performs no radio negotiation
            assert!(outcome.desired_radio_mode.is_none());
        }
    }

    #[test]
    fn crash_from_down_is_noop() {
        let mut ctrl = LifecycleController::new();
        let outcome = ctrl.apply(LifecycleCommand::Crash);
        assert!(outcome.transitioned.is_none());
        assert_eq!(ctrl.state(), InterfaceState::Down);
    }

    #[test]
    fn restart_after_crash() {
        let mut ctrl = LifecycleController::new();
        bring_up(&mut ctrl);
        ctrl.apply(LifecycleCommand::Crash);

        let outcome = ctrl.apply(LifecycleCommand::Start(StartStage::Local));
        assert_eq!(
            outcome.transitioned,
            Some((InterfaceState::Crashed, InterfaceState::Starting))
        );
        ctrl.apply(LifecycleCommand::Start(StartStage::LinkLayer));
        assert!(ctrl.is_operational());
    }

    #[test]
    fn crash_sweeps_timers_and_fires_go_stale() {
        let mut ctrl = LifecycleController::new();
        bring_up(&mut ctrl);
        let id = ctrl.arm_timer(TimerKind::AckTimeout).unwrap();

        let outcome = ctrl.apply(LifecycleCommand::Crash);
        assert_eq!(outcome.canceled_timers, Some(1));
        assert!(matches!(ctrl.timer_fired(id), Err(MacError::StaleTimer(_))));
    }

    #[test]
    fn startup_timer_allowed_while_starting() {
        let mut ctrl = LifecycleController::new();
        ctrl.apply(LifecycleCommand::Start(StartStage::Local));

        assert!(ctrl.arm_timer(TimerKind::Startup).is_ok());
        assert!(matches!(
            ctrl.arm_timer(TimerKind::AckTimeout),
            Err(MacError::NotRunning { .. })
        ));
    }
}
