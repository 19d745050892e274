//! Closed-loop tests: the MAC engine wired to a virtual radio
//!
//! The host loop here is the real integration contract: drained radio
//! commands are applied to the radio, and the notifications the radio
//! raises are delivered back to the engine, in order, until both sides
//! are quiet.

use air_mac::{
    InterfaceConfig, LifecycleCommand, LinkInterface, ShutdownStage, StartStage,
};
use air_protocol::RadioMode;
use air_sim::VirtualRadio;

/// Shuttle commands and notifications until both sides are quiet
fn pump(iface: &mut LinkInterface, radio: &mut VirtualRadio) {
    loop {
        let commands = iface.drain_radio_commands();
        let mut quiet = commands.is_empty();
        for command in commands {
            radio.apply(command);
        }
        for notification in radio.drain_notifications() {
            quiet = false;
            iface.radio_notification(notification);
        }
        if quiet {
            break;
        }
    }
}

fn iface() -> LinkInterface {
    LinkInterface::with_config(InterfaceConfig {
        mode_set: "802.11b".to_string(),
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn bring_up_drives_radio_to_receiver() {
    let mut iface = iface();
    let mut radio = VirtualRadio::new("sim0");

    iface.apply_lifecycle(LifecycleCommand::Start(StartStage::Local));
    iface.apply_lifecycle(LifecycleCommand::Start(StartStage::LinkLayer));
    pump(&mut iface, &mut radio);

    assert!(iface.is_operational());
    assert_eq!(radio.mode(), RadioMode::Receiver);
    assert_eq!(iface.observed_radio_mode(), RadioMode::Receiver);
}

#[test]
fn transmission_cycle_returns_radio_to_receiver() {
    let mut iface = iface();
    let mut radio = VirtualRadio::new("sim0");
    iface.apply_lifecycle(LifecycleCommand::Start(StartStage::Local));
    iface.apply_lifecycle(LifecycleCommand::Start(StartStage::LinkLayer));
    pump(&mut iface, &mut radio);

    // The transmit path flips the radio over and sends one frame
    radio.set_mode(RadioMode::Transmitter);
    assert!(radio.begin_transmission());
    assert!(radio.finish_transmission());
    pump(&mut iface, &mut radio);

    // The finished edge re-armed the receiver through the command queue
    assert_eq!(radio.mode(), RadioMode::Receiver);
    assert_eq!(iface.observed_radio_mode(), RadioMode::Receiver);
}

#[test]
fn shutdown_turns_radio_off() {
    let mut iface = iface();
    let mut radio = VirtualRadio::new("sim0");
    iface.apply_lifecycle(LifecycleCommand::Start(StartStage::Local));
    iface.apply_lifecycle(LifecycleCommand::Start(StartStage::LinkLayer));
    pump(&mut iface, &mut radio);

    iface.apply_lifecycle(LifecycleCommand::Shutdown(ShutdownStage::LinkLayer));
    pump(&mut iface, &mut radio);
    iface.apply_lifecycle(LifecycleCommand::Shutdown(ShutdownStage::Local));

    assert_eq!(radio.mode(), RadioMode::Off);
    assert!(!iface.is_operational());
}
