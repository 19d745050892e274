//! Bring-up demo: one interface driving one virtual radio
//!
//! Walks an interface through its full life: staged start, a data frame
//! and its acknowledgment, a transmission cycle on the radio, and a
//! staged shutdown. Run with `RUST_LOG=debug` for the engine's view.

use air_mac::{
    InterfaceConfig, LifecycleCommand, LinkInterface, ShutdownStage, StartStage,
};
use air_protocol::{Frame, MacAddress, RadioMode, ReceptionIndication};
use air_sim::VirtualRadio;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

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

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "air_mac=info,air_sim=info,bringup=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut iface = LinkInterface::with_config(InterfaceConfig {
        mode_set: "802.11b".to_string(),
        ..Default::default()
    })?;
    let mut radio = VirtualRadio::new("sim0");
    tracing::info!("Interface {} over {}", iface.address(), iface.modes().name());

    // Staged bring-up; the engine pushes the radio into receive
    iface.apply_lifecycle(LifecycleCommand::Start(StartStage::Local));
    iface.apply_lifecycle(LifecycleCommand::Start(StartStage::LinkLayer));
    pump(&mut iface, &mut radio);
    tracing::info!("Interface up, radio {}", radio.mode().name());

    // Stamp an outgoing data frame
    let peer = MacAddress::generate_auto();
    let mut data = Frame::data(iface.address(), peer, 1400);
    let mode = iface.stamp_outgoing(&mut data, None)?;
    tracing::info!("Outgoing data frame leaves at {}", mode);

    // A frame arrives at 11 Mbps; the ACK steps down to 2 Mbps
    let mut inbound = Frame::data(peer, iface.address(), 256);
    inbound.set_reception_indication(ReceptionIndication {
        mode: iface.modes().mode_for_bitrate(11_000_000)?,
    });
    iface.handle_received(&inbound)?;
    let ack = iface.acknowledge(&inbound)?;
    if let Some(tag) = ack.transmission_request() {
        tracing::info!("Acknowledging an 11 Mbps frame at {}", tag.mode);
    }

    // The radio transmits the ACK and the engine re-arms the receiver
    radio.set_mode(RadioMode::Transmitter);
    radio.begin_transmission();
    radio.finish_transmission();
    pump(&mut iface, &mut radio);
    tracing::info!("After transmission the radio is back to {}", radio.mode().name());

    // Staged shutdown turns the radio off
    iface.apply_lifecycle(LifecycleCommand::Shutdown(ShutdownStage::LinkLayer));
    pump(&mut iface, &mut radio);
    iface.apply_lifecycle(LifecycleCommand::Shutdown(ShutdownStage::Local));
    tracing::info!("Interface {} down, radio {}", iface.address(), radio.mode().name());

    Ok(())
}
