//! Frame metadata: addresses, frame kinds and per-frame mode tags
//!
//! Frames here carry only what the MAC policy layer needs: a kind, link
//! addresses, and the two mode tags exchanged with the transmitting and
//! receiving layers. The wire format itself lives below this model.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ConfigError;
use crate::modes::TransmissionMode;

/// Counter backing auto-generated addresses; one sequence per process.
static AUTO_ADDRESS_CTR: AtomicU64 = AtomicU64::new(1);

/// A 48-bit link-layer address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// The all-ones broadcast address
    pub const BROADCAST: MacAddress = MacAddress([0xFF; 6]);

    /// Whether the group bit is set (multicast or broadcast destination)
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// Whether this is the broadcast address
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Generate a fresh locally-administered unicast address
    ///
    /// Addresses are drawn from the 0A:AA:00 block with a process-wide
    /// counter, so every interface created in one process gets a distinct
    /// address without coordination.
    pub fn generate_auto() -> MacAddress {
        let ctr = AUTO_ADDRESS_CTR.fetch_add(1, Ordering::Relaxed);
        MacAddress([
            0x0A,
            0xAA,
            0x00,
            (ctr >> 16) as u8,
            (ctr >> 8) as u8,
            ctr as u8,
        ])
    }

    /// Resolve a configured address string
    ///
    /// The literal `"auto"` generates a fresh address; anything else must
    /// parse as a colon-separated MAC address.
    pub fn resolve(configured: &str) -> Result<MacAddress, ConfigError> {
        if configured == "auto" {
            Ok(Self::generate_auto())
        } else {
            configured.parse()
        }
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 6];
        let mut parts = s.split(':');
        for byte in bytes.iter_mut() {
            let part = parts
                .next()
                .ok_or_else(|| ConfigError::InvalidAddress(s.to_string()))?;
            *byte = u8::from_str_radix(part, 16)
                .map_err(|_| ConfigError::InvalidAddress(s.to_string()))?;
        }
        if parts.next().is_some() {
            return Err(ConfigError::InvalidAddress(s.to_string()));
        }
        Ok(MacAddress(bytes))
    }
}

/// Kind of a link-layer frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameKind {
    /// Payload-bearing data frame
    Data,
    /// Management frame (association, beaconing and friends)
    Management,
    /// Acknowledgment control frame
    Ack,
    /// Request-to-send control frame
    Rts,
    /// Clear-to-send control frame
    Cts,
}

impl FrameKind {
    /// Whether this is a short control frame
    pub fn is_control(&self) -> bool {
        matches!(self, FrameKind::Ack | FrameKind::Rts | FrameKind::Cts)
    }
}

/// Coarse classification driving mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameClass {
    /// Data or management frame to a unicast destination
    UnicastDataOrMgmt,
    /// Data or management frame to a group destination
    MulticastDataOrMgmt,
    /// Control frame (ACK/RTS/CTS)
    Control,
}

/// Mode chosen for an outgoing frame, attached before transmission
///
/// Written by the rate-selection policy, read by the transmitting layer.
/// Not part of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransmissionRequest {
    /// Mode the frame is to be transmitted at
    pub mode: TransmissionMode,
}

/// Mode a frame was actually received at, attached on reception
///
/// Written by the receiving layer, read when deriving acknowledgment rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReceptionIndication {
    /// Mode the frame arrived at
    pub mode: TransmissionMode,
}

/// A link-layer frame as seen by the MAC policy layer
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame kind
    pub kind: FrameKind,
    /// Destination link address
    pub dest: MacAddress,
    /// Source link address
    pub src: MacAddress,
    /// Payload length in bytes (zero for control frames)
    pub payload_len: usize,
    transmission_request: Option<TransmissionRequest>,
    reception_indication: Option<ReceptionIndication>,
}

impl Frame {
    /// Create a data frame
    pub fn data(src: MacAddress, dest: MacAddress, payload_len: usize) -> Self {
        Self::new(FrameKind::Data, src, dest, payload_len)
    }

    /// Create a management frame
    pub fn management(src: MacAddress, dest: MacAddress, payload_len: usize) -> Self {
        Self::new(FrameKind::Management, src, dest, payload_len)
    }

    /// Create an acknowledgment frame
    pub fn ack(src: MacAddress, dest: MacAddress) -> Self {
        Self::new(FrameKind::Ack, src, dest, 0)
    }

    /// Create a request-to-send frame
    pub fn rts(src: MacAddress, dest: MacAddress) -> Self {
        Self::new(FrameKind::Rts, src, dest, 0)
    }

    /// Create a clear-to-send frame
    pub fn cts(src: MacAddress, dest: MacAddress) -> Self {
        Self::new(FrameKind::Cts, src, dest, 0)
    }

    fn new(kind: FrameKind, src: MacAddress, dest: MacAddress, payload_len: usize) -> Self {
        Self {
            kind,
            dest,
            src,
            payload_len,
            transmission_request: None,
            reception_indication: None,
        }
    }

    /// Classify the frame for mode selection
    pub fn class(&self) -> FrameClass {
        if self.kind.is_control() {
            FrameClass::Control
        } else if self.dest.is_multicast() {
            FrameClass::MulticastDataOrMgmt
        } else {
            FrameClass::UnicastDataOrMgmt
        }
    }

    /// The transmission-request tag, if one has been attached
    pub fn transmission_request(&self) -> Option<TransmissionRequest> {
        self.transmission_request
    }

    /// Attach the transmission-request tag
    pub fn set_transmission_request(&mut self, tag: TransmissionRequest) {
        self.transmission_request = Some(tag);
    }

    /// The reception-indication tag, if one has been attached
    pub fn reception_indication(&self) -> Option<ReceptionIndication> {
        self.reception_indication
    }

    /// Attach the reception-indication tag
    pub fn set_reception_indication(&mut self, tag: ReceptionIndication) {
        self.reception_indication = Some(tag);
    }
}
