use crate::error::TransmitError;
use crossbeam::channel::{Receiver, Sender};
use route_fwd_packets::EthernetFrame;

/// The router's only way out. Implementations hand the frame to whatever drives the named
/// interface and must not block.
pub trait Transmit: Send + Sync {
    fn transmit(&self, frame: EthernetFrame, interface: &str) -> Result<(), TransmitError>;
}

/// A frame on its way to a driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundFrame {
    pub interface: String,
    pub frame: EthernetFrame,
}

/// Pushes every frame onto one crossbeam channel, tagged with its interface. The receiving end
/// is drained by an I/O driver, or by a test.
#[derive(Clone)]
pub struct ChannelTransmitter {
    sender: Sender<OutboundFrame>,
}

impl ChannelTransmitter {
    pub fn new(sender: Sender<OutboundFrame>) -> Self {
        ChannelTransmitter { sender }
    }

    /// A transmitter on a fresh unbounded channel, together with its receiving end.
    pub fn unbounded() -> (Self, Receiver<OutboundFrame>) {
        let (sender, receiver) = crossbeam::channel::unbounded();
        (ChannelTransmitter::new(sender), receiver)
    }
}

impl Transmit for ChannelTransmitter {
    fn transmit(&self, frame: EthernetFrame, interface: &str) -> Result<(), TransmitError> {
        self.sender
            .try_send(OutboundFrame {
                interface: interface.to_string(),
                frame,
            })
            .map_err(|_| TransmitError::Disconnected(interface.to_string()))
    }
}
