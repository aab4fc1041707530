use crate::classifier::{ByEtherType, Classifier, EtherType};
use crate::router::Router;
use crate::transmit::Transmit;
use log::{debug, warn};
use route_fwd_packets::{EthernetFrame, PacketData};

impl<T: Transmit> Router<T> {
    /// Single entry point for a frame received on the interface named `interface`. Frames are
    /// handed to the ARP handler or the IPv4 engine by EtherType; anything else, and anything
    /// too short to carry an Ethernet header, is dropped.
    pub fn handle_packet(&self, data: PacketData, interface: &str) {
        let iface = match self.interfaces.get(interface) {
            Some(iface) => iface,
            None => {
                warn!("Dropping frame from unknown interface {}", interface);
                return;
            }
        };
        let frame = match EthernetFrame::from_buffer(data) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Dropping frame on {}: {}", interface, e);
                return;
            }
        };

        match ByEtherType.classify(&frame) {
            EtherType::Arp => self.handle_arp(frame, iface),
            EtherType::Ipv4 => self.handle_ip(frame, iface),
            EtherType::Unsupported(ether_type) => {
                debug!("Dropping EtherType {:#06x} on {}", ether_type, interface)
            }
        }
    }
}
