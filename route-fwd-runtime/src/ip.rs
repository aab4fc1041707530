use crate::arp::{QueueOutcome, QueuedFrame};
use crate::interface::Interface;
use crate::processor::{DecIpv4HopLimit, Processor};
use crate::router::Router;
use crate::transmit::Transmit;
use log::{debug, warn};
use route_fwd_packets::{EthernetFrame, Icmpv4DstUnreachable, Ipv4Packet, MacAddr};
use std::convert::TryFrom;

impl<T: Transmit> Router<T> {
    /// Validates an IPv4 frame received on `iface` and either answers it, forwards it, parks it
    /// behind an ARP resolution, or bounces an ICMP error back to its sender.
    pub fn handle_ip(&self, frame: EthernetFrame, iface: &Interface) {
        let packet = match Ipv4Packet::try_from(frame) {
            Ok(packet) => packet,
            Err(e) => {
                warn!("Dropping IPv4 frame on {}: {}", iface.name, e);
                return;
            }
        };
        if !packet.validate_checksum() {
            warn!(
                "Dropping IPv4 packet from {} on {}: bad header checksum {:#06x}",
                packet.src_addr(),
                iface.name,
                packet.checksum()
            );
            return;
        }

        let destination = packet.dest_addr();
        if self.interfaces.find_by_ip(destination).is_some() {
            self.deliver_locally(packet, iface);
            return;
        }

        if packet.ttl() <= 1 {
            debug!(
                "TTL expired for {} -> {}",
                packet.src_addr(),
                destination
            );
            self.send_time_exceeded(&packet, iface);
            return;
        }

        let route = match self.routes.lookup(destination) {
            Some(route) => route,
            None => {
                debug!("No route to {}", destination);
                self.send_unreachable(&packet, Icmpv4DstUnreachable::NetUnreachable, iface);
                return;
            }
        };
        let outgoing = match self.interfaces.get(&route.interface) {
            Some(outgoing) => outgoing,
            None => {
                warn!("Route to {} names unknown interface {}", destination, route.interface);
                return;
            }
        };
        let next_hop = route.next_hop(destination);

        let packet = match DecIpv4HopLimit::new().process(packet) {
            Some(packet) => packet,
            None => return,
        };

        if let Some(entry) = self.arp_cache.lookup(next_hop) {
            self.transmit_to(packet, entry.mac, outgoing);
            return;
        }

        let queued = QueuedFrame {
            frame: EthernetFrame::from(packet),
            outgoing_interface: outgoing.name.clone(),
            inbound_interface: iface.name.clone(),
        };
        match self.arp_cache.queue_frame(next_hop, queued) {
            QueueOutcome::NewRequest => {
                debug!("Queued {} behind new ARP request for {}", destination, next_hop);
                self.send_arp_request(next_hop, &outgoing.name);
            }
            QueueOutcome::Queued => {
                debug!("Queued {} behind pending ARP request for {}", destination, next_hop)
            }
            QueueOutcome::Resolved(entry, queued) => {
                self.forward_resolved(queued.frame, entry.mac, &queued.outgoing_interface)
            }
        }
    }

    /// Sends a frame whose next hop just resolved to `dest_mac`.
    pub(crate) fn forward_resolved(&self, frame: EthernetFrame, dest_mac: MacAddr, outgoing: &str) {
        let outgoing = match self.interfaces.get(outgoing) {
            Some(outgoing) => outgoing,
            None => {
                warn!("Dropping queued frame for unknown interface {}", outgoing);
                return;
            }
        };
        match Ipv4Packet::try_from(frame) {
            Ok(packet) => self.transmit_to(packet, dest_mac, outgoing),
            Err(e) => warn!("Dropping queued frame for {}: {}", outgoing.name, e),
        }
    }

    fn transmit_to(&self, mut packet: Ipv4Packet, dest_mac: MacAddr, outgoing: &Interface) {
        packet.set_checksum();
        {
            let mut ethernet = packet.ethernet_mut();
            ethernet.set_dest_mac(dest_mac);
            ethernet.set_src_mac(outgoing.mac);
        }
        debug!(
            "Forwarding {} -> {} out {}",
            packet.src_addr(),
            packet.dest_addr(),
            outgoing.name
        );
        self.send(EthernetFrame::from(packet), &outgoing.name);
    }
}
