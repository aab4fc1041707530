use crate::arp::PendingRequest;
use crate::interface::Interface;
use crate::router::Router;
use crate::transmit::Transmit;
use log::{debug, info, warn};
use route_fwd_packets::{ArpFrame, ArpOp, EthernetFrame, MacAddr};
use std::convert::TryFrom;
use std::net::Ipv4Addr;

impl<T: Transmit> Router<T> {
    ///
    /// Handles an ARP frame received on `iface`, following RFC 826:
    /// https://tools.ietf.org/html/rfc826
    ///
    /// The sender of every request or reply is recorded, which may resolve frames waiting on
    /// that address. Requests for the receiving interface's address are answered out the same
    /// interface.
    ///
    pub fn handle_arp(&self, frame: EthernetFrame, iface: &Interface) {
        let mut arp_frame = match ArpFrame::try_from(frame) {
            Ok(arp_frame) => arp_frame,
            Err(e) => {
                warn!("Dropping ARP frame on {}: {}", iface.name, e);
                return;
            }
        };
        let op = match ArpOp::try_from(arp_frame.opcode()) {
            Ok(op) => op,
            Err(opcode) => {
                warn!("Dropping ARP frame on {} with opcode {}", iface.name, opcode);
                return;
            }
        };

        let sender_mac = arp_frame.sender_hardware_addr();
        let sender_ip = arp_frame.sender_protocol_addr();
        self.learn(sender_mac, sender_ip);

        match op {
            ArpOp::Request if arp_frame.target_protocol_addr() == iface.ip => {
                // Turn the request around in place, keeping its type and length fields
                arp_frame.ethernet_mut().reverse(iface.mac);
                arp_frame.set_opcode(ArpOp::Reply as u16);
                arp_frame.set_target_hardware_addr(sender_mac);
                arp_frame.set_target_protocol_addr(sender_ip);
                arp_frame.set_sender_hardware_addr(iface.mac);
                arp_frame.set_sender_protocol_addr(iface.ip);

                debug!("ARP reply to {} ({}) on {}", sender_ip, sender_mac, iface.name);
                self.send(arp_frame.frame(), &iface.name);
            }
            ArpOp::Request => debug!(
                "ARP request for {} on {} is not for us",
                arp_frame.target_protocol_addr(),
                iface.name
            ),
            ArpOp::Reply => debug!("ARP reply from {} on {}", sender_ip, iface.name),
        }
    }

    fn learn(&self, mac: MacAddr, ip: Ipv4Addr) {
        if ip.is_unspecified() {
            // Address probes carry no usable sender
            return;
        }
        if let Some(request) = self.arp_cache.insert(mac, ip) {
            self.drain_pending(request, mac);
        } else {
            debug!("Learned {} is at {}", ip, mac);
        }
    }

    /// Sends every frame that was waiting on the request, oldest first.
    fn drain_pending(&self, request: PendingRequest, mac: MacAddr) {
        info!(
            "Resolved {} to {}, sending {} queued frame(s)",
            request.ip,
            mac,
            request.frames.len()
        );
        for queued in request.frames {
            self.forward_resolved(queued.frame, mac, &queued.outgoing_interface);
        }
    }

    /// Broadcasts a who-has for `target_ip` out `interface`.
    pub(crate) fn send_arp_request(&self, target_ip: Ipv4Addr, interface: &str) {
        match self.interfaces.get(interface) {
            Some(iface) => {
                debug!("ARP who-has {} on {}", target_ip, iface.name);
                self.send(
                    ArpFrame::request(iface.mac, iface.ip, target_ip).frame(),
                    &iface.name,
                );
            }
            None => warn!("Cannot resolve {}: no interface {}", target_ip, interface),
        }
    }
}
