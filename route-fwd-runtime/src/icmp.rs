use crate::interface::Interface;
use crate::router::Router;
use crate::transmit::Transmit;
use log::{debug, warn};
use route_fwd_packets::{
    checksum, EthernetFrame, IpProtocol, Icmpv4DstUnreachable, Icmpv4Message, Icmpv4Packet,
    Icmpv4TimeExceeded, Ipv4Packet, IPV4_FLAG_DF,
};
use std::cmp;
use std::convert::TryFrom;

/// Type, code, checksum and the unused 32 bits in front of the quoted datagram.
const ICMP_ERROR_HDR_LEN: usize = 8;
/// Offending IP header plus the first 8 bytes of its payload.
const ICMP_ERROR_DATA_LEN: usize = 28;
const ICMP_ERROR_LEN: usize = ICMP_ERROR_HDR_LEN + ICMP_ERROR_DATA_LEN;
const ICMP_TTL: u8 = 64;

/// Helper to generate ICMPv4 error messages sent from one interface.
pub struct Icmpv4ErrorGenerator<'a> {
    interface: &'a Interface,
}

impl<'a> Icmpv4ErrorGenerator<'a> {
    /// Errors come from `interface`: its MAC and IP are the sources of the generated frame.
    pub fn new(interface: &'a Interface) -> Self {
        Icmpv4ErrorGenerator { interface }
    }

    /// Create an ICMPv4 TTL exceeded error message about `packet`.
    pub fn time_exceeded(&self, packet: &Ipv4Packet) -> EthernetFrame {
        self.generic_error(
            packet,
            Icmpv4Message::TimeExceeded,
            Icmpv4TimeExceeded::TtlExpired as u8,
        )
    }

    pub fn dst_unreachable(
        &self,
        packet: &Ipv4Packet,
        reason: Icmpv4DstUnreachable,
    ) -> EthernetFrame {
        self.generic_error(packet, Icmpv4Message::DstUnreachable, reason as u8)
    }

    // Fixed size error frame quoting the first 28 bytes of the offending datagram, addressed back
    // to whoever sent it.
    fn generic_error(
        &self,
        packet: &Ipv4Packet,
        msg_type: Icmpv4Message,
        msg_code: u8,
    ) -> EthernetFrame {
        debug_assert!(msg_type.is_error());

        let mut error = Ipv4Packet::with_payload_len(ICMP_ERROR_LEN);
        {
            let mut ethernet = error.ethernet_mut();
            ethernet.set_dest_mac(packet.src_mac());
            ethernet.set_src_mac(self.interface.mac);
        }
        error.set_tos(packet.tos());
        error.set_identification(0);
        error.set_flags_and_fragment(IPV4_FLAG_DF);
        error.set_ttl(ICMP_TTL);
        error.set_protocol(IpProtocol::ICMP);
        error.set_src_addr(self.interface.ip);
        error.set_dest_addr(packet.src_addr());

        let quoted = packet.datagram();
        let copied = cmp::min(quoted.len(), ICMP_ERROR_DATA_LEN);
        let icmp = error.payload_mut();
        icmp[0] = msg_type.into();
        icmp[1] = msg_code;
        icmp[ICMP_ERROR_HDR_LEN..ICMP_ERROR_HDR_LEN + copied].copy_from_slice(&quoted[..copied]);
        let sum = checksum::internet_checksum(&icmp[..ICMP_ERROR_LEN]);
        icmp[2..4].copy_from_slice(&sum.to_be_bytes());

        error.set_checksum();
        EthernetFrame::from(error)
    }
}

impl<T: Transmit> Router<T> {
    /// Answers a datagram addressed to one of the router's own addresses.
    pub(crate) fn deliver_locally(&self, packet: Ipv4Packet, iface: &Interface) {
        match packet.protocol() {
            IpProtocol::ICMP => match Icmpv4Packet::try_from(packet) {
                Ok(icmp) => self.handle_icmp(icmp, iface),
                Err(e) => debug!("Dropping malformed ICMP on {}: {}", iface.name, e),
            },
            IpProtocol::TCP | IpProtocol::UDP => {
                debug!(
                    "{:?} from {} to the router, port unreachable",
                    packet.protocol(),
                    packet.src_addr()
                );
                self.send_unreachable(&packet, Icmpv4DstUnreachable::PortUnreachable, iface);
            }
            IpProtocol::Other(protocol) => {
                warn!(
                    "Dropping IP protocol {} from {} addressed to the router",
                    protocol,
                    packet.src_addr()
                );
            }
        }
    }

    fn handle_icmp(&self, mut icmp: Icmpv4Packet, iface: &Interface) {
        if !icmp.validate_checksum() {
            debug!(
                "Dropping ICMP with bad checksum from {}",
                icmp.ip().src_addr()
            );
            return;
        }
        if icmp.msg_type() != Icmpv4Message::EchoRequest || icmp.msg_code() != 0 {
            debug!(
                "ICMP {:?}/{} from {} to the router, port unreachable",
                icmp.msg_type(),
                icmp.msg_code(),
                icmp.ip().src_addr()
            );
            self.send_unreachable(icmp.ip(), Icmpv4DstUnreachable::PortUnreachable, iface);
            return;
        }

        icmp.set_msg_type(Icmpv4Message::EchoReply);
        icmp.set_msg_code(0);
        icmp.set_checksum();

        let ip = icmp.ip_mut();
        ip.reverse();
        ip.set_ttl(ICMP_TTL);
        ip.set_checksum();
        ip.ethernet_mut().reverse(iface.mac);

        debug!("Echo reply to {} on {}", ip.dest_addr(), iface.name);
        self.send(EthernetFrame::from(icmp), &iface.name);
    }

    pub(crate) fn send_time_exceeded(&self, packet: &Ipv4Packet, iface: &Interface) {
        let frame = Icmpv4ErrorGenerator::new(iface).time_exceeded(packet);
        self.send(frame, &iface.name);
    }

    pub(crate) fn send_unreachable(
        &self,
        packet: &Ipv4Packet,
        reason: Icmpv4DstUnreachable,
        iface: &Interface,
    ) {
        let frame = Icmpv4ErrorGenerator::new(iface).dst_unreachable(packet, reason);
        self.send(frame, &iface.name);
    }
}
