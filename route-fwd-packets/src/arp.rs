use crate::*;
use std::convert::TryFrom;
use std::net::Ipv4Addr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArpOp {
    Request = 1,
    Reply = 2,
}

impl TryFrom<u16> for ArpOp {
    type Error = u16;

    fn try_from(opcode: u16) -> Result<Self, Self::Error> {
        match opcode {
            1 => Ok(ArpOp::Request),
            2 => Ok(ArpOp::Reply),
            other => Err(other),
        }
    }
}

pub enum ArpHardwareType {
    Ethernet = 1,
}

const HARDWARE_TYPE_RANGE: (usize, usize) = (0, 2);
const PROTOCOL_TYPE_RANGE: (usize, usize) = (2, 4);
const HARDWARE_ADDR_LEN_OFFSET: usize = 4;
const PROTOCOL_ADDR_LEN_OFFSET: usize = 5;
const OPCODE_RANGE: (usize, usize) = (6, 8);
const SENDER_HARDWARE_ADDR_RANGE: (usize, usize) = (8, 14);
const SENDER_PROTOCOL_ADDR_RANGE: (usize, usize) = (14, 18);
const TARGET_HARDWARE_ADDR_RANGE: (usize, usize) = (18, 24);
const TARGET_PROTOCOL_ADDR_RANGE: (usize, usize) = (24, 28);

///
/// EthernetFrame wrapper with getters/setters for the packet structure described in RFC 826
/// https://tools.ietf.org/html/rfc826
///
/// Only Ethernet hardware addresses and IPv4 protocol addresses are supported, so every field
/// sits at a fixed offset.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArpFrame {
    frame: EthernetFrame,
}

impl Packet for ArpFrame {}

impl ArpFrame {
    ///
    /// Constructs a new frame with the ARP ether type and the Ethernet/IPv4 type and length
    /// fields filled in. Opcode and addresses are left zeroed.
    ///
    pub fn new() -> Self {
        let mut frame = EthernetFrame::with_payload_len(ARP_HEADER_LEN);
        frame.set_ether_type(ARP_ETHER_TYPE);

        let mut arp_frame = ArpFrame { frame };
        arp_frame.set_hardware_type(ArpHardwareType::Ethernet as u16);
        arp_frame.set_protocol_type(IPV4_ETHER_TYPE);
        arp_frame.set_hardware_addr_len(6);
        arp_frame.set_protocol_addr_len(4);
        arp_frame
    }

    /// A broadcast "who-has `target_ip`" request sent from (`sender_mac`, `sender_ip`).
    pub fn request(sender_mac: MacAddr, sender_ip: Ipv4Addr, target_ip: Ipv4Addr) -> Self {
        let mut arp_frame = ArpFrame::new();
        arp_frame.frame.set_dest_mac(MacAddr::BROADCAST);
        arp_frame.frame.set_src_mac(sender_mac);
        arp_frame.set_opcode(ArpOp::Request as u16);
        arp_frame.set_sender_hardware_addr(sender_mac);
        arp_frame.set_sender_protocol_addr(sender_ip);
        arp_frame.set_target_hardware_addr(MacAddr::BROADCAST);
        arp_frame.set_target_protocol_addr(target_ip);
        arp_frame
    }

    pub fn hardware_type(&self) -> u16 {
        self.read_u16(HARDWARE_TYPE_RANGE)
    }

    pub fn protocol_type(&self) -> u16 {
        self.read_u16(PROTOCOL_TYPE_RANGE)
    }

    pub fn hardware_addr_len(&self) -> u8 {
        self.arp_data()[HARDWARE_ADDR_LEN_OFFSET]
    }

    pub fn protocol_addr_len(&self) -> u8 {
        self.arp_data()[PROTOCOL_ADDR_LEN_OFFSET]
    }

    pub fn opcode(&self) -> u16 {
        self.read_u16(OPCODE_RANGE)
    }

    pub fn sender_hardware_addr(&self) -> MacAddr {
        let (start, end) = SENDER_HARDWARE_ADDR_RANGE;
        MacAddr::new(mac_array(&self.arp_data()[start..end]))
    }

    pub fn sender_protocol_addr(&self) -> Ipv4Addr {
        let (start, end) = SENDER_PROTOCOL_ADDR_RANGE;
        Ipv4Addr::from(ipv4_array(&self.arp_data()[start..end]))
    }

    pub fn target_hardware_addr(&self) -> MacAddr {
        let (start, end) = TARGET_HARDWARE_ADDR_RANGE;
        MacAddr::new(mac_array(&self.arp_data()[start..end]))
    }

    pub fn target_protocol_addr(&self) -> Ipv4Addr {
        let (start, end) = TARGET_PROTOCOL_ADDR_RANGE;
        Ipv4Addr::from(ipv4_array(&self.arp_data()[start..end]))
    }

    pub fn set_hardware_type(&mut self, htype: u16) {
        self.set_arp_data(&htype.to_be_bytes(), HARDWARE_TYPE_RANGE);
    }

    pub fn set_protocol_type(&mut self, ptype: u16) {
        self.set_arp_data(&ptype.to_be_bytes(), PROTOCOL_TYPE_RANGE);
    }

    pub fn set_hardware_addr_len(&mut self, len: u8) {
        self.arp_data_mut()[HARDWARE_ADDR_LEN_OFFSET] = len;
    }

    pub fn set_protocol_addr_len(&mut self, len: u8) {
        self.arp_data_mut()[PROTOCOL_ADDR_LEN_OFFSET] = len;
    }

    pub fn set_opcode(&mut self, code: u16) {
        self.set_arp_data(&code.to_be_bytes(), OPCODE_RANGE);
    }

    pub fn set_sender_hardware_addr(&mut self, addr: MacAddr) {
        self.set_arp_data(&addr.bytes, SENDER_HARDWARE_ADDR_RANGE);
    }

    pub fn set_sender_protocol_addr(&mut self, ip_addr: Ipv4Addr) {
        self.set_arp_data(&ip_addr.octets(), SENDER_PROTOCOL_ADDR_RANGE);
    }

    pub fn set_target_hardware_addr(&mut self, addr: MacAddr) {
        self.set_arp_data(&addr.bytes, TARGET_HARDWARE_ADDR_RANGE);
    }

    pub fn set_target_protocol_addr(&mut self, ip_addr: Ipv4Addr) {
        self.set_arp_data(&ip_addr.octets(), TARGET_PROTOCOL_ADDR_RANGE);
    }

    pub fn ethernet(&self) -> &EthernetFrame {
        &self.frame
    }

    pub fn ethernet_mut(&mut self) -> &mut EthernetFrame {
        &mut self.frame
    }

    // Move ownership of the frame back to the caller
    pub fn frame(self) -> EthernetFrame {
        self.frame
    }

    fn arp_data(&self) -> &[u8] {
        self.frame.payload()
    }

    fn arp_data_mut(&mut self) -> &mut [u8] {
        self.frame.payload_mut()
    }

    fn read_u16(&self, (start, end): (usize, usize)) -> u16 {
        let bytes = &self.arp_data()[start..end];
        u16::from_be_bytes([bytes[0], bytes[1]])
    }

    fn set_arp_data(&mut self, bytes: &[u8], (start, end): (usize, usize)) {
        self.arp_data_mut()[start..end].copy_from_slice(bytes);
    }
}

impl Default for ArpFrame {
    fn default() -> Self {
        ArpFrame::new()
    }
}

impl TryFrom<EthernetFrame> for ArpFrame {
    type Error = PacketError;

    ///
    /// Decorates the given EthernetFrame with ArpFrame getters/setters.
    /// Validates
    /// - The frame has an ARP ether type
    /// - The frame is long enough to hold an Ethernet/IPv4 ARP header
    /// - The address length fields describe Ethernet/IPv4 addresses
    ///
    fn try_from(frame: EthernetFrame) -> Result<Self, Self::Error> {
        if frame.ether_type() != ARP_ETHER_TYPE {
            return Err(PacketError::WrongEtherType {
                found: frame.ether_type(),
                expected: ARP_ETHER_TYPE,
            });
        }

        if !validation::valid_arp_length(frame.len()) {
            return Err(PacketError::TooShort {
                len: frame.len(),
                min: ETHERNET_HEADER_LEN + ARP_HEADER_LEN,
            });
        }

        let arp_frame = ArpFrame { frame };
        let hardware = arp_frame.hardware_addr_len();
        let protocol = arp_frame.protocol_addr_len();
        if hardware != 6 || protocol != 4 {
            return Err(PacketError::UnsupportedArpAddressLen { hardware, protocol });
        }

        Ok(arp_frame)
    }
}
