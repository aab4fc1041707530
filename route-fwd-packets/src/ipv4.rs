use crate::*;
use std::convert::TryFrom;
use std::net::Ipv4Addr;

/// Don't Fragment, in the high byte of the flags/fragment offset word.
pub const IPV4_FLAG_DF: u16 = 0x4000;
const IPV4_FLAG_MF: u16 = 0x2000;
const IPV4_FRAGMENT_OFFSET_MASK: u16 = 0x1FFF;

/// An IPv4 datagram still sitting in its Ethernet frame.
#[derive(Clone, Debug)]
pub struct Ipv4Packet {
    pub data: PacketData,
    pub layer3_offset: usize,
    pub payload_offset: usize,
}

impl Packet for Ipv4Packet {}

impl Ipv4Packet {
    fn new(data: PacketData, layer3_offset: usize) -> Result<Ipv4Packet, PacketError> {
        // Header of Ethernet Frame: 14 bytes
        // Header of IPv4 Frame: 20 bytes
        if !validation::valid_ip_length(data.len()) {
            return Err(PacketError::TooShort {
                len: data.len(),
                min: layer3_offset + IPV4_HEADER_LEN,
            });
        }

        // Check version number
        let version: u8 = (data[layer3_offset] & 0xF0) >> 4;
        if version != 4 {
            return Err(PacketError::WrongIpVersion(version));
        }

        // This is the header length in 32bit words
        let ihl = data[layer3_offset] & 0x0F;
        if ihl < 5 {
            return Err(PacketError::InvalidHeaderLen(ihl));
        }
        let payload_offset = layer3_offset + (ihl as usize * 4);
        if data.len() < payload_offset {
            return Err(PacketError::TooShort {
                len: data.len(),
                min: payload_offset,
            });
        }

        Ok(Ipv4Packet {
            data,
            layer3_offset,
            payload_offset,
        })
    }

    /// Builds a frame holding an option-less IPv4 header followed by `payload_len` zero bytes.
    /// Version, IHL and total length are filled in; everything else is zero.
    pub fn with_payload_len(payload_len: usize) -> Ipv4Packet {
        let mut frame = EthernetFrame::with_payload_len(IPV4_HEADER_LEN + payload_len);
        frame.set_ether_type(IPV4_ETHER_TYPE);
        let layer3_offset = frame.payload_offset;
        let mut packet = Ipv4Packet {
            data: frame.into_inner(),
            layer3_offset,
            payload_offset: layer3_offset + IPV4_HEADER_LEN,
        };
        packet.data[layer3_offset] = 0x45;
        packet.set_total_len((IPV4_HEADER_LEN + payload_len) as u16);
        packet
    }

    pub fn version(&self) -> u8 {
        self.data[self.layer3_offset] >> 4
    }

    pub fn ihl(&self) -> u8 {
        self.data[self.layer3_offset] & 0x0F
    }

    pub fn header_len(&self) -> usize {
        self.payload_offset - self.layer3_offset
    }

    pub fn tos(&self) -> u8 {
        self.data[self.layer3_offset + 1]
    }

    pub fn set_tos(&mut self, tos: u8) {
        self.data[self.layer3_offset + 1] = tos;
    }

    pub fn total_len(&self) -> u16 {
        self.read_u16(2)
    }

    pub fn set_total_len(&mut self, total_len: u16) {
        self.write_u16(2, total_len);
    }

    pub fn identification(&self) -> u16 {
        self.read_u16(4)
    }

    pub fn set_identification(&mut self, id: u16) {
        self.write_u16(4, id);
    }

    /// The raw flags/fragment offset word.
    pub fn flags_and_fragment(&self) -> u16 {
        self.read_u16(6)
    }

    pub fn set_flags_and_fragment(&mut self, word: u16) {
        self.write_u16(6, word);
    }

    pub fn fragment_offset(&self) -> u16 {
        self.flags_and_fragment() & IPV4_FRAGMENT_OFFSET_MASK
    }

    /// Returns tuple of (Don't Fragment, More Fragments)
    pub fn flags(&self) -> (bool, bool) {
        let word = self.flags_and_fragment();
        (word & IPV4_FLAG_DF != 0, word & IPV4_FLAG_MF != 0)
    }

    pub fn ttl(&self) -> u8 {
        self.data[self.layer3_offset + 8]
    }

    pub fn set_ttl(&mut self, ttl: u8) {
        self.data[self.layer3_offset + 8] = ttl;
    }

    pub fn protocol(&self) -> IpProtocol {
        IpProtocol::from(self.data[self.layer3_offset + 9])
    }

    pub fn set_protocol(&mut self, protocol: IpProtocol) {
        self.data[self.layer3_offset + 9] = protocol.into();
    }

    pub fn checksum(&self) -> u16 {
        self.read_u16(10)
    }

    pub fn src_addr(&self) -> Ipv4Addr {
        let start = self.layer3_offset + 12;
        Ipv4Addr::from(ipv4_array(&self.data[start..start + 4]))
    }

    pub fn set_src_addr(&mut self, addr: Ipv4Addr) {
        let start = self.layer3_offset + 12;
        self.data[start..start + 4].copy_from_slice(&addr.octets());
    }

    pub fn dest_addr(&self) -> Ipv4Addr {
        let start = self.layer3_offset + 16;
        Ipv4Addr::from(ipv4_array(&self.data[start..start + 4]))
    }

    pub fn set_dest_addr(&mut self, addr: Ipv4Addr) {
        let start = self.layer3_offset + 16;
        self.data[start..start + 4].copy_from_slice(&addr.octets());
    }

    pub fn header(&self) -> &[u8] {
        &self.data[self.layer3_offset..self.payload_offset]
    }

    /// Header and payload as declared by the total length field, clipped to what was received.
    pub fn datagram(&self) -> &[u8] {
        let end = (self.layer3_offset + self.total_len() as usize).min(self.data.len());
        let end = end.max(self.payload_offset);
        &self.data[self.layer3_offset..end]
    }

    /// Everything received after the IP header, including any link-layer padding.
    pub fn payload(&self) -> &[u8] {
        &self.data[self.payload_offset..]
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.payload_offset..]
    }

    /// Verifies the header checksum carried in the packet. The buffer is left untouched.
    pub fn validate_checksum(&self) -> bool {
        validation::valid_ip_checksum(self.header())
    }

    /// Calculates what the checksum should be set to given the current header
    pub fn calculate_checksum(&self) -> u16 {
        checksum::checksum_with_zeroed_field(self.header(), 10)
    }

    /// Sets checksum field to valid value
    pub fn set_checksum(&mut self) {
        let new_checksum = self.calculate_checksum();
        self.write_u16(10, new_checksum);
    }

    /// Swaps source and destination addresses.
    pub fn reverse(&mut self) {
        let src = self.src_addr();
        let dst = self.dest_addr();
        self.set_src_addr(dst);
        self.set_dest_addr(src);
    }

    pub fn ethernet_mut(&mut self) -> EthernetHeaderMut<'_> {
        EthernetHeaderMut {
            data: &mut self.data[..self.layer3_offset],
        }
    }

    pub fn src_mac(&self) -> MacAddr {
        MacAddr::new(mac_array(&self.data[6..12]))
    }

    fn read_u16(&self, offset: usize) -> u16 {
        let start = self.layer3_offset + offset;
        u16::from_be_bytes([self.data[start], self.data[start + 1]])
    }

    fn write_u16(&mut self, offset: usize, value: u16) {
        let start = self.layer3_offset + offset;
        self.data[start..start + 2].copy_from_slice(&value.to_be_bytes());
    }
}

/// Mutable access to the Ethernet header in front of a packet view.
pub struct EthernetHeaderMut<'a> {
    data: &'a mut [u8],
}

impl<'a> EthernetHeaderMut<'a> {
    pub fn set_dest_mac(&mut self, mac: MacAddr) {
        self.data[..6].copy_from_slice(&mac.bytes);
    }

    pub fn set_src_mac(&mut self, mac: MacAddr) {
        self.data[6..12].copy_from_slice(&mac.bytes);
    }

    /// The old source becomes the destination and `own_mac` becomes the source.
    pub fn reverse(&mut self, own_mac: MacAddr) {
        let sender = mac_array(&self.data[6..12]);
        self.data[..6].copy_from_slice(&sender);
        self.set_src_mac(own_mac);
    }
}

/// Ipv4Packets are considered the same if they have the same data from the IPv4 header onward.
impl PartialEq for Ipv4Packet {
    fn eq(&self, other: &Self) -> bool {
        self.data[self.layer3_offset..] == other.data[other.layer3_offset..]
    }
}

impl Eq for Ipv4Packet {}

impl TryFrom<EthernetFrame> for Ipv4Packet {
    type Error = PacketError;

    fn try_from(frame: EthernetFrame) -> Result<Self, Self::Error> {
        if frame.ether_type() != IPV4_ETHER_TYPE {
            return Err(PacketError::WrongEtherType {
                found: frame.ether_type(),
                expected: IPV4_ETHER_TYPE,
            });
        }
        let layer3_offset = frame.payload_offset;
        Ipv4Packet::new(frame.into_inner(), layer3_offset)
    }
}

impl From<Ipv4Packet> for EthernetFrame {
    fn from(packet: Ipv4Packet) -> Self {
        EthernetFrame {
            data: packet.data,
            payload_offset: packet.layer3_offset,
        }
    }
}
