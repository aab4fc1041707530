use crate::*;
use std::convert::TryFrom;

/// ICMP message types the router sends or answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Icmpv4Message {
    EchoReply,
    DstUnreachable,
    Redirect,
    EchoRequest,
    TimeExceeded,
    ParamProblem,
    Unknown(u8),
}

impl Icmpv4Message {
    /// Error messages. An error is never generated about one of these.
    pub fn is_error(self) -> bool {
        match self {
            Icmpv4Message::DstUnreachable
            | Icmpv4Message::Redirect
            | Icmpv4Message::TimeExceeded
            | Icmpv4Message::ParamProblem => true,
            _ => false,
        }
    }
}

impl From<u8> for Icmpv4Message {
    fn from(value: u8) -> Self {
        match value {
            0 => Icmpv4Message::EchoReply,
            3 => Icmpv4Message::DstUnreachable,
            5 => Icmpv4Message::Redirect,
            8 => Icmpv4Message::EchoRequest,
            11 => Icmpv4Message::TimeExceeded,
            12 => Icmpv4Message::ParamProblem,
            other => Icmpv4Message::Unknown(other),
        }
    }
}

impl From<Icmpv4Message> for u8 {
    fn from(message: Icmpv4Message) -> Self {
        match message {
            Icmpv4Message::EchoReply => 0,
            Icmpv4Message::DstUnreachable => 3,
            Icmpv4Message::Redirect => 5,
            Icmpv4Message::EchoRequest => 8,
            Icmpv4Message::TimeExceeded => 11,
            Icmpv4Message::ParamProblem => 12,
            Icmpv4Message::Unknown(other) => other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icmpv4DstUnreachable {
    NetUnreachable = 0,
    HostUnreachable = 1,
    ProtoUnreachable = 2,
    PortUnreachable = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icmpv4TimeExceeded {
    TtlExpired = 0,
}

/// An ICMP message inside an IPv4 datagram inside an Ethernet frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Icmpv4Packet {
    packet: Ipv4Packet,
}

impl Packet for Icmpv4Packet {}

impl Icmpv4Packet {
    /// Offset of the ICMP header within the underlying buffer.
    pub fn icmp_offset(&self) -> usize {
        self.packet.payload_offset
    }

    pub fn msg_type(&self) -> Icmpv4Message {
        Icmpv4Message::from(self.packet.data[self.icmp_offset()])
    }

    pub fn set_msg_type(&mut self, message: Icmpv4Message) {
        let offset = self.icmp_offset();
        self.packet.data[offset] = message.into();
    }

    pub fn msg_code(&self) -> u8 {
        self.packet.data[self.icmp_offset() + 1]
    }

    pub fn set_msg_code(&mut self, code: u8) {
        let offset = self.icmp_offset();
        self.packet.data[offset + 1] = code;
    }

    pub fn checksum(&self) -> u16 {
        let offset = self.icmp_offset() + 2;
        u16::from_be_bytes([self.packet.data[offset], self.packet.data[offset + 1]])
    }

    /// The checksummed ICMP span: from the ICMP header to the end of the datagram.
    fn span_len(&self) -> usize {
        let declared = (self.packet.total_len() as usize).saturating_sub(self.packet.header_len());
        declared.min(self.packet.payload().len())
    }

    /// The ICMP message bounded by the IP total length.
    pub fn message(&self) -> &[u8] {
        let start = self.icmp_offset();
        &self.packet.data[start..start + self.span_len()]
    }

    /// Bytes after the type, code and checksum. Empty when the IP total length stops inside the
    /// ICMP header.
    pub fn data(&self) -> &[u8] {
        self.message().get(ICMP_HEADER_LEN..).unwrap_or(&[])
    }

    pub fn validate_checksum(&self) -> bool {
        validation::valid_icmp_checksum(
            self.packet.payload(),
            self.packet.total_len(),
            self.packet.header_len(),
        )
    }

    /// Recomputes the ICMP checksum over the span covered by the IP total length.
    pub fn set_checksum(&mut self) {
        let sum = checksum::checksum_with_zeroed_field(self.message(), 2);
        let offset = self.icmp_offset() + 2;
        self.packet.data[offset..offset + 2].copy_from_slice(&sum.to_be_bytes());
    }

    pub fn ip(&self) -> &Ipv4Packet {
        &self.packet
    }

    pub fn ip_mut(&mut self) -> &mut Ipv4Packet {
        &mut self.packet
    }
}

impl TryFrom<Ipv4Packet> for Icmpv4Packet {
    type Error = PacketError;

    fn try_from(packet: Ipv4Packet) -> Result<Self, Self::Error> {
        let protocol = packet.protocol();
        if protocol != IpProtocol::ICMP {
            return Err(PacketError::NotIcmp(protocol.into()));
        }
        let min = packet.payload_offset + ICMP_HEADER_LEN;
        if !validation::valid_icmp_length(packet.data.len()) || packet.data.len() < min {
            return Err(PacketError::TooShort {
                len: packet.data.len(),
                min,
            });
        }
        Ok(Icmpv4Packet { packet })
    }
}

impl From<Icmpv4Packet> for Ipv4Packet {
    fn from(packet: Icmpv4Packet) -> Self {
        packet.packet
    }
}

impl From<Icmpv4Packet> for EthernetFrame {
    fn from(packet: Icmpv4Packet) -> Self {
        EthernetFrame::from(packet.packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::internet_checksum;

    fn echo_request_frame(padding: usize) -> EthernetFrame {
        let mut icmp = vec![8, 0, 0, 0, 0x12, 0x34, 0x00, 0x01, b'p', b'i', b'n', b'g'];
        let sum = internet_checksum(&icmp);
        icmp[2..4].copy_from_slice(&sum.to_be_bytes());

        let mut packet = Ipv4Packet::with_payload_len(icmp.len());
        packet.set_ttl(64);
        packet.set_protocol(IpProtocol::ICMP);
        packet.set_src_addr("10.0.1.100".parse().unwrap());
        packet.set_dest_addr("10.0.1.1".parse().unwrap());
        packet.payload_mut().copy_from_slice(&icmp);
        packet.set_checksum();
        let mut frame = EthernetFrame::from(packet);
        frame.data.extend(std::iter::repeat(0).take(padding));
        frame
    }

    fn parse(frame: EthernetFrame) -> Result<Icmpv4Packet, PacketError> {
        Icmpv4Packet::try_from(Ipv4Packet::try_from(frame)?)
    }

    #[test]
    fn echo_request_fields() {
        let icmp = parse(echo_request_frame(0)).unwrap();
        assert_eq!(icmp.msg_type(), Icmpv4Message::EchoRequest);
        assert_eq!(icmp.msg_code(), 0);
        assert!(icmp.validate_checksum());
        assert_eq!(icmp.message().len(), 12);
        assert_eq!(icmp.data(), &[0x12, 0x34, 0x00, 0x01, b'p', b'i', b'n', b'g']);
    }

    #[test]
    fn padding_is_outside_the_message() {
        let icmp = parse(echo_request_frame(10)).unwrap();
        assert_eq!(icmp.message().len(), 12);
        assert!(icmp.validate_checksum());
    }

    #[test]
    fn short_total_len_leaves_no_data() {
        let mut icmp = parse(echo_request_frame(0)).unwrap();
        icmp.ip_mut().set_total_len(22);
        assert_eq!(icmp.message().len(), 2);
        assert!(icmp.data().is_empty());
        assert!(!icmp.validate_checksum());
    }

    #[test]
    fn turn_into_reply() {
        let mut icmp = parse(echo_request_frame(4)).unwrap();
        icmp.set_msg_type(Icmpv4Message::EchoReply);
        assert!(!icmp.validate_checksum());
        icmp.set_checksum();
        assert!(icmp.validate_checksum());
        assert_eq!(icmp.msg_type(), Icmpv4Message::EchoReply);
        // Padding bytes are not touched
        let frame = EthernetFrame::from(icmp);
        assert_eq!(&frame.data[frame.len() - 4..], &[0, 0, 0, 0]);
    }

    #[test]
    fn rejects_other_protocols() {
        let mut packet = Ipv4Packet::try_from(echo_request_frame(0)).unwrap();
        packet.set_protocol(IpProtocol::UDP);
        assert_eq!(
            Icmpv4Packet::try_from(packet),
            Err(PacketError::NotIcmp(17))
        );
    }

    #[test]
    fn rejects_truncated_header() {
        let mut packet = Ipv4Packet::with_payload_len(2);
        packet.set_protocol(IpProtocol::ICMP);
        assert!(matches!(
            Icmpv4Packet::try_from(packet),
            Err(PacketError::TooShort { .. })
        ));
    }

    #[test]
    fn message_types() {
        assert_eq!(Icmpv4Message::from(3), Icmpv4Message::DstUnreachable);
        assert_eq!(u8::from(Icmpv4Message::TimeExceeded), 11);
        assert_eq!(Icmpv4Message::from(42), Icmpv4Message::Unknown(42));
        assert!(Icmpv4Message::ParamProblem.is_error());
        assert!(Icmpv4Message::Redirect.is_error());
        assert!(!Icmpv4Message::EchoRequest.is_error());
        assert!(!Icmpv4Message::Unknown(42).is_error());
        assert_eq!(Icmpv4DstUnreachable::PortUnreachable as u8, 3);
        assert_eq!(Icmpv4TimeExceeded::TtlExpired as u8, 0);
    }
}
