use std::fmt;
use std::str::FromStr;

use crate::PacketError;

/// The common datatype that all packet structures use to hold their bytes.
pub type PacketData = Vec<u8>;

pub const ETHERNET_HEADER_LEN: usize = 14;
pub const ARP_HEADER_LEN: usize = 28;
pub const IPV4_HEADER_LEN: usize = 20;
/// Type, code and checksum. Everything after is message specific.
pub const ICMP_HEADER_LEN: usize = 4;

pub const IPV4_ETHER_TYPE: u16 = 0x0800;
pub const ARP_ETHER_TYPE: u16 = 0x0806;

/// Marker for structures that wrap a full link-layer frame.
pub trait Packet: Send + Clone {}

// Most significant byte is 0th
#[derive(Eq, Clone, Copy, Hash, PartialEq, Default)]
pub struct MacAddr {
    pub bytes: [u8; 6],
}

impl MacAddr {
    pub const BROADCAST: MacAddr = MacAddr { bytes: [0xff; 6] };

    pub fn new(bytes: [u8; 6]) -> MacAddr {
        MacAddr { bytes }
    }

    pub fn is_broadcast(&self) -> bool {
        *self == MacAddr::BROADCAST
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.bytes;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl fmt::Debug for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddr({})", self)
    }
}

impl FromStr for MacAddr {
    type Err = PacketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 6];
        let mut parts = s.split(|c| c == ':' || c == '-');
        for byte in bytes.iter_mut() {
            let part = parts
                .next()
                .ok_or_else(|| PacketError::InvalidMacAddr(s.to_string()))?;
            if part.len() != 2 {
                return Err(PacketError::InvalidMacAddr(s.to_string()));
            }
            *byte = u8::from_str_radix(part, 16)
                .map_err(|_| PacketError::InvalidMacAddr(s.to_string()))?;
        }
        if parts.next().is_some() {
            return Err(PacketError::InvalidMacAddr(s.to_string()));
        }
        Ok(MacAddr::new(bytes))
    }
}

pub(crate) fn mac_array(bytes: &[u8]) -> [u8; 6] {
    let mut mac_arr: [u8; 6] = Default::default();
    mac_arr.copy_from_slice(&bytes[0..6]);
    mac_arr
}

pub(crate) fn ipv4_array(bytes: &[u8]) -> [u8; 4] {
    let mut ipv4_arr: [u8; 4] = Default::default();
    ipv4_arr.copy_from_slice(&bytes[0..4]);
    ipv4_arr
}

/// Protocol numbers carried in the IPv4 protocol field that the router cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IpProtocol {
    ICMP,
    TCP,
    UDP,
    Other(u8),
}

impl From<u8> for IpProtocol {
    fn from(protocol: u8) -> Self {
        match protocol {
            1 => IpProtocol::ICMP,
            6 => IpProtocol::TCP,
            17 => IpProtocol::UDP,
            other => IpProtocol::Other(other),
        }
    }
}

impl From<IpProtocol> for u8 {
    fn from(protocol: IpProtocol) -> Self {
        match protocol {
            IpProtocol::ICMP => 1,
            IpProtocol::TCP => 6,
            IpProtocol::UDP => 17,
            IpProtocol::Other(other) => other,
        }
    }
}
