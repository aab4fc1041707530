use thiserror::Error;

/// Reasons a byte buffer can not be viewed as a given header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    #[error("frame is {len} bytes, needs at least {min}")]
    TooShort { len: usize, min: usize },

    #[error("frame has ether type {found:#06x}, expected {expected:#06x}")]
    WrongEtherType { found: u16, expected: u16 },

    #[error("unsupported ARP address lengths (hardware {hardware}, protocol {protocol})")]
    UnsupportedArpAddressLen { hardware: u8, protocol: u8 },

    #[error("packet has IP version {0}, expected 4")]
    WrongIpVersion(u8),

    #[error("IPv4 header length field {0} is below the 5 word minimum")]
    InvalidHeaderLen(u8),

    #[error("IP protocol {0} is not ICMP")]
    NotIcmp(u8),

    #[error("invalid MAC address: {0}")]
    InvalidMacAddr(String),
}
