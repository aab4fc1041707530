//! Cheap gates run before any header is interpreted. None of these touch the buffer.

use crate::checksum::checksum_with_zeroed_field;
use crate::{ARP_HEADER_LEN, ETHERNET_HEADER_LEN, ICMP_HEADER_LEN, IPV4_HEADER_LEN};

const IPV4_CHECKSUM_OFFSET: usize = 10;
const ICMP_CHECKSUM_OFFSET: usize = 2;

pub fn valid_ethernet_length(len: usize) -> bool {
    len >= ETHERNET_HEADER_LEN
}

pub fn valid_arp_length(len: usize) -> bool {
    len >= ETHERNET_HEADER_LEN + ARP_HEADER_LEN
}

pub fn valid_ip_length(len: usize) -> bool {
    len >= ETHERNET_HEADER_LEN + IPV4_HEADER_LEN
}

pub fn valid_icmp_length(len: usize) -> bool {
    len >= ETHERNET_HEADER_LEN + IPV4_HEADER_LEN + ICMP_HEADER_LEN
}

/// Checks the checksum carried in an IPv4 header (`header` spans exactly IHL * 4 bytes).
pub fn valid_ip_checksum(header: &[u8]) -> bool {
    if header.len() < IPV4_HEADER_LEN {
        return false;
    }
    let carried = u16::from_be_bytes([
        header[IPV4_CHECKSUM_OFFSET],
        header[IPV4_CHECKSUM_OFFSET + 1],
    ]);
    checksum_with_zeroed_field(header, IPV4_CHECKSUM_OFFSET) == carried
}

/// Checks the checksum carried in an ICMP message.
///
/// `icmp` starts at the ICMP header and runs to the end of the received buffer. The checksummed
/// span is bounded by the IP header's declared total length, not by the buffer, so link-layer
/// padding is excluded. A total length that claims more bytes than were received, or too few to
/// hold an ICMP header, fails validation.
pub fn valid_icmp_checksum(icmp: &[u8], ip_total_len: u16, ip_header_len: usize) -> bool {
    let span = match (ip_total_len as usize).checked_sub(ip_header_len) {
        Some(span) if span >= ICMP_HEADER_LEN && span <= icmp.len() => span,
        _ => return false,
    };
    let icmp = &icmp[..span];
    let carried = u16::from_be_bytes([
        icmp[ICMP_CHECKSUM_OFFSET],
        icmp[ICMP_CHECKSUM_OFFSET + 1],
    ]);
    checksum_with_zeroed_field(icmp, ICMP_CHECKSUM_OFFSET) == carried
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::internet_checksum;

    #[test]
    fn length_guards() {
        assert!(!valid_ethernet_length(13));
        assert!(valid_ethernet_length(14));
        assert!(!valid_arp_length(41));
        assert!(valid_arp_length(42));
        assert!(!valid_ip_length(33));
        assert!(valid_ip_length(34));
        assert!(!valid_icmp_length(37));
        assert!(valid_icmp_length(38));
    }

    #[test]
    fn ip_checksum() {
        let mut header: Vec<u8> = vec![
            0x45, 0x00, 0x00, 0x14, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0xb8, 0xc0, 0xc0, 0xa8,
            0x00, 0x01, 0xc0, 0xa8, 0x00, 0xc7,
        ];
        assert!(valid_ip_checksum(&header));
        header[8] = 0x3f;
        assert!(!valid_ip_checksum(&header));
        // The carried value is left as it was
        assert_eq!(&header[10..12], &[0xb8, 0xc0]);
        assert!(!valid_ip_checksum(&header[..19]));
    }

    fn echo_request() -> Vec<u8> {
        let mut icmp = vec![8, 0, 0, 0, 0x12, 0x34, 0x00, 0x01, b'p', b'i', b'n', b'g'];
        let sum = internet_checksum(&icmp);
        icmp[2..4].copy_from_slice(&sum.to_be_bytes());
        icmp
    }

    #[test]
    fn icmp_checksum_uses_declared_length() {
        let icmp = echo_request();
        let total_len = (20 + icmp.len()) as u16;
        assert!(valid_icmp_checksum(&icmp, total_len, 20));

        // Ethernet padding after the datagram is not part of the checksum
        let mut padded = icmp.clone();
        padded.extend_from_slice(&[0xaa; 6]);
        assert!(valid_icmp_checksum(&padded, total_len, 20));
    }

    #[test]
    fn icmp_checksum_rejects_bad_lengths() {
        let icmp = echo_request();
        let total_len = (20 + icmp.len()) as u16;
        assert!(!valid_icmp_checksum(&icmp, total_len + 2, 20));
        assert!(!valid_icmp_checksum(&icmp, 22, 20));
        assert!(!valid_icmp_checksum(&icmp, 10, 20));
    }

    #[test]
    fn icmp_checksum_detects_payload_corruption() {
        let mut icmp = echo_request();
        let total_len = (20 + icmp.len()) as u16;
        icmp[9] ^= 0x01;
        assert!(!valid_icmp_checksum(&icmp, total_len, 20));
    }
}
