//! RFC 1071 Internet checksum, shared by the IPv4 and ICMP headers.

/// One's-complement sum of `data` as big-endian 16-bit words, without the final complement.
/// An odd trailing byte is padded with a zero byte. The word starting at `skip` (if any) is
/// treated as zero, which is how a header's own checksum field is excluded.
fn ones_complement_sum(data: &[u8], skip: Option<usize>) -> u16 {
    let full_sum = data
        .chunks(2)
        .enumerate()
        .filter(|(i, _)| skip.map_or(true, |offset| i * 2 != offset))
        .fold(0u32, |acc, (_, word)| {
            let hi = u32::from(word[0]) << 8;
            let lo = word.get(1).copied().map_or(0, u32::from);
            acc + (hi | lo)
        });
    fold_carries(full_sum)
}

fn fold_carries(mut sum: u32) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum as u16
}

/// The Internet checksum of `data`, as it should be written into a checksum field.
pub fn internet_checksum(data: &[u8]) -> u16 {
    !ones_complement_sum(data, None)
}

/// The Internet checksum of `data` computed as if the 16-bit field at `field_offset` were zero.
/// `field_offset` must be even, checksum fields always are.
pub fn checksum_with_zeroed_field(data: &[u8], field_offset: usize) -> u16 {
    debug_assert!(field_offset % 2 == 0);
    !ones_complement_sum(data, Some(field_offset))
}

/// True if `data`, with its checksum already embedded, sums to zero.
pub fn verify(data: &[u8]) -> bool {
    internet_checksum(data) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    // 192.168.0.1 -> 192.168.0.199, UDP, checksum 0xb8c0 (see ipv4 tests)
    const HEADER: [u8; 20] = [
        0x45, 0x00, 0x00, 0x14, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0xb8, 0xc0, 0xc0, 0xa8, 0x00,
        0x01, 0xc0, 0xa8, 0x00, 0xc7,
    ];

    #[test]
    fn known_header_checksum() {
        assert_eq!(checksum_with_zeroed_field(&HEADER, 10), 0xb8c0);
        let mut zeroed = HEADER;
        zeroed[10] = 0;
        zeroed[11] = 0;
        assert_eq!(internet_checksum(&zeroed), 0xb8c0);
    }

    #[test]
    fn embedded_checksum_sums_to_zero() {
        assert!(verify(&HEADER));
        assert_eq!(internet_checksum(&HEADER), 0);
    }

    #[test]
    fn recompute_is_stable() {
        let first = checksum_with_zeroed_field(&HEADER, 10);
        let mut header = HEADER;
        header[10..12].copy_from_slice(&first.to_be_bytes());
        let second = checksum_with_zeroed_field(&header, 10);
        assert_eq!(first, second);
    }

    #[test]
    fn odd_length_pads_with_zero() {
        assert_eq!(internet_checksum(&[0x01]), internet_checksum(&[0x01, 0x00]));
        assert_eq!(internet_checksum(&[0x12, 0x34, 0x56]), !0x6834);
    }

    #[test]
    fn carries_wrap_around() {
        // 0xffff + 0x0001 = 0x1_0000 -> 0x0001 after the end-around carry
        assert_eq!(internet_checksum(&[0xff, 0xff, 0x00, 0x01]), !0x0001);
    }

    #[test]
    fn every_single_bit_flip_is_detected() {
        for byte in 0..HEADER.len() {
            for bit in 0..8 {
                let mut corrupted = HEADER;
                corrupted[byte] ^= 1 << bit;
                let carried = u16::from_be_bytes([corrupted[10], corrupted[11]]);
                assert_ne!(
                    checksum_with_zeroed_field(&corrupted, 10),
                    carried,
                    "flip of byte {} bit {} went unnoticed",
                    byte,
                    bit
                );
            }
        }
    }
}
