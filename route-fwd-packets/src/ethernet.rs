use crate::*;

#[derive(Clone, Debug)]
pub struct EthernetFrame {
    pub data: PacketData,
    pub payload_offset: usize,
}

impl Packet for EthernetFrame {}

impl EthernetFrame {
    pub fn from_buffer(frame: PacketData) -> Result<EthernetFrame, PacketError> {
        // Ethernet II frames must be at least the header, which is 14bytes
        // 0                    6                    12                      14
        // |---6 byte Dest_MAC--|---6 byte Src_MAC---|--2 Byte EtherType---|

        if !validation::valid_ethernet_length(frame.len()) {
            return Err(PacketError::TooShort {
                len: frame.len(),
                min: ETHERNET_HEADER_LEN,
            });
        }

        Ok(EthernetFrame {
            data: frame,
            payload_offset: ETHERNET_HEADER_LEN,
        })
    }

    /// Returns an EthernetFrame with a zeroed header and no payload.
    pub fn empty() -> EthernetFrame {
        EthernetFrame {
            data: vec![0; ETHERNET_HEADER_LEN],
            payload_offset: ETHERNET_HEADER_LEN,
        }
    }

    /// Returns a zeroed frame with room for `payload_len` bytes after the header.
    pub fn with_payload_len(payload_len: usize) -> EthernetFrame {
        EthernetFrame {
            data: vec![0; ETHERNET_HEADER_LEN + payload_len],
            payload_offset: ETHERNET_HEADER_LEN,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dest_mac(&self) -> MacAddr {
        MacAddr::new(mac_array(&self.data[0..6]))
    }

    pub fn src_mac(&self) -> MacAddr {
        MacAddr::new(mac_array(&self.data[6..12]))
    }

    pub fn set_dest_mac(&mut self, mac: MacAddr) {
        self.data[..6].copy_from_slice(&mac.bytes);
    }

    pub fn set_src_mac(&mut self, mac: MacAddr) {
        self.data[6..12].copy_from_slice(&mac.bytes);
    }

    pub fn ether_type(&self) -> u16 {
        u16::from_be_bytes([self.data[12], self.data[13]])
    }

    pub fn set_ether_type(&mut self, ether_type: u16) {
        self.data[12..14].copy_from_slice(&ether_type.to_be_bytes());
    }

    /// Points the frame back at whoever sent it: the old source becomes the destination and
    /// `own_mac` becomes the source.
    pub fn reverse(&mut self, own_mac: MacAddr) {
        let sender = self.src_mac();
        self.set_dest_mac(sender);
        self.set_src_mac(own_mac);
    }

    pub fn payload(&self) -> &[u8] {
        &self.data[self.payload_offset..]
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.payload_offset..]
    }

    pub fn set_payload(&mut self, payload: &[u8]) {
        self.data.truncate(self.payload_offset);
        self.data.reserve_exact(payload.len());
        self.data.extend_from_slice(payload);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> PacketData {
        self.data
    }
}

/// EthernetFrames are considered the same if they carry the same bytes.
impl PartialEq for EthernetFrame {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for EthernetFrame {}
