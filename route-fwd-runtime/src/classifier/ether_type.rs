use crate::classifier::Classifier;
use route_fwd_packets::{EthernetFrame, ARP_ETHER_TYPE, IPV4_ETHER_TYPE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EtherType {
    Arp,
    Ipv4,
    Unsupported(u16),
}

/// Sorts frames by the EtherType field of the Ethernet header.
/// https://en.wikipedia.org/wiki/EtherType
#[derive(Default)]
pub struct ByEtherType;

impl Classifier for ByEtherType {
    type Packet = EthernetFrame;
    type Class = EtherType;

    fn classify(&self, frame: &Self::Packet) -> Self::Class {
        match frame.ether_type() {
            ARP_ETHER_TYPE => EtherType::Arp,
            IPV4_ETHER_TYPE => EtherType::Ipv4,
            other => EtherType::Unsupported(other),
        }
    }
}
