#![allow(dead_code)]

use crossbeam::channel::Receiver;
use route_fwd_packets::{checksum, ArpFrame, ArpOp, EthernetFrame, IpProtocol, Ipv4Packet, MacAddr};
use route_fwd_runtime::{
    ChannelTransmitter, InterfaceList, OutboundFrame, Router, RouterConfig, RoutingTable,
};
use std::io::Write;
use std::net::Ipv4Addr;
use tempfile::NamedTempFile;

pub const INTERFACES: &str = "\
# name mac               ip
eth0 00:11:22:33:44:00 10.0.1.1
eth1 00:11:22:33:44:01 10.0.0.1
";

pub const RTABLE: &str = "\
10.0.1.0   0.0.0.0    255.255.255.0 eth0
10.0.0.0   0.0.0.0    255.255.255.0 eth1
";

pub const ETH0_MAC: MacAddr = MacAddr {
    bytes: [0x00, 0x11, 0x22, 0x33, 0x44, 0x00],
};
pub const ETH1_MAC: MacAddr = MacAddr {
    bytes: [0x00, 0x11, 0x22, 0x33, 0x44, 0x01],
};
pub const HOST_MAC: MacAddr = MacAddr {
    bytes: [0x02, 0x00, 0x00, 0x00, 0x01, 0x64],
};
pub const HOST_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 1, 100);

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// A router loaded from interface and rtable files, transmitting onto a channel.
pub fn router(config: RouterConfig) -> (Router<ChannelTransmitter>, Receiver<OutboundFrame>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let interfaces_file = write_temp(INTERFACES);
    let rtable_file = write_temp(RTABLE);

    let interfaces = InterfaceList::load(interfaces_file.path()).unwrap();
    let routes = RoutingTable::load(rtable_file.path(), &interfaces).unwrap();
    let (transmitter, receiver) = ChannelTransmitter::unbounded();
    let router = Router::builder()
        .interfaces(interfaces)
        .routes(routes)
        .config(config)
        .transmitter(transmitter)
        .build()
        .unwrap();
    (router, receiver)
}

/// A UDP datagram from HOST to `dst`, as it arrives on eth0.
pub fn udp_frame(dst: Ipv4Addr, ttl: u8, payload: &[u8]) -> Vec<u8> {
    let mut udp = vec![0x30, 0x39, 0x00, 0x35, 0, (8 + payload.len()) as u8, 0, 0];
    udp.extend_from_slice(payload);

    let mut packet = Ipv4Packet::with_payload_len(udp.len());
    {
        let mut ethernet = packet.ethernet_mut();
        ethernet.set_dest_mac(ETH0_MAC);
        ethernet.set_src_mac(HOST_MAC);
    }
    packet.set_ttl(ttl);
    packet.set_protocol(IpProtocol::UDP);
    packet.set_src_addr(HOST_IP);
    packet.set_dest_addr(dst);
    packet.payload_mut().copy_from_slice(&udp);
    packet.set_checksum();
    EthernetFrame::from(packet).into_inner()
}

pub fn echo_request_frame(dst: Ipv4Addr) -> Vec<u8> {
    let mut icmp = vec![8, 0, 0, 0, 0x00, 0x2a, 0x00, 0x07, b'h', b'e', b'l', b'l', b'o'];
    let sum = checksum::internet_checksum(&icmp);
    icmp[2..4].copy_from_slice(&sum.to_be_bytes());

    let mut packet = Ipv4Packet::with_payload_len(icmp.len());
    {
        let mut ethernet = packet.ethernet_mut();
        ethernet.set_dest_mac(ETH0_MAC);
        ethernet.set_src_mac(HOST_MAC);
    }
    packet.set_ttl(64);
    packet.set_protocol(IpProtocol::ICMP);
    packet.set_src_addr(HOST_IP);
    packet.set_dest_addr(dst);
    packet.payload_mut().copy_from_slice(&icmp);
    packet.set_checksum();
    EthernetFrame::from(packet).into_inner()
}

/// An ARP reply from (`mac`, `ip`) to eth1.
pub fn arp_reply_frame(mac: MacAddr, ip: Ipv4Addr) -> Vec<u8> {
    let mut arp = ArpFrame::new();
    arp.ethernet_mut().set_dest_mac(ETH1_MAC);
    arp.ethernet_mut().set_src_mac(mac);
    arp.set_opcode(ArpOp::Reply as u16);
    arp.set_sender_hardware_addr(mac);
    arp.set_sender_protocol_addr(ip);
    arp.set_target_hardware_addr(ETH1_MAC);
    arp.set_target_protocol_addr(Ipv4Addr::new(10, 0, 0, 1));
    arp.frame().into_inner()
}

pub fn collect(receiver: &Receiver<OutboundFrame>) -> Vec<OutboundFrame> {
    receiver.try_iter().collect()
}
