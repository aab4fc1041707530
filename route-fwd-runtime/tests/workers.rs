mod common;

use common::*;
use route_fwd_packets::*;
use route_fwd_runtime::arp::spawn_arp_sweeper;
use route_fwd_runtime::intake::{spawn_workers, InboundFrame};
use route_fwd_runtime::{ArpConfig, RouterConfig};
use std::convert::TryFrom;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn workers_forward_frames_from_intake() {
    let (router, output) = router(RouterConfig::default());
    let router = Arc::new(router);
    let (sender, receiver) = crossbeam::channel::unbounded();
    let handles = spawn_workers(Arc::clone(&router), receiver).unwrap();
    assert_eq!(handles.len(), router.config().workers);

    sender
        .send(InboundFrame {
            interface: "eth0".to_string(),
            data: echo_request_frame(Ipv4Addr::new(10, 0, 0, 1)),
        })
        .unwrap();
    drop(sender);
    for handle in handles {
        handle.join().unwrap();
    }

    let sent = collect(&output);
    assert_eq!(sent.len(), 1);
    // Pinging eth1's address from eth0 is answered on eth0
    assert_eq!(sent[0].interface, "eth0");
}

#[tokio::test]
async fn unanswered_arp_bounces_host_unreachable() {
    let config = RouterConfig {
        arp: ArpConfig {
            retry_interval: Duration::from_millis(5),
            sweep_interval: Duration::from_millis(5),
            max_retries: 3,
            ..ArpConfig::default()
        },
        ..RouterConfig::default()
    };
    let (router, output) = router(config);
    let router = Arc::new(router);
    let sweeper = spawn_arp_sweeper(&router);

    router.handle_packet(udp_frame(Ipv4Addr::new(10, 0, 0, 9), 64, b"nobody home"), "eth0");

    let mut requests = 0;
    let mut unreachable = None;
    for _ in 0..200 {
        tokio::time::sleep(Duration::from_millis(5)).await;
        for out in collect(&output) {
            match out.frame.ether_type() {
                ARP_ETHER_TYPE => requests += 1,
                _ => unreachable = Some(out),
            }
        }
        if unreachable.is_some() {
            break;
        }
    }

    assert_eq!(requests, 3);
    let out = unreachable.expect("no host unreachable was sent");
    assert_eq!(out.interface, "eth0");
    let icmp = Icmpv4Packet::try_from(Ipv4Packet::try_from(out.frame).unwrap()).unwrap();
    assert_eq!(icmp.msg_type(), Icmpv4Message::DstUnreachable);
    assert_eq!(icmp.msg_code(), Icmpv4DstUnreachable::HostUnreachable as u8);
    assert_eq!(icmp.ip().dest_addr(), HOST_IP);
    assert_eq!(router.arp_cache().pending_count(), 0);

    sweeper.abort();
}
