use crate::config::RouterConfig;
use crate::interface::{Interface, InterfaceList};
use crate::route::RoutingTable;
use crate::router::Router;
use crate::transmit::{ChannelTransmitter, OutboundFrame};
use crate::utils::test::packet_generators::*;
use crossbeam::channel::Receiver;

/// eth1 holds 10.0.0.0/24 directly and reaches 172.16.0.0/16 through 10.0.0.254. There is no
/// default route.
pub(crate) const RTABLE: &str = "
10.0.1.0    0.0.0.0     255.255.255.0  eth0
10.0.0.0    0.0.0.0     255.255.255.0  eth1
172.16.0.0  10.0.0.254  255.255.0.0    eth1
";

pub(crate) fn interfaces() -> InterfaceList {
    let mut list = InterfaceList::new();
    list.add(Interface::new("eth0", ETH0_MAC, ETH0_IP)).unwrap();
    list.add(Interface::new("eth1", ETH1_MAC, ETH1_IP)).unwrap();
    list
}

pub(crate) fn test_router_with(
    config: RouterConfig,
) -> (Router<ChannelTransmitter>, Receiver<OutboundFrame>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let interfaces = interfaces();
    let routes = RoutingTable::parse(RTABLE, &interfaces).unwrap();
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

pub(crate) fn test_router() -> (Router<ChannelTransmitter>, Receiver<OutboundFrame>) {
    test_router_with(RouterConfig::default())
}

/// Everything transmitted so far.
pub(crate) fn collect(receiver: &Receiver<OutboundFrame>) -> Vec<OutboundFrame> {
    receiver.try_iter().collect()
}
