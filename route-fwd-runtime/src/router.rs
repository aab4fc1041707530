use crate::arp::ArpCache;
use crate::config::RouterConfig;
use crate::error::RouterError;
use crate::interface::InterfaceList;
use crate::route::RoutingTable;
use crate::transmit::Transmit;
use log::warn;
use route_fwd_packets::EthernetFrame;

/// Everything the forwarding plane needs to process a frame. One value per router instance,
/// shared by reference (usually behind an `Arc`) between workers and the ARP sweeper.
pub struct Router<T: Transmit> {
    pub(crate) interfaces: InterfaceList,
    pub(crate) routes: RoutingTable,
    pub(crate) arp_cache: ArpCache,
    pub(crate) transmitter: T,
    pub(crate) config: RouterConfig,
}

impl<T: Transmit> Router<T> {
    pub fn builder() -> RouterBuilder<T> {
        RouterBuilder::default()
    }

    pub fn interfaces(&self) -> &InterfaceList {
        &self.interfaces
    }

    pub fn routes(&self) -> &RoutingTable {
        &self.routes
    }

    pub fn arp_cache(&self) -> &ArpCache {
        &self.arp_cache
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn transmitter(&self) -> &T {
        &self.transmitter
    }

    /// Hands `frame` to the transmitter. Failures end here.
    pub(crate) fn send(&self, frame: EthernetFrame, interface: &str) {
        if let Err(e) = self.transmitter.transmit(frame, interface) {
            warn!("Transmit on {} failed: {}", interface, e);
        }
    }
}

/// Assembles a [`Router`]. Interfaces and routes default to empty tables, config to
/// [`RouterConfig::default`]; a transmitter is required.
pub struct RouterBuilder<T: Transmit> {
    interfaces: InterfaceList,
    routes: RoutingTable,
    config: RouterConfig,
    transmitter: Option<T>,
}

impl<T: Transmit> Default for RouterBuilder<T> {
    fn default() -> Self {
        RouterBuilder {
            interfaces: InterfaceList::new(),
            routes: RoutingTable::new(),
            config: RouterConfig::default(),
            transmitter: None,
        }
    }
}

impl<T: Transmit> RouterBuilder<T> {
    pub fn interfaces(mut self, interfaces: InterfaceList) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub fn routes(mut self, routes: RoutingTable) -> Self {
        self.routes = routes;
        self
    }

    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn transmitter(mut self, transmitter: T) -> Self {
        self.transmitter = Some(transmitter);
        self
    }

    pub fn build(self) -> Result<Router<T>, RouterError> {
        let transmitter = self.transmitter.ok_or(RouterError::MissingTransmitter)?;
        let interfaces = &self.interfaces;
        if let Some(route) = self
            .routes
            .entries()
            .iter()
            .find(|route| interfaces.get(&route.interface).is_none())
        {
            return Err(RouterError::UnknownInterface(route.interface.clone()));
        }
        Ok(Router {
            arp_cache: ArpCache::new(&self.config.arp),
            interfaces: self.interfaces,
            routes: self.routes,
            transmitter,
            config: self.config,
        })
    }
}
