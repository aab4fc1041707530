use crate::router::Router;
use crate::transmit::Transmit;
use log::{debug, warn};
use route_fwd_packets::{Icmpv4DstUnreachable, Ipv4Packet};
use std::convert::TryFrom;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time;

impl<T: Transmit> Router<T> {
    /// One pass of the ARP cache's upkeep: re-broadcasts requests that are due and bounces the
    /// traffic of requests that ran out of retries with host unreachable.
    pub fn sweep_arp(&self, now: Instant) {
        let report = self.arp_cache.sweep(now);

        for retry in report.retries {
            debug!("Retrying ARP for {} on {}", retry.ip, retry.interface);
            self.send_arp_request(retry.ip, &retry.interface);
        }

        for request in report.failed {
            warn!(
                "No ARP reply for {} after {} request(s), dropping {} queued frame(s)",
                request.ip,
                request.times_sent,
                request.frames.len()
            );
            for queued in request.frames {
                let inbound = match self.interfaces.get(&queued.inbound_interface) {
                    Some(inbound) => inbound,
                    None => {
                        warn!(
                            "Dropping queued frame for {}: unknown inbound interface {}",
                            request.ip, queued.inbound_interface
                        );
                        continue;
                    }
                };
                match Ipv4Packet::try_from(queued.frame) {
                    Ok(packet) => {
                        self.send_unreachable(&packet, Icmpv4DstUnreachable::HostUnreachable, inbound)
                    }
                    Err(e) => warn!("Dropping unparsable queued frame: {}", e),
                }
            }
        }
    }
}

/// Runs [`Router::sweep_arp`] every `sweep_interval` on the current tokio runtime. The task ends
/// on its own once the last strong reference to the router is dropped.
pub fn spawn_arp_sweeper<T: Transmit + 'static>(router: &Arc<Router<T>>) -> JoinHandle<()> {
    // tokio rejects a zero period
    let period = router.config.arp.sweep_interval.max(Duration::from_millis(1));
    let router: Weak<Router<T>> = Arc::downgrade(router);
    tokio::spawn(async move {
        let mut interval = time::interval(period);
        loop {
            interval.tick().await;
            match router.upgrade() {
                Some(router) => router.sweep_arp(Instant::now()),
                None => break,
            }
        }
        debug!("ARP sweeper stopped");
    })
}
