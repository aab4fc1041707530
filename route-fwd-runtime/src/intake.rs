use crate::error::RouterError;
use crate::router::Router;
use crate::transmit::Transmit;
use crossbeam::channel::Receiver;
use log::debug;
use route_fwd_packets::PacketData;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A raw frame as it came off the wire, tagged with the interface it arrived on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundFrame {
    pub interface: String,
    pub data: PacketData,
}

/// Starts the router's configured number of worker threads (at least one). Each pulls frames off
/// `intake` and runs them through [`Router::handle_packet`], exiting once every sender of `intake`
/// is dropped and the channel is drained.
pub fn spawn_workers<T: Transmit + 'static>(
    router: Arc<Router<T>>,
    intake: Receiver<InboundFrame>,
) -> Result<Vec<JoinHandle<()>>, RouterError> {
    let workers = router.config().workers.max(1);
    (0..workers)
        .map(|id| {
            let router = Arc::clone(&router);
            let intake = intake.clone();
            thread::Builder::new()
                .name(format!("route-fwd-worker-{}", id))
                .spawn(move || {
                    for inbound in intake.iter() {
                        router.handle_packet(inbound.data, &inbound.interface);
                    }
                    debug!("Worker {} stopped: intake closed", id);
                })
                .map_err(RouterError::Spawn)
        })
        .collect()
}
