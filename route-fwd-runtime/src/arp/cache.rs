use crate::config::ArpConfig;
use log::debug;
use parking_lot::Mutex;
use route_fwd_packets::{EthernetFrame, MacAddr};
use std::collections::{HashMap, VecDeque};
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

/// A learned IP to MAC translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArpEntry {
    pub ip: Ipv4Addr,
    pub mac: MacAddr,
    pub created: Instant,
}

/// A frame parked behind an unresolved next hop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueuedFrame {
    pub frame: EthernetFrame,
    /// Interface the frame leaves through once the next hop resolves.
    pub outgoing_interface: String,
    /// Interface the frame arrived on. Errors about it go back out this way.
    pub inbound_interface: String,
}

/// A resolution in flight: every frame waiting on `ip`, oldest first.
#[derive(Clone, Debug)]
pub struct PendingRequest {
    pub ip: Ipv4Addr,
    /// Interface the ARP requests are broadcast on.
    pub interface: String,
    pub frames: VecDeque<QueuedFrame>,
    pub last_sent: Instant,
    pub times_sent: u32,
}

/// Result of parking a frame.
#[derive(Debug)]
pub enum QueueOutcome {
    /// First frame for this address. The caller broadcasts the initial ARP request.
    NewRequest,
    /// Added behind frames already waiting on the same address.
    Queued,
    /// The address was learned since the caller's lookup. The frame is handed back.
    Resolved(ArpEntry, QueuedFrame),
}

/// An ARP request the sweeper should broadcast again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArpRetry {
    pub ip: Ipv4Addr,
    pub interface: String,
}

#[derive(Debug, Default)]
pub struct SweepReport {
    pub retries: Vec<ArpRetry>,
    /// Requests that ran out of retries, already removed from the cache.
    pub failed: Vec<PendingRequest>,
    pub expired: usize,
}

#[derive(Default)]
struct ArpState {
    entries: HashMap<Ipv4Addr, ArpEntry>,
    requests: HashMap<Ipv4Addr, PendingRequest>,
}

/// Learned translations plus the requests still waiting on one, behind a single lock.
///
/// Every method is one critical section, so a frame is never queued behind a request that
/// another thread just resolved and destroyed.
pub struct ArpCache {
    state: Mutex<ArpState>,
    entry_ttl: Duration,
    retry_interval: Duration,
    max_retries: u32,
}

impl ArpCache {
    pub fn new(config: &ArpConfig) -> Self {
        ArpCache {
            state: Mutex::new(ArpState::default()),
            entry_ttl: config.entry_ttl,
            retry_interval: config.retry_interval,
            max_retries: config.max_retries,
        }
    }

    fn is_live(&self, entry: &ArpEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.created) < self.entry_ttl
    }

    pub fn lookup(&self, ip: Ipv4Addr) -> Option<ArpEntry> {
        let now = Instant::now();
        let state = self.state.lock();
        state
            .entries
            .get(&ip)
            .filter(|entry| self.is_live(entry, now))
            .copied()
    }

    /// Records `ip` at `mac`. If frames were waiting on `ip`, their request is removed and
    /// returned so the caller can send them.
    pub fn insert(&self, mac: MacAddr, ip: Ipv4Addr) -> Option<PendingRequest> {
        let entry = ArpEntry {
            ip,
            mac,
            created: Instant::now(),
        };
        let mut state = self.state.lock();
        state.entries.insert(ip, entry);
        state.requests.remove(&ip)
    }

    /// Parks `queued` until `ip` resolves, creating the request if there is none. A new request
    /// counts as sent once.
    pub fn queue_frame(&self, ip: Ipv4Addr, queued: QueuedFrame) -> QueueOutcome {
        let now = Instant::now();
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if let Some(entry) = state.entries.get(&ip).filter(|e| self.is_live(e, now)) {
            return QueueOutcome::Resolved(*entry, queued);
        }
        match state.requests.get_mut(&ip) {
            Some(request) => {
                request.frames.push_back(queued);
                QueueOutcome::Queued
            }
            None => {
                let interface = queued.outgoing_interface.clone();
                let mut frames = VecDeque::new();
                frames.push_back(queued);
                state.requests.insert(
                    ip,
                    PendingRequest {
                        ip,
                        interface,
                        frames,
                        last_sent: now,
                        times_sent: 1,
                    },
                );
                QueueOutcome::NewRequest
            }
        }
    }

    /// Drops the request for `ip` along with its frames.
    pub fn destroy(&self, ip: Ipv4Addr) -> Option<PendingRequest> {
        self.state.lock().requests.remove(&ip)
    }

    /// Frames currently parked behind `ip`.
    pub fn queued_len(&self, ip: Ipv4Addr) -> usize {
        self.state
            .lock()
            .requests
            .get(&ip)
            .map_or(0, |request| request.frames.len())
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// Evicts expired entries and advances every request due for a retry. Requests that have
    /// been sent `max_retries` times are removed and reported as failed.
    pub fn sweep(&self, now: Instant) -> SweepReport {
        let mut report = SweepReport::default();
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let before = state.entries.len();
        let entry_ttl = self.entry_ttl;
        state
            .entries
            .retain(|_, entry| now.saturating_duration_since(entry.created) < entry_ttl);
        report.expired = before - state.entries.len();

        let mut exhausted = Vec::new();
        for (ip, request) in state.requests.iter_mut() {
            if now.saturating_duration_since(request.last_sent) < self.retry_interval {
                continue;
            }
            if request.times_sent >= self.max_retries {
                exhausted.push(*ip);
            } else {
                request.times_sent += 1;
                request.last_sent = now;
                report.retries.push(ArpRetry {
                    ip: *ip,
                    interface: request.interface.clone(),
                });
            }
        }
        for ip in exhausted {
            if let Some(request) = state.requests.remove(&ip) {
                report.failed.push(request);
            }
        }

        if report.expired > 0 {
            debug!("Evicted {} expired ARP entries", report.expired);
        }
        report
    }
}
