use std::time::Duration;

/// Timers for the ARP cache and its background sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArpConfig {
    /// How long a learned address stays usable after it was recorded.
    pub entry_ttl: Duration,
    /// Minimum gap between two broadcasts for the same unresolved address.
    pub retry_interval: Duration,
    /// Broadcasts sent for one address before queued traffic is bounced back.
    pub max_retries: u32,
    pub sweep_interval: Duration,
}

impl Default for ArpConfig {
    fn default() -> Self {
        ArpConfig {
            entry_ttl: Duration::from_secs(15),
            retry_interval: Duration::from_secs(1),
            max_retries: 5,
            sweep_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouterConfig {
    pub arp: ArpConfig,
    /// Worker threads pulling frames off the intake channel.
    pub workers: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig {
            arp: ArpConfig::default(),
            workers: 2,
        }
    }
}
