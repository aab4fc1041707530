use crate::error::RouterError;
use crate::interface::InterfaceList;
use ipnetwork::Ipv4Network;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

/// One static route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteEntry {
    pub destination: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub interface: String,
    network: Ipv4Network,
}

impl RouteEntry {
    /// Fails if `mask` is not a contiguous run of leading ones.
    pub fn new(
        destination: Ipv4Addr,
        gateway: Ipv4Addr,
        mask: Ipv4Addr,
        interface: &str,
    ) -> Result<Self, RouterError> {
        let network = Ipv4Network::with_netmask(destination, mask)
            .map_err(|source| RouterError::InvalidNetmask { mask, source })?;
        Ok(RouteEntry {
            destination,
            gateway,
            mask,
            interface: interface.to_string(),
            network,
        })
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        self.network.contains(ip)
    }

    /// Where a datagram for `destination` goes next: the gateway, or the destination itself on a
    /// directly connected route.
    pub fn next_hop(&self, destination: Ipv4Addr) -> Ipv4Addr {
        if self.gateway.is_unspecified() {
            destination
        } else {
            self.gateway
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RoutingTable {
    entries: Vec<RouteEntry>,
}

impl RoutingTable {
    pub fn new() -> Self {
        RoutingTable::default()
    }

    pub fn add(&mut self, entry: RouteEntry) {
        self.entries.push(entry);
    }

    /// Longest-prefix match. Among equally specific routes the one added first wins.
    pub fn lookup(&self, destination: Ipv4Addr) -> Option<&RouteEntry> {
        let mut best: Option<&RouteEntry> = None;
        for entry in self.entries.iter().filter(|e| e.contains(destination)) {
            if best.map_or(true, |b| entry.prefix() > b.prefix()) {
                best = Some(entry);
            }
        }
        best
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn load<P: AsRef<Path>>(path: P, interfaces: &InterfaceList) -> Result<Self, RouterError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RouterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        RoutingTable::parse(&text, interfaces)
    }

    /// Parses rtable lines of the form `<dest> <gateway> <mask> <iface>`. Every interface named
    /// must exist in `interfaces`.
    pub fn parse(text: &str, interfaces: &InterfaceList) -> Result<Self, RouterError> {
        let mut table = RoutingTable::new();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }
            let fields: Vec<&str> = content.split_whitespace().collect();
            if fields.len() != 4 {
                return Err(RouterError::Parse {
                    line,
                    message: format!(
                        "expected `<dest> <gateway> <mask> <iface>`, found `{}`",
                        content
                    ),
                });
            }
            let addr = |field: &str| {
                field.parse::<Ipv4Addr>().map_err(|e| RouterError::Parse {
                    line,
                    message: format!("{}: {}", field, e),
                })
            };
            let (destination, gateway, mask) = (addr(fields[0])?, addr(fields[1])?, addr(fields[2])?);
            if interfaces.get(fields[3]).is_none() {
                return Err(RouterError::UnknownInterface(fields[3].to_string()));
            }
            let entry = RouteEntry::new(destination, gateway, mask, fields[3]).map_err(|e| {
                RouterError::Parse {
                    line,
                    message: e.to_string(),
                }
            })?;
            table.add(entry);
        }
        Ok(table)
    }
}
