use crate::error::RouterError;
use route_fwd_packets::MacAddr;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;
use std::slice;

/// A local interface: the name the transmit path knows it by, and its addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub mac: MacAddr,
    pub ip: Ipv4Addr,
}

impl Interface {
    pub fn new(name: &str, mac: MacAddr, ip: Ipv4Addr) -> Self {
        Interface {
            name: name.to_string(),
            mac,
            ip,
        }
    }
}

/// The router's interfaces, fixed once the router is built.
///
/// Routers have a handful of interfaces, so lookups are linear scans.
#[derive(Clone, Debug, Default)]
pub struct InterfaceList {
    interfaces: Vec<Interface>,
}

impl InterfaceList {
    pub fn new() -> Self {
        InterfaceList::default()
    }

    pub fn add(&mut self, interface: Interface) -> Result<(), RouterError> {
        if self.get(&interface.name).is_some() {
            return Err(RouterError::DuplicateInterface(interface.name));
        }
        self.interfaces.push(interface);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|iface| iface.name == name)
    }

    /// Finds the interface that owns `ip`, if any.
    pub fn find_by_ip(&self, ip: Ipv4Addr) -> Option<&Interface> {
        self.interfaces.iter().find(|iface| iface.ip == ip)
    }

    pub fn iter(&self) -> slice::Iter<'_, Interface> {
        self.interfaces.iter()
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RouterError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RouterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        InterfaceList::parse(&text)
    }

    /// Parses one `<name> <mac> <ipv4>` definition per line. Blank lines and `#` comments are
    /// skipped.
    pub fn parse(text: &str) -> Result<Self, RouterError> {
        let mut list = InterfaceList::new();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }
            let fields: Vec<&str> = content.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(RouterError::Parse {
                    line,
                    message: format!("expected `<name> <mac> <ip>`, found `{}`", content),
                });
            }
            let mac = fields[1]
                .parse::<MacAddr>()
                .map_err(|e| RouterError::Parse {
                    line,
                    message: e.to_string(),
                })?;
            let ip = fields[2]
                .parse::<Ipv4Addr>()
                .map_err(|e| RouterError::Parse {
                    line,
                    message: format!("{}: {}", fields[2], e),
                })?;
            list.add(Interface::new(fields[0], mac, ip))?;
        }
        Ok(list)
    }
}

impl<'a> IntoIterator for &'a InterfaceList {
    type Item = &'a Interface;
    type IntoIter = slice::Iter<'a, Interface>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const INTERFACES: &str = "
# name  mac                ip
eth0 00:11:22:33:44:00 10.0.1.1
eth1 00:11:22:33:44:01 10.0.0.1   # upstream

";

    #[test]
    fn parse_interfaces() {
        let list = InterfaceList::parse(INTERFACES).unwrap();
        assert_eq!(list.len(), 2);
        let eth1 = list.get("eth1").unwrap();
        assert_eq!(eth1.mac, MacAddr::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x01]));
        assert_eq!(eth1.ip, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(
            list.find_by_ip(Ipv4Addr::new(10, 0, 1, 1)).map(|i| i.name.as_str()),
            Some("eth0")
        );
        assert!(list.find_by_ip(Ipv4Addr::new(10, 0, 1, 2)).is_none());
        assert!(list.get("eth2").is_none());
        let names: Vec<&str> = list.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["eth0", "eth1"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let text = "eth0 00:11:22:33:44:00 10.0.1.1\neth0 00:11:22:33:44:01 10.0.0.1\n";
        match InterfaceList::parse(text) {
            Err(RouterError::DuplicateInterface(name)) => assert_eq!(name, "eth0"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn parse_errors_carry_line_numbers() {
        let text = "eth0 00:11:22:33:44:00 10.0.1.1\n\neth1 00:11:22:33:44 10.0.0.1\n";
        match InterfaceList::parse(text) {
            Err(RouterError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {:?}", other),
        }
        match InterfaceList::parse("eth0 00:11:22:33:44:00\n") {
            Err(RouterError::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(InterfaceList::parse("eth0 00:11:22:33:44:00 10.0.1.300\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(INTERFACES.as_bytes()).unwrap();
        let list = InterfaceList::load(file.path()).unwrap();
        assert_eq!(list.len(), 2);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            InterfaceList::load(&missing),
            Err(RouterError::Io { .. })
        ));
    }
}
