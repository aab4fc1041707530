use std::io;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling a router. Once the router is running, per-frame failures are
/// logged and dropped instead.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid netmask {mask}: {source}")]
    InvalidNetmask {
        mask: Ipv4Addr,
        #[source]
        source: ipnetwork::IpNetworkError,
    },

    #[error("interface {0} is defined more than once")]
    DuplicateInterface(String),

    #[error("no interface named {0}")]
    UnknownInterface(String),

    #[error("router needs a transmitter")]
    MissingTransmitter,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransmitError {
    #[error("output for interface {0} is disconnected")]
    Disconnected(String),
}
