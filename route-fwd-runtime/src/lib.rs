//! The forwarding plane of a software IPv4 router.
//!
//! Frames enter through [`Router::handle_packet`], usually from the worker threads started by
//! [`intake::spawn_workers`], and leave through a [`transmit::Transmit`] implementation.

pub mod arp;

pub mod classifier;

pub mod config;

mod dispatch;

pub mod error;

/// ICMP echo service and error generation.
pub mod icmp;

pub mod intake;

pub mod interface;

/// IPv4 validation and forwarding.
mod ip;

pub mod processor;

pub mod route;

pub mod router;

pub mod transmit;

/// Utility module
mod utils;

pub use self::config::{ArpConfig, RouterConfig};
pub use self::error::{RouterError, TransmitError};
pub use self::interface::{Interface, InterfaceList};
pub use self::route::{RouteEntry, RoutingTable};
pub use self::router::{Router, RouterBuilder};
pub use self::transmit::{ChannelTransmitter, OutboundFrame, Transmit};
