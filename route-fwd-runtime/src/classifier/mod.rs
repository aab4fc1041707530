//! # What are they for?
//!
//! Classifiers sort packets without touching them. They take each packet by reference and
//! return a class, usually an enum, that the caller matches on to pick the next stage.
mod ether_type;
pub use self::ether_type::*;

/// Determines the kind of packet we have. The caller dispatches on `Classifier::Class`.
pub trait Classifier {
    type Packet: Send + Clone;
    type Class: Sized;

    fn classify(&self, packet: &Self::Packet) -> Self::Class;
}
