//! Processors take a packet by value and hand back the transformed packet, or `None` when the
//! packet should go no further.
mod dec_ip_hop;
pub use self::dec_ip_hop::*;

pub trait Processor {
    type Input: Send + Clone;
    type Output: Send + Clone;

    fn process(&mut self, packet: Self::Input) -> Option<Self::Output>;
}
