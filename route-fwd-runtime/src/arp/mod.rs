//! Address resolution. The cache holds learned translations along with the frames parked behind
//! addresses still being resolved, and a background sweep retries or expires what is left there.
mod cache;
pub use self::cache::*;

mod handler;

mod sweeper;
pub use self::sweeper::*;
