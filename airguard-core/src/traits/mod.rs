//! Collaborator ports
//!
//! The pipeline talks to the outside world through three traits and nothing
//! else:
//!
//! - [`Transport`] - where raw readings come from
//! - [`BaselineStore`] - where the last-published snapshot survives reboots
//! - [`Publisher`] - where reported values go
//!
//! plus [`Delay`] for the blocking poll loop of a read. All of them are
//! plain synchronous traits with static dispatch, so a bare-metal driver and a
//! test double implement them the same way.

pub mod publish;
pub mod storage;
pub mod transport;

pub use publish::Publisher;
pub use storage::BaselineStore;
pub use transport::{Delay, Transport};

#[cfg(feature = "std")]
pub use transport::StdDelay;
