//! Connection lifecycle, outgoing/incoming queues, ping/RTT tracking,
//! handshake and message classification.

pub mod action;
mod peer_impl;
pub mod rtt;
pub mod state;
pub mod stats;

pub use self::action::Action;
pub use self::peer_impl::Peer;
pub use self::rtt::RttEstimator;
pub use self::state::PeerState;
pub use self::stats::TrafficStats;
