//! `PhotonPeer`: the public entry point. Wraps the peer state machine with
//! the three-lock discipline the host is expected to follow: `send_lock`
//! and `dispatch_lock` guard the service loop against concurrent
//! `connect`/`disconnect`/`stop`, and `enqueue_lock` guards the outgoing
//! queue against concurrent `op_custom` calls racing a connect/disconnect.

use crate::clock::{Clock, SystemClock};
use crate::codec::Parameters;
use crate::config::PeerConfig;
use crate::error::{Error, Result};
use crate::listener::{DebugLevel, Listener};
use crate::peer::Peer;
use slog::Logger;
use std::sync::{Arc, Mutex};

/// Transport selection at construction time. Only `Tcp` is implemented;
/// `Udp` is rejected by `PhotonPeer::new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
}

/// The public facade. One instance per connection; cheap to clone the
/// `Arc<Peer>` it wraps, but the facade itself is not `Clone` since the
/// three locks are meant to be owned by a single call site per peer.
pub struct PhotonPeer {
    peer: Arc<Peer>,
    send_lock: Mutex<()>,
    dispatch_lock: Mutex<()>,
    enqueue_lock: Mutex<()>,
}

impl PhotonPeer {
    pub fn new(protocol: Protocol, config: PeerConfig, listener: Arc<dyn Listener>, logger: Logger) -> Result<PhotonPeer> {
        Self::with_clock(protocol, config, listener, Arc::new(SystemClock::new()), logger)
    }

    pub fn with_clock(
        protocol: Protocol,
        config: PeerConfig,
        listener: Arc<dyn Listener>,
        clock: Arc<dyn Clock>,
        logger: Logger,
    ) -> Result<PhotonPeer> {
        if protocol == Protocol::Udp {
            return Err(Error::Unsupported("udp transport is not implemented".to_string()));
        }

        Ok(PhotonPeer {
            peer: Peer::new(config, listener, clock, logger),
            send_lock: Mutex::new(()),
            dispatch_lock: Mutex::new(()),
            enqueue_lock: Mutex::new(()),
        })
    }

    /// Starts the connection. Takes `send_lock` then `dispatch_lock`
    /// (outer-to-inner, matching `disconnect`/`stop`) so a connect can
    /// never interleave with an in-flight service call.
    pub fn connect(&self, host: &str, port: u16, app_id: Option<&str>) -> bool {
        let _send = self.send_lock.lock().expect("send_lock poisoned");
        let _dispatch = self.dispatch_lock.lock().expect("dispatch_lock poisoned");
        Peer::connect(&self.peer, host, port, app_id)
    }

    pub fn disconnect(&self) {
        let _send = self.send_lock.lock().expect("send_lock poisoned");
        let _dispatch = self.dispatch_lock.lock().expect("dispatch_lock poisoned");
        Peer::disconnect(&self.peer);
    }

    pub fn stop_thread(&self) {
        let _send = self.send_lock.lock().expect("send_lock poisoned");
        let _dispatch = self.dispatch_lock.lock().expect("dispatch_lock poisoned");
        Peer::stop(&self.peer);
    }

    /// Drains incoming commands, firing listener callbacks, then flushes
    /// the outgoing queue. Intended to be called from a single host
    /// thread on a regular interval.
    pub fn service(&self) {
        self.dispatch_incoming_commands();
        self.send_outgoing_commands();
    }

    pub fn dispatch_incoming_commands(&self) {
        let _dispatch = self.dispatch_lock.lock().expect("dispatch_lock poisoned");
        while self.peer.dispatch_incoming_commands() {}
    }

    pub fn send_outgoing_commands(&self) -> bool {
        let _send = self.send_lock.lock().expect("send_lock poisoned");
        self.peer.send_outgoing_commands()
    }

    /// Enqueues a custom operation request. `channel_id` defaults to `0`
    /// via `op_custom_default_channel`.
    pub fn op_custom(&self, op_code: u8, params: Parameters, reliable: bool, channel_id: u8) -> bool {
        let _enqueue = self.enqueue_lock.lock().expect("enqueue_lock poisoned");
        self.peer.enqueue_operation(op_code, params, reliable, channel_id)
    }

    pub fn op_custom_default_channel(&self, op_code: u8, params: Parameters, reliable: bool) -> bool {
        self.op_custom(op_code, params, reliable, 0)
    }

    pub fn set_listener(&self, listener: Arc<dyn Listener>) {
        self.peer.set_listener(listener);
    }

    pub fn set_debug_level(&self, level: DebugLevel) {
        self.peer.set_debug_level(level);
    }

    pub fn debug_level(&self) -> DebugLevel {
        self.peer.debug_level()
    }

    pub fn peer_state(&self) -> crate::peer::PeerState {
        self.peer.state()
    }

    pub fn last_round_trip_time(&self) -> f64 {
        self.peer.last_round_trip_time()
    }

    pub fn stats(&self) -> Option<&crate::peer::TrafficStats> {
        self.peer.stats()
    }
}
