//! A client library for a length-prefixed, self-describing binary protocol
//! used by realtime game-networking servers: TCP framing and connection
//! state machine, plus the tagged value codec used for operation
//! parameters and event data.

pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod facade;
pub mod listener;
pub mod logging;
pub mod net;
pub mod peer;

pub use clock::{Clock, SystemClock};
pub use codec::{
    ArrayValue, EventData, OperationRequest, OperationResponse, Parameters, TypedDictValue, Value,
};
pub use config::PeerConfig;
pub use error::{CodecError, Error, Result};
pub use facade::{PhotonPeer, Protocol};
pub use listener::{DebugLevel, Listener, StatusCode};
pub use peer::{PeerState, TrafficStats};
