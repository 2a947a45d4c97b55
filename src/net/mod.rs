//! Length-prefixed TCP framing: one blocking socket, one dedicated
//! receive thread, and the byte layouts the protocol uses for its
//! handshake, operation frames and ping frames.

pub mod connection;
pub mod message;

pub use self::connection::{Connection, FrameSink};
