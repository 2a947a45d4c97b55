use crate::listener::{DebugLevel, StatusCode};

/// A deferred call to the listener, queued from either the dispatch
/// thread or the receive thread and run on the dispatch thread.
pub enum Action {
    DebugMessage { level: DebugLevel, text: String },
    StatusChange { code: StatusCode },
}
