use crate::codec::{EventData, OperationResponse};

/// Verbosity for `Listener::debug_return`, shared with the server product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Warning = 2,
    Info = 3,
    All = 5,
}

/// Lifecycle and warning codes fired through `Listener::on_status_changed`.
/// The full enumeration is carried even though this core only ever fires
/// a subset of it, since it is shared with the server product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Connect = 1024,
    Disconnect = 1025,
    Exception = 1026,
    ExceptionOnConnect = 1023,
    QueueOutgoingReliableWarning = 1027,
    QueueOutgoingReliableError = 1028,
    QueueOutgoingUnreliableWarning = 1029,
    SendError = 1030,
    QueueOutgoingAcksWarning = 1031,
    QueueIncomingReliableWarning = 1033,
    QueueIncomingUnreliableWarning = 1035,
    QueueSentWarning = 1037,
    InternalReceiveException = 1039,
    TimeoutDisconnect = 1040,
    DisconnectByServer = 1041,
    DisconnectByServerUserLimit = 1042,
    DisconnectByServerLogic = 1043,
    TcpRouterResponseOk = 1044,
    TcpRouterResponseNodeIdUnknown = 1045,
    TcpRouterResponseEndpointUnknown = 1046,
    TcpRouterResponseNodeNotReady = 1047,
    EncryptionEstablished = 1048,
    EncryptionFailedToEstablish = 1049,
}

/// The host-supplied collaborator. Callbacks are invoked synchronously on
/// the dispatch thread (see the facade's `service()`), never from the
/// receive thread.
pub trait Listener: Send + Sync {
    fn debug_return(&self, level: DebugLevel, message: &str);
    fn on_status_changed(&self, code: StatusCode);
    fn on_operation_response(&self, response: OperationResponse);
    fn on_event(&self, event: EventData);
}
