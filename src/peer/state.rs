/// Connection lifecycle state. Numeric code 2 is intentionally unused,
/// reserved by the wire protocol this core shares with the server
/// product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    Disconnected = 0,
    Connecting = 1,
    Connected = 3,
    Disconnecting = 4,
    AcknowledgingDisconnect = 5,
    Zombie = 6,
}
