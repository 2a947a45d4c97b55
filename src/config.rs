use serde_derive::{Deserialize, Serialize};

pub const DEFAULT_APP_ID: &str = "Lite";

/// In-process configuration for a peer. Reading this from a file or the
/// environment is out of scope; the host builds one of these and hands it
/// to `Peer::new`/`PhotonPeer::new`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PeerConfig {
    pub ping_interval_ms: u32,
    pub warning_size: usize,
    pub channel_count: u8,
    pub app_id: String,
    pub traffic_stats_enabled: bool,
}

impl Default for PeerConfig {
    fn default() -> PeerConfig {
        PeerConfig {
            ping_interval_ms: 1000,
            warning_size: 100,
            channel_count: 2,
            app_id: DEFAULT_APP_ID.to_string(),
            traffic_stats_enabled: false,
        }
    }
}
