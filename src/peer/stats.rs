use std::sync::atomic::{AtomicU64, Ordering};

/// Transport-layer byte/command counters, gated by
/// `PeerConfig::traffic_stats_enabled`. This counts frames the peer
/// itself sends and classifies; it has no effect on the wire and carries
/// no opinion about application-level traffic.
#[derive(Default)]
pub struct TrafficStats {
    operations_sent: AtomicU64,
    operation_bytes_sent: AtomicU64,
    control_bytes_sent: AtomicU64,
    pings_sent: AtomicU64,
    frames_received: AtomicU64,
    frame_bytes_received: AtomicU64,
}

impl TrafficStats {
    pub fn new() -> TrafficStats {
        TrafficStats::default()
    }

    pub fn record_operation_sent(&self, bytes: usize) {
        self.operations_sent.fetch_add(1, Ordering::Relaxed);
        self.operation_bytes_sent.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_control_sent(&self, bytes: usize) {
        self.control_bytes_sent.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_ping_sent(&self) {
        self.pings_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_frame_received(&self, bytes: usize) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
        self.frame_bytes_received.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn operations_sent(&self) -> u64 {
        self.operations_sent.load(Ordering::Relaxed)
    }

    pub fn operation_bytes_sent(&self) -> u64 {
        self.operation_bytes_sent.load(Ordering::Relaxed)
    }

    pub fn control_bytes_sent(&self) -> u64 {
        self.control_bytes_sent.load(Ordering::Relaxed)
    }

    pub fn pings_sent(&self) -> u64 {
        self.pings_sent.load(Ordering::Relaxed)
    }

    pub fn frames_received(&self) -> u64 {
        self.frames_received.load(Ordering::Relaxed)
    }

    pub fn frame_bytes_received(&self) -> u64 {
        self.frame_bytes_received.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_operations_and_bytes() {
        let stats = TrafficStats::new();
        stats.record_operation_sent(10);
        stats.record_operation_sent(20);
        assert_eq!(stats.operations_sent(), 2);
        assert_eq!(stats.operation_bytes_sent(), 30);
    }
}
