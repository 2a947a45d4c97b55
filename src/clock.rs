use std::time::Instant;

/// Returns a monotonic wall-clock in milliseconds. The peer never reads
/// this value directly as a timestamp; it always subtracts a previously
/// captured reading (connection start) to get a peer-local millisecond
/// counter.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Default `Clock` backed by `std::time::Instant`, which is monotonic and
/// needs no wall-clock epoch.
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock { epoch: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> SystemClock {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}
