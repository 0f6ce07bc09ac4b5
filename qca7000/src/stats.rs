//! Link counters.
//!
//! Mostly written from the service task only (spec.md §5), except
//! `tx_dropped`, which `send()` may increment from whatever task calls it
//! when the TX queue is full — see `SPEC_FULL.md` §3.2 for why every field
//! is an atomic rather than just that one.

use core::sync::atomic::{AtomicU32, Ordering};

#[derive(Default)]
pub struct Stats {
    pub rx_errors: AtomicU32,
    pub rx_dropped: AtomicU32,
    pub rx_packets: AtomicU32,
    pub rx_bytes: AtomicU32,
    pub tx_errors: AtomicU32,
    pub tx_dropped: AtomicU32,
    pub tx_packets: AtomicU32,
    pub tx_bytes: AtomicU32,
    pub device_resets: AtomicU32,
    pub read_buf_errors: AtomicU32,
    pub write_buf_errors: AtomicU32,
}

/// A point-in-time copy of [`Stats`] for callers that want plain integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub rx_errors: u32,
    pub rx_dropped: u32,
    pub rx_packets: u32,
    pub rx_bytes: u32,
    pub tx_errors: u32,
    pub tx_dropped: u32,
    pub tx_packets: u32,
    pub tx_bytes: u32,
    pub device_resets: u32,
    pub read_buf_errors: u32,
    pub write_buf_errors: u32,
}

impl Stats {
    pub const fn new() -> Self {
        Self {
            rx_errors: AtomicU32::new(0),
            rx_dropped: AtomicU32::new(0),
            rx_packets: AtomicU32::new(0),
            rx_bytes: AtomicU32::new(0),
            tx_errors: AtomicU32::new(0),
            tx_dropped: AtomicU32::new(0),
            tx_packets: AtomicU32::new(0),
            tx_bytes: AtomicU32::new(0),
            device_resets: AtomicU32::new(0),
            read_buf_errors: AtomicU32::new(0),
            write_buf_errors: AtomicU32::new(0),
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            rx_errors: self.rx_errors.load(Ordering::Relaxed),
            rx_dropped: self.rx_dropped.load(Ordering::Relaxed),
            rx_packets: self.rx_packets.load(Ordering::Relaxed),
            rx_bytes: self.rx_bytes.load(Ordering::Relaxed),
            tx_errors: self.tx_errors.load(Ordering::Relaxed),
            tx_dropped: self.tx_dropped.load(Ordering::Relaxed),
            tx_packets: self.tx_packets.load(Ordering::Relaxed),
            tx_bytes: self.tx_bytes.load(Ordering::Relaxed),
            device_resets: self.device_resets.load(Ordering::Relaxed),
            read_buf_errors: self.read_buf_errors.load(Ordering::Relaxed),
            write_buf_errors: self.write_buf_errors.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_increments() {
        let stats = Stats::new();
        stats.tx_dropped.fetch_add(1, Ordering::Relaxed);
        stats.rx_packets.fetch_add(3, Ordering::Relaxed);
        let snap = stats.snapshot();
        assert_eq!(snap.tx_dropped, 1);
        assert_eq!(snap.rx_packets, 3);
        assert_eq!(snap.rx_errors, 0);
    }
}
