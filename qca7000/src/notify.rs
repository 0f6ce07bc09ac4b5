//! A minimal atomic-bitmask notification primitive, standing in for the
//! host OS task-notify/semaphore the service loop waits on (spec.md §1,
//! §4.7). `wait` busy-polls with a caller-supplied delay rather than
//! blocking a real scheduler, since no_std has nothing else to block on.

use core::sync::atomic::{AtomicU8, Ordering};

/// Set by `on_irq()` when the modem's interrupt line fires.
pub const INT_FLAG: u8 = 1 << 0;
/// Reserved for a future RX-specific wakeup source; unused today since RX
/// is driven entirely off `INT_FLAG` (spec.md §4.7 names it but no caller
/// sets it).
pub const RX_FLAG: u8 = 1 << 1;
/// Set by `send()` when a frame is queued for transmission.
pub const TX_FLAG: u8 = 1 << 2;

/// An atomic bitmask of pending event flags.
#[derive(Default)]
pub struct Notify {
    flags: AtomicU8,
}

impl Notify {
    pub const fn new() -> Self {
        Self {
            flags: AtomicU8::new(0),
        }
    }

    /// OR `bits` into the pending set. Safe to call from any context.
    pub fn post(&self, bits: u8) {
        self.flags.fetch_or(bits, Ordering::Relaxed);
    }

    /// Atomically read and clear the full pending set.
    pub fn take(&self) -> u8 {
        self.flags.swap(0, Ordering::Relaxed)
    }

    /// Poll for any pending flag, sleeping `step` between checks, up to
    /// `timeout_ms`. Returns the flags observed (0 on timeout).
    pub fn wait<D: embedded_hal::delay::DelayNs>(
        &self,
        delay: &mut D,
        step_ms: u32,
        timeout_ms: u32,
    ) -> u8 {
        let mut waited = 0u32;
        loop {
            let bits = self.take();
            if bits != 0 || waited >= timeout_ms {
                return bits;
            }
            delay.delay_ms(step_ms);
            waited += step_ms;
        }
    }
}
