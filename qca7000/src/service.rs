//! The cooperative service loop: demultiplexes IRQ/TX-request/timeout
//! events, drives the sync state machine, and services RX/TX in turn
//! (spec.md §4.7).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::device::{LinkConfig, QcaSpi};
use crate::frame::{RxFrame, TxFrame};
use crate::framing::Decoder;
use crate::notify::{Notify, INT_FLAG, TX_FLAG};
use crate::queue::FrameQueue;
use crate::register::{intr, Register};
use crate::rx::service_rx;
use crate::stats::{Stats, StatsSnapshot};
use crate::sync::SyncState;
use crate::tx::service_tx;

/// How long `poll()` waits for an event while `Ready` (spec.md §4.7): the
/// link is quiescent most of the time once synced, so it can afford a
/// long idle wait and rely on `on_irq()`/`send()` to wake it early.
pub const HIGH_CHECK_MS: u32 = 15_000;
/// How long `poll()` waits while not yet `Ready`: sync needs to retry
/// promptly.
pub const LOW_CHECK_MS: u32 = 1_000;
const WAIT_STEP_MS: u32 = 10;

/// A complete QCA7000 link: SPI handle, framing state, queues, and
/// counters. One per modem.
pub struct QcaLink<SPI, RST, const TXN: usize, const RXN: usize> {
    dev: QcaSpi<SPI, RST>,
    decoder: Decoder,
    rx_scratch: RxFrame,
    tx_queue: FrameQueue<TxFrame, TXN>,
    rx_queue: FrameQueue<RxFrame, RXN>,
    notify: Notify,
    stats: Stats,
}

impl<SPI, RST, const TXN: usize, const RXN: usize> QcaLink<SPI, RST, TXN, RXN>
where
    SPI: SpiDevice,
    RST: OutputPin,
{
    pub fn new(spi: SPI, reset: RST, config: LinkConfig) -> Self {
        Self {
            dev: QcaSpi::new(spi, reset, config),
            decoder: Decoder::new(),
            rx_scratch: RxFrame::new(),
            tx_queue: FrameQueue::new(),
            rx_queue: FrameQueue::new(),
            notify: Notify::new(),
            stats: Stats::new(),
        }
    }

    /// Called from the GPIO interrupt handler for the modem's IRQ line.
    /// Only posts a flag; all actual I/O happens from `poll()`.
    pub fn on_irq(&self) {
        self.notify.post(INT_FLAG);
    }

    /// Queue `payload` for transmission. Non-blocking: if the TX queue is
    /// full, the frame is dropped and `tx_dropped` is incremented, per
    /// spec.md §4.4/§7. Returns `false` if `payload` is oversized or the
    /// queue was full.
    pub fn send(&self, payload: &[u8]) -> bool {
        let Some(frame) = TxFrame::from_payload(payload) else {
            self.stats
                .tx_errors
                .fetch_add(1, core::sync::atomic::Ordering::Relaxed);
            return false;
        };
        match self.tx_queue.push(frame) {
            Ok(()) => {
                self.notify.post(TX_FLAG);
                true
            }
            Err(_) => {
                self.stats
                    .tx_dropped
                    .fetch_add(1, core::sync::atomic::Ordering::Relaxed);
                false
            }
        }
    }

    /// Pop the oldest reassembled frame, if any.
    pub fn recv(&self) -> Option<RxFrame> {
        self.rx_queue.pop()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn sync_state(&self) -> SyncState {
        self.dev.sync_state()
    }

    /// Run one iteration of the service loop: wait for an event (or
    /// timeout), re-validate sync on a plain timeout, service interrupt
    /// causes, then service RX ahead of TX so an inbound burst is never
    /// starved by an outbound one.
    pub fn poll<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), SPI::Error> {
        let ready = self.dev.sync_state() == SyncState::Ready;
        let timeout_ms = if ready { HIGH_CHECK_MS } else { LOW_CHECK_MS };
        let flags = self.notify.wait(delay, WAIT_STEP_MS, timeout_ms);

        // A plain timeout (no notification at all) means we should
        // re-validate sync regardless of whether we were already `Ready` —
        // the liveness watchdog this drives only works if it runs every
        // time, not just while unsynced.
        if flags == 0 {
            match self.dev.sync(delay) {
                Ok(_) => {}
                Err(e) => {
                    self.stats
                        .device_resets
                        .fetch_add(1, core::sync::atomic::Ordering::Relaxed);
                    return Err(e);
                }
            }
            if self.dev.sync_state() != SyncState::Ready {
                self.drop_tx_queue();
                return Ok(());
            }
        }

        if flags & INT_FLAG != 0 {
            self.dev.write_register(Register::INTR_ENABLE, 0)?;
            let cause = self.dev.read_register(Register::INTR_CAUSE)?;

            if cause & intr::CPU_ON != 0 {
                self.dev.sync_to(SyncState::CpuOn, delay)?;
                self.stats
                    .device_resets
                    .fetch_add(1, core::sync::atomic::Ordering::Relaxed);
                if self.dev.sync_state() != SyncState::Ready {
                    return Ok(());
                }
            }

            let buf_err = cause & (intr::ADDR_ERR | intr::RDBUF_ERR | intr::WRBUF_ERR);
            if buf_err != 0 {
                if cause & intr::RDBUF_ERR != 0 {
                    self.stats
                        .read_buf_errors
                        .fetch_add(1, core::sync::atomic::Ordering::Relaxed);
                }
                if cause & intr::WRBUF_ERR != 0 {
                    self.stats
                        .write_buf_errors
                        .fetch_add(1, core::sync::atomic::Ordering::Relaxed);
                }
                self.dev.sync_to(SyncState::Reset, delay)?;
                return Ok(());
            }

            if self.dev.sync_state() == SyncState::Ready && cause & intr::PKT_AVLBL != 0 {
                service_rx(
                    &mut self.dev,
                    &mut self.decoder,
                    &mut self.rx_scratch,
                    &self.rx_queue,
                    &self.stats,
                )?;
            }

            if cause != 0 {
                self.dev.write_register(Register::INTR_CAUSE, cause)?;
            }
            self.dev.write_register(
                Register::INTR_ENABLE,
                intr::CPU_ON | intr::PKT_AVLBL | intr::RDBUF_ERR | intr::WRBUF_ERR,
            )?;
        }

        if self.dev.sync_state() == SyncState::Ready {
            self.flush_tx_queue()?;
        }

        Ok(())
    }

    /// Drain as much of the TX queue as the modem currently has credit
    /// for, one frame per `service_tx` call (spec.md §4.4's
    /// one-frame-per-iteration discipline), stopping at the first frame
    /// that doesn't fit yet.
    fn flush_tx_queue(&mut self) -> Result<(), SPI::Error> {
        while service_tx(&mut self.dev, &self.tx_queue, &self.stats)? {}
        Ok(())
    }

    /// Discard everything queued for transmission, as the original does
    /// while sync is not yet established (`qcaspi_flush_txq`).
    fn drop_tx_queue(&self) {
        while self.tx_queue.pop().is_some() {}
    }
}
