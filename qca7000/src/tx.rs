//! Transmit path: drain at most one frame per service-loop iteration,
//! gated on the modem reporting enough write-buffer credit (spec.md §4.4).

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::device::QcaSpi;
use crate::frame::TxFrame;
use crate::queue::FrameQueue;
use crate::register::Register;
use crate::stats::Stats;

/// Attempt to send the head-of-queue frame, if any and if the modem has
/// reported enough buffer credit for it. Sends at most one frame per call,
/// matching the original's one-frame-per-service-loop-iteration TX
/// discipline, so a single large frame cannot starve RX servicing.
///
/// Returns `Ok(true)` if a frame was sent, `Ok(false)` if nothing was
/// queued or there wasn't enough credit yet (the frame stays queued).
pub fn service_tx<SPI, RST, const N: usize>(
    dev: &mut QcaSpi<SPI, RST>,
    tx_queue: &FrameQueue<TxFrame, N>,
    stats: &Stats,
) -> Result<bool, SPI::Error>
where
    SPI: SpiDevice,
    RST: OutputPin,
{
    let Some(frame) = tx_queue.pop() else {
        return Ok(false);
    };

    let wire = frame.wire_bytes();
    let credit = dev.read_register(Register::WRBUF_SPC_AVA)?;
    if (credit as usize) < wire.len() {
        // Not enough room yet; put it back at the front for next time.
        // `push` can only fail if the queue is full, which can't happen
        // here since we just popped from it.
        let _ = tx_queue.push(frame);
        return Ok(false);
    }

    match dev.write_burst(wire) {
        Ok(()) => {
            stats.tx_packets.fetch_add(1, core::sync::atomic::Ordering::Relaxed);
            stats
                .tx_bytes
                .fetch_add(wire.len() as u32, core::sync::atomic::Ordering::Relaxed);
            Ok(true)
        }
        Err(e) => {
            stats.tx_errors.fetch_add(1, core::sync::atomic::Ordering::Relaxed);
            Err(e)
        }
    }
}
