//! Receive path: sample `RDBUF_BYTE_AVA` once, then drain exactly that many
//! bytes through the framing decoder, one scratch buffer at a time
//! (spec.md §4.5).

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::device::QcaSpi;
use crate::frame::RxFrame;
use crate::framing::{Action, Decoder, FeedResult, QCAFRM_HEADER_LEN};
use crate::queue::FrameQueue;
use crate::register::Register;
use crate::stats::Stats;

/// Bounds the scratch buffer used for the byte-wise header/footer scan.
/// Sized to `QCAFRM_HEADER_LEN` since the header (8 bytes) is the larger of
/// the two byte-wise phases; the footer (2 bytes) fits inside it too, per
/// `SPEC_FULL.md` §3.4.
pub const RX_SCRATCH_LEN: usize = QCAFRM_HEADER_LEN;

/// Outcome of one `service_rx` call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RxOutcome {
    /// Number of complete frames queued this call.
    pub queued: u32,
    /// `true` if the byte count sampled at entry still covers the
    /// decoder's next phase after the loop stopped — the modem reported
    /// more than one frame's worth of bytes in a single `RDBUF_BYTE_AVA`
    /// snapshot, and the caller should re-invoke `service_rx` rather than
    /// wait for a fresh interrupt (mirrors `qcaspi_receive`'s `-1` return).
    pub rearm: bool,
}

/// Sample `RDBUF_BYTE_AVA` exactly once, then decode complete frames into
/// `rx_queue` until the remaining count can no longer satisfy the
/// decoder's current phase.
pub fn service_rx<SPI, RST, const N: usize>(
    dev: &mut QcaSpi<SPI, RST>,
    decoder: &mut Decoder,
    rx_frame: &mut RxFrame,
    rx_queue: &FrameQueue<RxFrame, N>,
    stats: &Stats,
) -> Result<RxOutcome, SPI::Error>
where
    SPI: SpiDevice,
    RST: OutputPin,
{
    let mut available = dev.read_register(Register::RDBUF_BYTE_AVA)? as usize;
    let mut queued = 0u32;

    while available >= decoder.bytes_required() as usize {
        match decoder.next_action() {
            Action::FindHeader | Action::CheckFooter => {
                let n = decoder.bytes_required() as usize;
                let mut scratch = [0u8; RX_SCRATCH_LEN];
                dev.read_blocking(&mut scratch[..n])?;
                available -= n;
                for &b in &scratch[..n] {
                    match decoder.feed(b, rx_frame.payload_mut()) {
                        FeedResult::Complete(len) => {
                            rx_frame.set_len(len);
                            if rx_queue.push(rx_frame.clone()).is_err() {
                                stats
                                    .rx_dropped
                                    .fetch_add(1, core::sync::atomic::Ordering::Relaxed);
                            } else {
                                stats
                                    .rx_packets
                                    .fetch_add(1, core::sync::atomic::Ordering::Relaxed);
                                stats.rx_bytes.fetch_add(
                                    len as u32,
                                    core::sync::atomic::Ordering::Relaxed,
                                );
                                queued += 1;
                            }
                            decoder.reset();
                        }
                        FeedResult::NoHead | FeedResult::NoTail | FeedResult::InvLen => {
                            stats
                                .rx_errors
                                .fetch_add(1, core::sync::atomic::Ordering::Relaxed);
                        }
                        FeedResult::Gather => {}
                    }
                }
            }
            Action::CopyFrame => {
                let want = decoder.bytes_required() as usize;
                let offset = decoder.offset() as usize;
                {
                    let buf = rx_frame.payload_mut();
                    dev.read_blocking(&mut buf[offset..offset + want])?;
                }
                decoder.advance_copy(want as u16);
                available -= want;
            }
            Action::FrameComplete => {
                // `feed` always transitions straight past `Complete` via
                // `reset()` above; this arm exists for exhaustiveness.
                decoder.reset();
            }
        }
    }

    let rearm = available >= decoder.bytes_required() as usize;
    Ok(RxOutcome { queued, rearm })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::LinkConfig;
    use crate::framing::{create_footer, create_header};
    use crate::test_util::{Expect, MockSpi};

    struct NullPin;
    impl embedded_hal::digital::ErrorType for NullPin {
        type Error = core::convert::Infallible;
    }
    impl OutputPin for NullPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn read_buf_ava_cmd() -> Vec<u8> {
        vec![0xC3, 0x00]
    }

    fn external_read_cmd() -> Vec<u8> {
        vec![0x80, 0x00]
    }

    fn bfr_size_cmd(n: u16) -> Vec<u8> {
        let val = n.to_be_bytes();
        vec![0x41, 0x00, val[0], val[1]]
    }

    #[test]
    fn decodes_one_frame_sampling_available_once() {
        let payload = [0xABu8; 60];
        let mut wire = vec![0u8; QCAFRM_HEADER_LEN + 60 + 2];
        create_header(&mut wire, 60);
        wire[QCAFRM_HEADER_LEN..QCAFRM_HEADER_LEN + 60].copy_from_slice(&payload);
        create_footer(&mut wire[QCAFRM_HEADER_LEN + 60..]);

        let total = wire.len() as u16;
        let spi = MockSpi::new(vec![
            Expect::Write(read_buf_ava_cmd()),
            Expect::Read(total.to_be_bytes().to_vec()),
            // header phase: 8 bytes
            Expect::Write(bfr_size_cmd(8)),
            Expect::Write(external_read_cmd()),
            Expect::Read(wire[0..8].to_vec()),
            // payload phase: 60 bytes
            Expect::Write(bfr_size_cmd(60)),
            Expect::Write(external_read_cmd()),
            Expect::Read(wire[8..68].to_vec()),
            // footer phase: 2 bytes
            Expect::Write(bfr_size_cmd(2)),
            Expect::Write(external_read_cmd()),
            Expect::Read(wire[68..70].to_vec()),
        ]);
        let mut dev = QcaSpi::new(spi, NullPin, LinkConfig::default());
        let mut decoder = Decoder::new();
        let mut rx_frame = RxFrame::new();
        let rx_queue: FrameQueue<RxFrame, 4> = FrameQueue::new();
        let stats = Stats::new();

        let outcome = service_rx(&mut dev, &mut decoder, &mut rx_frame, &rx_queue, &stats).unwrap();
        assert_eq!(outcome.queued, 1);
        assert!(!outcome.rearm);
        let frame = rx_queue.pop().unwrap();
        assert_eq!(frame.payload(), &payload[..]);
        assert_eq!(
            stats.rx_packets.load(core::sync::atomic::Ordering::Relaxed),
            1
        );
    }

    #[test]
    fn drains_two_frames_from_a_single_availability_sample() {
        // The modem reports two frames' worth of bytes in one snapshot;
        // since the count is sampled once and the loop keeps running as
        // long as it still covers the decoder's next phase, both frames
        // are drained in this single call rather than needing a second
        // interrupt to pick up the leftover one.
        let mut one = vec![0u8; QCAFRM_HEADER_LEN + 60 + 2];
        create_header(&mut one, 60);
        one[QCAFRM_HEADER_LEN..QCAFRM_HEADER_LEN + 60].copy_from_slice(&[0xCDu8; 60]);
        create_footer(&mut one[QCAFRM_HEADER_LEN + 60..]);

        let mut two = vec![0u8; QCAFRM_HEADER_LEN + 60 + 2];
        create_header(&mut two, 60);
        two[QCAFRM_HEADER_LEN..QCAFRM_HEADER_LEN + 60].copy_from_slice(&[0xEFu8; 60]);
        create_footer(&mut two[QCAFRM_HEADER_LEN + 60..]);

        let available = (one.len() + two.len()) as u16;
        let spi = MockSpi::new(vec![
            Expect::Write(read_buf_ava_cmd()),
            Expect::Read(available.to_be_bytes().to_vec()),
            Expect::Write(bfr_size_cmd(8)),
            Expect::Write(external_read_cmd()),
            Expect::Read(one[0..8].to_vec()),
            Expect::Write(bfr_size_cmd(60)),
            Expect::Write(external_read_cmd()),
            Expect::Read(one[8..68].to_vec()),
            Expect::Write(bfr_size_cmd(2)),
            Expect::Write(external_read_cmd()),
            Expect::Read(one[68..70].to_vec()),
            Expect::Write(bfr_size_cmd(8)),
            Expect::Write(external_read_cmd()),
            Expect::Read(two[0..8].to_vec()),
            Expect::Write(bfr_size_cmd(60)),
            Expect::Write(external_read_cmd()),
            Expect::Read(two[8..68].to_vec()),
            Expect::Write(bfr_size_cmd(2)),
            Expect::Write(external_read_cmd()),
            Expect::Read(two[68..70].to_vec()),
        ]);
        let mut dev = QcaSpi::new(spi, NullPin, LinkConfig::default());
        let mut decoder = Decoder::new();
        let mut rx_frame = RxFrame::new();
        let rx_queue: FrameQueue<RxFrame, 4> = FrameQueue::new();
        let stats = Stats::new();

        let outcome = service_rx(&mut dev, &mut decoder, &mut rx_frame, &rx_queue, &stats).unwrap();
        assert_eq!(outcome.queued, 2);
        assert!(!outcome.rearm);
        assert_eq!(rx_queue.pop().unwrap().payload(), &[0xCDu8; 60][..]);
        assert_eq!(rx_queue.pop().unwrap().payload(), &[0xEFu8; 60][..]);
    }
}
