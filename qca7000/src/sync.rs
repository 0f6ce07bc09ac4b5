//! Modem reset/handshake state machine.
//!
//! Drives the QCA7000 from power-on through a soft or hard reset and into
//! `Ready`, watching the `SIGNATURE` register and the write-buffer credit
//! the modem reports once its CPU has booted.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::device::QcaSpi;
use crate::register::Register;

/// Value `SIGNATURE` reads back once the modem's CPU is running.
pub const QCASPI_GOOD_SIGNATURE: u16 = 0xAA55;
/// `WRBUF_SPC_AVA` value reported once the modem's TX buffer is fully
/// drained and sized for the driver's largest burst.
pub const QCASPI_HW_BUF_LEN: u16 = 0x0C5B;
/// Number of `sync()` ticks spent in `WaitReset` before giving up and
/// escalating to a fresh reset cycle.
pub const QCASPI_RESET_TIMEOUT: u32 = 500;

/// States of the reset/handshake state machine (spec.md §4.6).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SyncState {
    Unknown,
    /// Entered when the modem's CPU-on interrupt fires: the dual signature
    /// read and write-buffer credit check run before anything else does.
    CpuOn,
    /// Re-entry point used to re-validate the link (on a fatal buffer
    /// error, or after `Unknown`'s own first signature read) without
    /// assuming a CPU-on event actually happened.
    Reset,
    SoftReset,
    HardReset,
    WaitReset,
    Ready,
}

/// Outcome of one `sync()` tick, for the service loop to act on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SyncEvent {
    /// No user-visible change; keep polling.
    Continue,
    /// Just reached `Ready`: safe to start driving TX/RX.
    BecameReady,
    /// Link dropped out of `Ready` and a reset cycle is starting.
    Reset,
}

impl<SPI, RST> QcaSpi<SPI, RST>
where
    SPI: SpiDevice,
    RST: OutputPin,
{
    pub fn sync_state(&self) -> SyncState {
        self.sync_state
    }

    /// Advance the sync state machine by one tick, without forcing any
    /// particular entry state (mirrors the original's `SYNC_UPDATE`
    /// pseudo-event: re-check whatever state we're already in). Safe to
    /// call repeatedly.
    pub fn sync<D: DelayNs>(&mut self, delay: &mut D) -> Result<SyncEvent, SPI::Error> {
        self.advance(delay)
    }

    /// Force the state machine into `state` and run it, as the service
    /// loop does when a specific interrupt cause (CPU-on, a buffer error)
    /// demands a particular entry point rather than a plain timeout
    /// re-check.
    pub fn sync_to<D: DelayNs>(
        &mut self,
        state: SyncState,
        delay: &mut D,
    ) -> Result<SyncEvent, SPI::Error> {
        self.sync_state = state;
        self.advance(delay)
    }

    /// One tick's worth of work, per the one-tick-per-call contract
    /// documented in `SPEC_FULL.md` §3.1 — with the exception that a state
    /// which itself never blocks on a timeout (everything except
    /// `WaitReset`) keeps stepping forward in the same call, since each of
    /// those states does at most one SPI round trip before either
    /// returning or falling through to the next.
    fn advance<D: DelayNs>(&mut self, delay: &mut D) -> Result<SyncEvent, SPI::Error> {
        loop {
            match self.sync_state {
                SyncState::CpuOn => {
                    // Read signature twice; only the second read counts,
                    // matching `qcaspi_qca7k_sync`'s `QCASPI_SYNC_CPUON` case.
                    let _ = self.read_register(Register::SIGNATURE)?;
                    let signature = self.read_register(Register::SIGNATURE)?;
                    if signature != QCASPI_GOOD_SIGNATURE {
                        self.sync_state = SyncState::HardReset;
                    } else {
                        let credit = self.read_register(Register::WRBUF_SPC_AVA)?;
                        if credit != QCASPI_HW_BUF_LEN {
                            self.sync_state = SyncState::SoftReset;
                        } else {
                            self.sync_state = SyncState::Ready;
                            return Ok(SyncEvent::BecameReady);
                        }
                    }
                }
                SyncState::Unknown | SyncState::Reset => {
                    let signature = self.read_register(Register::SIGNATURE)?;
                    self.sync_state = if signature == QCASPI_GOOD_SIGNATURE {
                        SyncState::SoftReset
                    } else {
                        SyncState::HardReset
                    };
                }
                SyncState::SoftReset => {
                    self.soft_reset()?;
                    self.reset_count = 0;
                    self.sync_state = SyncState::WaitReset;
                    return Ok(SyncEvent::Reset);
                }
                SyncState::HardReset => {
                    let _ = self.hard_reset(delay);
                    self.reset_count = 0;
                    self.sync_state = SyncState::WaitReset;
                    return Ok(SyncEvent::Reset);
                }
                SyncState::WaitReset => {
                    self.reset_count += 1;
                    if self.reset_count >= QCASPI_RESET_TIMEOUT {
                        // Reset did not seem to take place; try again.
                        self.sync_state = SyncState::Reset;
                    }
                    return Ok(SyncEvent::Continue);
                }
                SyncState::Ready => {
                    let signature = self.read_register(Register::SIGNATURE)?;
                    if signature == QCASPI_GOOD_SIGNATURE {
                        return Ok(SyncEvent::Continue);
                    }
                    self.sync_state = SyncState::HardReset;
                }
            }
        }
    }
}
