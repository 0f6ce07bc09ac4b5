//! The SPI link handle: register I/O (in `register.rs`), burst I/O (here),
//! and the sync state machine (in `sync.rs`) all hang off this one struct.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Operation, SpiDevice};

use crate::byte_order::to_be16;
use crate::register::Register;
use crate::sync::SyncState;

/// Runtime-tunable knobs that don't belong as compile-time constants.
///
/// The only one today is whether [`QcaSpi::hard_reset`] drives a GPIO, per
/// the Open Question resolved in `SPEC_FULL.md` §3.3.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinkConfig {
    /// When `true`, `hard_reset` drives the reset pin low for the reset
    /// delay and releases it afterward. When `false` (the default, matching
    /// what `original_source` actually exercises), only the delay runs.
    pub hard_reset_drives_gpio: bool,
}

/// A handle to one QCA7000 modem over one SPI device.
///
/// Owns the SPI device and (optionally used) reset pin, plus the sync
/// state machine's own bookkeeping. Framing, queues, and the service loop
/// are built on top of this in their own modules.
pub struct QcaSpi<SPI, RST> {
    pub(crate) spi: SPI,
    pub(crate) reset: RST,
    pub(crate) config: LinkConfig,
    pub(crate) sync_state: SyncState,
    pub(crate) reset_count: u32,
}

impl<SPI, RST> QcaSpi<SPI, RST>
where
    SPI: SpiDevice,
    RST: OutputPin,
{
    pub fn new(spi: SPI, reset: RST, config: LinkConfig) -> Self {
        Self {
            spi,
            reset,
            config,
            sync_state: SyncState::Unknown,
            reset_count: 0,
        }
    }

    /// Drive (or simulate, per [`LinkConfig::hard_reset_drives_gpio`]) a
    /// hardware reset of the modem, per spec.md §4.6/§9.
    pub fn hard_reset<D: embedded_hal::delay::DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), RST::Error> {
        if self.config.hard_reset_drives_gpio {
            self.reset.set_low()?;
            delay.delay_ms(50);
            self.reset.set_high()?;
        } else {
            delay.delay_ms(50);
        }
        Ok(())
    }

    /// Issue a soft reset: set, then clear, the slave-reset bit of
    /// `SPI_CONFIG`.
    pub fn soft_reset(&mut self) -> Result<(), SPI::Error> {
        self.write_register(Register::SPI_CONFIG, crate::register::SLAVE_RESET_BIT)?;
        self.write_register(Register::SPI_CONFIG, 0)
    }

    /// Write `data` into the modem's external write buffer, programming
    /// `BFR_SIZE` first so the modem knows how much to expect, per
    /// spec.md §4.3/§4.4 step 5 and `original_source/qca_spi.c`'s
    /// `qcaspi_tx_frame` (`write_register(BFR_SIZE, len)` immediately
    /// before the burst write).
    pub fn write_burst(&mut self, data: &[u8]) -> Result<(), SPI::Error> {
        self.write_register(Register::BFR_SIZE, data.len() as u16)?;
        let cmd = to_be16(QcaSpi::<SPI, RST>::external_write_cmd());
        self.spi
            .transaction(&mut [Operation::Write(&cmd), Operation::Write(data)])
    }

    /// Read `buf.len()` bytes from the modem's external read buffer,
    /// programming `BFR_SIZE` first so the modem knows how much to send.
    pub fn read_burst(&mut self, buf: &mut [u8]) -> Result<(), SPI::Error> {
        self.write_register(Register::BFR_SIZE, buf.len() as u16)?;
        let cmd = to_be16(QcaSpi::<SPI, RST>::external_read_cmd());
        self.spi
            .transaction(&mut [Operation::Write(&cmd), Operation::Read(buf)])
    }

    /// Alias for [`QcaSpi::read_burst`] kept for call sites that read this
    /// as "block until exactly this many bytes arrive" (the RX path always
    /// does, since `BFR_SIZE` makes the transaction length-exact).
    pub fn read_blocking(&mut self, buf: &mut [u8]) -> Result<(), SPI::Error> {
        self.read_burst(buf)
    }
}
