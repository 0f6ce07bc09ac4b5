use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use simple_network::{EtherType, MacAddress, ReceiveError, SimpleNetwork, TransmitError};

use crate::QcaLink;

impl<SPI, RST, const TXN: usize, const RXN: usize> SimpleNetwork for QcaLink<SPI, RST, TXN, RXN>
where
    SPI: SpiDevice,
    RST: OutputPin,
{
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, ReceiveError> {
        let Some(frame) = self.recv() else {
            return Ok(0);
        };
        let payload = frame.payload();
        if payload.len() > buf.len() {
            return Err(ReceiveError::BufferTooSmall(payload.len()));
        }
        buf[..payload.len()].copy_from_slice(payload);
        Ok(payload.len())
    }

    fn transmit(
        &mut self,
        dst: &MacAddress,
        src: &MacAddress,
        ether_type: EtherType,
        data: &[u8],
    ) -> Result<(), TransmitError> {
        const ETH_HEADER_LEN: usize = 14;
        if data.len() > crate::framing::QCAFRM_ETHMAXLEN as usize - ETH_HEADER_LEN {
            return Err(TransmitError::InvalidParameter);
        }

        // `send()` only accepts one contiguous slice; build the Ethernet
        // header + payload into a stack buffer before queuing it.
        let mut buf = [0u8; crate::framing::QCAFRM_ETHMAXLEN as usize];
        buf[0..6].copy_from_slice(&dst.octets());
        buf[6..12].copy_from_slice(&src.octets());
        buf[12..14].copy_from_slice(&ether_type.to_be_bytes());
        buf[ETH_HEADER_LEN..ETH_HEADER_LEN + data.len()].copy_from_slice(data);

        if self.send(&buf[..ETH_HEADER_LEN + data.len()]) {
            Ok(())
        } else {
            Err(TransmitError::Aborted)
        }
    }
}
