//! Fixed-size frame buffers carried through the TX/RX queues.
//!
//! Both buffers are sized for the largest wire frame this driver ever
//! builds or decodes (`QCAFRM_ETHMAXLEN` payload bytes), so they can live
//! inline in a `heapless::spsc::Queue` element without an allocator.

use crate::framing::{
    create_footer, create_header, QCAFRM_ETHMAXLEN, QCAFRM_ETHMINLEN, QCAFRM_FRAME_OVERHEAD,
    QCAFRM_HEADER_LEN,
};

/// A frame queued for transmission: payload already framed with header and
/// footer, ready to hand straight to [`crate::device::QcaSpi::write_burst`].
#[derive(Clone)]
pub struct TxFrame {
    buf: [u8; QCAFRM_ETHMAXLEN as usize + QCAFRM_FRAME_OVERHEAD],
    wire_len: usize,
}

impl TxFrame {
    /// Build a `TxFrame` from an Ethernet payload, padding short frames up
    /// to `QCAFRM_ETHMINLEN` with zero bytes before framing, per spec.md
    /// §4.4 and the re-clamp noted in `SPEC_FULL.md` §2.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        if payload.len() > QCAFRM_ETHMAXLEN as usize {
            return None;
        }
        let padded_len = core::cmp::max(payload.len(), QCAFRM_ETHMINLEN as usize);
        let mut buf = [0u8; QCAFRM_ETHMAXLEN as usize + QCAFRM_FRAME_OVERHEAD];
        create_header(&mut buf, padded_len as u16);
        buf[QCAFRM_HEADER_LEN..QCAFRM_HEADER_LEN + payload.len()].copy_from_slice(payload);
        // Bytes between `payload.len()` and `padded_len` are left zeroed.
        create_footer(&mut buf[QCAFRM_HEADER_LEN + padded_len..]);
        Some(Self {
            buf,
            wire_len: QCAFRM_HEADER_LEN + padded_len + 2,
        })
    }

    /// The complete on-wire byte sequence: header, payload, footer.
    pub fn wire_bytes(&self) -> &[u8] {
        &self.buf[..self.wire_len]
    }
}

/// A frame reassembled off the wire: payload only, header/footer already
/// stripped by the decoder.
#[derive(Clone)]
pub struct RxFrame {
    buf: [u8; QCAFRM_ETHMAXLEN as usize],
    len: u16,
}

impl Default for RxFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl RxFrame {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; QCAFRM_ETHMAXLEN as usize],
            len: 0,
        }
    }

    /// Mutable access to the full-capacity scratch buffer the decoder
    /// writes payload bytes into directly (see `framing::Decoder::feed`).
    pub fn payload_mut(&mut self) -> &mut [u8; QCAFRM_ETHMAXLEN as usize] {
        &mut self.buf
    }

    pub fn set_len(&mut self, len: u16) {
        self.len = len;
    }

    pub fn len(&self) -> u16 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn payload(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_payload_is_padded_to_min_length() {
        let frame = TxFrame::from_payload(&[1, 2, 3]).unwrap();
        let wire = frame.wire_bytes();
        assert_eq!(wire.len(), QCAFRM_HEADER_LEN + 60 + 2);
        assert_eq!(&wire[QCAFRM_HEADER_LEN..QCAFRM_HEADER_LEN + 3], &[1, 2, 3]);
        assert_eq!(wire[QCAFRM_HEADER_LEN + 3], 0);
    }

    #[test]
    fn oversized_payload_rejected() {
        let payload = vec![0u8; QCAFRM_ETHMAXLEN as usize + 1];
        assert!(TxFrame::from_payload(&payload).is_none());
    }

    #[test]
    fn rx_frame_round_trips_payload() {
        let mut rx = RxFrame::new();
        rx.payload_mut()[..4].copy_from_slice(&[9, 8, 7, 6]);
        rx.set_len(4);
        assert_eq!(rx.payload(), &[9, 8, 7, 6]);
    }
}
