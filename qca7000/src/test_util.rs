//! A scripted mock [`SpiDevice`] used by this crate's own unit tests.
#![cfg(test)]

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal::spi::{ErrorType, Operation, SpiDevice};

#[derive(Debug, Clone)]
pub enum Expect {
    Write(Vec<u8>),
    Read(Vec<u8>),
}

pub struct MockSpi {
    expectations: VecDeque<Expect>,
}

impl MockSpi {
    pub fn new(expectations: Vec<Expect>) -> Self {
        Self {
            expectations: expectations.into(),
        }
    }

    pub fn done(&self) -> bool {
        self.expectations.is_empty()
    }
}

impl Drop for MockSpi {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            assert!(
                self.expectations.is_empty(),
                "mock SPI dropped with unconsumed expectations: {:?}",
                self.expectations
            );
        }
    }
}

impl ErrorType for MockSpi {
    type Error = core::convert::Infallible;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::Write(data) => match self.expectations.pop_front() {
                    Some(Expect::Write(expected)) => {
                        assert_eq!(expected.as_slice(), *data, "unexpected write payload")
                    }
                    other => panic!("expected {other:?}, got write of {} bytes", data.len()),
                },
                Operation::Read(buf) => match self.expectations.pop_front() {
                    Some(Expect::Read(bytes)) => {
                        assert_eq!(buf.len(), bytes.len(), "read length mismatch");
                        buf.copy_from_slice(&bytes);
                    }
                    other => panic!("expected {other:?}, got read of {} bytes", buf.len()),
                },
                Operation::Transfer(read, write) => match self.expectations.pop_front() {
                    Some(Expect::Write(expected)) => {
                        assert_eq!(expected.as_slice(), *write, "unexpected transfer write");
                        for b in read.iter_mut() {
                            *b = 0;
                        }
                    }
                    other => panic!("expected {other:?}, got transfer"),
                },
                Operation::TransferInPlace(buf) => match self.expectations.pop_front() {
                    Some(Expect::Read(bytes)) => {
                        assert_eq!(buf.len(), bytes.len(), "transfer-in-place length mismatch");
                        buf.copy_from_slice(&bytes);
                    }
                    other => panic!("expected {other:?}, got transfer-in-place"),
                },
                Operation::DelayNs(_) => {}
            }
        }
        Ok(())
    }
}
