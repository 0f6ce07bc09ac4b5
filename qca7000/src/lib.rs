//! Driver core for the Qualcomm/Atheros QCA7000 Ethernet-over-SPI modem.
//!
//! Covers the SPI link: register and burst I/O, the reset/handshake state
//! machine, the Atheros frame envelope codec, and the cooperative service
//! loop that demultiplexes IRQ/TX-request/timeout events. Does not cover
//! the SPI bus driver, the GPIO/IRQ controller, an upper network stack, an
//! allocator, host OS task/queue primitives, or board configuration — all
//! of those are supplied by the caller.
#![cfg_attr(not(test), no_std)]

mod byte_order;
pub mod device;
mod frame;
pub mod framing;
mod notify;
mod queue;
pub mod register;
mod rx;
pub mod service;
pub mod stats;
pub mod sync;
mod tx;

#[cfg(feature = "simple-network")]
mod adapter;
#[cfg(test)]
mod test_util;

pub use device::LinkConfig;
pub use frame::RxFrame;
pub use service::QcaLink;
pub use stats::StatsSnapshot;
pub use sync::SyncState;
