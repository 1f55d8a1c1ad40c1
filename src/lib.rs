//! # askwire
//!
//! A portable, no_std software modem for Amplitude Shift Keying (ASK/OOK) radio
//! links, for cheap 315/433 MHz modules like the FS1000A and XY-MK-5V.
//!
//! The modem is implemented in software using:
//! - `embedded-hal` traits for digital I/O and timing
//! - a software PLL for clock recovery and demodulation
//! - 4b6b DC-balanced symbols and a CRC-16/CCITT trailer
//! - interrupt-safe shared access with `critical-section`
//! - optional tick sources using either timer interrupts or blocking delay
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` |
//! | `delay-loop`          | Drives `tick()` from `embedded_hal::delay::DelayNs` |
//! | `timer-isr` (default) | Shares the driver with a timer interrupt via `critical_section` |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Wire format
//!
//! A frame is a training preamble, a start symbol, then the count byte, the
//! payload and the CRC, each byte sent as two 6-bit symbols. Up to 27 payload
//! bytes fit in one frame. Every bit is held for eight ticks. Symbol order
//! matches VirtualWire: the high nibble of each byte goes out first.
//!
//! ## Usage
//!
//! ```rust
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! use askwire::{AskConfig, AskDriver};
//!
//! # let tx_pin = Pin::new(&[PinTransaction::set(PinState::Low)]);
//! # let rx_pin = Pin::new(&[]);
//! let mut driver: AskDriver<Pin, Pin, Pin> =
//!     AskDriver::new(tx_pin, rx_pin, None, AskConfig::default());
//! driver.rx_start();
//! // Call driver.tick() every 62.5 µs (16 kHz at 2000 bit/s)
//! # let (mut tx, mut rx, _) = driver.release();
//! # tx.done();
//! # rx.done();
//! ```
//!
//! Or, with `delay-loop`, hand the driver to `timer::run_ask_tick_loop()`
//! together with a `DelayNs` implementation.
//!
//! ## Integration Notes
//!
//! - Timing precision is critical; hardware timer configuration is recommended
//!   for reliability
//! - The link is half duplex: nothing is received while a frame goes out
//! - Only one frame is buffered; a newer frame replaces an unread one
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
mod fmt;

#[cfg(feature = "timer-isr")]
pub use critical_section;

pub use heapless;

pub mod config;
pub mod consts;
pub mod crc;
pub mod driver;
pub mod encoding;
pub mod error;
pub mod frame;
pub mod mailbox;
pub mod pll;
pub mod receiver;
pub mod timer;
pub mod transmitter;

pub use config::AskConfig;
pub use driver::AskDriver;
pub use error::AskError;
pub use mailbox::Delivery;
