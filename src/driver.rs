//! ASK/OOK modem driver.
//!
//! This module provides the [`AskDriver`] struct, the single owned context for
//! one radio link. It ties the [`Transmitter`], [`SoftwarePLL`], [`Receiver`]
//! and [`Mailbox`] to three `embedded-hal` pins and exposes the platform API:
//! start/stop either direction, `send`, `have_message`, `get_message` and the
//! per-tick entry point.
//!
//! The driver does not own a timer. Something must call
//! [`tick()`](AskDriver::tick) at eight times the bit rate (every 62.5 µs at the
//! default 2000 bit/s), from a timer interrupt (see
//! [`crate::timer`] with `timer-isr`) or a delay loop (`delay-loop`).
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! use askwire::config::AskConfig;
//! use askwire::driver::AskDriver;
//!
//! # let tx_pin = Pin::new(&[PinTransaction::set(PinState::Low)]);
//! # let rx_pin = Pin::new(&[]);
//! let mut driver: AskDriver<Pin, Pin, Pin> =
//!     AskDriver::new(tx_pin, rx_pin, None, AskConfig::default());
//! driver.rx_start();
//!
//! let mut buf = [0u8; 27];
//! if driver.have_message() {
//!     let delivery = driver.get_message(&mut buf).unwrap();
//!     if let Ok(n) = delivery.verified() {
//!         // use &buf[..n]
//! #       let _ = n;
//!     }
//! }
//! # let (mut tx, mut rx, _) = driver.release();
//! # tx.done();
//! # rx.done();
//! ```
//!
//! ## Half duplex
//!
//! While a frame is going out the RX pin is not read and the PLL does not run.
//! Receiving resumes on its own once the transmitter goes idle.

use core::convert::Infallible;

use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::AskConfig;
use crate::error::AskError;
use crate::frame::check_payload_len;
use crate::mailbox::{Delivery, Mailbox};
use crate::pll::SoftwarePLL;
use crate::receiver::{Receiver, RxEvent};
use crate::transmitter::{Transmitter, TxStep};

/// What the driver is doing, as seen from outside.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum AskMode {
    ///   Neither transmitting nor listening.
    #[default]
    Idle,
    ///   Listening: the PLL runs on every tick.
    Rx,
    ///   A frame is going out; reception is suspended.
    Tx,
}

/// Link diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct LinkStats {
    /// Frames transmitted to completion.
    pub tx_sent: u16,
    /// Frames received with a valid length (CRC is checked on retrieval).
    pub rx_good: u16,
    /// Frames dropped for a bad length byte or an invalid symbol.
    pub rx_bad: u16,
}

/// A software ASK/OOK modem bound to a set of pins.
///
/// ## Type Parameters
///
/// - `TX`: output pin keying the transmitter (high = carrier on)
/// - `RX`: input pin sampling the receiver's data output
/// - `PTT`: optional push-to-talk output enabling the transmitter
#[derive(Debug)]
pub struct AskDriver<TX, RX, PTT>
where
    TX: OutputPin,
    RX: InputPin,
    PTT: OutputPin,
{
    config: AskConfig,
    tx: TX,
    rx: RX,
    ptt: Option<PTT>,
    rx_enabled: bool,
    pll: SoftwarePLL,
    receiver: Receiver,
    transmitter: Transmitter,
    mailbox: Mailbox,
}

impl<TX, RX, PTT> AskDriver<TX, RX, PTT>
where
    TX: OutputPin,
    RX: InputPin,
    PTT: OutputPin,
{
    /// Creates a driver with both directions stopped.
    ///
    /// TX is driven low and PTT (if any) is released.
    pub fn new(tx: TX, rx: RX, ptt: Option<PTT>, config: AskConfig) -> Self {
        let mut driver = Self {
            config,
            tx,
            rx,
            ptt,
            rx_enabled: false,
            pll: SoftwarePLL::new(),
            receiver: Receiver::new(),
            transmitter: Transmitter::new(),
            mailbox: Mailbox::new(),
        };
        driver.write_tx(false);
        driver.write_ptt(false);
        driver
    }

    /// Hands the pins back.
    pub fn release(self) -> (TX, RX, Option<PTT>) {
        (self.tx, self.rx, self.ptt)
    }

    /// The active configuration.
    pub fn config(&self) -> &AskConfig {
        &self.config
    }

    /// Changes the bit rate used by tick-scheduling helpers.
    pub fn set_bit_rate(&mut self, bit_rate: u16) -> Result<(), AskError> {
        self.config = self.config.with_bit_rate(bit_rate)?;
        Ok(())
    }

    /// Sets PTT polarity; takes effect on the next PTT write.
    pub fn set_ptt_inverted(&mut self, inverted: bool) {
        self.config = self.config.with_ptt_inverted(inverted);
    }

    /// Sets RX polarity; takes effect on the next sample.
    pub fn set_rx_inverted(&mut self, inverted: bool) {
        self.config = self.config.with_rx_inverted(inverted);
    }

    fn write_tx(&mut self, level: bool) {
        let _ = if level {
            self.tx.set_high()
        } else {
            self.tx.set_low()
        };
    }

    fn write_ptt(&mut self, assert: bool) {
        let level = assert != self.config.ptt_inverted();
        if let Some(ref mut ptt) = self.ptt {
            let _ = if level { ptt.set_high() } else { ptt.set_low() };
        }
    }

    /// Current mode. Transmit wins over receive.
    pub fn mode(&self) -> AskMode {
        if self.transmitter.is_active() {
            AskMode::Tx
        } else if self.rx_enabled {
            AskMode::Rx
        } else {
            AskMode::Idle
        }
    }

    /// Starts sending the current frame buffer from the top.
    ///
    /// [`send`](AskDriver::send) calls this; calling it directly repeats the
    /// last frame.
    pub fn tx_start(&mut self) {
        self.transmitter.start();
        self.write_ptt(true);
    }

    /// Stops transmitting at once, releasing PTT and driving TX low.
    pub fn tx_stop(&mut self) {
        self.write_ptt(false);
        self.write_tx(false);
        self.transmitter.stop();
    }

    /// True while a frame is going out.
    pub fn tx_active(&self) -> bool {
        self.transmitter.is_active()
    }

    /// Starts listening. Any half-received frame is forgotten.
    pub fn rx_start(&mut self) {
        if !self.rx_enabled {
            self.rx_enabled = true;
            self.receiver.resync();
        }
    }

    /// Stops listening. A message already completed stays retrievable.
    pub fn rx_stop(&mut self) {
        self.rx_enabled = false;
    }

    /// True if the receiver is enabled.
    pub fn rx_enabled(&self) -> bool {
        self.rx_enabled
    }

    /// Encodes `payload` and starts transmitting it.
    ///
    /// Payload length is checked first; an oversize payload fails with
    /// [`nb::Error::Other`] and changes nothing. An empty payload is sent, but
    /// receivers drop its frame. While a previous frame
    /// is still going out this returns [`nb::Error::WouldBlock`], so wrap it in
    /// [`nb::block!`] from a context the tick handler can preempt.
    pub fn send(&mut self, payload: &[u8]) -> nb::Result<(), AskError> {
        check_payload_len(payload.len()).map_err(nb::Error::Other)?;
        self.transmitter.load(payload)?;
        debug!("queued {} byte payload", payload.len());
        self.tx_start();
        Ok(())
    }

    /// `Ok` once the transmitter is idle.
    pub fn poll_tx(&self) -> nb::Result<(), Infallible> {
        if self.transmitter.is_active() {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }

    /// `Ok` once a message is waiting.
    pub fn poll_rx(&self) -> nb::Result<(), Infallible> {
        if self.mailbox.is_pending() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// True if a complete frame is waiting to be collected.
    pub fn have_message(&self) -> bool {
        self.mailbox.is_pending()
    }

    /// Copies the pending payload into `buf` and clears the pending flag.
    ///
    /// Fails with [`AskError::NotReady`] when nothing is waiting. Otherwise
    /// up to `buf.len()` payload bytes are copied and the returned
    /// [`Delivery`] says whether the frame CRC matched.
    pub fn get_message(&mut self, buf: &mut [u8]) -> Result<Delivery, AskError> {
        let delivery = self.mailbox.take_into(buf)?;
        if !delivery.is_intact() {
            warn!("retrieved frame failed CRC");
        }
        Ok(delivery)
    }

    /// Diagnostic counters.
    pub fn stats(&self) -> LinkStats {
        LinkStats {
            tx_sent: self.transmitter.sent(),
            rx_good: self.receiver.good(),
            rx_bad: self.receiver.bad(),
        }
    }

    /// Advances the modem by one sample period.
    ///
    /// Must be called at exactly eight times the bit rate. Each call samples RX
    /// (when listening and not transmitting), then advances the transmitter,
    /// then runs the PLL on the sample.
    pub fn tick(&mut self) {
        let sample = if self.rx_enabled && !self.transmitter.is_active() {
            Some(self.rx.is_high().unwrap_or(false) != self.config.rx_inverted())
        } else {
            None
        };

        match self.transmitter.tick() {
            TxStep::Hold => {}
            TxStep::Emit(level) => self.write_tx(level),
            TxStep::Finished => {
                self.tx_stop();
                trace!("transmission complete");
            }
        }

        if let Some(sample) = sample {
            self.receive_sample(sample);
        }
    }

    fn receive_sample(&mut self, sample: bool) {
        let Some(bit) = self.pll.update(sample) else {
            return;
        };
        match self.receiver.push_bit(bit) {
            Some(RxEvent::Started) => self.mailbox.discard(),
            Some(RxEvent::Completed) => {
                self.mailbox.publish(self.receiver.frame());
                debug!("frame of {} bytes received", self.receiver.count());
            }
            Some(RxEvent::Rejected(err)) => debug!("frame dropped: {}", err),
            None => {}
        }
    }
}
