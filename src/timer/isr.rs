use crate::driver::AskDriver;
use crate::error::AskError;
use crate::mailbox::Delivery;
use core::cell::RefCell;
use critical_section::Mutex;
use embedded_hal::digital::{InputPin, OutputPin};

use super::{Millis, elapsed_ms};

/// An `AskDriver` shared between the timer interrupt and the application.
///
/// Every access goes through a short critical section, so the interrupt can
/// run between any two calls made from the application side.
pub type GlobalAskDriver<TX, RX, PTT> = Mutex<RefCell<Option<AskDriver<TX, RX, PTT>>>>;

/// Used to initialize a global static `AskDriver` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty slot; install a driver with [`global_ask_driver_setup`]
///
/// # Example
/// ```rust
/// use askwire::timer::{GlobalAskDriver, global_ask_driver_init};
/// # use embedded_hal_mock::eh1::digital::Mock as Pin;
///
/// static ASK_DRIVER: GlobalAskDriver<Pin, Pin, Pin> = global_ask_driver_init();
/// ```
pub const fn global_ask_driver_init<TX: OutputPin, RX: InputPin, PTT: OutputPin>()
-> GlobalAskDriver<TX, RX, PTT> {
    Mutex::new(RefCell::new(None))
}

/// Installs `driver` in the global slot, replacing any previous one.
pub fn global_ask_driver_setup<TX: OutputPin, RX: InputPin, PTT: OutputPin>(
    global: &GlobalAskDriver<TX, RX, PTT>,
    driver: AskDriver<TX, RX, PTT>,
) {
    critical_section::with(|cs| {
        let _ = global.borrow(cs).replace(Some(driver));
    });
}

/// Removes the driver from the global slot, handing it back.
pub fn global_ask_driver_take<TX: OutputPin, RX: InputPin, PTT: OutputPin>(
    global: &GlobalAskDriver<TX, RX, PTT>,
) -> Option<AskDriver<TX, RX, PTT>> {
    critical_section::with(|cs| global.borrow(cs).take())
}

/// Runs `f` on the installed driver inside a critical section.
pub fn with_ask_driver<TX, RX, PTT, R>(
    global: &GlobalAskDriver<TX, RX, PTT>,
    f: impl FnOnce(&mut AskDriver<TX, RX, PTT>) -> R,
) -> Result<R, AskError>
where
    TX: OutputPin,
    RX: InputPin,
    PTT: OutputPin,
{
    critical_section::with(|cs| {
        global
            .borrow(cs)
            .borrow_mut()
            .as_mut()
            .map(f)
            .ok_or(AskError::NotInstalled)
    })
}

/// Runs the tick at each interrupt
///
/// Does nothing until a driver has been installed.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM2() {
///     global_ask_timer_tick(&ASK_DRIVER);
/// }
/// ```
pub fn global_ask_timer_tick<TX: OutputPin, RX: InputPin, PTT: OutputPin>(
    global: &GlobalAskDriver<TX, RX, PTT>,
) {
    let _ = with_ask_driver(global, AskDriver::tick);
}

/// Sends `payload`, spinning until any earlier frame has gone out.
///
/// Each attempt takes its own critical section so the timer interrupt keeps
/// running while this waits. Must not be called from the interrupt itself.
pub fn global_ask_send<TX: OutputPin, RX: InputPin, PTT: OutputPin>(
    global: &GlobalAskDriver<TX, RX, PTT>,
    payload: &[u8],
) -> Result<(), AskError> {
    nb::block!(
        with_ask_driver(global, |driver| driver.send(payload))
            .unwrap_or_else(|err| Err(nb::Error::Other(err)))
    )
}

/// Spins until the transmitter is idle.
pub fn global_ask_wait_tx<TX: OutputPin, RX: InputPin, PTT: OutputPin>(
    global: &GlobalAskDriver<TX, RX, PTT>,
) -> Result<(), AskError> {
    while with_ask_driver(global, |driver| driver.tx_active())? {
        core::hint::spin_loop();
    }
    Ok(())
}

/// Spins until a message is waiting.
pub fn global_ask_wait_rx<TX: OutputPin, RX: InputPin, PTT: OutputPin>(
    global: &GlobalAskDriver<TX, RX, PTT>,
) -> Result<(), AskError> {
    while !with_ask_driver(global, |driver| driver.have_message())? {
        core::hint::spin_loop();
    }
    Ok(())
}

/// Spins until a message is waiting or `timeout_ms` have passed on `clock`.
///
/// # Returns
/// Whether a message is waiting.
pub fn global_ask_wait_rx_timeout<TX, RX, PTT, C>(
    global: &GlobalAskDriver<TX, RX, PTT>,
    clock: &mut C,
    timeout_ms: u32,
) -> Result<bool, AskError>
where
    TX: OutputPin,
    RX: InputPin,
    PTT: OutputPin,
    C: Millis,
{
    let start = clock.millis();
    loop {
        if with_ask_driver(global, |driver| driver.have_message())? {
            return Ok(true);
        }
        if elapsed_ms(start, clock.millis()) >= timeout_ms {
            return Ok(false);
        }
        core::hint::spin_loop();
    }
}

/// Copies the pending message out and clears it in a single critical section.
///
/// A frame completing in the interrupt can never land half-way through the
/// copy.
pub fn global_ask_get_message<TX: OutputPin, RX: InputPin, PTT: OutputPin>(
    global: &GlobalAskDriver<TX, RX, PTT>,
    buf: &mut [u8],
) -> Result<Delivery, AskError> {
    with_ask_driver(global, |driver| driver.get_message(buf))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AskConfig;
    use crate::frame::{TxBuffer, encode_frame};
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use std::vec::Vec;

    type Link = GlobalAskDriver<PinMock, PinMock, PinMock>;

    fn rx_samples(payload: &[u8]) -> Vec<PinTransaction> {
        let mut symbols = TxBuffer::new();
        encode_frame(payload, &mut symbols).unwrap();
        let mut samples = std::vec![false; 40];
        for &s in symbols.iter() {
            for i in 0..6 {
                samples.extend(core::iter::repeat(s & (1 << i) != 0).take(8));
            }
        }
        samples.extend(core::iter::repeat(false).take(40));
        samples
            .into_iter()
            .map(|s| PinTransaction::get(if s { PinState::High } else { PinState::Low }))
            .collect()
    }

    fn finish(link: &Link) {
        let (mut tx, mut rx, ptt) = global_ask_driver_take(link).unwrap().release();
        tx.done();
        rx.done();
        if let Some(mut ptt) = ptt {
            ptt.done();
        }
    }

    #[test]
    fn test_uninstalled_slot_reports_not_installed() {
        let link: Link = global_ask_driver_init();
        global_ask_timer_tick(&link);
        let mut buf = [0u8; 4];
        assert_eq!(
            global_ask_get_message(&link, &mut buf),
            Err(AskError::NotInstalled)
        );
        assert_eq!(global_ask_send(&link, b"x"), Err(AskError::NotInstalled));
        assert_eq!(global_ask_wait_tx(&link), Err(AskError::NotInstalled));
    }

    #[test]
    fn test_ticks_from_isr_deliver_message() {
        let samples = rx_samples(b"via isr");
        let ticks = samples.len();
        let tx = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let rx = PinMock::new(&samples);

        let link: Link = global_ask_driver_init();
        global_ask_driver_setup(&link, AskDriver::new(tx, rx, None, AskConfig::default()));
        with_ask_driver(&link, |driver| driver.rx_start()).unwrap();

        for _ in 0..ticks {
            global_ask_timer_tick(&link);
        }

        let mut clock = || 0u32;
        assert_eq!(global_ask_wait_rx_timeout(&link, &mut clock, 10), Ok(true));
        assert_eq!(global_ask_wait_rx(&link), Ok(()));

        let mut buf = [0u8; 27];
        let n = global_ask_get_message(&link, &mut buf)
            .unwrap()
            .verified()
            .unwrap();
        assert_eq!(&buf[..n], b"via isr");
        assert_eq!(
            with_ask_driver(&link, |driver| driver.have_message()),
            Ok(false)
        );
        finish(&link);
    }

    #[test]
    fn test_wait_rx_timeout_expires() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let rx = PinMock::new(&[]);
        let link: Link = global_ask_driver_init();
        global_ask_driver_setup(&link, AskDriver::new(tx, rx, None, AskConfig::default()));

        let mut now = 0u32;
        let mut clock = || {
            now += 5;
            now
        };
        assert_eq!(global_ask_wait_rx_timeout(&link, &mut clock, 50), Ok(false));
        assert!(now >= 55);
        finish(&link);
    }

    #[test]
    fn test_send_when_idle_returns_immediately() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let rx = PinMock::new(&[]);
        let ptt = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let link: Link = global_ask_driver_init();
        global_ask_driver_setup(&link, AskDriver::new(tx, rx, Some(ptt), AskConfig::default()));

        assert_eq!(global_ask_send(&link, b"ping"), Ok(()));
        assert_eq!(with_ask_driver(&link, |driver| driver.tx_active()), Ok(true));
        assert_eq!(
            global_ask_send(&link, &[0u8; 40]),
            Err(AskError::PayloadTooLong { len: 40, max: 27 })
        );
        finish(&link);
    }
}
