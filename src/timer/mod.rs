//! Tick scheduling helpers for the ASK driver.
//!
//! The modem needs [`tick()`](crate::driver::AskDriver::tick) called at eight
//! times the bit rate. This employs two approaches: an interrupt service
//! routine sharing the driver through `critical_section` (`timer-isr`
//! feature), or a busy loop over `embedded_hal::delay::DelayNs` (`delay-loop`
//! feature).
//!
//! Contains:
//! - `compute_ocr_value`: runtime timer compare calculator
//! - `const_ocr_value`: compile-time timer compare calculator
//! - [`Millis`]: the monotonic millisecond clock used by bounded waits
//! - `run_ask_tick_loop`, `tick_until_sent`, `tick_until_message`: blocking
//!   drivers over `DelayNs` (feature `delay-loop`)
//! - `GlobalAskDriver` helpers and the `init_ask_driver!`,
//!   `setup_ask_driver!`, `tick_ask_timer!` macros (feature `timer-isr`)
//!
//! Timer counts per tick at the default 2000 bit/s (16 kHz tick):
//!
//! | F_CPU  | PRESCALER | COUNTS |
//! |--------|-----------|--------|
//! | 16 MHz |         8 |    125 |
//! | 16 MHz |        64 |     16 |
//! | 72 MHz |         1 |   4500 |

use libm::roundf;

use crate::consts::ASK_SAMPLES_PER_BIT;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;

/// A free-running millisecond counter.
///
/// Wraparound is fine; elapsed time is taken with wrapping subtraction.
pub trait Millis {
    /// Milliseconds since some fixed point.
    fn millis(&mut self) -> u32;
}

impl<F> Millis for F
where
    F: FnMut() -> u32,
{
    fn millis(&mut self) -> u32 {
        self()
    }
}

/// Milliseconds from `start` to `now` on a wrapping counter.
pub fn elapsed_ms(start: u32, now: u32) -> u32 {
    now.wrapping_sub(start)
}

/// Timer counts per tick for a compare-match timer.
///
/// # Arguments
/// - `f_cpu`: timer input clock in Hz
/// - `prescaler`: timer prescaler (e.g., 8, 64, 256)
/// - `bit_rate`: link speed in bits per second
///
/// # Returns
/// Counts between ticks, rounded to the nearest integer. CTC-style compare
/// registers usually want this minus one.
pub fn compute_ocr_value(f_cpu: u32, prescaler: u32, bit_rate: u16) -> u16 {
    let tick_hz = f32::from(bit_rate) * f32::from(ASK_SAMPLES_PER_BIT);
    let counts = f_cpu as f32 / prescaler as f32 / tick_hz;
    roundf(counts) as u16
}

/// Compile-time version of [`compute_ocr_value`], using integer rounding.
pub const fn const_ocr_value(f_cpu: u32, prescaler: u32, bit_rate: u16) -> u16 {
    let tick_hz = bit_rate as u32 * ASK_SAMPLES_PER_BIT as u32;
    let timer_hz = f_cpu / prescaler;
    ((timer_hz + tick_hz / 2) / tick_hz) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocr_values_at_default_rate() {
        assert_eq!(compute_ocr_value(16_000_000, 8, 2000), 125);
        assert_eq!(compute_ocr_value(16_000_000, 64, 2000), 16);
        assert_eq!(compute_ocr_value(72_000_000, 1, 2000), 4500);
    }

    #[test]
    fn test_const_ocr_matches_runtime() {
        const OCR: u16 = const_ocr_value(16_000_000, 8, 2000);
        assert_eq!(OCR, 125);
        for (f, p, r) in [(16_000_000, 64, 2000), (8_000_000, 8, 1000), (72_000_000, 8, 4800)] {
            assert_eq!(const_ocr_value(f, p, r), compute_ocr_value(f, p, r));
        }
    }

    #[test]
    fn test_elapsed_handles_wraparound() {
        assert_eq!(elapsed_ms(10, 25), 15);
        assert_eq!(elapsed_ms(u32::MAX - 4, 5), 10);
    }

    #[test]
    fn test_closure_is_a_clock() {
        let mut now = 0u32;
        let mut clock = || {
            now += 7;
            now
        };
        assert_eq!(clock.millis(), 7);
        assert_eq!(clock.millis(), 14);
    }
}
