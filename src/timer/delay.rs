use crate::driver::AskDriver;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Runs a blocking loop that repeatedly calls `tick()` on the provided ASK driver.
///
/// This is a simple timing loop for use in environments where interrupts are
/// unavailable or undesired. The period comes from the driver's
/// [`AskConfig`](crate::config::AskConfig).
///
/// # Example
/// ```rust,ignore
/// let mut driver = AskDriver::new(tx, rx, None, AskConfig::default());
/// driver.rx_start();
/// run_ask_tick_loop(&mut driver, &mut delay);
/// ```
///
/// # Notes
/// - This loop never returns; it is intended for single-purpose polling firmware.
/// - The time spent inside `tick()` is not subtracted, so the real rate runs a
///   little slow. Prefer a timer interrupt where one is free.
pub fn run_ask_tick_loop<D, TX, RX, PTT>(driver: &mut AskDriver<TX, RX, PTT>, delay: &mut D) -> !
where
    D: DelayNs,
    TX: OutputPin,
    RX: InputPin,
    PTT: OutputPin,
{
    let tick_ns = driver.config().tick_interval_ns();
    loop {
        driver.tick();
        delay.delay_ns(tick_ns);
    }
}

/// Ticks the driver until the frame being transmitted has gone out.
///
/// # Returns
/// The number of ticks spent.
pub fn tick_until_sent<D, TX, RX, PTT>(driver: &mut AskDriver<TX, RX, PTT>, delay: &mut D) -> u32
where
    D: DelayNs,
    TX: OutputPin,
    RX: InputPin,
    PTT: OutputPin,
{
    let tick_ns = driver.config().tick_interval_ns();
    let mut ticks = 0u32;
    while driver.tx_active() {
        driver.tick();
        delay.delay_ns(tick_ns);
        ticks = ticks.wrapping_add(1);
    }
    ticks
}

/// Ticks the driver until a message is waiting or `timeout_ms` worth of ticks
/// have run.
///
/// Time is counted in ticks at the configured rate, not read from a clock.
///
/// # Returns
/// Whether a message is waiting.
pub fn tick_until_message<D, TX, RX, PTT>(
    driver: &mut AskDriver<TX, RX, PTT>,
    delay: &mut D,
    timeout_ms: u32,
) -> bool
where
    D: DelayNs,
    TX: OutputPin,
    RX: InputPin,
    PTT: OutputPin,
{
    let tick_ns = driver.config().tick_interval_ns();
    let budget = u64::from(timeout_ms) * u64::from(driver.config().tick_hz()) / 1000;
    for _ in 0..budget {
        if driver.have_message() {
            return true;
        }
        driver.tick();
        delay.delay_ns(tick_ns);
    }
    driver.have_message()
}
