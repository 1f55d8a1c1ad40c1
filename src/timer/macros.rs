/// Declares a static global `ASK_DRIVER` slot protected by a `critical_section` mutex.
///
/// The slot starts empty. Fill it with [`setup_ask_driver!`] and drive it
/// from the timer interrupt with [`tick_ask_timer!`].
///
/// # Arguments
/// - `$tx`: The concrete type of the TX pin (must implement `OutputPin`)
/// - `$rx`: The concrete type of the RX pin (must implement `InputPin`)
/// - `$ptt`: The concrete type of the PTT pin (must implement `OutputPin`)
///
/// # Example
/// ```rust
/// # use embedded_hal_mock::eh1::digital::Mock as MyPin;
/// askwire::init_ask_driver!(MyPin, MyPin, MyPin);
/// ```
#[macro_export]
macro_rules! init_ask_driver {
    ( $tx:ty, $rx:ty, $ptt:ty ) => {
        pub static ASK_DRIVER: $crate::timer::GlobalAskDriver<$tx, $rx, $ptt> =
            $crate::timer::global_ask_driver_init();
    };
}

/// Installs a driver in the global `ASK_DRIVER` slot.
///
/// Accepts either a ready-made `AskDriver`, or the four arguments of
/// `AskDriver::new`.
///
/// # Example
/// ```rust,ignore
/// setup_ask_driver!(tx, rx, None, AskConfig::default());
/// ```
///
/// # Notes
/// - Requires `init_ask_driver!` to have been used earlier in the same scope.
#[macro_export]
macro_rules! setup_ask_driver {
    ( $driver:expr ) => {
        $crate::timer::global_ask_driver_setup(&ASK_DRIVER, $driver)
    };
    ( $tx:expr, $rx:expr, $ptt:expr, $config:expr ) => {
        $crate::timer::global_ask_driver_setup(
            &ASK_DRIVER,
            $crate::driver::AskDriver::new($tx, $rx, $ptt, $config),
        )
    };
}

/// Calls `tick()` on the global `ASK_DRIVER` if it has been installed.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM2() {
///     tick_ask_timer!();
/// }
/// ```
#[macro_export]
macro_rules! tick_ask_timer {
    () => {
        $crate::timer::global_ask_timer_tick(&ASK_DRIVER)
    };
}
