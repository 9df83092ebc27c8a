//! Button edge watching for the roulette's ready and start buttons.
//!
//! Each button gets a spawned task that waits on the GPIO edge interrupt and hands the edge
//! to [`SelectorStatic::on_edge`] as soon as the task runs again. The GPIO interrupt latches
//! the edge, so a press that is already released by the time the task is scheduled (for
//! example, after a blocking [`Roulette::poll`](crate::roulette::Roulette::poll)) still counts.
//! Debouncing only guards re-arming: the next edge is awaited once the button has read
//! released for [`BUTTON_DEBOUNCE_MS`].
//!
//! See [`RouletteButtons`] for usage and [`handle_press`] for one press.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;

use crate::selector::{SelectorButton, SelectorStatic};

#[cfg(not(feature = "host"))]
use embassy_executor::Spawner;
#[cfg(not(feature = "host"))]
use embassy_rp::Peri;
#[cfg(not(feature = "host"))]
use embassy_rp::gpio::{AnyPin, Input, Pull};
#[cfg(not(feature = "host"))]
use embassy_time::Delay;

#[cfg(not(feature = "host"))]
use crate::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// How long a button must read released before its next edge is awaited (milliseconds).
pub const BUTTON_DEBOUNCE_MS: u32 = 10;

/// Poll interval while waiting for release (milliseconds).
const RELEASE_POLL_MS: u32 = 1;

// ============================================================================
// PressedTo - How the button is wired
// ============================================================================

/// Describes how a button is physically wired.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, defmt::Format)]
pub enum PressedTo {
    /// Button connects pin to voltage (3.3V) when pressed.
    /// Uses internal pull-down resistor. A press is a rising edge.
    ///
    /// Note: The original Pico 2 (RP2350) has a known silicon bug with pull-down resistors
    /// that can cause pins to stay HIGH after button release. Use ToGround instead.
    Voltage,

    /// Button connects pin to ground (GND) when pressed.
    /// Uses internal pull-up resistor. A press is a falling edge.
    Ground,
}

#[cfg(not(feature = "host"))]
impl PressedTo {
    const fn pull(self) -> Pull {
        match self {
            Self::Voltage => Pull::Down,
            Self::Ground => Pull::Up,
        }
    }
}

// ============================================================================
// RouletteButtons - spawns the edge watchers
// ============================================================================

/// The ready and start buttons, each watched by its own task.
///
/// # Example
///
/// ```rust,ignore
/// use electronic_roulette::button::{PressedTo, RouletteButtons};
/// use electronic_roulette::selector::SelectorStatic;
///
/// static SELECTOR_STATIC: SelectorStatic = SelectorStatic::new_static();
///
/// async fn example(
///     p: embassy_rp::Peripherals,
///     spawner: embassy_executor::Spawner,
/// ) -> electronic_roulette::Result<()> {
///     RouletteButtons::spawn(
///         p.PIN_2.into(),
///         p.PIN_3.into(),
///         PressedTo::Ground,
///         &SELECTOR_STATIC,
///         spawner,
///     )?;
///     Ok(())
/// }
/// ```
#[cfg(not(feature = "host"))]
pub struct RouletteButtons;

#[cfg(not(feature = "host"))]
impl RouletteButtons {
    /// Starts watching `ready_pin` and `start_pin`, delivering their edges to `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskSpawn`] if either watcher task cannot be spawned
    /// (for example, when called twice).
    pub fn spawn(
        ready_pin: Peri<'static, AnyPin>,
        start_pin: Peri<'static, AnyPin>,
        pressed_to: PressedTo,
        selector: &'static SelectorStatic,
        spawner: Spawner,
    ) -> Result<()> {
        let ready_input = Input::new(ready_pin, pressed_to.pull());
        let start_input = Input::new(start_pin, pressed_to.pull());
        spawner
            .spawn(button_edge_task(
                ready_input,
                pressed_to,
                SelectorButton::Ready,
                selector,
            ))
            .map_err(Error::TaskSpawn)?;
        spawner
            .spawn(button_edge_task(
                start_input,
                pressed_to,
                SelectorButton::Start,
                selector,
            ))
            .map_err(Error::TaskSpawn)?;
        info!("buttons: watching ready and start ({})", pressed_to);
        Ok(())
    }
}

// ============================================================================
// Background task implementation
// ============================================================================

/// Background task that turns presses of one button into selector edges.
///
/// Never call directly - spawned by [`RouletteButtons::spawn`].
#[cfg(not(feature = "host"))]
#[embassy_executor::task(pool_size = 2)]
async fn button_edge_task(
    mut input: Input<'static>,
    pressed_to: PressedTo,
    button: SelectorButton,
    selector: &'static SelectorStatic,
) -> ! {
    let mut delay = Delay;
    loop {
        handle_press(&mut input, pressed_to, button, selector, &mut delay).await;
    }
}

/// Waits for one press of `input`, reports it to `selector`, then waits for a stable release.
///
/// The edge is reported before the pin is read again, so a tap that has already ended
/// when this resumes is not mistaken for bounce.
pub async fn handle_press<P, D>(
    input: &mut P,
    pressed_to: PressedTo,
    button: SelectorButton,
    selector: &SelectorStatic,
    delay: &mut D,
) where
    P: ErrorType<Error = Infallible> + InputPin + Wait,
    D: DelayNs,
{
    let Ok(()) = match pressed_to {
        PressedTo::Ground => input.wait_for_falling_edge().await,
        PressedTo::Voltage => input.wait_for_rising_edge().await,
    };

    selector.on_edge(button);
    debug!("buttons: {} edge, state {}", button, selector.state());

    wait_for_release(input, pressed_to, delay).await;
}

fn is_pressed<P>(input: &mut P, pressed_to: PressedTo) -> bool
where
    P: ErrorType<Error = Infallible> + InputPin,
{
    let Ok(high) = input.is_high();
    match pressed_to {
        PressedTo::Voltage => high,
        PressedTo::Ground => !high,
    }
}

async fn wait_for_release<P, D>(input: &mut P, pressed_to: PressedTo, delay: &mut D)
where
    P: ErrorType<Error = Infallible> + InputPin,
    D: DelayNs,
{
    loop {
        if !is_pressed(input, pressed_to) {
            delay.delay_ms(BUTTON_DEBOUNCE_MS).await;
            if !is_pressed(input, pressed_to) {
                break;
            }
        }
        delay.delay_ms(RELEASE_POLL_MS).await;
    }
}
