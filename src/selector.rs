//! Lifecycle state shared between the polled controller and the button edge handlers.
//!
//! Edges arrive in interrupt context and may preempt [`Roulette::poll`](crate::roulette::Roulette::poll)
//! between any two instructions. [`SelectorStatic`] therefore keeps the state and the
//! suppression flag in two single-word atomics, and every transition is a compare-and-set
//! from the one state it is allowed to leave.

use portable_atomic::{AtomicBool, AtomicU8, Ordering};

/// Lifecycle of the roulette.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, defmt::Format)]
#[repr(u8)]
pub enum SelectorState {
    /// Playing the idle light effects.
    Idle = 0,
    /// Lights off, waiting for the start button.
    Armed = 1,
    /// Spinning toward the next result.
    Spinning = 2,
    /// Blinking the result, waiting for the ready button.
    Shown = 3,
}

impl SelectorState {
    const fn from_tag(tag: u8) -> Self {
        match tag {
            1 => Self::Armed,
            2 => Self::Spinning,
            3 => Self::Shown,
            _ => Self::Idle,
        }
    }

    const fn tag(self) -> u8 {
        self as u8
    }
}

/// The two physical controls of the roulette.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, defmt::Format)]
pub enum SelectorButton {
    /// Arms the roulette from idle, or dismisses a shown result.
    Ready,
    /// Starts a spin once armed.
    Start,
}

/// Shared state of one roulette: the [`SelectorState`] and the suppression flag.
///
/// Place it in a `static` so edge handlers running in interrupt context can reach it.
///
/// # Example
///
/// ```rust
/// use electronic_roulette::selector::{SelectorState, SelectorStatic};
///
/// static SELECTOR_STATIC: SelectorStatic = SelectorStatic::new_static();
///
/// SELECTOR_STATIC.on_ready_edge();
/// assert_eq!(SELECTOR_STATIC.state(), SelectorState::Armed);
/// SELECTOR_STATIC.on_start_edge();
/// assert_eq!(SELECTOR_STATIC.state(), SelectorState::Spinning);
/// ```
pub struct SelectorStatic {
    state: AtomicU8,
    suppressed: AtomicBool,
}

impl SelectorStatic {
    /// Creates shared state in [`SelectorState::Idle`] with suppression clear.
    #[must_use]
    pub const fn new_static() -> Self {
        Self {
            state: AtomicU8::new(SelectorState::Idle.tag()),
            suppressed: AtomicBool::new(false),
        }
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> SelectorState {
        SelectorState::from_tag(self.state.load(Ordering::Acquire))
    }

    /// Whether the ready button is being ignored while idle.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.suppressed.load(Ordering::Acquire)
    }

    /// Moves `from` to `to` if and only if the state is still `from`.
    ///
    /// Returns whether the transition happened.
    pub(crate) fn transition(&self, from: SelectorState, to: SelectorState) -> bool {
        self.state
            .compare_exchange(from.tag(), to.tag(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Clears the suppression flag once the idle effects have cycled.
    pub(crate) fn clear_suppression(&self) {
        self.suppressed.store(false, Ordering::Release);
    }

    /// Returns to idle with suppression clear, whatever the current state.
    pub(crate) fn restart(&self) {
        self.suppressed.store(false, Ordering::Release);
        self.state.store(SelectorState::Idle.tag(), Ordering::Release);
    }

    /// Handles a falling edge on the ready button.
    ///
    /// Idle (suppression clear) arms the roulette. Shown returns to idle and sets the
    /// suppression flag. Anything else is ignored.
    pub fn on_ready_edge(&self) {
        if !self.is_suppressed() && self.transition(SelectorState::Idle, SelectorState::Armed) {
            return;
        }
        if self.transition(SelectorState::Shown, SelectorState::Idle) {
            self.suppressed.store(true, Ordering::Release);
        }
    }

    /// Handles a falling edge on the start button: Armed starts a spin, anything else is ignored.
    pub fn on_start_edge(&self) {
        self.transition(SelectorState::Armed, SelectorState::Spinning);
    }

    /// Routes an edge to the handler for `button`.
    pub fn on_edge(&self, button: SelectorButton) {
        match button {
            SelectorButton::Ready => self.on_ready_edge(),
            SelectorButton::Start => self.on_start_edge(),
        }
    }
}

impl Default for SelectorStatic {
    fn default() -> Self {
        Self::new_static()
    }
}
