//! The roulette controller: idle effects, a decelerating spin, and a blinking result.
//!
//! See [`Roulette`] for usage.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use rand_core::RngCore;

use crate::bit_effects::AnimationEngine;
use crate::lights::{LightBank, LightCount, LightVector};
use crate::selector::{SelectorState, SelectorStatic};
use crate::{Error, Result};

/// Number of entries in a [`ResultSequence`].
pub const RESULT_SEQUENCE_LEN: usize = 24;

/// Spin step delay at speed 0 (milliseconds).
pub const SPIN_MAX_DELAY_MS: u32 = 250;

/// Spin step delay at speed 100 (milliseconds).
pub const SPIN_MIN_DELAY_MS: u32 = 0;

/// The idle effects run at this share (percent) of the roulette speed.
pub const EFFECT_SPEED_PERCENT: u32 = 80;

/// How long the result stays on, then off, while shown.
pub const RESULT_BLINK_DELAY: Duration = Duration::from_millis(150);

// GPIOs brought out on Pico 1 and Pico 2 boards (GPIO0..=29).
const BOARD_GPIO_COUNT: u16 = 30;

/// Sound hardware that beeps whenever a light is lit.
pub trait ToneEmitter {
    /// Sounds `frequency_hz` for `duration`.
    fn tone(&mut self, frequency_hz: u16, duration: Duration);
}

/// No buzzer fitted.
impl ToneEmitter for () {
    fn tone(&mut self, _frequency_hz: u16, _duration: Duration) {}
}

/// Settings for [`Roulette::new`].
///
/// Everything is validated by [`Roulette::new`] before any derived value (delays, masks) is
/// computed.
#[derive(Clone, Copy, Debug, defmt::Format)]
pub struct RouletteConfig {
    /// Number of lights in the ring (1..=32).
    pub light_count: u8,
    /// Speed as a percentage (0..=100, larger values are clamped).
    pub speed: u8,
    /// Delay added after every spin step (milliseconds).
    pub deceleration_ms: u16,
    /// The spin may stop once its step delay reaches this (milliseconds).
    pub stop_threshold_ms: u16,
    /// Buzzer pitch.
    pub tone_frequency_hz: u16,
    /// Buzzer length per lit write.
    pub tone_duration: Duration,
    /// GPIO wired to light 0; light *i* is on GPIO `first_light_pin + i`.
    ///
    /// Informational: the pins actually driven are the ones in the [`LightBank`]. This only
    /// feeds [`Roulette::light_pin`], the logs, and the check that the chain fits the board.
    pub first_light_pin: u8,
    /// 1-based results, one per spin, used in order and then repeated.
    /// `None` seeds random results when the roulette is created.
    pub result_sequence: Option<[u8; RESULT_SEQUENCE_LEN]>,
}

impl RouletteConfig {
    /// Eight lights on GPIO4..=11, speed 80, deceleration 3 ms, stop at 250 ms, 500 Hz for 20 ms.
    pub const DEFAULT: Self = Self {
        light_count: 8,
        speed: 80,
        deceleration_ms: 3,
        stop_threshold_ms: 250,
        tone_frequency_hz: 500,
        tone_duration: Duration::from_millis(20),
        first_light_pin: 4,
        result_sequence: None,
    };
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Maps a speed percentage (clamped to 100) onto the spin's base step delay.
#[must_use]
pub const fn spin_base_delay_ms(speed: u8) -> u32 {
    let speed = if speed > 100 { 100 } else { speed as u32 };
    SPIN_MAX_DELAY_MS - (SPIN_MAX_DELAY_MS - SPIN_MIN_DELAY_MS) * speed / 100
}

/// The idle effects' speed for a roulette speed.
#[must_use]
pub const fn effect_speed(speed: u8) -> u8 {
    let speed = if speed > 100 { 100 } else { speed as u32 };
    (speed * EFFECT_SPEED_PERCENT / 100) as u8
}

/// The pre-seeded results, consumed one per spin and wrapping after the last.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub struct ResultSequence {
    entries: [u8; RESULT_SEQUENCE_LEN],
    cursor: usize,
}

impl ResultSequence {
    /// Validates 1-based results against `light_count`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResultOutOfRange`] for the first entry outside `1..=light_count`.
    pub fn new(entries: [u8; RESULT_SEQUENCE_LEN], light_count: LightCount) -> Result<Self> {
        let max = light_count.get();
        if let Some((index, &value)) = entries
            .iter()
            .enumerate()
            .find(|&(_, value)| !(1..=max).contains(value))
        {
            return Err(Error::ResultOutOfRange {
                index,
                value,
                light_count: max,
            });
        }
        Ok(Self { entries, cursor: 0 })
    }

    /// Seeds results uniformly from `1..=light_count`.
    pub fn random(light_count: LightCount, rng: &mut impl RngCore) -> Self {
        let count = u32::from(light_count.get());
        let mut entries = [1; RESULT_SEQUENCE_LEN];
        for entry in &mut entries {
            let offset = rng.next_u32() % count;
            *entry = u8::try_from(offset).map_or(1, |offset| offset.saturating_add(1));
        }
        Self { entries, cursor: 0 }
    }

    /// The 1-based light the next spin lands on.
    #[must_use]
    pub fn target(&self) -> u8 {
        self.entries.get(self.cursor).copied().unwrap_or(1)
    }

    /// Index of the next result.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// All results, in order.
    #[must_use]
    pub const fn entries(&self) -> &[u8; RESULT_SEQUENCE_LEN] {
        &self.entries
    }

    fn advance(&mut self) {
        self.cursor = self.cursor.saturating_add(1) % RESULT_SEQUENCE_LEN;
    }
}

/// Progress of the spin in flight. Reset whenever a spin starts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, defmt::Format)]
pub struct SpinProgress {
    /// The highlighted light (0-based).
    pub position: u8,
    /// Delay accumulated by deceleration so far (milliseconds). Never shrinks within a spin.
    pub extra_delay_ms: u32,
}

/// The roulette controller.
///
/// Call [`poll`](Self::poll) in a loop. Each poll performs one step of the current state and
/// may block on the delay for up to a few hundred milliseconds:
///
/// | State | Poll |
/// |---|---|
/// | [`Idle`](SelectorState::Idle) | one idle-effect increment |
/// | [`Armed`](SelectorState::Armed) | all lights off |
/// | [`Spinning`](SelectorState::Spinning) | one spin-advance |
/// | [`Shown`](SelectorState::Shown) | toggle the result light, wait [`RESULT_BLINK_DELAY`] |
///
/// Button edges reach the shared [`SelectorStatic`] directly, usually from interrupt
/// context (see [`button`](mod@crate::button) on hardware).
///
/// # Example
///
/// ```rust,ignore
/// use electronic_roulette::roulette::{Roulette, RouletteConfig};
/// use electronic_roulette::selector::SelectorStatic;
/// use embassy_rp::clocks::RoscRng;
/// use embassy_time::Delay;
///
/// static SELECTOR_STATIC: SelectorStatic = SelectorStatic::new_static();
///
/// fn example(lights: [embassy_rp::gpio::Output<'static>; 8]) -> electronic_roulette::Result<()> {
///     let config = RouletteConfig {
///         speed: 75,
///         result_sequence: Some([3, 2, 4, 2, 3, 4, 1, 5, 6, 3, 7, 2, 1, 5, 2, 5, 3, 6, 5, 4, 1, 8, 3, 1]),
///         ..RouletteConfig::DEFAULT
///     };
///     let mut roulette = Roulette::new(&config, &SELECTOR_STATIC, lights, (), Delay, &mut RoscRng)?;
///     loop {
///         roulette.poll();
///     }
/// }
/// ```
pub struct Roulette<'a, L, T, D> {
    selector: &'a SelectorStatic,
    light_bank: L,
    tone_emitter: T,
    delay: D,
    effects: AnimationEngine,
    light_count: LightCount,
    output: LightVector,
    base_delay_ms: u32,
    deceleration_ms: u32,
    stop_threshold_ms: u32,
    tone_frequency_hz: u16,
    tone_duration: Duration,
    first_light_pin: u8,
    results: ResultSequence,
    spin: SpinProgress,
    observed: SelectorState,
}

impl<'a, L, T, D> Roulette<'a, L, T, D>
where
    L: LightBank,
    T: ToneEmitter,
    D: DelayNs,
{
    /// Validates `config`, derives delays and masks, and returns an idle roulette.
    ///
    /// `rng` is only drawn from when `config.result_sequence` is `None`.
    /// The shared state is reset to [`SelectorState::Idle`] with suppression clear.
    ///
    /// # Errors
    ///
    /// - [`Error::LightCount`] when `light_count` is 0 or over 32.
    /// - [`Error::LightBankTooShort`] when `light_bank` cannot drive `light_count` lights.
    /// - [`Error::LightPinOutOfRange`] when the light chain runs past the board's GPIOs.
    /// - [`Error::ResultOutOfRange`] when a result is outside `1..=light_count`.
    pub fn new(
        config: &RouletteConfig,
        selector: &'a SelectorStatic,
        light_bank: L,
        tone_emitter: T,
        delay: D,
        rng: &mut impl RngCore,
    ) -> Result<Self> {
        let light_count = LightCount::new(config.light_count)?;
        if light_bank.light_capacity() < usize::from(light_count.get()) {
            return Err(Error::LightBankTooShort {
                light_capacity: light_bank.light_capacity(),
                light_count: light_count.get(),
            });
        }
        if u16::from(config.first_light_pin) + u16::from(light_count.get()) > BOARD_GPIO_COUNT {
            return Err(Error::LightPinOutOfRange {
                first_light_pin: config.first_light_pin,
                light_count: light_count.get(),
            });
        }
        let results = match config.result_sequence {
            Some(entries) => ResultSequence::new(entries, light_count)?,
            None => ResultSequence::random(light_count, rng),
        };

        let effects = AnimationEngine::new(light_count, effect_speed(config.speed));
        let base_delay_ms = spin_base_delay_ms(config.speed);
        info!(
            "roulette: {} lights from GPIO{}, spin base {}ms, effect step {}ms, all on {=u32:b}",
            light_count.get(),
            config.first_light_pin,
            base_delay_ms,
            effects.step_delay_ms(),
            light_count.all_on().bits()
        );

        selector.restart();
        Ok(Self {
            selector,
            light_bank,
            tone_emitter,
            delay,
            effects,
            light_count,
            output: LightVector::OFF,
            base_delay_ms,
            deceleration_ms: u32::from(config.deceleration_ms),
            stop_threshold_ms: u32::from(config.stop_threshold_ms),
            tone_frequency_hz: config.tone_frequency_hz,
            tone_duration: config.tone_duration,
            first_light_pin: config.first_light_pin,
            results,
            spin: SpinProgress::default(),
            observed: SelectorState::Idle,
        })
    }

    /// Runs one step of the current state. See [`Roulette`] for what each state does.
    pub fn poll(&mut self) {
        let state = self.selector.state();
        if state != self.observed {
            self.enter(state);
        }

        match state {
            SelectorState::Idle => self.animate(),
            SelectorState::Armed => self.turn_off(),
            SelectorState::Spinning => self.spin_advance(),
            SelectorState::Shown => self.blink_result(),
        }
        trace!("roulette: {} lights={=u32:b}", state, self.output.bits());
    }

    /// Bookkeeping for a state first seen by this controller.
    fn enter(&mut self, state: SelectorState) {
        debug!("roulette: {} -> {}", self.observed, state);
        if self.observed == SelectorState::Idle {
            self.effects.reset();
        }
        if state == SelectorState::Spinning {
            self.spin = SpinProgress::default();
            info!(
                "roulette: spin #{} toward light {}",
                self.results.cursor(),
                self.results.target()
            );
        }
        self.observed = state;
    }

    fn animate(&mut self) {
        if self.effects.step(&mut self.delay) {
            self.selector.clear_suppression();
            debug!("roulette: idle effects cycled");
        }
        self.output = self.effects.current_bits();
        self.update_lights();
    }

    fn turn_off(&mut self) {
        self.output = LightVector::OFF;
        self.update_lights();
    }

    fn spin_advance(&mut self) {
        let total_delay_ms = self.base_delay_ms.saturating_add(self.spin.extra_delay_ms);
        self.output = LightVector::single(self.spin.position);
        self.update_lights();
        self.delay.delay_ms(total_delay_ms);

        let landed = self.results.target().checked_sub(1) == Some(self.spin.position);
        if total_delay_ms >= self.stop_threshold_ms
            && landed
            && self
                .selector
                .transition(SelectorState::Spinning, SelectorState::Shown)
        {
            self.observed = SelectorState::Shown;
            self.results.advance();
            self.spin.extra_delay_ms = 0;
            info!(
                "roulette: landed on light {} (GPIO{}) at {}ms, next result #{}",
                self.spin.position,
                self.light_pin(self.spin.position).unwrap_or(u8::MAX),
                total_delay_ms,
                self.results.cursor()
            );
            return;
        }

        self.spin.position = self.spin.position.saturating_add(1) % self.light_count.get();
        self.spin.extra_delay_ms = self.spin.extra_delay_ms.saturating_add(self.deceleration_ms);
    }

    fn blink_result(&mut self) {
        self.output = if self.output.any() {
            LightVector::OFF
        } else {
            LightVector::single(self.spin.position)
        };
        self.update_lights();
        self.delay.delay_ms(duration_ms(RESULT_BLINK_DELAY));
    }

    /// Beeps if anything is lit, then drives the lights.
    fn update_lights(&mut self) {
        if self.output.any() {
            self.tone_emitter
                .tone(self.tone_frequency_hz, self.tone_duration);
        }
        self.light_bank.write_lights(self.output, self.light_count);
    }

    /// The lifecycle state as last observed by [`poll`](Self::poll).
    #[must_use]
    pub const fn state(&self) -> SelectorState {
        self.observed
    }

    /// The lights as last written.
    #[must_use]
    pub const fn lights(&self) -> LightVector {
        self.output
    }

    /// Progress of the current (or last) spin.
    #[must_use]
    pub const fn spin_progress(&self) -> SpinProgress {
        self.spin
    }

    /// Index of the result the next spin lands on.
    #[must_use]
    pub const fn result_cursor(&self) -> usize {
        self.results.cursor()
    }

    /// The result sequence.
    #[must_use]
    pub const fn results(&self) -> &ResultSequence {
        &self.results
    }

    /// The spin's step delay before any deceleration (milliseconds).
    #[must_use]
    pub const fn base_delay_ms(&self) -> u32 {
        self.base_delay_ms
    }

    /// The idle effects.
    #[must_use]
    pub const fn effects(&self) -> &AnimationEngine {
        &self.effects
    }

    /// GPIO wired to light `index` per [`RouletteConfig::first_light_pin`], or `None` past
    /// the end of the ring.
    #[must_use]
    pub const fn light_pin(&self, index: u8) -> Option<u8> {
        if index < self.light_count.get() {
            self.first_light_pin.checked_add(index)
        } else {
            None
        }
    }
}

fn duration_ms(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
