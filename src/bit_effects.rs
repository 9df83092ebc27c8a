//! Idle light effects built from bit shifts, stepped one increment at a time.
//!
//! [`AnimationEngine`] walks an 18-slot [`CATALOGUE`] of [`Effect`]s. Every call to
//! [`AnimationEngine::step`] advances exactly one effect by one increment, blocking for the
//! effect's step delay when the increment changes the lights. Each slot keeps its own
//! progress, so the engine can be stepped from a polled loop without ever blocking for a
//! whole effect.
//!
//! # Example
//!
//! ```rust
//! use electronic_roulette::bit_effects::AnimationEngine;
//! use electronic_roulette::lights::LightCount;
//! # struct NoDelay;
//! # impl embedded_hal::delay::DelayNs for NoDelay { fn delay_ns(&mut self, _ns: u32) {} }
//!
//! # fn main() -> electronic_roulette::Result<()> {
//! let mut engine = AnimationEngine::new(LightCount::new(8)?, 60);
//! let mut delay = NoDelay;
//! while !engine.step(&mut delay) {
//!     let _lights = engine.current_bits();
//! }
//! # Ok(())
//! # }
//! ```

use embedded_hal::delay::DelayNs;

use crate::lights::{LightCount, LightVector};

/// Step delay at speed 0 (milliseconds).
pub const EFFECT_MAX_DELAY_MS: u32 = 150;

/// Step delay at speed 100 (milliseconds).
pub const EFFECT_MIN_DELAY_MS: u32 = 30;

/// Number of slots in [`CATALOGUE`].
pub const CATALOGUE_LEN: usize = 18;

/// Increments in one [`Effect::Flash`] run.
const FLASH_STEPS: u8 = 16;

/// The idle effects, played in this order and then repeated.
pub const CATALOGUE: [Effect; CATALOGUE_LEN] = [
    Effect::RampUpOn,
    Effect::RampUpOff,
    Effect::RampDownOn,
    Effect::RampDownOff,
    Effect::RampUpOn,
    Effect::RampUpOff,
    Effect::RampDownOn,
    Effect::RampDownOff,
    Effect::SwapUp,
    Effect::SwapDown,
    Effect::SwapUp,
    Effect::SwapDown,
    Effect::StaticSwap,
    Effect::StaticSwap,
    Effect::StaticSwap,
    Effect::StaticSwap,
    Effect::Flash,
    Effect::Flash,
];

/// One family of idle effect.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub enum Effect {
    /// Lights the ring one light at a time, first to last.
    RampUpOn,
    /// Starts fully lit and unlights first to last.
    RampUpOff,
    /// Lights the ring one light at a time, last to first.
    RampDownOn,
    /// Starts fully lit and unlights last to first.
    RampDownOff,
    /// Shifts an every-other-light pattern upward until it leaves the ring.
    SwapUp,
    /// Shifts an every-other-light pattern downward until it leaves the ring.
    SwapDown,
    /// Swaps an every-other-light pattern in place, up then down.
    StaticSwap,
    /// Flashes the whole ring on and off.
    Flash,
}

/// Progress an effect keeps between steps.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct EffectLatch {
    started: bool,
    step: u8,
}

/// What one increment did: how many step delays to wait and whether the effect finished.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Increment {
    waits: u8,
    done: bool,
}

impl Increment {
    const SETUP: Self = Self {
        waits: 0,
        done: false,
    };
}

impl Effect {
    /// Runs one increment of this effect against `lights`.
    fn advance(
        self,
        latch: &mut EffectLatch,
        lights: &mut LightVector,
        light_count: LightCount,
    ) -> Increment {
        let all_on = light_count.all_on();
        let size = light_count.get();

        if !latch.started {
            latch.started = true;
            latch.step = match self {
                Self::RampDownOn | Self::RampDownOff => size,
                _ => 0,
            };
            *lights = match self {
                Self::RampUpOn | Self::RampDownOn => LightVector::OFF,
                Self::RampUpOff | Self::RampDownOff | Self::Flash => all_on,
                Self::SwapUp | Self::StaticSwap => alternate(all_on),
                Self::SwapDown => alternate(all_on).shifted_up().masked(all_on),
            };
            return Increment::SETUP;
        }

        let increment = match self {
            Self::RampUpOn | Self::RampUpOff => {
                if latch.step >= size {
                    Increment {
                        waits: 0,
                        done: true,
                    }
                } else {
                    *lights = if self == Self::RampUpOn {
                        lights.with_lit(latch.step)
                    } else {
                        lights.with_unlit(latch.step)
                    };
                    latch.step = latch.step.saturating_add(1);
                    Increment {
                        waits: 1,
                        done: false,
                    }
                }
            }
            Self::RampDownOn | Self::RampDownOff => {
                latch.step = latch.step.saturating_sub(1);
                *lights = if self == Self::RampDownOn {
                    lights.with_lit(latch.step)
                } else {
                    lights.with_unlit(latch.step)
                };
                Increment {
                    waits: 1,
                    done: latch.step == 0,
                }
            }
            Self::SwapUp | Self::SwapDown | Self::StaticSwap => {
                let shift_up = match self {
                    Self::SwapUp => true,
                    Self::SwapDown => false,
                    _ => latch.step % 2 == 0,
                };
                *lights = if shift_up {
                    lights.shifted_up().masked(all_on)
                } else {
                    lights.shifted_down()
                };
                latch.step = latch.step.saturating_add(1);
                Increment {
                    waits: 2,
                    done: latch.step >= size,
                }
            }
            Self::Flash => {
                *lights = if latch.step % 2 == 0 {
                    all_on
                } else {
                    LightVector::OFF
                };
                latch.step = latch.step.saturating_add(1);
                Increment {
                    waits: 2,
                    done: latch.step >= FLASH_STEPS,
                }
            }
        };

        if increment.done {
            latch.started = false;
        }
        increment
    }
}

/// Every other light, starting at light 0: `all_on / 3`.
const fn alternate(all_on: LightVector) -> LightVector {
    LightVector::from_bits(all_on.bits() / 3)
}

/// Maps a speed percentage (clamped to 100) onto the effect step delay.
#[must_use]
pub const fn effect_step_delay_ms(speed: u8) -> u32 {
    let speed = if speed > 100 { 100 } else { speed as u32 };
    EFFECT_MAX_DELAY_MS - (EFFECT_MAX_DELAY_MS - EFFECT_MIN_DELAY_MS) * speed / 100
}

/// Plays the idle effects of [`CATALOGUE`], one increment per [`step`](Self::step).
///
/// See the [module documentation](mod@crate::bit_effects) for an example.
pub struct AnimationEngine {
    light_count: LightCount,
    step_delay_ms: u32,
    lights: LightVector,
    slot: usize,
    effect_done: bool,
    cycle_done: bool,
    latches: [EffectLatch; CATALOGUE_LEN],
}

impl AnimationEngine {
    /// Creates an engine for `light_count` lights at `speed` percent (0..=100, clamped).
    #[must_use]
    pub const fn new(light_count: LightCount, speed: u8) -> Self {
        Self {
            light_count,
            step_delay_ms: effect_step_delay_ms(speed),
            lights: LightVector::OFF,
            slot: 0,
            effect_done: false,
            cycle_done: false,
            latches: [EffectLatch {
                started: false,
                step: 0,
            }; CATALOGUE_LEN],
        }
    }

    /// Advances the current effect by one increment.
    ///
    /// Blocks on `delay` for zero, one or two step delays, depending on the effect.
    /// Returns `true` on the step where the catalogue wraps back to its first slot,
    /// that is, once every slot has finished one after another.
    pub fn step(&mut self, delay: &mut impl DelayNs) -> bool {
        if self.effect_done {
            self.slot = self.slot.saturating_add(1);
        }
        self.cycle_done = self.slot >= CATALOGUE_LEN;
        if self.cycle_done {
            self.slot = 0;
        }
        self.effect_done = false;

        let effect = self.effect();
        let Some(latch) = self.latches.get_mut(self.slot) else {
            return self.cycle_done;
        };
        let increment = effect.advance(latch, &mut self.lights, self.light_count);
        for _ in 0..increment.waits {
            delay.delay_ms(self.step_delay_ms);
        }
        if increment.done {
            trace!("bit_effects: slot {} ({}) done", self.slot, effect);
        }
        self.effect_done = increment.done;
        self.cycle_done
    }

    /// The lights as left by the most recent step.
    #[must_use]
    pub const fn current_bits(&self) -> LightVector {
        self.lights
    }

    /// Returns to the first slot with every light off and every effect's progress cleared.
    pub fn reset(&mut self) {
        self.slot = 0;
        self.lights = LightVector::OFF;
        self.effect_done = false;
        self.cycle_done = false;
        self.latches = [EffectLatch::default(); CATALOGUE_LEN];
    }

    /// Index of the catalogue slot being played.
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.slot
    }

    /// The effect in the current slot.
    #[must_use]
    pub fn effect(&self) -> Effect {
        CATALOGUE.get(self.slot).copied().unwrap_or(Effect::RampUpOn)
    }

    /// Delay per effect increment (milliseconds).
    #[must_use]
    pub const fn step_delay_ms(&self) -> u32 {
        self.step_delay_ms
    }

    /// The number of lights the effects span.
    #[must_use]
    pub const fn light_count(&self) -> LightCount {
        self.light_count
    }
}
