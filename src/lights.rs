//! The ring of lights: how many there are, which are lit, and how they reach the pins.
//!
//! See [`LightBank`] for writing a [`LightVector`] to hardware.

use core::convert::Infallible;

use embedded_hal::digital::{OutputPin, PinState};

use crate::{Error, Result};

/// Largest supported ring, one light per bit of a [`LightVector`].
pub const MAX_LIGHTS: u8 = 32;

/// A validated number of lights in the ring (1..=32).
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub struct LightCount(u8);

impl LightCount {
    /// Validates a light count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LightCount`] for zero or for more than [`MAX_LIGHTS`].
    pub const fn new(light_count: u8) -> Result<Self> {
        if light_count == 0 || light_count > MAX_LIGHTS {
            return Err(Error::LightCount { light_count });
        }
        Ok(Self(light_count))
    }

    /// The number of lights.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Every light lit: `2^n - 1`.
    #[must_use]
    pub const fn all_on(self) -> LightVector {
        LightVector(u32::MAX >> (MAX_LIGHTS - self.0) as u32)
    }
}

/// Bit-mapped lit/unlit state of the ring. Bit *i* is light *i*.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, defmt::Format)]
pub struct LightVector(u32);

impl LightVector {
    /// No light lit.
    pub const OFF: Self = Self(0);

    /// Wraps raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Exactly one light lit.
    ///
    /// Indices past the vector width give [`LightVector::OFF`].
    #[must_use]
    pub const fn single(index: u8) -> Self {
        match 1_u32.checked_shl(index as u32) {
            Some(bits) => Self(bits),
            None => Self::OFF,
        }
    }

    /// The raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether light `index` is lit.
    #[must_use]
    pub const fn is_lit(self, index: u8) -> bool {
        match self.0.checked_shr(index as u32) {
            Some(bits) => bits & 1 == 1,
            None => false,
        }
    }

    /// Whether any light is lit.
    #[must_use]
    pub const fn any(self) -> bool {
        self.0 != 0
    }

    /// Lights `index`.
    #[must_use]
    pub const fn with_lit(self, index: u8) -> Self {
        Self(self.0 | Self::single(index).0)
    }

    /// Unlights `index`.
    #[must_use]
    pub const fn with_unlit(self, index: u8) -> Self {
        Self(self.0 & !Self::single(index).0)
    }

    /// Keeps only the lights in `mask`.
    #[must_use]
    pub const fn masked(self, mask: Self) -> Self {
        Self(self.0 & mask.0)
    }

    /// Shifts every light one position up (toward higher indices).
    #[must_use]
    pub const fn shifted_up(self) -> Self {
        Self(self.0 << 1)
    }

    /// Shifts every light one position down (toward index 0).
    #[must_use]
    pub const fn shifted_down(self) -> Self {
        Self(self.0 >> 1)
    }
}

/// Hardware that displays a [`LightVector`].
///
/// Implemented for arrays of infallible `embedded_hal` output pins (such as
/// `embassy_rp::gpio::Output`), where array element *i* drives light *i*.
///
/// # Example
///
/// ```rust,ignore
/// use electronic_roulette::lights::{LightBank, LightCount, LightVector};
/// use embassy_rp::gpio::{Level, Output};
///
/// fn example(p: embassy_rp::Peripherals) -> electronic_roulette::Result<()> {
///     let mut lights = [
///         Output::new(p.PIN_4, Level::Low),
///         Output::new(p.PIN_5, Level::Low),
///         Output::new(p.PIN_6, Level::Low),
///     ];
///     lights.write_lights(LightVector::single(1), LightCount::new(3)?);
///     Ok(())
/// }
/// ```
pub trait LightBank {
    /// Number of lights this bank can drive.
    fn light_capacity(&self) -> usize;

    /// Drives the first `light_count` lights from `lights`.
    fn write_lights(&mut self, lights: LightVector, light_count: LightCount);
}

impl<P, const N: usize> LightBank for [P; N]
where
    P: OutputPin<Error = Infallible>,
{
    fn light_capacity(&self) -> usize {
        N
    }

    fn write_lights(&mut self, lights: LightVector, light_count: LightCount) {
        for (index, pin) in (0..light_count.get()).zip(self.iter_mut()) {
            let Ok(()) = pin.set_state(PinState::from(lights.is_lit(index)));
        }
    }
}
