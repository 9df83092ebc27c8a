//! An electronic roulette for Pico 1 and 2: a ring of lights plays idle effects, spins with
//! growing delay on command, and lands on a pre-seeded number.
//!
//! See [`roulette::Roulette`] for the controller and a full usage example.
//!
//! # Glossary
//!
//! - **Light vector:** bit-mapped record of which lights are lit. Bit *i* is light *i*.
//! - **Catalogue slot:** one entry in the fixed, ordered list of idle effects.
//! - **Result sequence:** pre-seeded circular list of 1-based target lights, one per spin.
//! - **Spin-advance:** one iteration of the deceleration loop while spinning.
//! - **Edge:** a falling-signal transition on a button input, delivered asynchronously.
//! - **Suppression flag:** one-shot guard that ignores the ready button after a result is
//!   dismissed until the idle effects complete a full cycle.
#![cfg_attr(not(feature = "host"), no_std)]
#![cfg_attr(not(feature = "host"), no_main)]

// Compile-time checks: exactly one board must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "pico1", feature = "pico2")), not(feature = "host")))]
compile_error!("Must enable exactly one board feature: 'pico1' or 'pico2'");

#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

// Compile-time checks: exactly one architecture must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "arm", feature = "riscv")), not(feature = "host")))]
compile_error!("Must enable exactly one architecture feature: 'arm' or 'riscv'");

#[cfg(all(feature = "arm", feature = "riscv"))]
compile_error!("Cannot enable both 'arm' and 'riscv' features simultaneously");

// Compile-time check: pico1 only supports ARM
#[cfg(all(feature = "pico1", feature = "riscv"))]
compile_error!("Pico 1 (RP2040) only supports ARM architecture, not RISC-V");

// Host builds link without a defmt global logger, so logging compiles away there.
macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(not(feature = "host"))]
        defmt::info!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(not(feature = "host"))]
        defmt::debug!($($arg)*);
    }};
}

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(not(feature = "host"))]
        defmt::trace!($($arg)*);
    }};
}

pub mod bit_effects;
pub mod button;
// Requires embassy_rp and is excluded when testing on host
#[cfg(not(feature = "host"))]
pub mod buzzer;
mod error;
pub mod lights;
pub mod roulette;
pub mod selector;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
