use derive_more::{Display, Error};

/// Errors reported while configuring the roulette or starting its device tasks.
///
/// Configuration is validated once, before any derived value is committed.
/// After that, stepping and polling cannot fail.
#[derive(Debug, Display, Error, defmt::Format)]
pub enum Error {
    /// The light count is zero or wider than a [`LightVector`](crate::lights::LightVector).
    #[display("light count {light_count} is outside 1..=32")]
    LightCount {
        /// The rejected light count.
        light_count: u8,
    },

    /// A result sequence entry names a light the roulette does not have.
    #[display("result #{index} is {value}, expected 1..={light_count}")]
    ResultOutOfRange {
        /// Position of the entry in the result sequence.
        index: usize,
        /// The rejected 1-based light number.
        value: u8,
        /// The configured light count.
        light_count: u8,
    },

    /// The light chain runs past the last GPIO of the board.
    #[display("{light_count} lights starting at GPIO{first_light_pin} do not fit the board")]
    LightPinOutOfRange {
        /// First GPIO of the light chain.
        first_light_pin: u8,
        /// The configured light count.
        light_count: u8,
    },

    /// The light bank has fewer outputs than the configured light count.
    #[display("light bank drives {light_capacity} lights, expected at least {light_count}")]
    LightBankTooShort {
        /// Lights the bank can drive.
        light_capacity: usize,
        /// The configured light count.
        light_count: u8,
    },

    /// An embassy task could not be spawned.
    #[cfg(not(feature = "host"))]
    #[display("task spawn failed: {_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),
}

/// Result type for this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
