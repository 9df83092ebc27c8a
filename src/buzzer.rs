//! A PWM buzzer that beeps along with the roulette lights.
//!
//! See [`Buzzer`] for usage.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};
use embassy_time::{Duration, block_for};

use crate::roulette::ToneEmitter;

/// PWM ticks per second once the divider is applied (one tick per microsecond).
const TICKS_PER_SECOND: u32 = 1_000_000;

/// Lowest pitch whose period still fits the 16-bit PWM counter.
const MIN_FREQUENCY_HZ: u16 = 16;

/// A piezo buzzer driven by one PWM channel at 50% duty.
///
/// A tone holds the caller for its whole duration, so a longer tone also slows the
/// roulette down.
///
/// # Example
///
/// ```rust,ignore
/// use electronic_roulette::buzzer::Buzzer;
/// use electronic_roulette::roulette::ToneEmitter;
/// use embassy_rp::pwm::{Config, Pwm};
/// use embassy_time::Duration;
///
/// fn example(p: embassy_rp::Peripherals) {
///     // GPIO13 is channel B of PWM slice 6.
///     let mut buzzer = Buzzer::new_output_b(Pwm::new_output_b(p.PWM_SLICE6, p.PIN_13, Config::default()));
///     buzzer.tone(500, Duration::from_millis(20));
/// }
/// ```
pub struct Buzzer<'d> {
    pwm: Pwm<'d>,
    cfg: Config, // Store config to avoid recreating default (which resets divider)
    channel: BuzzerChannel,
}

#[derive(Debug, Clone, Copy)]
enum BuzzerChannel {
    A,
    B,
}

impl<'d> Buzzer<'d> {
    /// Create a buzzer on a PWM output A channel.
    ///
    /// See the [struct-level example](Self) for usage.
    #[must_use]
    pub fn new_output_a(pwm: Pwm<'d>) -> Self {
        Self::init(pwm, BuzzerChannel::A)
    }

    /// Create a buzzer on a PWM output B channel.
    ///
    /// See the [struct-level example](Self) for usage.
    #[must_use]
    pub fn new_output_b(pwm: Pwm<'d>) -> Self {
        Self::init(pwm, BuzzerChannel::B)
    }

    /// Configure a silent 1 µs-tick PWM slice. Internal shared logic.
    fn init(mut pwm: Pwm<'d>, channel: BuzzerChannel) -> Self {
        let clk = clk_sys_freq();
        let div_int = (clk / TICKS_PER_SECOND).clamp(1, 255);

        let mut cfg = Config::default();
        cfg.phase_correct = false;
        cfg.divider = u8::try_from(div_int).unwrap_or(u8::MAX).into();
        cfg.enable = false;
        pwm.set_config(&cfg);

        info!("buzzer clk={}Hz div={}", clk, div_int);

        Self { pwm, cfg, channel }
    }

    /// Start a square wave at `frequency_hz` (clamped to at least 16 Hz).
    pub fn start(&mut self, frequency_hz: u16) {
        let frequency_hz = u32::from(frequency_hz.max(MIN_FREQUENCY_HZ));
        let top = u16::try_from(TICKS_PER_SECOND / frequency_hz - 1).unwrap_or(u16::MAX);
        let half = top / 2 + 1;
        self.cfg.top = top;
        match self.channel {
            BuzzerChannel::A => self.cfg.compare_a = half,
            BuzzerChannel::B => self.cfg.compare_b = half,
        }
        self.cfg.enable = true;
        self.pwm.set_config(&self.cfg);
    }

    /// Silence the buzzer.
    pub fn stop(&mut self) {
        self.cfg.enable = false;
        self.pwm.set_config(&self.cfg);
    }
}

impl ToneEmitter for Buzzer<'_> {
    fn tone(&mut self, frequency_hz: u16, duration: Duration) {
        self.start(frequency_hz);
        block_for(duration);
        self.stop();
    }
}
