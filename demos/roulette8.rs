#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, panic};

use electronic_roulette::{
    Result,
    button::{PressedTo, RouletteButtons},
    buzzer::Buzzer,
    roulette::{Roulette, RouletteConfig},
    selector::SelectorStatic,
};
use embassy_executor::Spawner;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::pwm::{Config, Pwm};
use embassy_time::{Delay, Duration};
use {defmt_rtt as _, panic_probe as _};

const LUCKY_NUMBERS: [u8; 24] = [
    3, 2, 4, 2, 3, 4, 1, 5, 6, 3, 7, 2, 1, 5, 2, 5, 3, 6, 5, 4, 1, 8, 3, 1,
];

static SELECTOR_STATIC: SelectorStatic = SelectorStatic::new_static();

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    // Eight lights on GPIO4..=11.
    let lights = [
        Output::new(p.PIN_4, Level::Low),
        Output::new(p.PIN_5, Level::Low),
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_9, Level::Low),
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_11, Level::Low),
    ];
    // GPIO13 is channel B of PWM slice 6.
    let buzzer = Buzzer::new_output_b(Pwm::new_output_b(
        p.PWM_SLICE6,
        p.PIN_13,
        Config::default(),
    ));

    let config = RouletteConfig {
        light_count: 8,
        speed: 75,
        deceleration_ms: 3,
        stop_threshold_ms: 250,
        tone_frequency_hz: 500,
        // A longer beep also slows the roulette down.
        tone_duration: Duration::from_millis(20),
        first_light_pin: 4,
        result_sequence: Some(LUCKY_NUMBERS),
    };
    let mut roulette = Roulette::new(
        &config,
        &SELECTOR_STATIC,
        lights,
        buzzer,
        Delay,
        &mut RoscRng,
    )?;

    RouletteButtons::spawn(
        p.PIN_2.into(),
        p.PIN_3.into(),
        PressedTo::Ground,
        &SELECTOR_STATIC,
        spawner,
    )?;

    loop {
        roulette.poll();
        // Let the button tasks run between blocking polls.
        embassy_futures::yield_now().await;
    }
}
