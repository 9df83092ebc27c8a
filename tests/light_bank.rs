#![allow(missing_docs)]
//! Host-level tests for the light vector and writing it to output pins.

mod common;

use common::FakePin;
use electronic_roulette::Error;
use electronic_roulette::lights::{LightBank, LightCount, LightVector, MAX_LIGHTS};

fn light_count(light_count: u8) -> LightCount {
    LightCount::new(light_count).expect("valid light count")
}

#[test]
fn light_count_rejects_zero_and_too_many() {
    assert!(matches!(
        LightCount::new(0),
        Err(Error::LightCount { light_count: 0 })
    ));
    assert!(matches!(
        LightCount::new(MAX_LIGHTS + 1),
        Err(Error::LightCount { light_count: 33 })
    ));
    assert_eq!(light_count(MAX_LIGHTS).get(), 32);
}

#[test]
fn all_on_lights_exactly_the_ring() {
    assert_eq!(light_count(1).all_on().bits(), 0b1);
    assert_eq!(light_count(8).all_on().bits(), 0xFF);
    assert_eq!(light_count(31).all_on().bits(), 0x7FFF_FFFF);
    assert_eq!(light_count(32).all_on().bits(), u32::MAX);
}

#[test]
fn single_and_bit_helpers() {
    assert_eq!(LightVector::single(3).bits(), 0b1000);
    assert_eq!(LightVector::single(32), LightVector::OFF);
    assert!(LightVector::single(5).is_lit(5));
    assert!(!LightVector::single(5).is_lit(4));
    assert!(!LightVector::from_bits(u32::MAX).is_lit(40));
    assert!(!LightVector::OFF.any());

    let lights = LightVector::OFF.with_lit(0).with_lit(2).with_unlit(0);
    assert_eq!(lights.bits(), 0b100);
    assert_eq!(lights.shifted_up().bits(), 0b1000);
    assert_eq!(lights.shifted_down().bits(), 0b10);
    assert_eq!(
        LightVector::from_bits(0b1_1010).masked(light_count(4).all_on()).bits(),
        0b1010
    );
}

#[test]
fn pin_array_capacity_is_its_length() {
    let pins: [FakePin; 5] = Default::default();
    assert_eq!(pins.light_capacity(), 5);
}

#[test]
fn writes_each_pin_from_its_bit() {
    let mut pins: [FakePin; 8] = Default::default();
    pins.write_lights(LightVector::from_bits(0b1010_0101), light_count(8));
    let levels: Vec<bool> = pins.iter().map(|pin| pin.high).collect();
    assert_eq!(
        levels,
        [true, false, true, false, false, true, false, true]
    );

    pins.write_lights(LightVector::OFF, light_count(8));
    assert!(pins.iter().all(|pin| !pin.high));
}

#[test]
fn pins_past_the_light_count_are_left_alone() {
    let mut pins: [FakePin; 8] = Default::default();
    pins.write_lights(LightVector::from_bits(0xFF), light_count(5));
    assert!(pins.iter().take(5).all(|pin| pin.high && pin.writes == 1));
    assert!(pins.iter().skip(5).all(|pin| !pin.high && pin.writes == 0));
}

#[test]
fn light_count_past_the_array_writes_only_the_array() {
    let mut pins: [FakePin; 3] = Default::default();
    pins.write_lights(LightVector::from_bits(0xFF), light_count(8));
    assert!(pins.iter().all(|pin| pin.high && pin.writes == 1));
}
