//! Recording doubles for the roulette's hardware collaborators.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use core::convert::Infallible;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use electronic_roulette::lights::{LightBank, LightCount, LightVector, MAX_LIGHTS};
use electronic_roulette::roulette::ToneEmitter;
use electronic_roulette::selector::{SelectorButton, SelectorStatic};
use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use rand_core::RngCore;

/// Records every blocking delay in milliseconds.
#[derive(Clone, Default)]
pub struct DelayLog(Rc<RefCell<Vec<u32>>>);

impl DelayLog {
    pub fn calls(&self) -> Vec<u32> {
        self.0.borrow().clone()
    }

    pub fn last(&self) -> Option<u32> {
        self.0.borrow().last().copied()
    }

    pub fn total_ms(&self) -> u64 {
        self.0.borrow().iter().map(|&ms| u64::from(ms)).sum()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl DelayNs for DelayLog {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(ms);
    }
}

/// A delay that delivers scheduled button edges while it blocks, one edge per delay call,
/// the way an interrupt lands in the middle of a blocking poll.
#[derive(Clone)]
pub struct EdgeDelay<'a> {
    log: DelayLog,
    selector: &'a SelectorStatic,
    pending: Rc<RefCell<VecDeque<SelectorButton>>>,
}

impl<'a> EdgeDelay<'a> {
    pub fn new(selector: &'a SelectorStatic) -> Self {
        Self {
            log: DelayLog::default(),
            selector,
            pending: Rc::default(),
        }
    }

    /// Queues an edge for the next delay call.
    pub fn schedule(&self, button: SelectorButton) {
        self.pending.borrow_mut().push_back(button);
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn log(&self) -> &DelayLog {
        &self.log
    }

    fn deliver(&self) {
        let next = self.pending.borrow_mut().pop_front();
        if let Some(button) = next {
            self.selector.on_edge(button);
        }
    }
}

impl DelayNs for EdgeDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.log.delay_ns(ns);
        self.deliver();
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.delay_ms(ms);
        self.deliver();
    }
}

/// Records every light write.
#[derive(Clone, Default)]
pub struct LightLog(Rc<RefCell<Vec<LightVector>>>);

impl LightLog {
    pub fn writes(&self) -> Vec<LightVector> {
        self.0.borrow().clone()
    }

    pub fn last(&self) -> Option<LightVector> {
        self.0.borrow().last().copied()
    }
}

impl LightBank for LightLog {
    fn light_capacity(&self) -> usize {
        usize::from(MAX_LIGHTS)
    }

    fn write_lights(&mut self, lights: LightVector, light_count: LightCount) {
        assert_eq!(
            lights.masked(light_count.all_on()),
            lights,
            "wrote a light past the end of the ring"
        );
        self.0.borrow_mut().push(lights);
    }
}

/// An output pin that remembers its level and how often it was driven.
#[derive(Default)]
pub struct FakePin {
    pub high: bool,
    pub writes: usize,
}

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        self.writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        self.writes += 1;
        Ok(())
    }
}

/// Counts beeps.
#[derive(Clone, Default)]
pub struct ToneLog(Rc<RefCell<Vec<(u16, Duration)>>>);

impl ToneLog {
    pub fn count(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn last(&self) -> Option<(u16, Duration)> {
        self.0.borrow().last().copied()
    }
}

impl ToneEmitter for ToneLog {
    fn tone(&mut self, frequency_hz: u16, duration: Duration) {
        self.0.borrow_mut().push((frequency_hz, duration));
    }
}

/// Deterministic generator: 0, 1, 2, ...
#[derive(Default)]
pub struct CountingRng(u32);

impl RngCore for CountingRng {
    fn next_u32(&mut self) -> u32 {
        let value = self.0;
        self.0 = self.0.wrapping_add(1);
        value
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for byte in dst {
            *byte = self.next_u32().to_le_bytes()[0];
        }
    }
}
