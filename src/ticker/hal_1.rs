use embedded_hal::delay::DelayNs;
use fugit::ExtU32;

use super::{CounterSource, Ticker};
use crate::bus::RegisterBus;
use crate::rcc::CoreClock;

impl<B, S, C> DelayNs for Ticker<B, S, C>
where
    B: RegisterBus,
    S: CounterSource,
    C: CoreClock,
{
    fn delay_ns(&mut self, ns: u32) {
        let us = ns / 1_000 + (ns % 1_000 != 0) as u32;
        self.delay(us.micros());
    }

    fn delay_us(&mut self, us: u32) {
        self.delay(us.micros());
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay(1_000.micros());
        }
    }
}
