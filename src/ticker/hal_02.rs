use embedded_hal_02::blocking::delay::{DelayMs, DelayUs};
use fugit::ExtU32;

use super::{CounterSource, Ticker};
use crate::bus::RegisterBus;
use crate::rcc::CoreClock;

impl<B: RegisterBus, S: CounterSource, C: CoreClock> DelayUs<u32> for Ticker<B, S, C> {
    fn delay_us(&mut self, us: u32) {
        self.delay(us.micros())
    }
}

impl<B: RegisterBus, S: CounterSource, C: CoreClock> DelayMs<u32> for Ticker<B, S, C> {
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay(1_000.micros());
        }
    }
}

impl<B: RegisterBus, S: CounterSource, C: CoreClock> DelayUs<u16> for Ticker<B, S, C> {
    fn delay_us(&mut self, us: u16) {
        DelayUs::<u32>::delay_us(self, us as u32)
    }
}

impl<B: RegisterBus, S: CounterSource, C: CoreClock> DelayMs<u16> for Ticker<B, S, C> {
    fn delay_ms(&mut self, ms: u16) {
        DelayMs::<u32>::delay_ms(self, ms as u32);
    }
}

impl<B: RegisterBus, S: CounterSource, C: CoreClock> DelayUs<u8> for Ticker<B, S, C> {
    fn delay_us(&mut self, us: u8) {
        DelayUs::<u32>::delay_us(self, us as u32)
    }
}

impl<B: RegisterBus, S: CounterSource, C: CoreClock> DelayMs<u8> for Ticker<B, S, C> {
    fn delay_ms(&mut self, ms: u8) {
        DelayMs::<u32>::delay_ms(self, ms as u32);
    }
}
