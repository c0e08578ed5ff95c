//! RTIC Monotonic implementation

use fugit::{TimerDurationU32, TimerInstantU32};
use rtic_monotonic::Monotonic;

use super::{Overflow, Ticker, TICK_HZ};
use crate::bus::RegisterBus;
use crate::peripheral::Channel;
use crate::rcc::CoreClock;
use crate::timer::Event;

impl<B, C> Monotonic for Ticker<B, Overflow<'_>, C>
where
    B: RegisterBus,
    C: CoreClock,
{
    type Instant = TimerInstantU32<TICK_HZ>;
    type Duration = TimerDurationU32<TICK_HZ>;

    unsafe fn reset(&mut self) {
        self.init();
        self.source
            .stage
            .tim
            .listen_interrupt(&self.bus, Event::C1, true);
    }

    #[inline(always)]
    fn now(&mut self) -> Self::Instant {
        Self::Instant::from_ticks(self.read())
    }

    fn set_compare(&mut self, instant: Self::Instant) {
        let now = self.now();
        let tim = self.source.stage.tim;
        let cnt = tim.read_count(&self.bus) as u16;

        // CCR1 holds the low half only. Deadlines already due or more than one
        // period away fire after a full period and get re-armed by RTIC.
        let val = match instant.checked_duration_since(now) {
            Some(x) if x.ticks() <= 0xffff => instant.duration_since_epoch().ticks() as u16,
            _ => cnt.wrapping_add(0xffff),
        };

        tim.set_cc_value(&self.bus, Channel::C1, val as u32);
    }

    fn clear_compare_flag(&mut self) {
        self.source
            .stage
            .tim
            .clear_interrupt_flag(&self.bus, Event::C1);
    }

    fn on_interrupt(&mut self) {
        self.source.on_interrupt(&self.bus);
    }

    #[inline(always)]
    fn zero() -> Self::Instant {
        Self::Instant::from_ticks(0)
    }
}

