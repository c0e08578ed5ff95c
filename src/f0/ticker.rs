//! Ticker wiring
//!
//! TIM14 has no master mode controller, so its channel 1 output, in PWM mode
//! against 0xFFFF, is the carry into TIM3 (ITR3). That leaves no compare
//! channel for the cascade; use [`overflow`] when compare-match interrupts
//! are needed.

use crate::bus::RegisterBus;
use crate::rcc::{BusClock, CoreClock, Enable};
use crate::ticker::{Cascade, Link, Overflow, Rollover, Stage, Ticker};
use crate::timer::{Tim, Trigger};

use super::map::{TIM_14, TIM_3};

pub const TIM14: Stage = Stage::new(Tim(TIM_14), Enable::new(BusClock::Apb1, 8));
pub const TIM3: Stage = Stage::new(Tim(TIM_3), Enable::new(BusClock::Apb1, 1));

/// TIM14 -> TIM3 cascade
pub const CASCADE: Cascade = Cascade::new(TIM14, TIM3, Link::Compare(Trigger::Itr3));

/// Cascaded microsecond ticker
pub fn ticker<B, C>(bus: B, clock: C) -> Ticker<B, Cascade, C>
where
    B: RegisterBus,
    C: CoreClock,
{
    Ticker::new(bus, CASCADE, clock)
}

/// TIM3 alone, extended by its update interrupt
pub const fn overflow(rollover: &Rollover) -> Overflow<'_> {
    Overflow::new(TIM3, rollover)
}
