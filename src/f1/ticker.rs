//! Ticker wiring
//!
//! TIM2 prescaled to 1 MHz is the low half; its update event clocks TIM3
//! through ITR1. Compare-match interrupts use TIM2 channel 1.

use crate::bus::RegisterBus;
use crate::rcc::{BusClock, CoreClock, Enable};
use crate::ticker::{Cascade, Link, Overflow, Rollover, Stage, Ticker};
use crate::timer::{Tim, Trigger};

use super::map::{TIM_2, TIM_3};

pub const TIM2: Stage = Stage::new(Tim(TIM_2), Enable::new(BusClock::Apb1, 0));
pub const TIM3: Stage = Stage::new(Tim(TIM_3), Enable::new(BusClock::Apb1, 1));

/// TIM2 -> TIM3 cascade
pub const CASCADE: Cascade = Cascade::new(TIM2, TIM3, Link::Update(Trigger::Itr1));

/// Cascaded microsecond ticker
pub fn ticker<B, C>(bus: B, clock: C) -> Ticker<B, Cascade, C>
where
    B: RegisterBus,
    C: CoreClock,
{
    Ticker::new(bus, CASCADE, clock)
}

/// TIM3 alone, extended by its update interrupt (TIM3 IRQ)
pub const fn overflow(rollover: &Rollover) -> Overflow<'_> {
    Overflow::new(TIM3, rollover)
}
