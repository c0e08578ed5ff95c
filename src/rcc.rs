//! # Reset & Control Clock
//!
//! Only what pin routing and the ticker need: peripheral clock enables and the
//! core clock frequency. The RCC bank sits at the same address, with the same
//! enable-register offsets, on the F0 and F1 families.

use fugit::HertzU32 as Hertz;

use crate::bus::{self, Bank, RegisterBus};

pub const RCC: Bank = Bank::new(0x4002_1000);

/// Frequency of the internal RC oscillator, the core clock out of reset
pub const HSI: Hertz = Hertz::from_raw(8_000_000);

/// Peripheral bus an enable bit belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusClock {
    /// AMBA High-performance Bus (AHB)
    Ahb,
    /// Advanced Peripheral Bus 1 (APB1)
    Apb1,
    /// Advanced Peripheral Bus 2 (APB2)
    Apb2,
}

impl BusClock {
    /// Offset of the bus' clock enable register
    const fn enr(self) -> u32 {
        match self {
            BusClock::Ahb => 0x14,
            BusClock::Apb2 => 0x18,
            BusClock::Apb1 => 0x1C,
        }
    }
}

/// Clock enable bit of one peripheral
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Enable {
    pub bus: BusClock,
    pub bit: u8,
}

impl Enable {
    pub const fn new(bus: BusClock, bit: u8) -> Self {
        Self { bus, bit }
    }

    /// Address of the enable register
    pub const fn enr(self) -> u32 {
        RCC.reg(self.bus.enr())
    }

    /// Turns the peripheral clock on
    #[inline(always)]
    pub fn enable<B: RegisterBus>(self, bus: &B) {
        bus.set_bits(self.enr(), 1 << self.bit);
        bus::barrier();
    }

    #[inline(always)]
    pub fn disable<B: RegisterBus>(self, bus: &B) {
        bus.clear_bits(self.enr(), 1 << self.bit);
    }

    pub fn is_enabled<B: RegisterBus>(self, bus: &B) -> bool {
        bus.read(self.enr()) & (1 << self.bit) != 0
    }
}

/// Source of the current core clock frequency
///
/// The ticker asks at initialisation time, so a closure reading a clock
/// variable maintained elsewhere sees any reconfiguration made before the
/// first read.
pub trait CoreClock {
    fn core_clock(&self) -> Hertz;
}

impl CoreClock for Hertz {
    fn core_clock(&self) -> Hertz {
        *self
    }
}

impl<F: Fn() -> Hertz> CoreClock for F {
    fn core_clock(&self) -> Hertz {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::MockBus;
    use core::cell::Cell;
    use fugit::RateExtU32;

    #[test]
    fn enable_sets_one_bit() {
        let bus = MockBus::new();
        bus.preset(0x4002_101C, 0x0000_0001);
        let tim3 = Enable::new(BusClock::Apb1, 1);
        assert!(!tim3.is_enabled(&bus));
        tim3.enable(&bus);
        assert_eq!(bus.peek(0x4002_101C), 0x0000_0003);
        assert!(tim3.is_enabled(&bus));
        tim3.disable(&bus);
        assert_eq!(bus.peek(0x4002_101C), 0x0000_0001);
    }

    #[test]
    fn enable_register_addresses() {
        assert_eq!(Enable::new(BusClock::Ahb, 17).enr(), 0x4002_1014);
        assert_eq!(Enable::new(BusClock::Apb2, 2).enr(), 0x4002_1018);
    }

    #[test]
    fn core_clock_sources() {
        assert_eq!(48.MHz::<1, 1>().core_clock(), 48.MHz::<1, 1>());
        let sys = Cell::new(HSI);
        let query = || sys.get();
        assert_eq!(query.core_clock(), 8.MHz::<1, 1>());
        sys.set(72.MHz());
        assert_eq!(query.core_clock().raw(), 72_000_000);
    }
}
