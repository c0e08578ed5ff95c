//! # Peripheral identities
//!
//! Values that name one concrete hardware unit a pin can be routed to. Each
//! wraps the [`Bank`] of the unit, plus a channel where the pin only reaches
//! one input or output of it. Equality is the routing relation: two pins are
//! served by the same unit exactly when their identities compare equal.

use crate::bus::Bank;

/// A routable peripheral identity
pub trait Peripheral: Copy + Eq {
    /// Kind name used in diagnostics
    const NAME: &'static str;
}

/// USART/UART instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Uart(pub Bank);

impl Peripheral for Uart {
    const NAME: &'static str = "Serial";
}

/// SPI instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Spi(pub Bank);

impl Peripheral for Spi {
    const NAME: &'static str = "SPI";
}

/// One analog input of an ADC
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcChannel {
    pub adc: Bank,
    pub channel: u8,
}

impl AdcChannel {
    pub const fn new(adc: Bank, channel: u8) -> Self {
        Self { adc, channel }
    }
}

impl Peripheral for AdcChannel {
    const NAME: &'static str = "ADC";
}

/// Capture/compare channel of a timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Channel {
    C1 = 0,
    C2 = 1,
    C3 = 2,
    C4 = 3,
}

impl Channel {
    /// Zero-based channel number
    #[inline(always)]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// One output channel of a timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimChannel {
    pub tim: Bank,
    pub channel: Channel,
}

impl TimChannel {
    pub const fn new(tim: Bank, channel: Channel) -> Self {
        Self { tim, channel }
    }
}

impl Peripheral for TimChannel {
    const NAME: &'static str = "PWM";
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIM1: Bank = Bank::new(0x4001_2C00);
    const TIM3: Bank = Bank::new(0x4000_0400);

    #[test]
    fn timer_channels_are_distinct() {
        let all = [Channel::C1, Channel::C2, Channel::C3, Channel::C4];
        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                assert_eq!(
                    TimChannel::new(TIM1, *a) == TimChannel::new(TIM1, *b),
                    i == j
                );
            }
            assert_ne!(TimChannel::new(TIM1, *a), TimChannel::new(TIM3, *a));
        }
    }

    #[test]
    fn identity_is_the_bank() {
        let spi1 = Spi(Bank::new(0x4001_3000));
        assert_eq!(spi1.0.base(), 0x4001_3000);
        assert_eq!(spi1, Spi(Bank::new(0x4001_3000)));
        assert_ne!(spi1, Spi(Bank::new(0x4000_3800)));
    }
}
