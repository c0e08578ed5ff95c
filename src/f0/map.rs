//! Pin maps and peripheral identities of the STM32F030
//!
//! PB12-PB15 reach both SPI units; their SPI2 rows come first, so a lone
//! PB1x pin resolves to SPI2 and a pin set mixing them with SPI1-only pins is
//! a conflict.

use crate::bus::Bank;
use crate::peripheral::{AdcChannel, Channel, Spi, TimChannel, Uart};
use crate::pin::*;
use crate::pinmap::PinMap;
use crate::rcc::{BusClock, Enable};

use super::PinData;

pub const ADC_1: Bank = Bank::new(0x4001_2400);
pub const TIM_1: Bank = Bank::new(0x4001_2C00);
pub const TIM_3: Bank = Bank::new(0x4000_0400);
pub const TIM_14: Bank = Bank::new(0x4000_2000);
pub const TIM_16: Bank = Bank::new(0x4001_4400);
pub const TIM_17: Bank = Bank::new(0x4001_4800);

pub const USART_1: Uart = Uart(Bank::new(0x4001_3800));

pub const SPI_1: Spi = Spi(Bank::new(0x4001_3000));
pub const SPI_2: Spi = Spi(Bank::new(0x4000_3800));

pub const TIM_1_1: TimChannel = TimChannel::new(TIM_1, Channel::C1);
pub const TIM_1_2: TimChannel = TimChannel::new(TIM_1, Channel::C2);
pub const TIM_1_3: TimChannel = TimChannel::new(TIM_1, Channel::C3);
pub const TIM_1_4: TimChannel = TimChannel::new(TIM_1, Channel::C4);
pub const TIM_3_4: TimChannel = TimChannel::new(TIM_3, Channel::C4);
pub const TIM_14_1: TimChannel = TimChannel::new(TIM_14, Channel::C1);
pub const TIM_16_1: TimChannel = TimChannel::new(TIM_16, Channel::C1);
pub const TIM_17_1: TimChannel = TimChannel::new(TIM_17, Channel::C1);

const fn adc(channel: u8) -> AdcChannel {
    AdcChannel::new(ADC_1, channel)
}

const AF0: PinData = PinData::alternate(0);
const AF1: PinData = PinData::alternate(1);
const AF2: PinData = PinData::alternate(2);
const AF4: PinData = PinData::alternate(4);
const AF5: PinData = PinData::alternate(5);

/// Clock enable bit of every register bank the tables route to
const ENABLES: &[(Bank, Enable)] = &[
    (ADC_1, Enable::new(BusClock::Apb2, 9)),
    (USART_1.0, Enable::new(BusClock::Apb2, 14)),
    (SPI_1.0, Enable::new(BusClock::Apb2, 12)),
    (SPI_2.0, Enable::new(BusClock::Apb1, 14)),
    (TIM_1, Enable::new(BusClock::Apb2, 11)),
    (TIM_3, Enable::new(BusClock::Apb1, 1)),
    (TIM_14, Enable::new(BusClock::Apb1, 8)),
    (TIM_16, Enable::new(BusClock::Apb2, 17)),
    (TIM_17, Enable::new(BusClock::Apb2, 18)),
];

/// Clock enable of a peripheral register bank
pub fn enable(bank: Bank) -> Option<Enable> {
    ENABLES.iter().find(|(b, _)| *b == bank).map(|(_, e)| *e)
}

pub const ADC: &[PinMap<AdcChannel, PinData>] = &[
    PinMap::new(PA0, adc(0), PinData::ANALOG),
    PinMap::new(PA1, adc(1), PinData::ANALOG),
    PinMap::new(PA2, adc(2), PinData::ANALOG),
    PinMap::new(PA3, adc(3), PinData::ANALOG),
    PinMap::new(PA4, adc(4), PinData::ANALOG),
    PinMap::new(PA5, adc(5), PinData::ANALOG),
    PinMap::new(PA6, adc(6), PinData::ANALOG),
    PinMap::new(PA7, adc(7), PinData::ANALOG),
    PinMap::new(PB0, adc(8), PinData::ANALOG),
    PinMap::new(PB1, adc(9), PinData::ANALOG),
    PinMap::new(PC0, adc(10), PinData::ANALOG),
    PinMap::new(PC1, adc(11), PinData::ANALOG),
    PinMap::new(PC2, adc(12), PinData::ANALOG),
    PinMap::new(PC3, adc(13), PinData::ANALOG),
    PinMap::new(PC4, adc(14), PinData::ANALOG),
    PinMap::new(PC5, adc(15), PinData::ANALOG),
];

pub const UART_TX: &[PinMap<Uart, PinData>] = &[
    PinMap::new(PA9, USART_1, AF1),
    PinMap::new(PB6, USART_1, AF0),
];

pub const UART_RX: &[PinMap<Uart, PinData>] = &[
    PinMap::new(PA10, USART_1, AF1),
    PinMap::new(PB7, USART_1, AF0),
];

pub const SPI_SCLK: &[PinMap<Spi, PinData>] = &[
    PinMap::new(PA5, SPI_1, AF0),
    PinMap::new(PB3, SPI_1, AF0),
    PinMap::new(PB13, SPI_2, AF0),
    PinMap::new(PB13, SPI_1, AF0),
];

pub const SPI_MOSI: &[PinMap<Spi, PinData>] = &[
    PinMap::new(PA7, SPI_1, AF0),
    PinMap::new(PB5, SPI_1, AF0),
    PinMap::new(PB15, SPI_2, AF0),
    PinMap::new(PB15, SPI_1, AF0),
];

pub const SPI_MISO: &[PinMap<Spi, PinData>] = &[
    PinMap::new(PA6, SPI_1, AF0),
    PinMap::new(PB4, SPI_1, AF0),
    PinMap::new(PB14, SPI_2, AF0),
    PinMap::new(PB14, SPI_1, AF0),
];

pub const SPI_SSEL: &[PinMap<Spi, PinData>] = &[
    PinMap::new(PA4, SPI_1, AF0),
    PinMap::new(PA15, SPI_1, AF0),
    PinMap::new(PB12, SPI_2, AF0),
    PinMap::new(PB12, SPI_1, AF0),
];

pub const PWM_OUT: &[PinMap<TimChannel, PinData>] = &[
    PinMap::new(PA4, TIM_14_1, AF4),
    PinMap::new(PA6, TIM_16_1, AF5),
    PinMap::new(PA7, TIM_17_1, AF5),
    PinMap::new(PA8, TIM_1_1, AF2),
    PinMap::new(PA9, TIM_1_2, AF2),
    PinMap::new(PA10, TIM_1_3, AF2),
    PinMap::new(PA11, TIM_1_4, AF2),
    PinMap::new(PB1, TIM_3_4, AF1),
];
