//! Pin maps and peripheral identities of the STM32F1xx

use crate::bus::Bank;
use crate::peripheral::{AdcChannel, Channel, Spi, TimChannel, Uart};
use crate::pin::*;
use crate::pinmap::PinMap;
use crate::rcc::{BusClock, Enable};

use super::PinData;

pub const ADC_1: Bank = Bank::new(0x4001_2400);
pub const TIM_2: Bank = Bank::new(0x4000_0000);
pub const TIM_3: Bank = Bank::new(0x4000_0400);
pub const TIM_4: Bank = Bank::new(0x4000_0800);

pub const USART_1: Uart = Uart(Bank::new(0x4001_3800));
pub const USART_2: Uart = Uart(Bank::new(0x4000_4400));

pub const SPI_1: Spi = Spi(Bank::new(0x4001_3000));
pub const SPI_2: Spi = Spi(Bank::new(0x4000_3800));

pub const PWM_1: TimChannel = TimChannel::new(TIM_4, Channel::C1);
pub const PWM_2: TimChannel = TimChannel::new(TIM_4, Channel::C2);
pub const PWM_3: TimChannel = TimChannel::new(TIM_4, Channel::C3);
pub const PWM_4: TimChannel = TimChannel::new(TIM_4, Channel::C4);

const fn adc(channel: u8) -> AdcChannel {
    AdcChannel::new(ADC_1, channel)
}

/// Clock enable bit of every register bank the tables route to
const ENABLES: &[(Bank, Enable)] = &[
    (ADC_1, Enable::new(BusClock::Apb2, 9)),
    (USART_1.0, Enable::new(BusClock::Apb2, 14)),
    (USART_2.0, Enable::new(BusClock::Apb1, 17)),
    (SPI_1.0, Enable::new(BusClock::Apb2, 12)),
    (SPI_2.0, Enable::new(BusClock::Apb1, 14)),
    (TIM_2, Enable::new(BusClock::Apb1, 0)),
    (TIM_3, Enable::new(BusClock::Apb1, 1)),
    (TIM_4, Enable::new(BusClock::Apb1, 2)),
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
    PinMap::new(PA9, USART_1, PinData::ALT_PUSH_PULL),
    PinMap::new(PA2, USART_2, PinData::ALT_PUSH_PULL),
];

pub const UART_RX: &[PinMap<Uart, PinData>] = &[
    PinMap::new(PA10, USART_1, PinData::INPUT_FLOATING),
    PinMap::new(PA3, USART_2, PinData::INPUT_FLOATING),
];

pub const SPI_SCLK: &[PinMap<Spi, PinData>] = &[
    PinMap::new(PA5, SPI_1, PinData::ALT_PUSH_PULL),
    PinMap::new(PB13, SPI_2, PinData::ALT_PUSH_PULL),
];

pub const SPI_MOSI: &[PinMap<Spi, PinData>] = &[
    PinMap::new(PA7, SPI_1, PinData::ALT_PUSH_PULL),
    PinMap::new(PB15, SPI_2, PinData::ALT_PUSH_PULL),
];

pub const SPI_MISO: &[PinMap<Spi, PinData>] = &[
    PinMap::new(PA6, SPI_1, PinData::INPUT_FLOATING),
    PinMap::new(PB14, SPI_2, PinData::INPUT_FLOATING),
];

pub const PWM_OUT: &[PinMap<TimChannel, PinData>] = &[
    PinMap::new(PB6, PWM_1, PinData::ALT_PUSH_PULL),
    PinMap::new(PB7, PWM_2, PinData::ALT_PUSH_PULL),
    PinMap::new(PB8, PWM_3, PinData::ALT_PUSH_PULL),
    PinMap::new(PB9, PWM_4, PinData::ALT_PUSH_PULL),
];
