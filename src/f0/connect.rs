//! Peripheral pin connection
//!
//! Same contract as the F1 routines: every pin is resolved before any
//! register is written. The F0 has no AFIO block; alternate functions are
//! selected per pin through AFRL/AFRH.

use crate::bus::{Bank, RegisterBus};
use crate::peripheral::{AdcChannel, Spi, TimChannel, Uart};
use crate::pin::Pin;
use crate::pinmap::{self, Error, PinMode, Resolver};

use super::{gpio, map, Gpio};

fn enable_bank<B: RegisterBus>(bus: &B, bank: Bank) {
    match map::enable(bank) {
        Some(en) => en.enable(bus),
        None => debug!("no clock enable for bank {=u32:#x}", bank.base()),
    }
}

fn enable_ports<B: RegisterBus>(bus: &B, pins: &[Option<Pin>]) {
    for pin in pins.iter().flatten() {
        gpio::port_enable(pin.port()).enable(bus);
    }
}

/// Connects USART1 to `tx` and `rx`, both pulled up
pub fn serial<B: RegisterBus>(
    bus: &B,
    tx: impl Into<Option<Pin>>,
    rx: impl Into<Option<Pin>>,
) -> Result<Uart, Error> {
    let (tx, rx) = (tx.into(), rx.into());
    let uart = Resolver::new()
        .pin(tx, map::UART_TX)?
        .pin(rx, map::UART_RX)?
        .finish()?;

    enable_bank(bus, uart.0);
    enable_ports(bus, &[tx, rx]);

    let mut gpio = Gpio::new(bus);
    pinmap::pinout(&mut gpio, tx, map::UART_TX)?;
    pinmap::pinout(&mut gpio, rx, map::UART_RX)?;
    pinmap::pin_mode(&mut gpio, tx, PinMode::PullUp);
    pinmap::pin_mode(&mut gpio, rx, PinMode::PullUp);
    Ok(uart)
}

/// Connects an SPI to its data, clock and slave-select pins
pub fn spi<B: RegisterBus>(
    bus: &B,
    mosi: impl Into<Option<Pin>>,
    miso: impl Into<Option<Pin>>,
    sclk: impl Into<Option<Pin>>,
    ssel: impl Into<Option<Pin>>,
) -> Result<Spi, Error> {
    let (mosi, miso, sclk, ssel) = (mosi.into(), miso.into(), sclk.into(), ssel.into());
    let spi = Resolver::new()
        .pin(mosi, map::SPI_MOSI)?
        .pin(miso, map::SPI_MISO)?
        .pin(sclk, map::SPI_SCLK)?
        .pin(ssel, map::SPI_SSEL)?
        .finish()?;

    enable_bank(bus, spi.0);
    enable_ports(bus, &[mosi, miso, sclk, ssel]);

    let mut gpio = Gpio::new(bus);
    pinmap::pinout(&mut gpio, mosi, map::SPI_MOSI)?;
    pinmap::pinout(&mut gpio, miso, map::SPI_MISO)?;
    pinmap::pinout(&mut gpio, sclk, map::SPI_SCLK)?;
    pinmap::pinout(&mut gpio, ssel, map::SPI_SSEL)?;
    Ok(spi)
}

/// Connects an ADC input channel to `pin`
pub fn analog<B: RegisterBus>(bus: &B, pin: Pin) -> Result<AdcChannel, Error> {
    let adc = Resolver::new().pin(pin, map::ADC)?.finish()?;

    enable_bank(bus, adc.adc);
    enable_ports(bus, &[Some(pin)]);
    pinmap::pinout(&mut Gpio::new(bus), pin, map::ADC)?;
    Ok(adc)
}

/// Connects a timer output channel to `pin`
pub fn pwm<B: RegisterBus>(bus: &B, pin: Pin) -> Result<TimChannel, Error> {
    let pwm = Resolver::new().pin(pin, map::PWM_OUT)?.finish()?;

    enable_bank(bus, pwm.tim);
    enable_ports(bus, &[Some(pin)]);
    pinmap::pinout(&mut Gpio::new(bus), pin, map::PWM_OUT)?;
    Ok(pwm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::MockBus;
    use crate::f0::{Moder, PinData, Pull};
    use crate::pin::*;
    use crate::pinmap::Configurator;

    const AHBENR: u32 = 0x4002_1014;
    const APB2ENR: u32 = 0x4002_1018;
    const APB1ENR: u32 = 0x4002_101C;

    #[test]
    fn serial_on_usart1() {
        let bus = MockBus::new();
        assert_eq!(serial(&bus, PA9, PA10), Ok(map::USART_1));
        assert_eq!(bus.peek(APB2ENR), 1 << 14);
        assert_eq!(bus.peek(AHBENR), 1 << 17);

        let gpio = Gpio::new(&bus);
        let af1_up = PinData::new(Moder::Alternate, false, Pull::Up, 1);
        assert_eq!(gpio.function(PA9), af1_up);
        assert_eq!(gpio.function(PA10), af1_up);
        // AFRH
        assert_eq!(bus.peek(0x4800_0024), 0x0000_0110);
    }

    #[test]
    fn serial_on_port_b() {
        let bus = MockBus::new();
        assert_eq!(serial(&bus, PB6, PB7), Ok(map::USART_1));
        assert_eq!(bus.peek(AHBENR), 1 << 18);
        assert_eq!(bus.peek(0x4800_0420), 0);
        assert_eq!(bus.peek(0x4800_0400), 0b1010 << 12);
    }

    #[test]
    fn spi_with_slave_select() {
        let bus = MockBus::new();
        assert_eq!(spi(&bus, PA7, PA6, PA5, PA4), Ok(map::SPI_1));
        assert_eq!(bus.peek(APB2ENR), 1 << 12);
        let gpio = Gpio::new(&bus);
        for pin in [PA4, PA5, PA6, PA7] {
            assert_eq!(gpio.function(pin), PinData::alternate(0));
        }
    }

    #[test]
    fn spi2_on_shared_pins() {
        let bus = MockBus::new();
        assert_eq!(spi(&bus, PB15, PB14, PB13, None), Ok(map::SPI_2));
        assert_eq!(bus.peek(APB1ENR), 1 << 14);
        assert_eq!(bus.peek(APB2ENR), 0);
    }

    #[test]
    fn spi_conflict_writes_nothing() {
        let bus = MockBus::new();
        assert_eq!(
            spi(&bus, PB5, None, PB13, None),
            Err(Error::Conflict { peripheral: "SPI" })
        );
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn spi_without_pins_is_unconnected() {
        let bus = MockBus::new();
        assert_eq!(
            spi(&bus, None, None, None, None),
            Err(Error::Unconnected { peripheral: "SPI" })
        );
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn analog_input() {
        let bus = MockBus::new();
        let adc = analog(&bus, PC2).unwrap();
        assert_eq!(adc, AdcChannel::new(map::ADC_1, 12));
        assert_eq!(bus.peek(0x4800_0800), 0b11 << 4);
        assert_eq!(bus.peek(APB2ENR), 1 << 9);
        assert_eq!(bus.peek(AHBENR), 1 << 19);
    }

    #[test]
    fn pwm_on_tim3() {
        let bus = MockBus::new();
        assert_eq!(pwm(&bus, PB1), Ok(map::TIM_3_4));
        assert_eq!(bus.peek(APB1ENR), 1 << 1);
        // AFRL: AF1 for PB1
        assert_eq!(bus.peek(0x4800_0420), 1 << 4);
    }

    #[test]
    fn pwm_unmapped_pin_writes_nothing() {
        let bus = MockBus::new();
        assert_eq!(
            pwm(&bus, PA0),
            Err(Error::PinNotMapped {
                pin: PA0,
                peripheral: "PWM"
            })
        );
        assert!(bus.writes().is_empty());
    }
}
