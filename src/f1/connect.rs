//! Peripheral pin connection
//!
//! Each routine resolves every pin it is given to one unit first and returns
//! the error before any register is written. Only then are the clocks turned
//! on and the pins configured. The returned identity is the unit's register
//! bank, ready for the peripheral driver.

use crate::bus::{Bank, RegisterBus};
use crate::peripheral::{AdcChannel, Spi, TimChannel, Uart};
use crate::pin::{Pin, PB6, PB7};
use crate::pinmap::{self, Error, PinMode, Resolver};

use super::{gpio, map, Gpio, AFIO, AFIO_EN, MAPR, MAPR_I2C1_REMAP};

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

/// Connects a USART to `tx` and `rx`
///
/// Both pins end up pulled up, so an idle or unconnected line reads high.
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

    AFIO_EN.enable(bus);
    enable_bank(bus, uart.0);
    enable_ports(bus, &[tx, rx]);

    let mut gpio = Gpio::new(bus);
    pinmap::pinout(&mut gpio, tx, map::UART_TX)?;
    pinmap::pinout(&mut gpio, rx, map::UART_RX)?;
    pinmap::pin_mode(&mut gpio, tx, PinMode::PullUp);
    pinmap::pin_mode(&mut gpio, rx, PinMode::PullUp);
    Ok(uart)
}

/// Connects an SPI to its data and clock pins
pub fn spi<B: RegisterBus>(
    bus: &B,
    mosi: impl Into<Option<Pin>>,
    miso: impl Into<Option<Pin>>,
    sclk: impl Into<Option<Pin>>,
) -> Result<Spi, Error> {
    let (mosi, miso, sclk) = (mosi.into(), miso.into(), sclk.into());
    let spi = Resolver::new()
        .pin(mosi, map::SPI_MOSI)?
        .pin(miso, map::SPI_MISO)?
        .pin(sclk, map::SPI_SCLK)?
        .finish()?;

    AFIO_EN.enable(bus);
    enable_bank(bus, spi.0);
    enable_ports(bus, &[mosi, miso, sclk]);

    let mut gpio = Gpio::new(bus);
    pinmap::pinout(&mut gpio, mosi, map::SPI_MOSI)?;
    pinmap::pinout(&mut gpio, miso, map::SPI_MISO)?;
    pinmap::pinout(&mut gpio, sclk, map::SPI_SCLK)?;
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

    AFIO_EN.enable(bus);
    enable_bank(bus, pwm.tim);
    if pin == PB6 || pin == PB7 {
        bus.set_bits(AFIO.reg(MAPR), MAPR_I2C1_REMAP);
    }
    enable_ports(bus, &[Some(pin)]);
    pinmap::pinout(&mut Gpio::new(bus), pin, map::PWM_OUT)?;
    Ok(pwm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::MockBus;
    use crate::f1::PinData;
    use crate::pin::*;
    use crate::pinmap::Configurator;

    const APB1ENR: u32 = 0x4002_101C;
    const APB2ENR: u32 = 0x4002_1018;

    #[test]
    fn serial_on_usart1() {
        let bus = MockBus::new();
        assert_eq!(serial(&bus, PA9, PA10), Ok(map::USART_1));

        // AFIO, IOPA, USART1
        assert_eq!(bus.peek(APB2ENR), 1 << 0 | 1 << 2 | 1 << 14);
        let gpio = Gpio::new(&bus);
        // Pull-up leaves the alternate push-pull TX as it is
        assert_eq!(gpio.function(PA9), PinData::ALT_PUSH_PULL);
        assert_eq!(gpio.function(PA10), PinData::INPUT_PULL);
        assert_eq!(bus.peek(0x4001_080C), 1 << 10);
    }

    #[test]
    fn serial_rx_only() {
        let bus = MockBus::new();
        assert_eq!(serial(&bus, None, PA3), Ok(map::USART_2));
        assert_eq!(bus.peek(APB1ENR), 1 << 17);
    }

    #[test]
    fn serial_conflict_writes_nothing() {
        let bus = MockBus::new();
        assert_eq!(
            serial(&bus, PA9, PA3),
            Err(Error::Conflict {
                peripheral: "Serial"
            })
        );
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn spi_unmapped_pin_writes_nothing() {
        let bus = MockBus::new();
        assert_eq!(
            spi(&bus, PA7, PA6, PB3),
            Err(Error::PinNotMapped {
                pin: PB3,
                peripheral: "SPI"
            })
        );
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn spi2_without_miso() {
        let bus = MockBus::new();
        assert_eq!(spi(&bus, PB15, None, PB13), Ok(map::SPI_2));
        assert_eq!(bus.peek(APB1ENR), 1 << 14);
        let gpio = Gpio::new(&bus);
        assert_eq!(gpio.function(PB13), PinData::ALT_PUSH_PULL);
        assert_eq!(gpio.function(PB15), PinData::ALT_PUSH_PULL);
    }

    #[test]
    fn analog_input() {
        let bus = MockBus::new();
        bus.preset(0x4001_1000, 0x4444_4444);
        let adc = analog(&bus, PC2).unwrap();
        assert_eq!(adc.channel, 12);
        assert_eq!(bus.peek(0x4001_1000), 0x4444_4044);
        assert_eq!(bus.peek(APB2ENR), 1 << 9 | 1 << 4);
    }

    #[test]
    fn pwm_on_pb6_remaps_i2c1() {
        let bus = MockBus::new();
        assert_eq!(pwm(&bus, PB6), Ok(map::PWM_1));
        assert_eq!(bus.peek(0x4001_0004), 1 << 1);
        assert_eq!(bus.peek(APB1ENR), 1 << 2);

        let bus = MockBus::new();
        assert_eq!(pwm(&bus, PB9), Ok(map::PWM_4));
        assert_eq!(bus.peek(0x4001_0004), 0);
    }

    #[test]
    fn pwm_requires_a_mapped_pin() {
        let bus = MockBus::new();
        assert!(pwm(&bus, PA0).is_err());
        assert!(bus.writes().is_empty());
    }
}
