//! # GPIO configuration
//!
//! Each F1 pin is configured by one nibble in CRL (pins 0-7) or CRH (pins
//! 8-15): MODE in the low two bits (input, or output at a slew rate), CNF in
//! the high two. A [`PinData`] is that nibble.

use crate::bus::{Bank, RegisterBus};
use crate::gpio::PortIo;
use crate::pin::{Pin, Port};
use crate::pinmap::{Configurator, PinMode};
use crate::rcc::{BusClock, Enable};

const CRL: u32 = 0x00;
const CRH: u32 = 0x04;
const IDR: u32 = 0x08;
const ODR: u32 = 0x0C;
const BSRR: u32 = 0x10;

/// Slew rates available for Output and relevant AlternateMode Pins
///
/// See Table 21 "Output MODE bits" in the reference
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum IOPinSpeed {
    /// Slew at 10Mhz
    Mhz10 = 0b01, // (yes, this one is "less" then 2Mhz)
    /// Slew at 2Mhz
    Mhz2 = 0b10,
    /// Slew at 50Mhz
    Mhz50 = 0b11,
}

/// CNF of a pin in input mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum InputCnf {
    Analog = 0b00,
    Floating = 0b01,
    /// Pull-up or pull-down, selected by the ODR bit
    PullUpDown = 0b10,
}

/// CNF of a pin in output mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OutputCnf {
    PushPull = 0b00,
    OpenDrain = 0b01,
    AltPushPull = 0b10,
    AltOpenDrain = 0b11,
}

const MODE_INPUT: u8 = 0b00;
const CNF_ALT: u8 = 0b10;

/// Pin configuration code: `CNF << 2 | MODE`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinData(u8);

impl PinData {
    pub const ANALOG: Self = Self::input(InputCnf::Analog);
    pub const INPUT_FLOATING: Self = Self::input(InputCnf::Floating);
    pub const INPUT_PULL: Self = Self::input(InputCnf::PullUpDown);
    pub const OUTPUT_PUSH_PULL: Self = Self::output(IOPinSpeed::Mhz2, OutputCnf::PushPull);
    pub const ALT_PUSH_PULL: Self = Self::output(IOPinSpeed::Mhz50, OutputCnf::AltPushPull);

    pub const fn input(cnf: InputCnf) -> Self {
        Self((cnf as u8) << 2 | MODE_INPUT)
    }

    pub const fn output(speed: IOPinSpeed, cnf: OutputCnf) -> Self {
        Self((cnf as u8) << 2 | speed as u8)
    }

    /// Reads back a CRL/CRH nibble
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0xF)
    }

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// MODE field
    #[inline(always)]
    pub const fn mode(self) -> u8 {
        self.0 & 0b11
    }

    /// CNF field
    #[inline(always)]
    pub const fn cnf(self) -> u8 {
        self.0 >> 2
    }

    /// Output slew rate, `None` in input mode
    pub const fn speed(self) -> Option<IOPinSpeed> {
        match self.mode() {
            0b01 => Some(IOPinSpeed::Mhz10),
            0b10 => Some(IOPinSpeed::Mhz2),
            0b11 => Some(IOPinSpeed::Mhz50),
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn is_input(self) -> bool {
        self.mode() == MODE_INPUT
    }
}

/// GPIO port register bank
pub const fn port(port: Port) -> Bank {
    Bank::new(0x4001_0800 + ((port as u32) << 10))
}

/// Port clock enable (IOPxEN)
pub const fn port_enable(port: Port) -> Enable {
    Enable::new(BusClock::Apb2, port as u8 + 2)
}

/// Configuration register and bit offset of `pin`'s nibble
fn cr(pin: Pin) -> (u32, u32) {
    let bank = port(pin.port());
    let index = pin.index() as u32;
    if index < 8 {
        (bank.reg(CRL), index * 4)
    } else {
        (bank.reg(CRH), (index - 8) * 4)
    }
}

/// GPIO configurator for the F1 family
#[derive(Clone, Copy, Debug)]
pub struct Gpio<B> {
    bus: B,
}

impl<B: RegisterBus> Gpio<B> {
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: RegisterBus> Configurator for Gpio<B> {
    type Function = PinData;

    fn pin_function(&mut self, pin: Pin, function: PinData) {
        let (cr, offset) = cr(pin);
        self.bus.write_field(cr, offset, 4, function.bits() as u32);
    }

    fn pin_mode(&mut self, pin: Pin, mode: PinMode) {
        let (cr, offset) = cr(pin);
        let odr = port(pin.port()).reg(ODR);
        let orig = self.function(pin);

        let cnf = if orig.is_input() {
            match mode {
                PinMode::PullNone => InputCnf::Floating as u8,
                PinMode::PullUp => {
                    self.bus.set_bits(odr, pin.mask());
                    InputCnf::PullUpDown as u8
                }
                PinMode::PullDown => {
                    self.bus.clear_bits(odr, pin.mask());
                    InputCnf::PullUpDown as u8
                }
                PinMode::OpenDrain | PinMode::PullDefault => orig.cnf(),
            }
        } else {
            // Keep a pin owned by a peripheral in alternate mode
            let alt = orig.cnf() & CNF_ALT != 0;
            match (mode, alt) {
                (PinMode::OpenDrain, true) => OutputCnf::AltOpenDrain as u8,
                (PinMode::OpenDrain, false) => OutputCnf::OpenDrain as u8,
                (PinMode::PullUp | PinMode::PullDown, true) => OutputCnf::AltPushPull as u8,
                (PinMode::PullUp | PinMode::PullDown, false) => OutputCnf::PushPull as u8,
                (PinMode::PullNone | PinMode::PullDefault, _) => orig.cnf(),
            }
        };
        self.bus.write_field(cr, offset + 2, 2, cnf as u32);
    }

    fn function(&self, pin: Pin) -> PinData {
        let (cr, offset) = cr(pin);
        PinData::from_bits(self.bus.read_field(cr, offset, 4) as u8)
    }
}

impl<B: RegisterBus> PortIo for Gpio<B> {
    type Bus = B;

    const INPUT: PinData = PinData::INPUT_PULL;
    const OUTPUT: PinData = PinData::OUTPUT_PUSH_PULL;

    const IDR: u32 = IDR;
    const ODR: u32 = ODR;
    const BSRR: u32 = BSRR;

    fn bus(&self) -> &B {
        &self.bus
    }

    fn port(&self, port: Port) -> Bank {
        self::port(port)
    }

    fn enable_port(&self, port: Port) {
        port_enable(port).enable(&self.bus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::MockBus;
    use crate::f1::map;
    use crate::pin::*;

    const GPIOA_CRL: u32 = 0x4001_0800;
    const GPIOB_CRH: u32 = 0x4001_0C04;
    const GPIOA_ODR: u32 = 0x4001_080C;

    #[test]
    fn codes_match_the_tables() {
        assert_eq!(PinData::ALT_PUSH_PULL.bits(), 0xB);
        assert_eq!(PinData::INPUT_FLOATING.bits(), 0x4);
        assert_eq!(PinData::ANALOG.bits(), 0x0);
        assert_eq!(PinData::OUTPUT_PUSH_PULL.bits(), 0x2);
        assert_eq!(PinData::ALT_PUSH_PULL.speed(), Some(IOPinSpeed::Mhz50));
        assert_eq!(PinData::INPUT_PULL.speed(), None);
    }

    #[test]
    fn port_banks() {
        assert_eq!(port(Port::A).base(), 0x4001_0800);
        assert_eq!(port(Port::C).base(), 0x4001_1000);
        assert_eq!(port_enable(Port::B).enr(), 0x4002_1018);
        assert_eq!(port_enable(Port::B).bit, 3);
    }

    #[test]
    fn every_table_code_round_trips() {
        let codes = map::ADC
            .iter()
            .map(|m| (m.pin, m.function))
            .chain(map::UART_TX.iter().map(|m| (m.pin, m.function)))
            .chain(map::UART_RX.iter().map(|m| (m.pin, m.function)))
            .chain(map::SPI_SCLK.iter().map(|m| (m.pin, m.function)))
            .chain(map::SPI_MOSI.iter().map(|m| (m.pin, m.function)))
            .chain(map::SPI_MISO.iter().map(|m| (m.pin, m.function)))
            .chain(map::PWM_OUT.iter().map(|m| (m.pin, m.function)));
        for (pin, code) in codes {
            let bus = MockBus::new();
            let mut gpio = Gpio::new(&bus);
            gpio.pin_function(pin, code);
            let back = gpio.function(pin);
            assert_eq!(back, code, "{pin}");
            assert_eq!((back.mode(), back.cnf()), (code.mode(), code.cnf()));
        }
    }

    #[test]
    fn function_touches_one_nibble() {
        let bus = MockBus::new();
        bus.preset(GPIOA_CRL, 0x4444_4444);
        bus.preset(GPIOB_CRH, 0xFFFF_FFFF);
        let mut gpio = Gpio::new(&bus);

        gpio.pin_function(PA5, PinData::ALT_PUSH_PULL);
        assert_eq!(bus.peek(GPIOA_CRL), 0x44B4_4444);

        gpio.pin_function(PB13, PinData::ANALOG);
        assert_eq!(bus.peek(GPIOB_CRH), 0xFF0F_FFFF);
    }

    #[test]
    fn input_pulls() {
        let bus = MockBus::new();
        bus.preset(GPIOA_CRL, 0x4444_4444);
        bus.preset(GPIOA_ODR, 0x0000_0001);
        let mut gpio = Gpio::new(&bus);

        gpio.pin_mode(PA3, PinMode::PullUp);
        assert_eq!(gpio.function(PA3), PinData::INPUT_PULL);
        assert_eq!(bus.peek(GPIOA_ODR), 0x0000_0009);

        gpio.pin_mode(PA3, PinMode::PullDown);
        assert_eq!(gpio.function(PA3), PinData::INPUT_PULL);
        assert_eq!(bus.peek(GPIOA_ODR), 0x0000_0001);

        gpio.pin_mode(PA3, PinMode::PullNone);
        assert_eq!(gpio.function(PA3), PinData::INPUT_FLOATING);

        // Other pins untouched
        assert_eq!(bus.peek(GPIOA_CRL), 0x4444_4444);
    }

    #[test]
    fn output_drive_keeps_mode() {
        let bus = MockBus::new();
        let mut gpio = Gpio::new(&bus);

        gpio.pin_function(PA9, PinData::ALT_PUSH_PULL);
        gpio.pin_mode(PA9, PinMode::OpenDrain);
        assert_eq!(
            gpio.function(PA9),
            PinData::output(IOPinSpeed::Mhz50, OutputCnf::AltOpenDrain)
        );
        gpio.pin_mode(PA9, PinMode::PullUp);
        assert_eq!(gpio.function(PA9), PinData::ALT_PUSH_PULL);

        gpio.pin_function(PA8, PinData::OUTPUT_PUSH_PULL);
        gpio.pin_mode(PA8, PinMode::OpenDrain);
        assert_eq!(
            gpio.function(PA8),
            PinData::output(IOPinSpeed::Mhz2, OutputCnf::OpenDrain)
        );
        gpio.pin_mode(PA8, PinMode::PullNone);
        assert_eq!(
            gpio.function(PA8),
            PinData::output(IOPinSpeed::Mhz2, OutputCnf::OpenDrain)
        );
        // An output pin's pull request does not reach ODR
        assert_eq!(bus.peek(0x4001_080C), 0);
    }

    #[test]
    fn open_drain_ignored_on_inputs() {
        let bus = MockBus::new();
        let mut gpio = Gpio::new(&bus);
        gpio.pin_function(PB0, PinData::ANALOG);
        gpio.pin_mode(PB0, PinMode::OpenDrain);
        gpio.pin_mode(PB0, PinMode::PullDefault);
        assert_eq!(gpio.function(PB0), PinData::ANALOG);
    }
}
