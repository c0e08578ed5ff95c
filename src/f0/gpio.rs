//! # GPIO configuration
//!
//! F0 pins are configured through separate per-pin fields in MODER, OTYPER,
//! OSPEEDR, PUPDR and AFRL/AFRH. A [`PinData`] packs the values for one pin:
//!
//! | bits  | field                      |
//! |-------|----------------------------|
//! | 1:0   | MODER                      |
//! | 2     | OTYPER (open-drain)        |
//! | 4:3   | PUPDR                      |
//! | 11:8  | alternate function number  |

use crate::bus::{Bank, RegisterBus};
use crate::gpio::PortIo;
use crate::pin::{Pin, Port};
use crate::pinmap::{Configurator, PinMode};
use crate::rcc::{BusClock, Enable};

const MODER: u32 = 0x00;
const OTYPER: u32 = 0x04;
const OSPEEDR: u32 = 0x08;
const PUPDR: u32 = 0x0C;
const IDR: u32 = 0x10;
const ODR: u32 = 0x14;
const BSRR: u32 = 0x18;
const AFRL: u32 = 0x20;
const AFRH: u32 = 0x24;

const OSPEED_HIGH: u32 = 0b11;

/// Port mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Moder {
    Input = 0b00,
    Output = 0b01,
    Alternate = 0b10,
    Analog = 0b11,
}

impl Moder {
    const fn from_bits(bits: u16) -> Self {
        match bits & 0b11 {
            0b00 => Moder::Input,
            0b01 => Moder::Output,
            0b10 => Moder::Alternate,
            _ => Moder::Analog,
        }
    }
}

/// Pull-up/pull-down selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Pull {
    None = 0b00,
    Up = 0b01,
    Down = 0b10,
}

impl Pull {
    const fn from_bits(bits: u16) -> Self {
        match bits & 0b11 {
            0b01 => Pull::Up,
            0b10 => Pull::Down,
            _ => Pull::None,
        }
    }
}

/// Pin configuration code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinData(u16);

impl PinData {
    pub const ANALOG: Self = Self::new(Moder::Analog, false, Pull::None, 0);
    pub const INPUT_PULL_DOWN: Self = Self::new(Moder::Input, false, Pull::Down, 0);
    pub const OUTPUT_PUSH_PULL: Self = Self::new(Moder::Output, false, Pull::None, 0);

    pub const fn new(mode: Moder, open_drain: bool, pull: Pull, af: u8) -> Self {
        Self(mode as u16 | (open_drain as u16) << 2 | (pull as u16) << 3 | ((af & 0xF) as u16) << 8)
    }

    /// Push-pull alternate function `af`
    pub const fn alternate(af: u8) -> Self {
        Self::new(Moder::Alternate, false, Pull::None, af)
    }

    #[inline(always)]
    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn mode(self) -> Moder {
        Moder::from_bits(self.0)
    }

    pub const fn is_open_drain(self) -> bool {
        self.0 & (1 << 2) != 0
    }

    pub const fn pull(self) -> Pull {
        Pull::from_bits(self.0 >> 3)
    }

    /// Alternate function number
    pub const fn af(self) -> u8 {
        ((self.0 >> 8) & 0xF) as u8
    }
}

/// GPIO port register bank
pub const fn port(port: Port) -> Bank {
    Bank::new(0x4800_0000 + ((port as u32) << 10))
}

/// Port clock enable (IOPxEN)
pub const fn port_enable(port: Port) -> Enable {
    Enable::new(BusClock::Ahb, port as u8 + 17)
}

/// GPIO configurator for the F0 family
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

    fn afr(pin: Pin) -> (u32, u32) {
        let bank = port(pin.port());
        let index = pin.index() as u32;
        if index < 8 {
            (bank.reg(AFRL), index * 4)
        } else {
            (bank.reg(AFRH), (index - 8) * 4)
        }
    }
}

impl<B: RegisterBus> Configurator for Gpio<B> {
    type Function = PinData;

    fn pin_function(&mut self, pin: Pin, function: PinData) {
        let bank = port(pin.port());
        let i = pin.index() as u32;
        let mode = function.mode();

        let (afr, offset) = Self::afr(pin);
        self.bus.write_field(afr, offset, 4, function.af() as u32);
        if matches!(mode, Moder::Output | Moder::Alternate) {
            self.bus.write_field(bank.reg(OSPEEDR), i * 2, 2, OSPEED_HIGH);
        }
        self.bus
            .write_field(bank.reg(OTYPER), i, 1, function.is_open_drain() as u32);
        self.bus
            .write_field(bank.reg(PUPDR), i * 2, 2, function.pull() as u32);
        self.bus.write_field(bank.reg(MODER), i * 2, 2, mode as u32);
    }

    fn pin_mode(&mut self, pin: Pin, mode: PinMode) {
        let bank = port(pin.port());
        let i = pin.index() as u32;
        let moder = Moder::from_bits(self.bus.read_field(bank.reg(MODER), i * 2, 2) as u16);

        let pull = match mode {
            PinMode::PullNone => Pull::None,
            PinMode::PullUp => Pull::Up,
            PinMode::PullDown => Pull::Down,
            PinMode::OpenDrain => {
                if matches!(moder, Moder::Output | Moder::Alternate) {
                    self.bus.set_bits(bank.reg(OTYPER), pin.mask());
                }
                return;
            }
            PinMode::PullDefault => return,
        };
        // Pull resistors are disconnected in analog mode
        if moder != Moder::Analog {
            self.bus.write_field(bank.reg(PUPDR), i * 2, 2, pull as u32);
        }
    }

    fn function(&self, pin: Pin) -> PinData {
        let bank = port(pin.port());
        let i = pin.index() as u32;
        let (afr, offset) = Self::afr(pin);
        let mode = self.bus.read_field(bank.reg(MODER), i * 2, 2);
        let od = self.bus.read_field(bank.reg(OTYPER), i, 1);
        let pull = self.bus.read_field(bank.reg(PUPDR), i * 2, 2);
        let af = self.bus.read_field(afr, offset, 4);
        PinData((mode | od << 2 | pull << 3 | af << 8) as u16)
    }
}

impl<B: RegisterBus> PortIo for Gpio<B> {
    type Bus = B;

    const INPUT: PinData = PinData::INPUT_PULL_DOWN;
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
