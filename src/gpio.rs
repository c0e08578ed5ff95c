//! # General Purpose I/Os
//!
//! A [`DigitalPin`] drives or samples one GPIO line directly, without going
//! through a pin map. Its direction is chosen at runtime:
//!
//! - Input: pulled down, so an unconnected line reads low. The pull can be
//!   changed with [`DigitalPin::set_mode`].
//! - Output: push-pull, at the family's low slew rate.
//!
//! Output writes go through the atomic set/reset register, so pins of one
//! port can be owned by different drivers or interrupt handlers.
//!
//! ```rust,no_run
//! use stm32_pinmap_hal::{bus::Mmio, f0, gpio::{DigitalPin, Direction}, pin::PA5};
//!
//! let bus = unsafe { Mmio::steal() };
//! let mut led = DigitalPin::new(f0::Gpio::new(bus), PA5, Direction::Output);
//! led.set_high().unwrap();
//! ```

use crate::bus::{Bank, RegisterBus};
use crate::pin::{Pin, Port};
use crate::pinmap::{Configurator, PinMode};

mod hal_02;
mod hal_1;

/// Data-register access and plain digital configurations of one GPIO family
pub trait PortIo: Configurator {
    type Bus: RegisterBus;

    /// Pulled-down input
    const INPUT: Self::Function;
    /// Push-pull output
    const OUTPUT: Self::Function;

    /// Input data register offset
    const IDR: u32;
    /// Output data register offset
    const ODR: u32;
    /// Bit set/reset register offset
    const BSRR: u32;

    fn bus(&self) -> &Self::Bus;

    /// Register bank of `port`
    fn port(&self, port: Port) -> Bank;

    /// Turns on the clock of `port`
    fn enable_port(&self, port: Port);
}

/// Direction of a [`DigitalPin`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
}

/// Digital output pin state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    Low,
    High,
}

/// Tried to use a pin in the wrong direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinModeError {
    IncorrectMode,
}

/// One GPIO line with a runtime direction
pub struct DigitalPin<G> {
    gpio: G,
    pin: Pin,
    direction: Direction,
}

impl<G: PortIo> DigitalPin<G> {
    /// Enables the port clock and configures `pin` for `direction`
    pub fn new(gpio: G, pin: Pin, direction: Direction) -> Self {
        gpio.enable_port(pin.port());
        let mut this = Self {
            gpio,
            pin,
            direction,
        };
        this.set_direction(direction);
        this
    }

    pub fn pin(&self) -> Pin {
        self.pin
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        match direction {
            Direction::Input => {
                self.gpio.pin_function(self.pin, G::INPUT);
                self.gpio.pin_mode(self.pin, PinMode::PullDown);
            }
            Direction::Output => self.gpio.pin_function(self.pin, G::OUTPUT),
        }
        self.direction = direction;
    }

    /// Changes pull or drive, keeping the direction
    pub fn set_mode(&mut self, mode: PinMode) {
        self.gpio.pin_mode(self.pin, mode);
    }

    #[inline(always)]
    fn reg(&self, offset: u32) -> u32 {
        self.gpio.port(self.pin.port()).reg(offset)
    }

    fn _set_state(&mut self, state: PinState) {
        let mask = self.pin.mask();
        let bits = match state {
            PinState::High => mask,
            PinState::Low => mask << 16,
        };
        self.gpio.bus().write(self.reg(G::BSRR), bits);
    }

    fn _is_set_low(&self) -> bool {
        self.gpio.bus().read(self.reg(G::ODR)) & self.pin.mask() == 0
    }

    fn _is_low(&self) -> bool {
        self.gpio.bus().read(self.reg(G::IDR)) & self.pin.mask() == 0
    }

    pub fn set_state(&mut self, state: PinState) -> Result<(), PinModeError> {
        match self.direction {
            Direction::Output => {
                self._set_state(state);
                Ok(())
            }
            Direction::Input => Err(PinModeError::IncorrectMode),
        }
    }

    pub fn set_high(&mut self) -> Result<(), PinModeError> {
        self.set_state(PinState::High)
    }

    pub fn set_low(&mut self) -> Result<(), PinModeError> {
        self.set_state(PinState::Low)
    }

    pub fn toggle(&mut self) -> Result<(), PinModeError> {
        let state = if self.is_set_low()? {
            PinState::High
        } else {
            PinState::Low
        };
        self.set_state(state)
    }

    /// Level driven by the output latch
    pub fn is_set_low(&self) -> Result<bool, PinModeError> {
        match self.direction {
            Direction::Output => Ok(self._is_set_low()),
            Direction::Input => Err(PinModeError::IncorrectMode),
        }
    }

    pub fn is_set_high(&self) -> Result<bool, PinModeError> {
        self.is_set_low().map(|b| !b)
    }

    /// Level sampled on the input
    pub fn is_low(&self) -> Result<bool, PinModeError> {
        match self.direction {
            Direction::Input => Ok(self._is_low()),
            Direction::Output => Err(PinModeError::IncorrectMode),
        }
    }

    pub fn is_high(&self) -> Result<bool, PinModeError> {
        self.is_low().map(|b| !b)
    }

    /// Releases the configurator
    pub fn release(self) -> G {
        self.gpio
    }
}
