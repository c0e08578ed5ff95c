//! # STM32F1xx
//!
//! Pin configuration codes, GPIO configurator, pin maps, connect routines and
//! ticker wiring for the F1 family (F100/F101/F103/F105/F107).
//!
//! ```rust,no_run
//! use stm32_pinmap_hal::{bus::Mmio, f1, pin::*};
//!
//! let bus = unsafe { Mmio::steal() };
//! let spi = f1::connect::spi(&bus, PA7, PA6, PA5).unwrap();
//! assert_eq!(spi, f1::map::SPI_1);
//! ```

use crate::bus::Bank;
use crate::rcc::{BusClock, Enable};

pub mod connect;
pub mod gpio;
pub mod map;
pub mod ticker;

pub use gpio::{Gpio, IOPinSpeed, InputCnf, OutputCnf, PinData};

/// Alternate-function I/O and remap registers
pub const AFIO: Bank = Bank::new(0x4001_0000);
const AFIO_EN: Enable = Enable::new(BusClock::Apb2, 0);

/// AF remap and debug I/O configuration register
const MAPR: u32 = 0x04;
/// I2C1 remap bit; also frees PB6/PB7 for TIM4 channels 1 and 2
const MAPR_I2C1_REMAP: u32 = 1 << 1;
