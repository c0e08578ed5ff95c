//! # STM32F030
//!
//! Pin configuration codes, GPIO configurator, pin maps, connect routines and
//! ticker wiring for the STM32F030.

pub mod connect;
pub mod gpio;
pub mod map;
pub mod ticker;

pub use gpio::{Gpio, Moder, PinData, Pull};
