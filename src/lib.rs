//! # Pin routing and microsecond ticker for STM32F0/F1
//!
//! This crate holds the two pieces of an STM32 target port that are more
//! than register plumbing:
//!
//! - [`pinmap`]: turning the pins a driver was given into the one peripheral
//!   unit they are all wired to, and programming those pins' GPIO
//!   configuration from per-chip tables.
//! - [`ticker`]: a free-running 32-bit microsecond clock assembled from 16-bit
//!   timers, cascaded in hardware or extended by an overflow interrupt.
//!
//! Chip data lives in [`f1`] (STM32F1xx) and [`f0`] (STM32F030). Both are
//! always built; enabling a chip feature additionally re-exports the matching
//! family as `target`.
//!
//! ```toml
//! [dependencies.stm32-pinmap-hal]
//! version = "0.1.0"
//! features = ["stm32f103"]
//! ```
//!
//! ## Usage example
//!
//! ```rust,no_run
//! use stm32_pinmap_hal::{bus::Mmio, f1, fugit::HertzU32, pin::*};
//!
//! // NOTE(unsafe) the F1 register map is the one being accessed
//! let bus = unsafe { Mmio::steal() };
//!
//! // Both pins must reach the same USART, or nothing is touched
//! let uart = f1::connect::serial(&bus, PA9, PA10).unwrap();
//!
//! let mut ticker = f1::ticker::ticker(bus, HertzU32::MHz(72));
//! let t0 = ticker.read();
//! # let _ = (uart, t0);
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

macro_rules! error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::error!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
    }};
}

pub use embedded_hal as hal;
pub use embedded_hal_02 as hal_02;
pub use fugit;

#[cfg(all(feature = "stm32f1", not(feature = "stm32f0")))]
pub use crate::f1 as target;

#[cfg(all(feature = "stm32f0", not(feature = "stm32f1")))]
pub use crate::f0 as target;

pub mod bus;
pub mod f0;
pub mod f1;
pub mod gpio;
pub mod peripheral;
pub mod pin;
pub mod pinmap;
pub mod prelude;
pub mod rcc;
pub mod ticker;
pub mod timer;
