//! # Pin maps
//!
//! Every peripheral role on a chip (SPI clock, UART receive, ADC input, ...)
//! has a static table of the pins that can serve it, the unit each pin
//! reaches and the pin configuration that connects it. A driver resolves each
//! of its pins through the table of its role, merges the answers into one
//! unit, and only then touches any register:
//!
//! ```rust
//! use stm32_pinmap_hal::{f0::map, pin::*, pinmap::Resolver};
//!
//! let spi = Resolver::new()
//!     .pin(PB5, map::SPI_MOSI)?
//!     .pin(None, map::SPI_MISO)?
//!     .pin(PA5, map::SPI_SCLK)?
//!     .finish()?;
//! assert_eq!(spi, map::SPI_1);
//! # Ok::<(), stm32_pinmap_hal::pinmap::Error>(())
//! ```
//!
//! A table may list one pin more than once. Lookup takes the first row, so
//! the order of the rows is the preference among candidate units.

use core::fmt;

use crate::peripheral::Peripheral;
use crate::pin::Pin;

/// One row of a pin map
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinMap<P, F> {
    pub pin: Pin,
    pub peripheral: P,
    pub function: F,
}

impl<P, F> PinMap<P, F> {
    pub const fn new(pin: Pin, peripheral: P, function: F) -> Self {
        Self {
            pin,
            peripheral,
            function,
        }
    }
}

/// Pin-routing failure
///
/// All of these are configuration errors: the requested wiring cannot exist on
/// this chip, so the peripheral must not be initialised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The pin cannot serve the requested role
    PinNotMapped {
        pin: Pin,
        peripheral: &'static str,
    },
    /// Pins of one peripheral resolved to different units
    Conflict { peripheral: &'static str },
    /// No pin of the peripheral is connected
    Unconnected { peripheral: &'static str },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PinNotMapped { pin, peripheral } => {
                write!(f, "{peripheral} pinout mapping failed: {pin} has no such function")
            }
            Error::Conflict { peripheral } => {
                write!(f, "{peripheral} pinout mapping failed: pins belong to different units")
            }
            Error::Unconnected { peripheral } => {
                write!(f, "{peripheral} pinout mapping failed: no pin connected")
            }
        }
    }
}

/// Unit serving `pin` according to `map`
///
/// `None` when the pin is not connected or has no row in the map; the first
/// matching row wins.
pub fn peripheral<P: Copy, F>(pin: impl Into<Option<Pin>>, map: &[PinMap<P, F>]) -> Option<P> {
    let pin = pin.into()?;
    map.iter().find(|m| m.pin == pin).map(|m| m.peripheral)
}

/// Configuration code for `pin` according to `map` (first matching row)
pub fn function<P, F: Copy>(pin: Pin, map: &[PinMap<P, F>]) -> Option<F> {
    map.iter().find(|m| m.pin == pin).map(|m| m.function)
}

/// Reconciles the units two pins resolved to
///
/// A `None` side places no constraint. Equal units merge to themselves, and
/// two different units merge to `None`, which the caller must treat as a
/// failed mapping.
pub fn merge<P: PartialEq>(a: Option<P>, b: Option<P>) -> Option<P> {
    Resolution::from(a).merge(Resolution::from(b)).peripheral()
}

/// State of an N-pin resolution
///
/// Unlike the pairwise [`merge`], a conflict is kept once seen, so folding any
/// number of pins in any order gives the same answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution<P> {
    /// No connected pin seen yet
    Unconnected,
    /// All connected pins agree on this unit
    Peripheral(P),
    /// Two connected pins disagree
    Conflict,
}

impl<P: PartialEq> Resolution<P> {
    pub fn merge(self, other: Self) -> Self {
        use Resolution::*;
        match (self, other) {
            (Conflict, _) | (_, Conflict) => Conflict,
            (Unconnected, x) | (x, Unconnected) => x,
            (Peripheral(a), Peripheral(b)) => {
                if a == b {
                    Peripheral(a)
                } else {
                    Conflict
                }
            }
        }
    }

    /// The agreed unit, if any
    pub fn peripheral(self) -> Option<P> {
        match self {
            Resolution::Peripheral(p) => Some(p),
            _ => None,
        }
    }
}

impl<P> From<Option<P>> for Resolution<P> {
    fn from(p: Option<P>) -> Self {
        match p {
            Some(p) => Resolution::Peripheral(p),
            None => Resolution::Unconnected,
        }
    }
}

/// Resolves all pins of one peripheral to a single unit
#[derive(Clone, Copy, Debug)]
pub struct Resolver<P> {
    state: Resolution<P>,
}

impl<P: Peripheral> Default for Resolver<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Peripheral> Resolver<P> {
    pub fn new() -> Self {
        Self {
            state: Resolution::Unconnected,
        }
    }

    /// Adds one pin and the map of the role it plays
    ///
    /// A connected pin missing from `map` fails immediately.
    pub fn pin<F>(mut self, pin: impl Into<Option<Pin>>, map: &[PinMap<P, F>]) -> Result<Self, Error> {
        let pin = pin.into();
        let found = peripheral(pin, map);
        match (pin, found) {
            (Some(pin), None) => {
                error!("{=str} pinout mapping failed: {}", P::NAME, pin);
                Err(Error::PinNotMapped {
                    pin,
                    peripheral: P::NAME,
                })
            }
            _ => {
                self.state = self.state.merge(found.into());
                Ok(self)
            }
        }
    }

    /// Current resolution state
    pub fn state(&self) -> Resolution<P> {
        self.state
    }

    /// The unit every connected pin agreed on
    pub fn finish(self) -> Result<P, Error> {
        match self.state {
            Resolution::Peripheral(p) => Ok(p),
            Resolution::Conflict => {
                error!("{=str} pinout mapping failed: pins disagree", P::NAME);
                Err(Error::Conflict {
                    peripheral: P::NAME,
                })
            }
            Resolution::Unconnected => {
                error!("{=str} pinout mapping failed: no pins", P::NAME);
                Err(Error::Unconnected {
                    peripheral: P::NAME,
                })
            }
        }
    }
}

/// Pull and drive adjustments applied on top of a pin's configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    PullNone,
    PullUp,
    PullDown,
    OpenDrain,
    /// Keep whatever the pin has
    PullDefault,
}

/// Programs pin configurations into the GPIO registers of one chip family
pub trait Configurator {
    /// The family's configuration code
    type Function: Copy;

    /// Applies a full configuration code to `pin`
    fn pin_function(&mut self, pin: Pin, function: Self::Function);

    /// Adjusts pull/drive without changing the pin's base mode
    fn pin_mode(&mut self, pin: Pin, mode: PinMode);

    /// Decodes the configuration currently programmed for `pin`
    fn function(&self, pin: Pin) -> Self::Function;
}

/// Connects `pin` to the role described by `map`
///
/// Not connected is a no-op. A connected pin without a row in `map` is
/// reported and no register is written.
pub fn pinout<G, P>(gpio: &mut G, pin: impl Into<Option<Pin>>, map: &[PinMap<P, G::Function>]) -> Result<(), Error>
where
    G: Configurator,
    P: Peripheral,
{
    let Some(pin) = pin.into() else {
        return Ok(());
    };
    match function(pin, map) {
        Some(f) => {
            gpio.pin_function(pin, f);
            Ok(())
        }
        None => Err(Error::PinNotMapped {
            pin,
            peripheral: P::NAME,
        }),
    }
}

/// [`Configurator::pin_mode`] that accepts a not-connected pin
pub fn pin_mode<G: Configurator>(gpio: &mut G, pin: impl Into<Option<Pin>>, mode: PinMode) {
    if let Some(pin) = pin.into() {
        gpio.pin_mode(pin, mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Bank;
    use crate::peripheral::{AdcChannel, Spi};
    use crate::pin::*;
    use std::string::ToString;
    use std::vec::Vec;

    const ADC1: Bank = Bank::new(0x4001_2400);
    const ADC0_0: AdcChannel = AdcChannel::new(ADC1, 0);
    const ADC0_1: AdcChannel = AdcChannel::new(ADC1, 1);

    const ADC_MAP: &[PinMap<AdcChannel, u8>] = &[
        PinMap::new(PA0, ADC0_0, 0x1),
        PinMap::new(PA1, ADC0_1, 0x2),
    ];

    const SPI_1: Spi = Spi(Bank::new(0x4001_3000));
    const SPI_2: Spi = Spi(Bank::new(0x4000_3800));

    const SCLK: &[PinMap<Spi, u8>] = &[
        PinMap::new(PA5, SPI_1, 0),
        PinMap::new(PB13, SPI_2, 0),
        PinMap::new(PB13, SPI_1, 0),
    ];
    const MOSI: &[PinMap<Spi, u8>] = &[
        PinMap::new(PA7, SPI_1, 0),
        PinMap::new(PB5, SPI_1, 0),
        PinMap::new(PB15, SPI_2, 0),
    ];

    #[test]
    fn lookup_scenario() {
        assert_eq!(peripheral(PA0, ADC_MAP), Some(ADC0_0));
        assert_eq!(peripheral(PA1, ADC_MAP), Some(ADC0_1));
        assert_eq!(peripheral(PA5, ADC_MAP), None);
        assert_eq!(peripheral(None, ADC_MAP), None);
        assert_eq!(function(PA1, ADC_MAP), Some(0x2));
        assert_eq!(function(PA5, ADC_MAP), None);
    }

    #[test]
    fn first_row_wins() {
        assert_eq!(peripheral(PB13, SCLK), Some(SPI_2));
    }

    #[test]
    fn absent_pins_resolve_to_none() {
        for raw in 0..0x70 {
            let pin = Pin::from_raw(raw).unwrap();
            let listed = ADC_MAP.iter().any(|m| m.pin == pin);
            assert_eq!(peripheral(pin, ADC_MAP).is_some(), listed);
        }
    }

    #[test]
    fn merge_laws() {
        let values = [None, Some(SPI_1), Some(SPI_2)];
        for &x in &values {
            assert_eq!(merge(None, x), x);
            assert_eq!(merge(x, None), x);
            assert_eq!(merge(x, x), x);
            for &y in &values {
                assert_eq!(merge(x, y), merge(y, x));
                if x.is_some() && y.is_some() && x != y {
                    assert_eq!(merge(x, y), None);
                }
            }
        }
    }

    #[test]
    fn resolution_is_associative() {
        use Resolution::*;
        let values = [Unconnected, Peripheral(SPI_1), Peripheral(SPI_2), Conflict];
        for &a in &values {
            for &b in &values {
                assert_eq!(a.merge(b), b.merge(a));
                for &c in &values {
                    assert_eq!(a.merge(b).merge(c), a.merge(b.merge(c)));
                }
            }
        }
    }

    #[test]
    fn conflict_survives_later_pins() {
        // Pairwise merge forgets the conflict once it is folded with a third pin
        assert_eq!(merge(merge(Some(SPI_1), Some(SPI_2)), Some(SPI_1)), Some(SPI_1));

        let r = Resolver::new()
            .pin(PB15, MOSI)
            .and_then(|r| r.pin(PA5, SCLK))
            .and_then(|r| r.pin(PA7, MOSI))
            .unwrap();
        assert_eq!(r.state(), Resolution::Conflict);
        assert_eq!(r.finish(), Err(Error::Conflict { peripheral: "SPI" }));
    }

    #[test]
    fn resolver_agrees() {
        let spi = Resolver::new()
            .pin(PB5, MOSI)
            .and_then(|r| r.pin(PA5, SCLK))
            .and_then(|r| r.pin(None, SCLK))
            .and_then(|r| r.finish());
        assert_eq!(spi, Ok(SPI_1));
    }

    #[test]
    fn resolver_conflict() {
        let spi = Resolver::new()
            .pin(PB5, MOSI)
            .and_then(|r| r.pin(PB13, SCLK))
            .and_then(|r| r.finish());
        assert_eq!(spi, Err(Error::Conflict { peripheral: "SPI" }));
    }

    #[test]
    fn resolver_unmapped_and_unconnected() {
        let r = Resolver::<Spi>::new().pin(PC0, SCLK);
        assert_eq!(
            r.unwrap_err(),
            Error::PinNotMapped {
                pin: PC0,
                peripheral: "SPI"
            }
        );

        let r = Resolver::<Spi>::new()
            .pin(None, SCLK)
            .and_then(|r| r.pin(None, MOSI))
            .and_then(|r| r.finish());
        assert_eq!(r, Err(Error::Unconnected { peripheral: "SPI" }));
    }

    #[test]
    fn error_messages() {
        let e = Error::PinNotMapped {
            pin: PC0,
            peripheral: "SPI",
        };
        assert_eq!(e.to_string(), "SPI pinout mapping failed: PC0 has no such function");
        let e = Error::Conflict { peripheral: "Serial" };
        assert!(e.to_string().starts_with("Serial pinout mapping failed"));
    }

    /// Records configuration calls instead of writing registers
    #[derive(Default)]
    struct Recorder {
        functions: Vec<(Pin, u8)>,
        modes: Vec<(Pin, PinMode)>,
    }

    impl Configurator for Recorder {
        type Function = u8;

        fn pin_function(&mut self, pin: Pin, function: u8) {
            self.functions.push((pin, function));
        }

        fn pin_mode(&mut self, pin: Pin, mode: PinMode) {
            self.modes.push((pin, mode));
        }

        fn function(&self, pin: Pin) -> u8 {
            self.functions
                .iter()
                .rev()
                .find(|(p, _)| *p == pin)
                .map_or(0, |(_, f)| *f)
        }
    }

    #[test]
    fn pinout_applies_table_code() {
        let mut gpio = Recorder::default();
        pinout(&mut gpio, PA1, ADC_MAP).unwrap();
        assert_eq!(gpio.functions, [(PA1, 0x2)]);
        assert_eq!(gpio.function(PA1), 0x2);
    }

    #[test]
    fn not_connected_is_a_no_op() {
        let mut gpio = Recorder::default();
        pinout(&mut gpio, None, ADC_MAP).unwrap();
        pin_mode(&mut gpio, None, PinMode::PullUp);
        assert!(gpio.functions.is_empty());
        assert!(gpio.modes.is_empty());
    }

    #[test]
    fn pinout_unmapped_pin_writes_nothing() {
        let mut gpio = Recorder::default();
        assert_eq!(
            pinout(&mut gpio, PB0, ADC_MAP),
            Err(Error::PinNotMapped {
                pin: PB0,
                peripheral: "ADC"
            })
        );
        assert!(gpio.functions.is_empty());
    }
}
