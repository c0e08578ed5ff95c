//! # Pins
//!
//! A [`Pin`] names one GPIO line by port and bit index, packed into a byte as
//! `port << 4 | index`. "Not connected" is `None` wherever a pin is optional,
//! so every API that accepts a pin role that may be left unconnected takes
//! `impl Into<Option<Pin>>`.

use core::fmt;

/// GPIO port
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Port {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
}

impl Port {
    const ALL: [Port; 7] = [
        Port::A,
        Port::B,
        Port::C,
        Port::D,
        Port::E,
        Port::F,
        Port::G,
    ];

    /// Port number, `A` = 0
    #[inline(always)]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Port with number `index`
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::ALL.len() {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    fn letter(self) -> char {
        (b'A' + self.index()) as char
    }
}

/// One GPIO line
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(u8);

impl Pin {
    /// Pin `index` (0..=15) of `port`
    pub const fn new(port: Port, index: u8) -> Self {
        assert!(index < 16);
        Self((port as u8) << 4 | index)
    }

    /// Unpacks a `port << 4 | index` identifier
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match Port::from_index(raw >> 4) {
            Some(_) => Some(Self(raw)),
            None => None,
        }
    }

    /// Packed identifier
    #[inline(always)]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub fn port(self) -> Port {
        // `Pin` is only ever built from a valid `Port`
        Port::ALL[(self.0 >> 4) as usize]
    }

    /// Bit index within the port
    #[inline(always)]
    pub const fn index(self) -> u8 {
        self.0 & 0xF
    }

    /// Single-bit mask of this pin in the port's data registers
    #[inline(always)]
    pub const fn mask(self) -> u32 {
        1 << self.index()
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port().letter(), self.index())
    }
}

macro_rules! pins {
    ($($Port:ident => [$($PXi:ident: $i:literal,)+],)+) => {
        $(
            $(
                #[doc = concat!("Pin ", stringify!($PXi))]
                pub const $PXi: Pin = Pin::new(Port::$Port, $i);
            )+
        )+
    };
}

pins! {
    A => [
        PA0: 0,
        PA1: 1,
        PA2: 2,
        PA3: 3,
        PA4: 4,
        PA5: 5,
        PA6: 6,
        PA7: 7,
        PA8: 8,
        PA9: 9,
        PA10: 10,
        PA11: 11,
        PA12: 12,
        PA13: 13,
        PA14: 14,
        PA15: 15,
    ],
    B => [
        PB0: 0,
        PB1: 1,
        PB2: 2,
        PB3: 3,
        PB4: 4,
        PB5: 5,
        PB6: 6,
        PB7: 7,
        PB8: 8,
        PB9: 9,
        PB10: 10,
        PB11: 11,
        PB12: 12,
        PB13: 13,
        PB14: 14,
        PB15: 15,
    ],
    C => [
        PC0: 0,
        PC1: 1,
        PC2: 2,
        PC3: 3,
        PC4: 4,
        PC5: 5,
        PC6: 6,
        PC7: 7,
        PC8: 8,
        PC9: 9,
        PC10: 10,
        PC11: 11,
        PC12: 12,
        PC13: 13,
        PC14: 14,
        PC15: 15,
    ],
    D => [
        PD0: 0,
        PD1: 1,
        PD2: 2,
        PD3: 3,
        PD4: 4,
        PD5: 5,
        PD6: 6,
        PD7: 7,
        PD8: 8,
        PD9: 9,
        PD10: 10,
        PD11: 11,
        PD12: 12,
        PD13: 13,
        PD14: 14,
        PD15: 15,
    ],
    E => [
        PE0: 0,
        PE1: 1,
        PE2: 2,
        PE3: 3,
        PE4: 4,
        PE5: 5,
        PE6: 6,
        PE7: 7,
        PE8: 8,
        PE9: 9,
        PE10: 10,
        PE11: 11,
        PE12: 12,
        PE13: 13,
        PE14: 14,
        PE15: 15,
    ],
    F => [
        PF0: 0,
        PF1: 1,
        PF2: 2,
        PF3: 3,
        PF4: 4,
        PF5: 5,
        PF6: 6,
        PF7: 7,
        PF8: 8,
        PF9: 9,
        PF10: 10,
        PF11: 11,
        PF12: 12,
        PF13: 13,
        PF14: 14,
        PF15: 15,
    ],
    G => [
        PG0: 0,
        PG1: 1,
        PG2: 2,
        PG3: 3,
        PG4: 4,
        PG5: 5,
        PG6: 6,
        PG7: 7,
        PG8: 8,
        PG9: 9,
        PG10: 10,
        PG11: 11,
        PG12: 12,
        PG13: 13,
        PG14: 14,
        PG15: 15,
    ],
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::format;

    #[test]
    fn packing() {
        assert_eq!(PA0.raw(), 0x00);
        assert_eq!(PB13.raw(), 0x1D);
        assert_eq!(PB13.port(), Port::B);
        assert_eq!(PB13.index(), 13);
        assert_eq!(PB13.mask(), 1 << 13);
        assert_eq!(PG15.raw() >> 4, 6);
        assert_eq!(Pin::from_raw(0x1D), Some(PB13));
        assert_eq!(Pin::from_raw(0x70), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", PA5), "PA5");
        assert_eq!(format!("{:?}", PC15), "PC15");
    }

    #[test]
    fn not_connected_is_distinct() {
        let nc: Option<Pin> = None;
        for raw in 0..0x70 {
            assert_ne!(Pin::from_raw(raw), nc);
        }
        assert_eq!(core::mem::size_of::<Option<Pin>>(), 2);
    }
}
