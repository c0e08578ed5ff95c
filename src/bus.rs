//! # Register access
//!
//! Everything in this crate reaches the hardware through a [`RegisterBus`]: a
//! word-wide read and write keyed by absolute register address. On the target
//! that is [`Mmio`], a thin volatile accessor. On the host it is whatever mock
//! the tests provide.
//!
//! Register banks are named by their base address, wrapped in a [`Bank`]. The
//! same value is used as the routing key in the pin maps and as the handle a
//! driver uses to program the peripheral afterwards.

use core::num::NonZeroU32;

use vcell::VolatileCell;

/// Base address of one peripheral register bank
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bank(NonZeroU32);

impl Bank {
    /// Wraps a register-bank base address
    ///
    /// Panics (at compile time when used in a `const`) on address zero.
    pub const fn new(base: u32) -> Self {
        match NonZeroU32::new(base) {
            Some(base) => Self(base),
            None => panic!("register bank at address 0"),
        }
    }

    /// Base address
    #[inline(always)]
    pub const fn base(self) -> u32 {
        self.0.get()
    }

    /// Address of the register at `offset` within this bank
    #[inline(always)]
    pub const fn reg(self, offset: u32) -> u32 {
        self.0.get() + offset
    }
}

/// Word access to memory-mapped registers
///
/// Methods take `&self`: registers are shared, interior-mutable state, and an
/// interrupt handler may hold its own handle to the same bus.
pub trait RegisterBus {
    /// Reads the 32-bit register at `addr`
    fn read(&self, addr: u32) -> u32;

    /// Writes the 32-bit register at `addr`
    fn write(&self, addr: u32, value: u32);

    /// Read-modify-write
    #[inline(always)]
    fn modify<F>(&self, addr: u32, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(addr);
        self.write(addr, f(value));
    }

    /// Sets the bits of `mask`, leaving the others untouched
    #[inline(always)]
    fn set_bits(&self, addr: u32, mask: u32) {
        self.modify(addr, |r| r | mask);
    }

    /// Clears the bits of `mask`, leaving the others untouched
    #[inline(always)]
    fn clear_bits(&self, addr: u32, mask: u32) {
        self.modify(addr, |r| r & !mask);
    }

    /// Replaces the `width`-bit field at bit `offset` with `value`
    #[inline(always)]
    fn write_field(&self, addr: u32, offset: u32, width: u32, value: u32) {
        let mask = ((1 << width) - 1) << offset;
        self.modify(addr, |r| (r & !mask) | ((value << offset) & mask));
    }

    /// Reads the `width`-bit field at bit `offset`
    #[inline(always)]
    fn read_field(&self, addr: u32, offset: u32, width: u32) -> u32 {
        (self.read(addr) >> offset) & ((1 << width) - 1)
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &B {
    #[inline(always)]
    fn read(&self, addr: u32) -> u32 {
        (**self).read(addr)
    }

    #[inline(always)]
    fn write(&self, addr: u32, value: u32) {
        (**self).write(addr, value)
    }
}

/// The memory-mapped peripheral bus
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct Mmio;

impl Mmio {
    /// Creates a handle to the peripheral address space
    ///
    /// # Safety
    ///
    /// Every address handed to this bus is dereferenced. Only use it on the
    /// chip family whose register map the caller's addresses come from, and
    /// do not let two owners program the same bank at once.
    pub const unsafe fn steal() -> Self {
        Mmio
    }

    #[inline(always)]
    fn cell(addr: u32) -> &'static VolatileCell<u32> {
        // NOTE(unsafe) `Mmio` can only be created through `steal`, whose
        // caller vouches for the address map
        unsafe { &*(addr as usize as *const VolatileCell<u32>) }
    }
}

impl RegisterBus for Mmio {
    #[inline(always)]
    fn read(&self, addr: u32) -> u32 {
        Self::cell(addr).get()
    }

    #[inline(always)]
    fn write(&self, addr: u32, value: u32) {
        Self::cell(addr).set(value)
    }
}

/// Orders register writes before later accesses (clock enables in particular)
#[inline(always)]
pub(crate) fn barrier() {
    // Stall the pipeline to work around erratum 2.1.13 (DM00037591)
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    cortex_m::asm::dsb();
}


#[cfg(test)]
mod tests {
    use super::mock::MockBus;
    use super::*;

    #[test]
    fn bank_offsets() {
        const GPIOB: Bank = Bank::new(0x4001_0C00);
        assert_eq!(GPIOB.base(), 0x4001_0C00);
        assert_eq!(GPIOB.reg(0x04), 0x4001_0C04);
        assert_eq!(core::mem::size_of::<Option<Bank>>(), 4);
    }

    #[test]
    fn field_write_preserves_neighbours() {
        let bus = MockBus::new();
        bus.preset(0x100, 0xFFFF_FFFF);
        bus.write_field(0x100, 8, 4, 0b0101);
        assert_eq!(bus.peek(0x100), 0xFFFF_F5FF);
        assert_eq!(bus.read_field(0x100, 8, 4), 0b0101);

        bus.clear_bits(0x100, 0x1);
        bus.set_bits(0x100, 0x1 << 4 | 0x1 << 31);
        assert_eq!(bus.peek(0x100), 0xFFFF_F5FE);
    }

    #[test]
    fn scripted_reads_then_memory() {
        let bus = MockBus::new();
        bus.preset(0x24, 7);
        bus.script(0x24, &[1, 2]);
        assert_eq!(bus.read(0x24), 1);
        assert_eq!(bus.read(0x24), 2);
        assert_eq!(bus.read(0x24), 7);
        assert!(bus.writes().is_empty());
    }
}
