//! # Timer registers
//!
//! Register-level access to the general-purpose and basic timers shared by the
//! F0 and F1 families (TIM1-TIM17 keep one layout for the registers used
//! here). A [`Tim`] is a bank handle; every accessor takes the bus to go
//! through.

#![allow(non_upper_case_globals)]

use crate::bus::{Bank, RegisterBus};
use crate::peripheral::Channel;

const CR1: u32 = 0x00;
const CR2: u32 = 0x04;
const SMCR: u32 = 0x08;
const DIER: u32 = 0x0C;
const SR: u32 = 0x10;
const EGR: u32 = 0x14;
const CCMR1: u32 = 0x18;
const CCMR2: u32 = 0x1C;
const CCER: u32 = 0x20;
const CNT: u32 = 0x24;
const PSC: u32 = 0x28;
const ARR: u32 = 0x2C;
const CCR1: u32 = 0x34;
const CCR2: u32 = 0x38;
const CCR3: u32 = 0x3C;
const CCR4: u32 = 0x40;

const CR1_CEN: u32 = 1 << 0;
const EGR_UG: u32 = 1 << 0;

bitflags::bitflags! {
    /// Interrupt enable (DIER) and status (SR) bits
    pub struct Event: u32 {
        const Update  = 1 << 0;
        const C1 = 1 << 1;
        const C2 = 1 << 2;
        const C3 = 1 << 3;
        const C4 = 1 << 4;
    }
}

/// Output compare mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Ocm {
    Frozen = 0,
    ActiveOnMatch = 1,
    InactiveOnMatch = 2,
    Toggle = 3,
    ForceInactive = 4,
    ForceActive = 5,
    PwmMode1 = 6,
    PwmMode2 = 7,
}

/// Master mode selection: what drives TRGO
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MasterMode {
    Reset = 0,
    Enable = 1,
    Update = 2,
    ComparePulse = 3,
    Compare1 = 4,
}

/// Slave mode selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SlaveMode {
    Disabled = 0,
    Reset = 4,
    Gated = 5,
    Trigger = 6,
    /// Count rising edges of the selected trigger
    ExternalClock = 7,
}

/// Internal trigger input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Trigger {
    Itr0 = 0,
    Itr1 = 1,
    Itr2 = 2,
    Itr3 = 3,
}

/// Timer register bank
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tim(pub Bank);

impl Tim {
    pub const fn new(base: u32) -> Self {
        Self(Bank::new(base))
    }

    #[inline(always)]
    pub const fn bank(self) -> Bank {
        self.0
    }

    #[inline(always)]
    const fn reg(self, offset: u32) -> u32 {
        self.0.reg(offset)
    }

    /// Address of the counter register
    #[inline(always)]
    pub const fn cnt(self) -> u32 {
        self.reg(CNT)
    }

    /// Address of the capture/compare register of `channel`
    pub const fn ccr(self, channel: Channel) -> u32 {
        match channel {
            Channel::C1 => self.reg(CCR1),
            Channel::C2 => self.reg(CCR2),
            Channel::C3 => self.reg(CCR3),
            Channel::C4 => self.reg(CCR4),
        }
    }

    #[inline(always)]
    pub fn read_count<B: RegisterBus>(self, bus: &B) -> u32 {
        bus.read(self.reg(CNT))
    }

    #[inline(always)]
    pub fn cnt_reset<B: RegisterBus>(self, bus: &B) {
        bus.write(self.reg(CNT), 0);
    }

    #[inline(always)]
    pub fn set_prescaler<B: RegisterBus>(self, bus: &B, psc: u16) {
        bus.write(self.reg(PSC), psc as u32);
    }

    #[inline(always)]
    pub fn read_prescaler<B: RegisterBus>(self, bus: &B) -> u16 {
        bus.read(self.reg(PSC)) as u16
    }

    #[inline(always)]
    pub fn set_auto_reload<B: RegisterBus>(self, bus: &B, arr: u32) {
        bus.write(self.reg(ARR), arr);
    }

    #[inline(always)]
    pub fn enable_counter<B: RegisterBus>(self, bus: &B, b: bool) {
        if b {
            bus.set_bits(self.reg(CR1), CR1_CEN);
        } else {
            bus.clear_bits(self.reg(CR1), CR1_CEN);
        }
    }

    #[inline(always)]
    pub fn is_counter_enabled<B: RegisterBus>(self, bus: &B) -> bool {
        bus.read(self.reg(CR1)) & CR1_CEN != 0
    }

    /// Generates an update event, loading the prescaler
    #[inline(always)]
    pub fn trigger_update<B: RegisterBus>(self, bus: &B) {
        bus.write(self.reg(EGR), EGR_UG);
    }

    /// Generates an update and a capture/compare event on channel 1
    #[inline(always)]
    pub fn trigger_update_and_compare<B: RegisterBus>(self, bus: &B) {
        bus.write(self.reg(EGR), EGR_UG | Event::C1.bits());
    }

    #[inline(always)]
    pub fn listen_interrupt<B: RegisterBus>(self, bus: &B, event: Event, b: bool) {
        if b {
            bus.set_bits(self.reg(DIER), event.bits());
        } else {
            bus.clear_bits(self.reg(DIER), event.bits());
        }
    }

    #[inline(always)]
    pub fn listened_interrupts<B: RegisterBus>(self, bus: &B) -> Event {
        Event::from_bits_truncate(bus.read(self.reg(DIER)))
    }

    /// Clears the status flags of `event`
    ///
    /// SR flags are cleared by writing 0; writing 1 leaves them as they are,
    /// so a flag raised meanwhile is not lost.
    #[inline(always)]
    pub fn clear_interrupt_flag<B: RegisterBus>(self, bus: &B, event: Event) {
        bus.write(self.reg(SR), !event.bits() & Event::all().bits());
    }

    #[inline(always)]
    pub fn get_interrupt_flag<B: RegisterBus>(self, bus: &B) -> Event {
        Event::from_bits_truncate(bus.read(self.reg(SR)))
    }

    pub fn master_mode<B: RegisterBus>(self, bus: &B, mode: MasterMode) {
        bus.write_field(self.reg(CR2), 4, 3, mode as u32);
    }

    /// Clocks this timer from trigger input `ts` in slave mode `sms`
    pub fn slave_mode<B: RegisterBus>(self, bus: &B, ts: Trigger, sms: SlaveMode) {
        bus.write(self.reg(SMCR), (ts as u32) << 4 | sms as u32);
    }

    #[inline(always)]
    pub fn set_cc_value<B: RegisterBus>(self, bus: &B, channel: Channel, value: u32) {
        bus.write(self.ccr(channel), value);
    }

    #[inline(always)]
    pub fn read_cc_value<B: RegisterBus>(self, bus: &B, channel: Channel) -> u32 {
        bus.read(self.ccr(channel))
    }

    /// Selects the output compare mode of `channel`, with preload enabled
    pub fn preload_output_channel_in_mode<B: RegisterBus>(self, bus: &B, channel: Channel, mode: Ocm) {
        let c = channel.index() as u32;
        let ccmr = if c < 2 { CCMR1 } else { CCMR2 };
        let offset = (c % 2) * 8;
        // OCxM at bits 6:4, OCxPE at bit 3, CCxS = output
        bus.write_field(self.reg(ccmr), offset, 8, (mode as u32) << 4 | 1 << 3);
    }

    pub fn enable_channel<B: RegisterBus>(self, bus: &B, channel: Channel, b: bool) {
        let mask = 1 << (channel.index() as u32 * 4);
        if b {
            bus.set_bits(self.reg(CCER), mask);
        } else {
            bus.clear_bits(self.reg(CCER), mask);
        }
    }
}
