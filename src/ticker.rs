//! # Microsecond ticker
//!
//! A free-running 32-bit count of microseconds since the ticker started,
//! built from 16-bit timer counters. A [`CounterSource`] says how the count
//! is assembled:
//!
//! - [`Cascade`]: a low timer prescaled to 1 MHz clocks a high timer through
//!   the internal trigger network. No interrupt is involved.
//! - [`Overflow`]: one timer prescaled to 1 MHz plus a high word kept in RAM,
//!   advanced by the timer's update interrupt.
//! - [`Wide`]: a single 32-bit counter.
//!
//! The [`Ticker`] owns the bus handle, the source and the core clock query.
//! It starts the hardware on the first [`init`](Ticker::init) or
//! [`read`](Ticker::read), whichever comes first.

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use fugit::{HertzU32 as Hertz, MicrosDurationU32, TimerInstantU32};

use crate::bus::RegisterBus;
use crate::peripheral::Channel;
use crate::rcc::{CoreClock, Enable};
use crate::timer::{Event, MasterMode, Ocm, SlaveMode, Tim, Trigger};

mod hal_02;
mod hal_1;
#[cfg(feature = "rtic")]
mod monotonic;

/// Ticker tick rate
pub const TICK_HZ: u32 = 1_000_000;

/// Microsecond timestamp
pub type Instant = TimerInstantU32<TICK_HZ>;

const ROLLOVER: u32 = 0x1_0000;

/// One timer and its clock enable
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stage {
    pub tim: Tim,
    pub enable: Enable,
}

impl Stage {
    pub const fn new(tim: Tim, enable: Enable) -> Self {
        Self { tim, enable }
    }
}

/// Timer channel used for compare-match interrupts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Compare {
    pub tim: Tim,
    pub channel: Channel,
    /// Bits of the timestamp the compare register holds
    pub mask: u32,
}

/// Hardware that produces the microsecond count
pub trait CounterSource {
    /// Enables the timer clocks, prescales to 1 MHz and starts counting
    fn start<B: RegisterBus>(&self, bus: &B, prescaler: u16);

    /// Current count
    fn read<B: RegisterBus>(&self, bus: &B) -> u32;

    /// Channel carrying the compare-match interrupt, if the source leaves one free
    fn compare(&self) -> Option<Compare>;
}

/// How the low stage of a [`Cascade`] clocks the high stage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Link {
    /// Low timer update event on TRGO, seen by the high timer on `Trigger`
    Update(Trigger),
    /// Low timer compare output 1, seen by the high timer on `Trigger`
    ///
    /// For timers without a master mode controller. Channel 1 of the low
    /// timer is taken by the link.
    Compare(Trigger),
}

/// Two 16-bit timers chained in hardware
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cascade {
    pub low: Stage,
    pub high: Stage,
    pub link: Link,
}

impl Cascade {
    pub const fn new(low: Stage, high: Stage, link: Link) -> Self {
        Self { low, high, link }
    }
}

impl CounterSource for Cascade {
    fn start<B: RegisterBus>(&self, bus: &B, prescaler: u16) {
        let (low, high) = (self.low.tim, self.high.tim);
        self.low.enable.enable(bus);
        self.high.enable.enable(bus);

        low.cnt_reset(bus);
        low.set_prescaler(bus, prescaler);
        low.set_auto_reload(bus, 0xFFFF);
        let trigger = match self.link {
            Link::Update(trigger) => {
                low.master_mode(bus, MasterMode::Update);
                low.trigger_update(bus);
                trigger
            }
            Link::Compare(trigger) => {
                // PWM mode 1 against 0xFFFF: the output rises exactly at the wrap
                low.set_cc_value(bus, Channel::C1, 0xFFFF);
                low.preload_output_channel_in_mode(bus, Channel::C1, Ocm::PwmMode1);
                low.enable_channel(bus, Channel::C1, true);
                low.trigger_update_and_compare(bus);
                trigger
            }
        };

        high.cnt_reset(bus);
        high.set_auto_reload(bus, 0xFFFF);
        high.slave_mode(bus, trigger, SlaveMode::ExternalClock);

        low.enable_counter(bus, true);
        high.enable_counter(bus, true);
    }

    fn read<B: RegisterBus>(&self, bus: &B) -> u32 {
        let (low, high) = (self.low.tim, self.high.tim);
        let lo0 = low.read_count(bus) & 0xFFFF;
        let hi = high.read_count(bus) & 0xFFFF;
        let lo1 = low.read_count(bus) & 0xFFFF;

        let mut count = hi << 16;
        if lo1 < lo0 {
            // The low half wrapped between its samples. If `hi` was taken
            // before the carry reached the high timer, a fresh sample differs.
            let fresh = high.read_count(bus) & 0xFFFF;
            if fresh != hi {
                count = count.wrapping_add(ROLLOVER);
            }
        }
        count | lo1
    }

    fn compare(&self) -> Option<Compare> {
        match self.link {
            Link::Update(_) => Some(Compare {
                tim: self.low.tim,
                channel: Channel::C1,
                mask: 0xFFFF,
            }),
            Link::Compare(_) => None,
        }
    }
}

/// High half of an [`Overflow`] count
///
/// Holds the elapsed rollovers pre-shifted into ticks. Only the update
/// interrupt handler writes it.
#[derive(Debug, Default)]
pub struct Rollover(AtomicU32);

impl Rollover {
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    #[inline(always)]
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    fn advance(&self) {
        // Single writer: load/store instead of an RMW the M0 does not have
        let ovf = self.0.load(Ordering::Relaxed);
        self.0.store(ovf.wrapping_add(ROLLOVER), Ordering::Release);
    }
}

/// One 16-bit timer extended by its update interrupt
///
/// Copies of the source share the [`Rollover`] word, so the interrupt
/// handler can keep its own copy. The timer's IRQ must also be unmasked in
/// the NVIC; otherwise the update flag stays set and every wrap after the
/// first is lost.
///
/// ```rust,no_run
/// use stm32_pinmap_hal::{bus::Mmio, f1, ticker::Rollover};
///
/// static ROLLOVER: Rollover = Rollover::new();
///
/// // TIM3 interrupt handler
/// fn tim3() {
///     // NOTE(unsafe) only TIM3 status and ROLLOVER are touched
///     let bus = unsafe { Mmio::steal() };
///     f1::ticker::overflow(&ROLLOVER).on_interrupt(&bus);
/// }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Overflow<'r> {
    pub stage: Stage,
    rollover: &'r Rollover,
}

impl<'r> Overflow<'r> {
    pub const fn new(stage: Stage, rollover: &'r Rollover) -> Self {
        Self { stage, rollover }
    }

    pub fn rollover(&self) -> &'r Rollover {
        self.rollover
    }

    /// Update interrupt handler body
    ///
    /// Must run on every update interrupt of the timer, and be the only code
    /// that clears its update flag.
    pub fn on_interrupt<B: RegisterBus>(&self, bus: &B) {
        let tim = self.stage.tim;
        if tim.get_interrupt_flag(bus).contains(Event::Update) {
            tim.clear_interrupt_flag(bus, Event::Update);
            self.rollover.advance();
        }
    }
}

impl CounterSource for Overflow<'_> {
    fn start<B: RegisterBus>(&self, bus: &B, prescaler: u16) {
        let tim = self.stage.tim;
        self.stage.enable.enable(bus);

        tim.cnt_reset(bus);
        tim.set_prescaler(bus, prescaler);
        tim.set_auto_reload(bus, 0xFFFF);
        tim.trigger_update(bus);
        // UG raises the update flag as well
        tim.clear_interrupt_flag(bus, Event::Update);
        tim.listen_interrupt(bus, Event::Update, true);
        tim.enable_counter(bus, true);
    }

    fn read<B: RegisterBus>(&self, bus: &B) -> u32 {
        let tim = self.stage.tim;
        let listening = tim.listened_interrupts(bus).contains(Event::Update);
        tim.listen_interrupt(bus, Event::Update, false);

        let count = loop {
            let ovf = self.rollover.get();
            let cnt0 = tim.read_count(bus) & 0xFFFF;
            let pending = tim.get_interrupt_flag(bus).contains(Event::Update);
            let cnt1 = tim.read_count(bus) & 0xFFFF;

            // A handler already pended before masking can still slip in
            if self.rollover.get() != ovf {
                continue;
            }
            // Wrapped without the handler having run yet
            let carry = if pending || cnt1 < cnt0 { ROLLOVER } else { 0 };
            break ovf.wrapping_add(carry).wrapping_add(cnt1);
        };

        if listening {
            tim.listen_interrupt(bus, Event::Update, true);
        }
        count
    }

    fn compare(&self) -> Option<Compare> {
        Some(Compare {
            tim: self.stage.tim,
            channel: Channel::C1,
            mask: 0xFFFF,
        })
    }
}

/// A 32-bit timer counting microseconds on its own
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Wide {
    pub stage: Stage,
}

impl Wide {
    pub const fn new(stage: Stage) -> Self {
        Self { stage }
    }
}

impl CounterSource for Wide {
    fn start<B: RegisterBus>(&self, bus: &B, prescaler: u16) {
        let tim = self.stage.tim;
        self.stage.enable.enable(bus);
        tim.cnt_reset(bus);
        tim.set_prescaler(bus, prescaler);
        tim.set_auto_reload(bus, u32::MAX);
        tim.trigger_update(bus);
        tim.enable_counter(bus, true);
    }

    fn read<B: RegisterBus>(&self, bus: &B) -> u32 {
        self.stage.tim.read_count(bus)
    }

    fn compare(&self) -> Option<Compare> {
        Some(Compare {
            tim: self.stage.tim,
            channel: Channel::C1,
            mask: u32::MAX,
        })
    }
}

/// Ticker lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Uninitialized,
    Running,
}

/// Ticker error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The counter source has no channel free for compare-match interrupts
    NoCompareChannel,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoCompareChannel => f.write_str("ticker has no compare channel"),
        }
    }
}

/// Prescaler that divides `clock` down to 1 MHz
///
/// Saturates for clocks below 1 MHz (the counter then runs at `clock`) or
/// above the 16-bit prescaler range.
pub fn prescaler(clock: Hertz) -> u16 {
    let div = (clock.raw() / TICK_HZ).saturating_sub(1);
    div.min(u16::MAX as u32) as u16
}

/// Microsecond ticker
pub struct Ticker<B, S, C> {
    bus: B,
    source: S,
    clock: C,
    state: State,
}

impl<B, S, C> Ticker<B, S, C>
where
    B: RegisterBus,
    S: CounterSource,
    C: CoreClock,
{
    /// Creates a stopped ticker; nothing is written until first use
    pub const fn new(bus: B, source: S, clock: C) -> Self {
        Self {
            bus,
            source,
            clock,
            state: State::Uninitialized,
        }
    }

    /// Starts the hardware counter, once
    pub fn init(&mut self) {
        if self.state == State::Running {
            return;
        }
        let psc = prescaler(self.clock.core_clock());
        debug!("ticker: prescaler {=u16}", psc);
        self.source.start(&self.bus, psc);
        self.state = State::Running;
    }

    /// Microseconds since the ticker started
    pub fn read(&mut self) -> u32 {
        self.init();
        self.source.read(&self.bus)
    }

    pub fn now(&mut self) -> Instant {
        Instant::from_ticks(self.read())
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Arms the compare-match interrupt for `timestamp`
    ///
    /// Only the bits the compare register holds take part in the match, so
    /// the handler should check [`read`](Self::read) against its deadline.
    pub fn set_interrupt(&mut self, timestamp: u32) -> Result<(), Error> {
        let cmp = self.source.compare().ok_or(Error::NoCompareChannel)?;
        self.init();
        cmp.tim.set_cc_value(&self.bus, cmp.channel, timestamp & cmp.mask);
        cmp.tim
            .listen_interrupt(&self.bus, compare_event(cmp.channel), true);
        Ok(())
    }

    /// Masks the compare-match interrupt
    pub fn disable_interrupt(&self) {
        if let Some(cmp) = self.source.compare() {
            cmp.tim
                .listen_interrupt(&self.bus, compare_event(cmp.channel), false);
        }
    }

    /// Clears a pending compare match
    pub fn clear_interrupt(&self) {
        if let Some(cmp) = self.source.compare() {
            cmp.tim
                .clear_interrupt_flag(&self.bus, compare_event(cmp.channel));
        }
    }

    /// Busy-waits for at least `us`
    pub fn delay(&mut self, us: MicrosDurationU32) {
        // Keep each wait well inside the wrap period
        const MAX_WAIT: u32 = 1 << 31;

        let mut remaining = us.ticks();
        while remaining != 0 {
            let wait = remaining.min(MAX_WAIT);
            let start = self.read();
            // The start sample may be up to one tick late
            while self.read().wrapping_sub(start) <= wait {}
            remaining -= wait;
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Releases the bus handle and the counter source
    pub fn release(self) -> (B, S) {
        (self.bus, self.source)
    }
}

fn compare_event(channel: Channel) -> Event {
    match channel {
        Channel::C1 => Event::C1,
        Channel::C2 => Event::C2,
        Channel::C3 => Event::C3,
        Channel::C4 => Event::C4,
    }
}
