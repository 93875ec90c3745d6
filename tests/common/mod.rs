//! Host-side mocks for the `embedded-hal` traits and the two-wire bus.
//!
//! - [`Clock`]: virtual time advanced only by [`ClockDelay`]
//! - [`KeyPin`]: output pin that stamps every level change with the clock
//! - [`RecordingBus`]: `TwoWireBus` that logs operations and replays bytes
//! - [`Wire`]: shared SCL/SDA state for driving `BitBangI2c`

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use beacon_firmware::hal::i2c::{Ack, TwoWireBus};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

// ============================================================================
// Virtual clock
// ============================================================================

#[derive(Default)]
struct ClockState {
    now_ns: u64,
    transitions: Vec<(u64, bool)>,
}

/// Shared virtual clock plus the key pin's history
#[derive(Clone, Default)]
pub struct Clock(Rc<RefCell<ClockState>>);

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(&self) -> ClockDelay {
        ClockDelay(self.clone())
    }

    pub fn key_pin(&self) -> KeyPin {
        KeyPin(self.clone())
    }

    pub fn now_ns(&self) -> u64 {
        self.0.borrow().now_ns
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ns() / 1_000_000
    }

    /// Number of times the pin was written
    pub fn pin_writes(&self) -> usize {
        self.0.borrow().transitions.len()
    }

    /// Level runs of the key pin as `(high, ms)`, zero-length runs dropped
    pub fn segments(&self) -> Vec<(bool, u64)> {
        let state = self.0.borrow();
        let mut runs: Vec<(bool, u64, u64)> = Vec::new();

        for &(at, level) in &state.transitions {
            match runs.last_mut() {
                Some(last) if last.0 == level => {}
                Some(last) => {
                    last.2 = at;
                    runs.push((level, at, at));
                }
                None => runs.push((level, at, at)),
            }
        }
        if let Some(last) = runs.last_mut() {
            last.2 = state.now_ns;
        }

        runs.into_iter()
            .filter(|&(_, start, end)| end > start)
            .map(|(level, start, end)| (level, (end - start) / 1_000_000))
            .collect()
    }

    /// Number of key-down runs
    pub fn tone_count(&self) -> usize {
        self.segments().iter().filter(|(high, _)| *high).count()
    }

    /// Total key-down time in ms
    pub fn on_time_ms(&self) -> u64 {
        self.segments()
            .iter()
            .filter(|(high, _)| *high)
            .map(|(_, ms)| ms)
            .sum()
    }
}

/// Delay that advances a [`Clock`] instead of sleeping
pub struct ClockDelay(Clock);

impl DelayNs for ClockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0 .0.borrow_mut().now_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.0 .0.borrow_mut().now_ns += u64::from(us) * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0 .0.borrow_mut().now_ns += u64::from(ms) * 1_000_000;
    }
}

/// Key output pin recording its level changes on the clock
pub struct KeyPin(Clock);

impl ErrorType for KeyPin {
    type Error = Infallible;
}

impl OutputPin for KeyPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut state = self.0 .0.borrow_mut();
        let now = state.now_ns;
        state.transitions.push((now, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut state = self.0 .0.borrow_mut();
        let now = state.now_ns;
        state.transitions.push((now, true));
        Ok(())
    }
}

// ============================================================================
// Recording bus
// ============================================================================

/// One logged bus operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusOp {
    Release,
    Start,
    Stop,
    Write(u8),
    Read(Ack),
}

/// `TwoWireBus` that records every call
#[derive(Default)]
pub struct RecordingBus {
    pub ops: Vec<BusOp>,
    /// Bytes handed out by `read_byte`, 0xFF once exhausted
    pub read_data: VecDeque<u8>,
    /// Written bytes that get no acknowledge
    pub nack_bytes: Vec<u8>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus whose device answers temperature reads with `msb`, `lsb`
    pub fn with_reading(msb: u8, lsb: u8) -> Self {
        let mut bus = Self::new();
        bus.read_data.extend([msb, lsb]);
        bus
    }

    pub fn nack(mut self, byte: u8) -> Self {
        self.nack_bytes.push(byte);
        self
    }
}

impl TwoWireBus for RecordingBus {
    type Error = Infallible;

    fn release(&mut self) -> Result<(), Self::Error> {
        self.ops.push(BusOp::Release);
        Ok(())
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        self.ops.push(BusOp::Start);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.ops.push(BusOp::Stop);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<Ack, Self::Error> {
        self.ops.push(BusOp::Write(byte));
        if self.nack_bytes.contains(&byte) {
            Ok(Ack::Nack)
        } else {
            Ok(Ack::Ack)
        }
    }

    fn read_byte(&mut self, ack: Ack) -> Result<u8, Self::Error> {
        self.ops.push(BusOp::Read(ack));
        Ok(self.read_data.pop_front().unwrap_or(0xFF))
    }
}

// ============================================================================
// Simulated open-drain wire for the bit-banged bus
// ============================================================================

/// Bus condition decoded from the line history
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Start,
    Stop,
    Bit(bool),
}

struct WireState {
    scl: bool,
    sda: bool,
    /// Line levels after every pin write
    history: Vec<(bool, bool)>,
    /// Levels the device presents when SDA is sampled; released when empty
    device_bits: VecDeque<bool>,
}

/// Shared SCL/SDA lines
#[derive(Clone)]
pub struct Wire(Rc<RefCell<WireState>>);

impl Wire {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(WireState {
            scl: true,
            sda: true,
            history: Vec::new(),
            device_bits: VecDeque::new(),
        })))
    }

    pub fn scl(&self) -> SclPin {
        SclPin(self.clone())
    }

    pub fn sda(&self) -> SdaPin {
        SdaPin(self.clone())
    }

    /// Queue bits the device will present on SDA
    pub fn device_sends(&self, bits: &[bool]) {
        self.0.borrow_mut().device_bits.extend(bits.iter().copied());
    }

    /// Queue a byte MSB first
    pub fn device_sends_byte(&self, byte: u8) {
        let bits: Vec<bool> = (0..8).rev().map(|i| byte & (1 << i) != 0).collect();
        self.device_sends(&bits);
    }

    pub fn levels(&self) -> (bool, bool) {
        let state = self.0.borrow();
        (state.scl, state.sda)
    }

    pub fn clear_history(&self) {
        self.0.borrow_mut().history.clear();
    }

    /// Decode start/stop conditions and master-driven bits
    ///
    /// A bit is the SDA level latched on the SCL rising edge, committed on
    /// the falling edge. An SDA change while SCL is high is a start or stop
    /// and discards the latched level.
    pub fn signals(&self) -> Vec<Signal> {
        let state = self.0.borrow();
        let mut out = Vec::new();
        let (mut scl, mut sda) = (true, true);
        let mut latched = None;

        for &(next_scl, next_sda) in &state.history {
            if scl && next_scl && sda != next_sda {
                latched = None;
                out.push(if next_sda { Signal::Stop } else { Signal::Start });
            } else if !scl && next_scl {
                latched = Some(next_sda);
            } else if scl && !next_scl {
                if let Some(bit) = latched.take() {
                    out.push(Signal::Bit(bit));
                }
            }
            scl = next_scl;
            sda = next_sda;
        }
        out
    }

    /// Decoded data bits only
    pub fn bits(&self) -> Vec<bool> {
        self.signals()
            .into_iter()
            .filter_map(|s| match s {
                Signal::Bit(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    fn drive(&self, scl: Option<bool>, sda: Option<bool>) {
        let mut state = self.0.borrow_mut();
        if let Some(level) = scl {
            state.scl = level;
        }
        if let Some(level) = sda {
            state.sda = level;
        }
        let levels = (state.scl, state.sda);
        state.history.push(levels);
    }
}

pub struct SclPin(Wire);

impl ErrorType for SclPin {
    type Error = Infallible;
}

impl OutputPin for SclPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.drive(Some(false), None);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.drive(Some(true), None);
        Ok(())
    }
}

pub struct SdaPin(Wire);

impl ErrorType for SdaPin {
    type Error = Infallible;
}

impl OutputPin for SdaPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.drive(None, Some(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.drive(None, Some(true));
        Ok(())
    }
}

impl InputPin for SdaPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut state = self.0 .0.borrow_mut();
        let driven = state.sda;
        let device = state.device_bits.pop_front().unwrap_or(true);
        Ok(driven && device)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}
