//! Two-wire bus primitives
//!
//! Byte-level I2C master operations: start/stop conditions and single-byte
//! transfers with per-byte acknowledge. The sensor driver is written against
//! the [`TwoWireBus`] trait; [`BitBangI2c`] implements it on two open-drain
//! GPIOs.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::config::{BUS_HALF_PERIOD_US, SENSOR_I2C_ADDR};

/// I2C device address wrapper
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// Temperature sensor address
    pub const SENSOR: Self = Self(SENSOR_I2C_ADDR);

    /// Create from 7-bit address
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// Get the 7-bit address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self.0
    }

    /// Address byte that opens a write transfer (R/W bit clear)
    #[must_use]
    pub const fn write_address(self) -> u8 {
        self.0 << 1
    }

    /// Address byte that opens a read transfer (R/W bit set)
    #[must_use]
    pub const fn read_address(self) -> u8 {
        (self.0 << 1) | 1
    }
}

impl Default for I2cAddress {
    fn default() -> Self {
        Self::SENSOR
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for I2cAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{:02X}", self.0);
    }
}

/// Acknowledge bit of a byte transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum Ack {
    /// Receiver pulled SDA low
    Ack,
    /// SDA stayed high
    Nack,
}

impl Ack {
    /// Map a "send acknowledge" flag to the bit a reader should drive
    #[must_use]
    pub const fn from_flag(send_ack: bool) -> Self {
        if send_ack {
            Self::Ack
        } else {
            Self::Nack
        }
    }

    /// Check for an acknowledge
    #[must_use]
    pub const fn is_ack(self) -> bool {
        matches!(self, Self::Ack)
    }
}

/// Bus errors raised by [`BitBangI2c`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum BusError<E> {
    /// A line could not be driven or sampled
    Pin(E),
    /// Byte transfer or stop requested with no start condition issued
    Idle,
}

/// Byte-oriented two-wire bus master
///
/// Every `write_byte`, `read_byte` and `stop` must sit inside a bracket
/// opened by `start`. Calling `start` again inside a bracket issues a
/// repeated start.
pub trait TwoWireBus {
    /// Error type for bus operations
    type Error;

    /// Drive both lines to their idle-high state
    fn release(&mut self) -> Result<(), Self::Error>;

    /// Issue a start (or repeated start) condition
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Issue a stop condition, freeing the bus
    fn stop(&mut self) -> Result<(), Self::Error>;

    /// Shift out one byte MSB first and sample the receiver's acknowledge
    fn write_byte(&mut self, byte: u8) -> Result<Ack, Self::Error>;

    /// Shift in one byte MSB first, then drive `ack`
    ///
    /// The caller decides: [`Ack::Ack`] asks for another byte, [`Ack::Nack`]
    /// marks the final byte of the transfer.
    fn read_byte(&mut self, ack: Ack) -> Result<u8, Self::Error>;
}

impl<T: TwoWireBus + ?Sized> TwoWireBus for &mut T {
    type Error = T::Error;

    fn release(&mut self) -> Result<(), Self::Error> {
        T::release(self)
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        T::start(self)
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        T::stop(self)
    }

    fn write_byte(&mut self, byte: u8) -> Result<Ack, Self::Error> {
        T::write_byte(self, byte)
    }

    fn read_byte(&mut self, ack: Ack) -> Result<u8, Self::Error> {
        T::read_byte(self, ack)
    }
}

/// Software I2C master on two open-drain pins
///
/// SCL is driven only (no clock stretching support), SDA is driven and
/// sampled. Both lines need external pull-ups; "high" means released.
pub struct BitBangI2c<SCL, SDA, D> {
    scl: SCL,
    sda: SDA,
    delay: D,
    half_period_us: u32,
    active: bool,
}

impl<SCL, SDA, D> BitBangI2c<SCL, SDA, D>
where
    SCL: OutputPin,
    SDA: OutputPin<Error = SCL::Error> + InputPin,
    D: DelayNs,
{
    /// Create a bus clocked at the configured half period
    #[must_use]
    pub fn new(scl: SCL, sda: SDA, delay: D) -> Self {
        Self {
            scl,
            sda,
            delay,
            half_period_us: BUS_HALF_PERIOD_US,
            active: false,
        }
    }

    /// Override the half clock period (minimum 1 µs)
    #[must_use]
    pub fn with_half_period_us(mut self, half_period_us: u32) -> Self {
        self.half_period_us = half_period_us.max(1);
        self
    }

    /// Check if a start condition is outstanding
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Give back the pins and the delay
    pub fn free(self) -> (SCL, SDA, D) {
        (self.scl, self.sda, self.delay)
    }

    fn wait(&mut self) {
        self.delay.delay_us(self.half_period_us);
    }

    fn set_scl(&mut self, high: bool) -> Result<(), BusError<SCL::Error>> {
        self.scl.set_state(PinState::from(high)).map_err(BusError::Pin)
    }

    fn set_sda(&mut self, high: bool) -> Result<(), BusError<SCL::Error>> {
        self.sda.set_state(PinState::from(high)).map_err(BusError::Pin)
    }

    fn ensure_active(&self) -> Result<(), BusError<SCL::Error>> {
        if self.active {
            Ok(())
        } else {
            Err(BusError::Idle)
        }
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), BusError<SCL::Error>> {
        self.set_sda(bit)?;
        self.wait();
        self.set_scl(true)?;
        self.wait();
        self.set_scl(false)
    }

    fn read_bit(&mut self) -> Result<bool, BusError<SCL::Error>> {
        // Release SDA so the device can drive it
        self.set_sda(true)?;
        self.wait();
        self.set_scl(true)?;
        self.wait();
        let bit = self.sda.is_high().map_err(BusError::Pin)?;
        self.set_scl(false)?;
        Ok(bit)
    }
}

impl<SCL, SDA, D> TwoWireBus for BitBangI2c<SCL, SDA, D>
where
    SCL: OutputPin,
    SDA: OutputPin<Error = SCL::Error> + InputPin,
    D: DelayNs,
{
    type Error = BusError<SCL::Error>;

    fn release(&mut self) -> Result<(), Self::Error> {
        self.set_sda(true)?;
        self.set_scl(true)?;
        self.wait();
        self.active = false;
        Ok(())
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        // SDA goes up first so a repeated start (SCL low) does not
        // look like a stop condition
        self.set_sda(true)?;
        self.set_scl(true)?;
        self.wait();
        self.set_sda(false)?;
        self.wait();
        self.set_scl(false)?;
        self.wait();
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.ensure_active()?;
        self.set_sda(false)?;
        self.wait();
        self.set_scl(true)?;
        self.wait();
        self.set_sda(true)?;
        self.wait();
        self.active = false;
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<Ack, Self::Error> {
        self.ensure_active()?;
        for bit in (0..8).rev() {
            self.write_bit(byte & (1 << bit) != 0)?;
        }
        let released = self.read_bit()?;
        Ok(if released { Ack::Nack } else { Ack::Ack })
    }

    fn read_byte(&mut self, ack: Ack) -> Result<u8, Self::Error> {
        self.ensure_active()?;
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | u8::from(self.read_bit()?);
        }
        // Acknowledge is an active-low bit driven by the master
        self.write_bit(!ack.is_ack())?;
        Ok(byte)
    }
}
