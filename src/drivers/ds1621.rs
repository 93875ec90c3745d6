//! DS1621 Digital Thermometer Driver
//!
//! Command-based two-wire temperature sensor. The beacon uses three
//! commands: start conversion, write the configuration register and read
//! the two-byte temperature register.
//!
//! By default acknowledge bits are not checked, matching the beacon's
//! fire-and-forget use of the bus. [`AckPolicy::Require`] turns a missing
//! acknowledge into [`SensorError::Nack`].

use crate::config::{CMD_ACCESS_CONFIG, CMD_READ_TEMPERATURE, CMD_START_CONVERT, SENSOR_INIT_MODE};
use crate::hal::i2c::{Ack, I2cAddress, TwoWireBus};
use crate::types::{RawTemperature, Temperature};

/// What to do when a written byte is not acknowledged
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum AckPolicy {
    /// Carry on regardless
    #[default]
    Ignore,
    /// Stop the transaction and report the byte
    Require,
}

/// Sensor driver errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum SensorError<E> {
    /// Underlying bus failure
    Bus(E),
    /// Byte not acknowledged (only with [`AckPolicy::Require`])
    Nack {
        /// The byte that went unanswered
        byte: u8,
    },
}

impl<E> From<E> for SensorError<E> {
    fn from(err: E) -> Self {
        Self::Bus(err)
    }
}

/// DS1621 driver
pub struct Ds1621<B> {
    bus: B,
    address: I2cAddress,
    ack_policy: AckPolicy,
}

impl<B: TwoWireBus> Ds1621<B> {
    /// Create a driver for the sensor at its default address
    #[must_use]
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, I2cAddress::SENSOR)
    }

    /// Create a driver for a sensor at `address`
    #[must_use]
    pub fn with_address(bus: B, address: I2cAddress) -> Self {
        Self {
            bus,
            address,
            ack_policy: AckPolicy::default(),
        }
    }

    /// Select how missing acknowledges are handled
    #[must_use]
    pub fn with_ack_policy(mut self, policy: AckPolicy) -> Self {
        self.ack_policy = policy;
        self
    }

    /// Get the device address
    #[must_use]
    pub const fn address(&self) -> I2cAddress {
        self.address
    }

    /// Give back the bus
    pub fn release(self) -> B {
        self.bus
    }

    /// Initialize the sensor
    ///
    /// Releases both bus lines, starts conversion and writes the
    /// initialization mode to the configuration register.
    pub fn initialize(&mut self) -> Result<(), SensorError<B::Error>> {
        self.bus.release()?;

        self.bus.start()?;
        self.write(self.address.write_address())?;
        self.write(CMD_START_CONVERT)?;
        self.bus.stop()?;

        self.configure(SENSOR_INIT_MODE)?;
        debug!("sensor initialized, mode {}", SENSOR_INIT_MODE);
        Ok(())
    }

    /// Write `mode` to the configuration register
    pub fn configure(&mut self, mode: u8) -> Result<(), SensorError<B::Error>> {
        self.bus.start()?;
        self.write(self.address.write_address())?;
        self.write(CMD_ACCESS_CONFIG)?;
        self.write(mode)?;
        self.bus.stop()?;
        Ok(())
    }

    /// Read both temperature register bytes
    pub fn read_raw(&mut self) -> Result<RawTemperature, SensorError<B::Error>> {
        self.bus.start()?;
        self.write(self.address.write_address())?;
        self.write(CMD_READ_TEMPERATURE)?;

        self.bus.start()?;
        self.write(self.address.read_address())?;
        let msb = self.bus.read_byte(Ack::Ack)?;
        let lsb = self.bus.read_byte(Ack::Nack)?;
        self.bus.stop()?;

        let raw = RawTemperature::from_bytes(msb, lsb);
        trace!("temperature register {} {}", msb, lsb);
        Ok(raw)
    }

    /// Read the temperature in whole degrees
    ///
    /// Only the high byte is used; the low byte is clocked in to end the
    /// transfer and then dropped.
    pub fn read_full_temperature(&mut self) -> Result<Temperature, SensorError<B::Error>> {
        Ok(self.read_raw()?.whole_degrees())
    }

    fn write(&mut self, byte: u8) -> Result<(), SensorError<B::Error>> {
        let ack = self.bus.write_byte(byte)?;
        if ack.is_ack() {
            return Ok(());
        }

        match self.ack_policy {
            AckPolicy::Ignore => {
                trace!("byte {} not acknowledged", byte);
                Ok(())
            }
            AckPolicy::Require => {
                warn!("byte {} not acknowledged, aborting transaction", byte);
                self.bus.stop()?;
                Err(SensorError::Nack { byte })
            }
        }
    }
}
