//! Telemetry beacon loop
//!
//! Reads the sensor, formats the telemetry line and keys it out, then
//! pauses before the next transmission. Sensor access and keying never
//! overlap: each cycle finishes the read before the first element is sent.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::String;

use super::keyer::MorseKeyer;
use crate::config::{
    MESSAGE_CAPACITY, MESSAGE_PREFIX, MESSAGE_SUFFIX, TRANSMISSION_INTERVAL_MS, TRANSMIT_CHARS,
};
use crate::drivers::ds1621::{Ds1621, SensorError};
use crate::hal::i2c::TwoWireBus;
use crate::types::Temperature;

/// Formatted telemetry line
pub type Message = String<MESSAGE_CAPACITY>;

/// Build the telemetry line for `temperature`
///
/// The temperature field reads `t`, a sign letter (`n` below zero, `p`
/// otherwise), the magnitude with at least two digits, and `c`.
#[must_use]
pub fn format_message(temperature: Temperature) -> Message {
    let mut message = Message::new();
    // Capacity covers the prefix, suffix and the widest magnitude (128)
    let written = write!(
        message,
        "{}{}{:02}{}",
        MESSAGE_PREFIX,
        temperature.sign_letter(),
        temperature.magnitude(),
        MESSAGE_SUFFIX
    );
    debug_assert!(written.is_ok(), "telemetry message exceeds buffer");
    message
}

/// The part of the message that is actually keyed
#[must_use]
pub fn transmitted_part(message: &str) -> &str {
    match message.char_indices().nth(TRANSMIT_CHARS) {
        Some((end, _)) => &message[..end],
        None => message,
    }
}

/// Outcome of one successful transmission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct Transmission {
    /// Reading that was sent
    pub temperature: Temperature,
    /// Dits and dahs keyed
    pub tones: usize,
}

/// Beacon cycle errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum BeaconError<S, K> {
    /// Sensor read failed; nothing was keyed
    Sensor(SensorError<S>),
    /// Key line could not be driven
    Key(K),
}

/// Sensor plus keyer, run in lock-step
pub struct Beacon<B, P, D> {
    sensor: Ds1621<B>,
    keyer: MorseKeyer<P, D>,
    interval_ms: u32,
}

impl<B, P, D> Beacon<B, P, D>
where
    B: TwoWireBus,
    P: OutputPin,
    D: DelayNs,
{
    /// Create a beacon with the configured transmission interval
    #[must_use]
    pub fn new(sensor: Ds1621<B>, keyer: MorseKeyer<P, D>) -> Self {
        Self {
            sensor,
            keyer,
            interval_ms: TRANSMISSION_INTERVAL_MS,
        }
    }

    /// Override the pause between transmissions
    #[must_use]
    pub fn with_interval_ms(mut self, interval_ms: u32) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Get the pause between transmissions
    #[must_use]
    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Bring up the sensor
    pub fn start(&mut self) -> Result<(), BeaconError<B::Error, P::Error>> {
        self.sensor.initialize().map_err(BeaconError::Sensor)
    }

    /// Read, transmit, then pause
    ///
    /// The pause happens even when the read fails so a broken sensor does
    /// not turn the loop into a busy spin.
    pub fn cycle(&mut self) -> Result<Transmission, BeaconError<B::Error, P::Error>> {
        let outcome = self.transmit();
        self.keyer
            .idle_ms(self.interval_ms)
            .map_err(BeaconError::Key)?;
        outcome
    }

    /// Run forever
    pub fn run(&mut self) -> ! {
        loop {
            match self.cycle() {
                Ok(sent) => {
                    debug!("sent {} ({} elements)", sent.temperature, sent.tones);
                }
                Err(BeaconError::Sensor(_)) => {
                    warn!("sensor read failed, skipping transmission");
                }
                Err(BeaconError::Key(_)) => {
                    warn!("key line fault");
                }
            }
        }
    }

    /// Give back the sensor and the keyer
    pub fn free(self) -> (Ds1621<B>, MorseKeyer<P, D>) {
        (self.sensor, self.keyer)
    }

    fn transmit(&mut self) -> Result<Transmission, BeaconError<B::Error, P::Error>> {
        let temperature = self
            .sensor
            .read_full_temperature()
            .map_err(BeaconError::Sensor)?;
        let message = format_message(temperature);
        info!("telemetry {}", message.as_str());

        let tones = self
            .keyer
            .send_str(transmitted_part(&message))
            .map_err(BeaconError::Key)?;

        Ok(Transmission { temperature, tones })
    }
}
