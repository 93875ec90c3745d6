//! Shared types used across the beacon firmware
//!
//! Domain types for sensor readings. The beacon only ever transmits the
//! whole-degree value; the raw pair is kept so finer conversions stay available.

use core::fmt;

/// Whole-degree temperature as reported by the sensor's high byte
///
/// The value is the raw two's complement register content, not scaled.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Temperature(i8);

impl Temperature {
    /// Lowest value the sensor reports (-55 °C)
    pub const SENSOR_MIN: i8 = -55;

    /// Highest value the sensor reports (+125 °C)
    pub const SENSOR_MAX: i8 = 125;

    /// Create from a signed degree count
    #[must_use]
    pub const fn from_degrees(degrees: i8) -> Self {
        Self(degrees)
    }

    /// Reinterpret a raw register byte as a signed temperature
    #[must_use]
    pub const fn from_register(msb: u8) -> Self {
        Self(msb as i8)
    }

    /// Signed degree count
    #[must_use]
    pub const fn degrees(self) -> i8 {
        self.0
    }

    /// Check if below zero
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value (128 for the most negative register value)
    #[must_use]
    pub const fn magnitude(self) -> u8 {
        self.0.unsigned_abs()
    }

    /// Sign letter used in the telemetry text: `n` below zero, `p` otherwise
    #[must_use]
    pub const fn sign_letter(self) -> char {
        if self.is_negative() {
            'n'
        } else {
            'p'
        }
    }

    /// Check if the value lies inside the sensor's datasheet range
    #[must_use]
    pub const fn is_plausible(self) -> bool {
        self.0 >= Self::SENSOR_MIN && self.0 <= Self::SENSOR_MAX
    }
}

impl fmt::Debug for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Temperature({})", self.0)
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Temperature {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.0);
    }
}

/// Both bytes of a temperature register read
///
/// `msb` holds whole degrees in two's complement, bit 7 of `lsb` flags an
/// extra half degree. The remaining `lsb` bits read as zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct RawTemperature {
    /// High byte (whole degrees)
    pub msb: u8,
    /// Low byte (half-degree flag in bit 7)
    pub lsb: u8,
}

impl RawTemperature {
    /// Create from the two register bytes in bus order
    #[must_use]
    pub const fn from_bytes(msb: u8, lsb: u8) -> Self {
        Self { msb, lsb }
    }

    /// Whole degrees; this is what the beacon transmits
    #[must_use]
    pub const fn whole_degrees(self) -> Temperature {
        Temperature::from_register(self.msb)
    }

    /// Check the half-degree flag
    #[must_use]
    pub const fn has_half_degree(self) -> bool {
        self.lsb & 0x80 != 0
    }

    /// Full 9-bit reading in half-degree steps
    #[must_use]
    pub const fn half_degrees(self) -> i16 {
        let whole = (self.msb as i8) as i16;
        whole * 2 + (self.lsb >> 7) as i16
    }

    /// Degrees Fahrenheit, rounded the way the early beacon firmware did it
    ///
    /// `F = (C * 9 ± 4 if the half flag is set) / 5 + 32`, where the
    /// correction follows the sign and the division truncates toward zero.
    /// Not used on the transmit path.
    #[must_use]
    pub const fn fahrenheit(self) -> i16 {
        let mut scaled = ((self.msb as i8) as i16) * 9;
        if self.has_half_degree() {
            if scaled < 0 {
                scaled -= 4;
            } else {
                scaled += 4;
            }
        }
        scaled / 5 + 32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_byte_is_twos_complement() {
        assert_eq!(Temperature::from_register(0x05).degrees(), 5);
        assert_eq!(Temperature::from_register(0xFD).degrees(), -3);
        assert_eq!(Temperature::from_register(0x80).magnitude(), 128);
    }

    #[test]
    fn half_degree_steps() {
        // 25.5 °C
        assert_eq!(RawTemperature::from_bytes(0x19, 0x80).half_degrees(), 51);
        // -0.5 °C reads as 0xFF / 0x80
        assert_eq!(RawTemperature::from_bytes(0xFF, 0x80).half_degrees(), -1);
    }
}
