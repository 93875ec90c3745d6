//! System configuration and hardware constants
//!
//! Compile-time constants for the beacon: keying speed, sensor bus
//! addressing, the telemetry text and pin assignments are all centralized here.

use crate::radio::keyer::KeyTiming;

/// Reference Morse time-unit in milliseconds (12 WPM)
pub const UNIT_MS: u32 = 100;

/// Key-down length of a dit, in units
pub const DIT_UNITS: u32 = 1;

/// Key-down length of a dah, in units
pub const DAH_UNITS: u32 = 3;

/// Key-up gap after every dit or dah, in units
pub const ELEMENT_GAP_UNITS: u32 = 1;

/// Additional key-up time after the last element of a letter, in units
pub const LETTER_SPACE_UNITS: u32 = 3;

/// Key-up time for a word space, in units
pub const WORD_SPACE_UNITS: u32 = 7;

/// Pause between two transmissions of the telemetry message
pub const TRANSMISSION_INTERVAL_MS: u32 = 3_000;

/// 7-bit address of the temperature sensor (A2..A0 tied low)
pub const SENSOR_I2C_ADDR: u8 = 0x48;

/// Sensor command: access the configuration register
pub const CMD_ACCESS_CONFIG: u8 = 0xAC;

/// Sensor command: start temperature conversion
pub const CMD_START_CONVERT: u8 = 0xEE;

/// Sensor command: read the temperature register
pub const CMD_READ_TEMPERATURE: u8 = 0xAA;

/// Configuration byte written during sensor initialization
pub const SENSOR_INIT_MODE: u8 = 8;

/// Half of one software I2C clock period in microseconds (~100 kHz)
pub const BUS_HALF_PERIOD_US: u32 = 5;

/// Telemetry text preceding the temperature field
pub const MESSAGE_PREFIX: &str = "cq cq cq de om/ab3y/b beacon in jn99kf 30mw t";

/// Telemetry text following the temperature digits
pub const MESSAGE_SUFFIX: &str = "c ar";

/// Capacity of the formatted telemetry message buffer
pub const MESSAGE_CAPACITY: usize = 64;

/// Number of message characters keyed per transmission
pub const TRANSMIT_CHARS: usize = 51;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments (Nucleo-G474RE)

    /// Key output; also drives the user LED so the keying is visible
    pub const KEY: &str = "PA5";

    /// Software I2C clock (open drain, external pull-up)
    pub const BUS_SCL: &str = "PB8";

    /// Software I2C data (open drain, external pull-up)
    pub const BUS_SDA: &str = "PB9";
}

/// Build the default key timing
#[must_use]
pub const fn default_timing() -> KeyTiming {
    KeyTiming::from_unit_ms(UNIT_MS)
}
