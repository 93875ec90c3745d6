//! CW Keyer Module
//!
//! Plays Morse elements on the key line with blocking delays. Timing is
//! derived from one time-unit:
//!
//! | element        | key down | key up          |
//! |----------------|----------|-----------------|
//! | dit            | 1        | 1               |
//! | dah            | 3        | 1               |
//! | letter space   | -        | 3 (after a gap) |
//! | word space     | -        | 7               |

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use super::morse::{lookup, Element};
use crate::hal::gpio::{KeyLine, KeyState};

/// Length of one Morse time-unit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct KeyTiming {
    unit_ms: u32,
}

impl KeyTiming {
    /// Standard timing: 1 WPM = 1200ms per unit (PARIS)
    const MS_PER_UNIT_AT_1WPM: u32 = 1200;

    /// Minimum speed
    pub const MIN_WPM: u8 = 5;

    /// Maximum speed
    pub const MAX_WPM: u8 = 50;

    /// Create from a unit length in milliseconds (at least 1 ms)
    #[must_use]
    pub const fn from_unit_ms(unit_ms: u32) -> Self {
        Self {
            unit_ms: if unit_ms == 0 { 1 } else { unit_ms },
        }
    }

    /// Create from a speed in words per minute
    #[must_use]
    pub const fn from_wpm(wpm: u8) -> Self {
        let wpm = if wpm < Self::MIN_WPM {
            Self::MIN_WPM
        } else if wpm > Self::MAX_WPM {
            Self::MAX_WPM
        } else {
            wpm
        };
        Self::from_unit_ms(Self::MS_PER_UNIT_AT_1WPM / wpm as u32)
    }

    /// Unit length in milliseconds
    #[must_use]
    pub const fn unit_ms(self) -> u32 {
        self.unit_ms
    }

    /// Approximate speed in words per minute (saturates at `u8::MAX`)
    #[must_use]
    pub const fn wpm(self) -> u8 {
        let wpm = Self::MS_PER_UNIT_AT_1WPM / self.unit_ms;
        if wpm > u8::MAX as u32 {
            u8::MAX
        } else {
            wpm as u8
        }
    }

    /// Duration of `units` time-units in milliseconds, saturating
    #[must_use]
    pub const fn duration_ms(self, units: u32) -> u32 {
        units.saturating_mul(self.unit_ms)
    }
}

impl Default for KeyTiming {
    fn default() -> Self {
        crate::config::default_timing()
    }
}

/// Blocking Morse keyer
///
/// Owns the key line and a delay provider. Every call runs to completion
/// before returning.
pub struct MorseKeyer<P, D> {
    key: KeyLine<P>,
    delay: D,
    timing: KeyTiming,
}

impl<P: OutputPin, D: DelayNs> MorseKeyer<P, D> {
    /// Create a keyer; the key line starts released
    pub fn new(pin: P, delay: D, timing: KeyTiming) -> Result<Self, P::Error> {
        Ok(Self {
            key: KeyLine::new(pin)?,
            delay,
            timing,
        })
    }

    /// Get current timing
    #[must_use]
    pub const fn timing(&self) -> KeyTiming {
        self.timing
    }

    /// Change the keying speed
    pub fn set_timing(&mut self, timing: KeyTiming) {
        self.timing = timing;
    }

    /// Check if key is currently down
    #[must_use]
    pub const fn key_state(&self) -> KeyState {
        self.key.state()
    }

    /// Play one element: key down for its tone, then key up for its gap
    pub fn send_element(&mut self, element: Element) -> Result<(), P::Error> {
        if element.is_tone() {
            self.key.key_down()?;
            self.delay
                .delay_ms(self.timing.duration_ms(element.on_units()));
        }
        self.key.key_up()?;
        self.delay
            .delay_ms(self.timing.duration_ms(element.off_units()));
        Ok(())
    }

    /// Key one character
    ///
    /// Returns `false` without touching the line or spending any time when
    /// the character is not in the symbol table.
    pub fn send_char(&mut self, c: char) -> Result<bool, P::Error> {
        let Some(entry) = lookup(c) else {
            trace!("skipping unsupported character {}", c);
            return Ok(false);
        };

        for element in entry.elements() {
            self.send_element(element)?;
        }
        Ok(true)
    }

    /// Key every character of `text` in order
    ///
    /// Returns the number of dits and dahs keyed.
    pub fn send_str(&mut self, text: &str) -> Result<usize, P::Error> {
        let mut tones = 0;
        for c in text.chars() {
            if self.send_char(c)? {
                tones += lookup(c).map_or(0, |entry| usize::from(entry.length));
            }
        }
        Ok(tones)
    }

    /// Hold the key up for `ms` milliseconds
    pub fn idle_ms(&mut self, ms: u32) -> Result<(), P::Error> {
        self.key.key_up()?;
        self.delay.delay_ms(ms);
        Ok(())
    }

    /// Give back the pin and the delay
    pub fn free(self) -> (P, D) {
        (self.key.release(), self.delay)
    }
}
