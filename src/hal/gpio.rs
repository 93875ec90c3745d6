//! GPIO Abstractions
//!
//! Type-safe wrapper for the key output line. Gives the raw pin the
//! meaning "transmitter keyed" and remembers what was last driven.

use embedded_hal::digital::OutputPin;

/// Key line state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyState {
    /// Key released (silence)
    #[default]
    Up,
    /// Key pressed (tone)
    Down,
}

impl KeyState {
    /// Check if the transmitter is keyed
    #[must_use]
    pub const fn is_down(self) -> bool {
        matches!(self, Self::Down)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for KeyState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Up => defmt::write!(f, "UP"),
            Self::Down => defmt::write!(f, "DOWN"),
        }
    }
}

/// Key output driver (active high)
pub struct KeyLine<P> {
    pin: P,
    state: KeyState,
}

impl<P: OutputPin> KeyLine<P> {
    /// Wrap a pin and drive it to key-up
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self {
            pin,
            state: KeyState::Up,
        })
    }

    /// Assert the key
    pub fn key_down(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()?;
        self.state = KeyState::Down;
        Ok(())
    }

    /// Release the key
    pub fn key_up(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()?;
        self.state = KeyState::Up;
        Ok(())
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> KeyState {
        self.state
    }

    /// Give back the pin
    pub fn release(self) -> P {
        self.pin
    }
}
