//! Morse Telemetry Beacon Firmware Library
//!
//! Periodically samples a DS1621 temperature sensor over a software
//! two-wire bus and keys the reading out as Morse code on a single output
//! pin.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │          Beacon loop (read → format → key → pause)           │
//! ├──────────────────────────────┬──────────────────────────────┤
//! │        MORSE LAYER           │        DRIVER LAYER          │
//! │  Symbol table │ Keyer        │  DS1621 sensor               │
//! ├──────────────────────────────┼──────────────────────────────┤
//! │        KEY LINE (GPIO)       │  TWO-WIRE BUS (bit-banged)   │
//! ├──────────────────────────────┴──────────────────────────────┤
//! │          embedded-hal 1.0 traits (pins, blocking delay)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Functional core, imperative shell**: characters decode to pure
//!   element sequences; only the keyer touches the pin
//! - **Blocking by construction**: every bus transfer and every element
//!   runs to completion, there is one thread of control
//! - **Generic over `embedded-hal`**: the same code runs on the STM32 and
//!   against mocks on the host
//! - **Explicit error handling**: fallible operations return `Result`;
//!   silent behaviors (unsupported characters, unchecked acknowledges)
//!   are the documented defaults

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Key line and two-wire bus over `embedded-hal` traits.
pub mod hal;

/// Peripheral Drivers
///
/// The DS1621 temperature sensor.
pub mod drivers;

/// Radio Control Logic
///
/// Morse symbol table, keyer and beacon loop.
pub mod radio;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::drivers::ds1621::{AckPolicy, Ds1621, SensorError};
    pub use crate::hal::i2c::{Ack, BitBangI2c, BusError, I2cAddress, TwoWireBus};
    pub use crate::radio::beacon::{format_message, Beacon, BeaconError, Transmission};
    pub use crate::radio::keyer::{KeyTiming, MorseKeyer};
    pub use crate::radio::morse::{lookup, Element, SymbolEntry};
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::digital::{InputPin, OutputPin};

    // Embassy
    #[cfg(feature = "embedded")]
    pub use embassy_time::{Delay, Duration, Instant};

    // Logging
    #[cfg(feature = "embedded")]
    pub use defmt::{debug, error, info, trace, warn};
}
