//! Radio Control Logic
//!
//! Morse encoding, keying and the telemetry beacon loop.

pub mod beacon;
pub mod keyer;
pub mod morse;
