//! Peripheral Drivers
//!
//! High-level drivers for external ICs on the two-wire bus.

pub mod ds1621;
