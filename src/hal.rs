//! Hardware Abstraction Layer
//!
//! Key output and two-wire bus abstractions. Both are generic over the
//! `embedded-hal` traits so they run unchanged on the STM32 and on the host.

pub mod gpio;
pub mod i2c;
