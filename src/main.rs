//! Beacon Main Application
//!
//! Entry point for the STM32G474 telemetry beacon. Sets up the key line
//! and the software two-wire bus, then hands control to the beacon loop.

#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, OutputOpenDrain, Speed};
use {defmt_rtt as _, panic_probe as _};

use beacon_firmware::prelude::*;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Beacon Firmware v{}", env!("CARGO_PKG_VERSION"));

    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    // PA5 = key (user LED on Nucleo boards)
    let key = Output::new(p.PA5, Level::Low, Speed::Low);

    // PB8 = SCL, PB9 = SDA, external pull-ups
    let scl = OutputOpenDrain::new(p.PB8, Level::High, Speed::Low);
    let sda = OutputOpenDrain::new(p.PB9, Level::High, Speed::Low);
    let bus = BitBangI2c::new(scl, sda, Delay);

    let sensor = Ds1621::new(bus);
    let keyer = match MorseKeyer::new(key, Delay, default_timing()) {
        Ok(keyer) => keyer,
        Err(never) => match never {},
    };

    info!(
        "Keying at {} WPM, sensor at {}",
        keyer.timing().wpm(),
        sensor.address()
    );

    let mut beacon = Beacon::new(sensor, keyer);
    if beacon.start().is_err() {
        warn!("sensor initialization failed");
    }

    beacon.run()
}
