//! Softwire - I2C bus scanner firmware
//!
//! Runs the bit-banged master on the pins named in bus.toml and reports
//! every responding device over RTT, once per scan interval.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Timer};
use softwire_core::ErrorKind;
use softwire_drivers::{scan, Error, SoftwareI2cMaster};
use softwire_hal::I2cConfig;
use softwire_hal_rp2040::OpenDrainFlex;
use {defmt_rtt as _, panic_probe as _};

/// Constants generated from bus.toml
mod bus_config {
    include!(concat!(env!("OUT_DIR"), "/bus_config.rs"));
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Softwire scanner starting...");

    let p = embassy_rp::init(Default::default());
    let (scl, sda) = bus_config::take_bus_pins(p);
    let scl = OpenDrainFlex::new(scl, bus_config::SCL_PULL_UP);
    let sda = OpenDrainFlex::new(sda, bus_config::SDA_PULL_UP);

    let config = I2cConfig {
        frequency: bus_config::FREQUENCY,
        tolerance_percent: bus_config::TOLERANCE_PERCENT,
        stretch_budget: bus_config::STRETCH_BUDGET,
    };
    let master = SoftwareI2cMaster::new(scl, sda, Delay, config);

    let timing = master.timing();
    info!(
        "I2C on SCL=gpio{} SDA=gpio{}: {} Hz requested, {} Hz achieved, stretch timeout {} us",
        bus_config::SCL_PIN,
        bus_config::SDA_PIN,
        bus_config::FREQUENCY,
        timing.achieved_baudrate(),
        timing.stretch_timeout_ns() / 1_000
    );

    // Scans busy-wait; nothing else runs on this executor
    loop {
        match scan(&master) {
            Ok(found) if found.is_empty() => info!("No devices found"),
            Ok(found) => info!("{} device(s): {=[u8]:#x}", found.len(), found.as_slice()),
            Err(Error::Bus(ErrorKind::BusCondition)) => {
                warn!("Bus stuck low, check wiring and pull-ups")
            }
            Err(e) => warn!("Scan failed: {}", e),
        }

        Timer::after(Duration::from_millis(bus_config::SCAN_INTERVAL_MS)).await;
    }
}
