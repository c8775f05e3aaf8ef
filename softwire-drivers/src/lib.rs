//! Bit-banged I2C master driver
//!
//! This crate implements an I2C bus master on top of two open-drain GPIOs
//! and a nanosecond busy-wait, using the traits from `softwire-hal` and the
//! protocol state from `softwire-core`:
//!
//! - [`software_i2c::SoftwareI2cMaster`] - timing, bus conditions, bit/byte
//!   transfer and the transaction controller
//! - [`transaction`] - ready-made transactions (buffers, embedded-hal
//!   operation lists)
//! - [`scanner`] - bus presence scan

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod scanner;
pub mod software_i2c;
pub mod transaction;

pub use scanner::{scan, ScanResult};
pub use software_i2c::{ConfigurationHandler, Error, SoftwareI2cMaster};
pub use transaction::{Operations, WriteRead};
