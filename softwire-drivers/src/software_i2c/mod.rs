//! Software I2C master
//!
//! Layered bottom-up, each layer only calling the one below:
//!
//! - `bus` - quarter/half period delays, start and stop conditions,
//!   clock release with stretch handling
//! - `transfer` - single bits and whole bytes with ACK/NACK
//! - `master` - the transaction controller
//! - `i2c` - `embedded-hal` and `softwire-hal` bus trait implementations

mod bus;
mod i2c;
mod master;
mod transfer;

#[cfg(test)]
pub(crate) mod sim;

pub use master::{ConfigurationHandler, Error, SoftwareI2cMaster};
