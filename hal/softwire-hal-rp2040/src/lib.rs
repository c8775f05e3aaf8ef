//! RP2040-specific HAL for the softwire I2C master
//!
//! The RP2040 GPIO block has no open-drain mode. It is emulated by keeping
//! the output latch low and toggling the pad between input (released) and
//! output (driving low).

#![no_std]
#![deny(unsafe_code)]

pub mod open_drain;

pub use open_drain::OpenDrainFlex;
pub use softwire_hal::OpenDrainPin;
