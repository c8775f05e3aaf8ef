//! Softwire Hardware Abstraction Layer
//!
//! This crate defines the narrow hardware interfaces the software I2C
//! master is built on. Chip-specific crates (RP2040, ...) implement them,
//! so the same protocol engine runs on any pair of GPIOs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Device drivers / application           │
//! └─────────────────────────────────────────┘
//!                     │  I2cBus
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  softwire-drivers (SoftwareI2cMaster)   │
//! └─────────────────────────────────────────┘
//!                     │  OpenDrainPin + DelayNs
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  softwire-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ softwire-hal- │       │ any embedded- │
//! │    rp2040     │       │ hal 1.0 pin   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OpenDrainPin`] - Open-drain line (release / pull low / sample)
//! - [`i2c::I2cBus`] - I2C bus master operations
//! - [`DelayNs`] - Nanosecond busy-wait, re-exported from `embedded-hal`

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use embedded_hal::delay::DelayNs;
pub use gpio::{EmbeddedHalPin, OpenDrainPin};
pub use i2c::{I2cBus, I2cConfig};
