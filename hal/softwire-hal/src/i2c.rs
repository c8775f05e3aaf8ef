//! I2C bus abstractions
//!
//! Provides the master-side bus trait that device drivers program against,
//! plus the bus configuration shared by every implementation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// I2C bus master
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// This is commonly used to write a register address then read data.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// Default number of quarter-period polls a slave may stretch the clock
pub const DEFAULT_STRETCH_BUDGET: u16 = 250;

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Accepted deviation of the achieved frequency, in percent
    pub tolerance_percent: u8,
    /// Quarter-period polls allowed while a slave stretches the clock
    pub stretch_budget: u16,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self {
        frequency: 100_000,
        tolerance_percent: 5,
        stretch_budget: DEFAULT_STRETCH_BUDGET,
    };

    /// Fast mode (400 kHz)
    ///
    /// Software emulation tops out around 250 kHz, so expect the
    /// tolerance check to complain on most targets.
    pub const FAST: Self = Self {
        frequency: 400_000,
        tolerance_percent: 5,
        stretch_budget: DEFAULT_STRETCH_BUDGET,
    };

    /// Same configuration with a different clock frequency
    pub const fn with_frequency(self, frequency: u32) -> Self {
        Self { frequency, ..self }
    }

    /// Same configuration with a different clock stretching budget
    pub const fn with_stretch_budget(self, stretch_budget: u16) -> Self {
        Self {
            stretch_budget,
            ..self
        }
    }
}
