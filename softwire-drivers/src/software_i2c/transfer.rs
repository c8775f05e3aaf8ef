//! Bit and byte transfer
//!
//! Every bit follows the same shape: put the data on SDA while SCL is low,
//! release SCL, wait out any clock stretching, sample, then pull SCL low
//! again. Bytes go MSB first and are followed by one acknowledge bit.

use embedded_hal::delay::DelayNs;
use softwire_core::{Ack, ErrorKind};
use softwire_hal::OpenDrainPin;

use super::bus::Bus;

impl<SCL, SDA, D> Bus<SCL, SDA, D>
where
    SCL: OpenDrainPin,
    SDA: OpenDrainPin,
    D: DelayNs,
{
    /// Clock one bit out
    ///
    /// SDA is sampled once, right after SCL is seen high. Reading low
    /// while driving a 1 means another master won arbitration.
    pub(crate) fn write_bit(&mut self, bit: bool) -> Result<(), ErrorKind> {
        if bit {
            self.sda.set();
        } else {
            self.sda.reset();
        }
        self.delay2();

        if !self.scl_set_and_wait() {
            return Err(ErrorKind::ClockStretchTooLong);
        }
        if bit && self.sda.is_low() {
            return Err(ErrorKind::ArbitrationLost);
        }

        self.delay2();
        self.scl.reset();
        Ok(())
    }

    /// Clock one bit in
    pub(crate) fn read_bit(&mut self) -> Result<bool, ErrorKind> {
        self.sda.set();
        self.delay2();

        if !self.scl_set_and_wait() {
            return Err(ErrorKind::ClockStretchTooLong);
        }
        let bit = self.sda.is_high();

        self.delay2();
        self.scl.reset();
        Ok(bit)
    }

    /// Send a byte and return the receiver's acknowledge
    pub(crate) fn write(&mut self, byte: u8) -> Result<Ack, ErrorKind> {
        for shift in (0..8).rev() {
            self.write_bit((byte >> shift) & 1 != 0)?;
        }

        self.sda.set();
        let ack = self.read_bit()?;
        Ok(Ack::from_bit(ack))
    }

    /// Receive a byte and answer it with `ack`
    pub(crate) fn read(&mut self, ack: Ack) -> Result<u8, ErrorKind> {
        self.sda.set();

        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | u8::from(self.read_bit()?);
        }

        self.write_bit(ack.bit())?;
        self.sda.set();
        Ok(byte)
    }
}
