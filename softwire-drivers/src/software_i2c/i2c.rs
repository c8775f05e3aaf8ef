//! Bus trait implementations
//!
//! `embedded-hal` drivers and `softwire-hal` device drivers both run on top
//! of the transaction controller, each call being one transaction.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};
use softwire_hal::{I2cBus, OpenDrainPin};

use super::master::{Error, SoftwareI2cMaster};
use crate::transaction::{Operations, WriteRead};

impl<SCL, SDA, D> ErrorType for SoftwareI2cMaster<SCL, SDA, D> {
    type Error = Error;
}

impl<SCL, SDA, D> I2c<SevenBitAddress> for SoftwareI2cMaster<SCL, SDA, D>
where
    SCL: OpenDrainPin,
    SDA: OpenDrainPin,
    D: DelayNs,
{
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut transaction = Operations::new(address, operations);
        self.start(&mut transaction, None)
    }
}

impl<SCL, SDA, D> I2cBus for SoftwareI2cMaster<SCL, SDA, D>
where
    SCL: OpenDrainPin,
    SDA: OpenDrainPin,
    D: DelayNs,
{
    type Error = Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.start(&mut WriteRead::write(address, data), None)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.start(&mut WriteRead::read(address, buf), None)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.start(&mut WriteRead::write_read(address, write_data, read_buf), None)
    }
}
