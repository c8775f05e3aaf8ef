//! Bus scanner
//!
//! Probes every non-reserved 7-bit address with an address-only write and
//! collects the ones that acknowledge.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use softwire_core::ErrorKind;
use softwire_hal::OpenDrainPin;

use crate::software_i2c::{Error, SoftwareI2cMaster};
use crate::transaction::WriteRead;

/// First address outside the reserved low block
pub const FIRST_ADDRESS: u8 = 0x08;

/// Last address below the reserved high block
pub const LAST_ADDRESS: u8 = 0x77;

/// Number of addresses probed
pub const MAX_DEVICES: usize = (LAST_ADDRESS - FIRST_ADDRESS + 1) as usize;

/// Addresses that acknowledged, in ascending order
pub type ScanResult = Vec<u8, MAX_DEVICES>;

/// Probe `FIRST_ADDRESS..=LAST_ADDRESS`
///
/// A NACK just means nobody is home. Any other failure aborts the scan,
/// since the bus itself is unusable. The master is reset before
/// returning, so no probe NACK is left as the recorded error.
pub fn scan<SCL, SDA, D>(master: &SoftwareI2cMaster<SCL, SDA, D>) -> Result<ScanResult, Error>
where
    SCL: OpenDrainPin,
    SDA: OpenDrainPin,
    D: DelayNs,
{
    let mut found = ScanResult::new();

    for address in FIRST_ADDRESS..=LAST_ADDRESS {
        match master.start(&mut WriteRead::probe(address), None) {
            Ok(()) => {
                debug!("i2c: device at {=u8:#x}", address);
                // capacity covers every probed address
                let _ = found.push(address);
            }
            Err(Error::Bus(ErrorKind::AddressNack)) => {}
            Err(error) => {
                master.reset();
                return Err(error);
            }
        }
    }

    master.reset();
    Ok(found)
}
