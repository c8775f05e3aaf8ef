//! Buffer transaction

use softwire_core::{Ack, AfterStart, AfterTransfer, DetachCause, Starting, Transaction};

/// Write a buffer, read a buffer, or write then read with a repeated start
///
/// The last byte read is NACKed. With both buffers empty the transaction
/// is an address-only probe.
pub struct WriteRead<'a> {
    address: u8,
    write: &'a [u8],
    read: &'a mut [u8],
    written: usize,
    received: usize,
    write_done: bool,
    detach: Option<DetachCause>,
}

impl<'a> WriteRead<'a> {
    /// Create a new transaction writing `write`, then reading into `read`
    pub fn write_read(address: u8, write: &'a [u8], read: &'a mut [u8]) -> Self {
        Self {
            address,
            write,
            read,
            written: 0,
            received: 0,
            write_done: false,
            detach: None,
        }
    }

    /// Write-only transaction
    pub fn write(address: u8, write: &'a [u8]) -> Self {
        Self::write_read(address, write, &mut [])
    }

    /// Read-only transaction
    pub fn read(address: u8, read: &'a mut [u8]) -> Self {
        Self::write_read(address, &[], read)
    }

    /// Address-only transaction, succeeds if a device acknowledges
    pub fn probe(address: u8) -> Self {
        Self::write_read(address, &[], &mut [])
    }

    /// Bytes handed to the controller for writing
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    /// Bytes stored into the read buffer
    pub fn bytes_read(&self) -> usize {
        self.received
    }

    /// How the last run ended, `None` if it never ran
    pub fn detach_cause(&self) -> Option<DetachCause> {
        self.detach
    }
}

impl Transaction for WriteRead<'_> {
    fn attaching(&mut self) -> bool {
        self.written = 0;
        self.received = 0;
        self.write_done = false;
        self.detach = None;
        true
    }

    fn starting(&mut self) -> Starting {
        let next = if !self.write.is_empty() && !self.write_done {
            AfterStart::Write
        } else if !self.read.is_empty() {
            AfterStart::Read
        } else {
            AfterStart::Stop
        };
        Starting::new(self.address, next)
    }

    fn next_write(&mut self) -> Option<u8> {
        let byte = *self.write.get(self.written)?;
        self.written += 1;
        Some(byte)
    }

    fn after_write(&mut self) -> AfterTransfer {
        self.write_done = true;
        if self.read.is_empty() {
            AfterTransfer::Stop
        } else {
            AfterTransfer::Restart
        }
    }

    fn next_read(&mut self) -> Option<Ack> {
        let remaining = self.read.len() - self.received;
        match remaining {
            0 => None,
            1 => Some(Ack::Nack),
            _ => Some(Ack::Ack),
        }
    }

    fn read_completed(&mut self, byte: u8) {
        if let Some(slot) = self.read.get_mut(self.received) {
            *slot = byte;
            self.received += 1;
        }
    }

    fn detaching(&mut self, cause: DetachCause) {
        self.detach = Some(cause);
    }
}
