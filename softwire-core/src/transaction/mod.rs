//! Transaction contract
//!
//! A transaction is a caller-owned object the controller borrows for the
//! duration of one `start()` call. The controller asks it what to do next
//! at every phase boundary and feeds it the bytes it reads:
//!
//! ```text
//!  attaching ─► starting ─┬─► writing ─► next_write* ─► after_write ─┐
//!                 ▲       ├─► reading ─► next_read*  ─► after_read  ─┤
//!                 │       └─► stop                                   │
//!                 └──────────────── Restart ◄────────────────────────┤
//!                                    Stop ─► detaching(NormalStop) ◄─┘
//! ```

/// Address byte R/W bit for a read
pub const READ_BIT: u8 = 0x01;

/// Acknowledge bit sent after a byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    /// Receiver pulls SDA low: keep going
    Ack,
    /// Receiver leaves SDA high: refuse, or end of a read
    Nack,
}

impl Ack {
    /// Acknowledge bit as it appears on SDA
    pub fn bit(&self) -> bool {
        matches!(self, Ack::Nack)
    }

    /// Decode the acknowledge slot from the sampled SDA level
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Ack::Nack
        } else {
            Ack::Ack
        }
    }
}

/// What follows the address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AfterStart {
    /// Address with R/W = 0, then the write phase
    Write,
    /// Address with R/W = 1, then the read phase
    Read,
    /// Address with R/W = 0, then stop (presence probe)
    Stop,
}

/// What follows a write or read phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AfterTransfer {
    /// Repeated start, then a new `starting()` round
    Restart,
    /// Stop condition, transaction complete
    Stop,
}

/// Why the controller let go of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DetachCause {
    /// Stop condition sent, all phases completed
    NormalStop,
    /// The transaction was aborted by a fault or a reset
    ErrorCondition,
    /// `attaching()` refused the bus
    FailedToAttach,
}

/// Answer to `starting()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Starting {
    /// 7-bit slave address
    pub address: u8,
    /// Phase after the address byte
    pub next: AfterStart,
}

impl Starting {
    /// Build an answer for `address`
    pub fn new(address: u8, next: AfterStart) -> Self {
        Self { address, next }
    }

    /// Address byte as shifted onto the wire
    pub fn address_byte(&self) -> u8 {
        let rw = match self.next {
            AfterStart::Read => READ_BIT,
            AfterStart::Write | AfterStart::Stop => 0,
        };
        ((self.address & 0x7F) << 1) | rw
    }
}

/// Caller-supplied transaction description
///
/// Only `starting()` is mandatory; the defaults describe a transaction
/// with empty write and read phases that stops afterwards.
pub trait Transaction {
    /// The controller is about to take the bus
    ///
    /// Return `false` to refuse; the controller then reports
    /// `FailedToAttach` and leaves the bus untouched.
    fn attaching(&mut self) -> bool {
        true
    }

    /// A (repeated) start is about to be generated
    fn starting(&mut self) -> Starting;

    /// The write phase begins
    fn writing(&mut self) {}

    /// Next byte to send, or `None` to end the write phase
    fn next_write(&mut self) -> Option<u8> {
        None
    }

    /// The write phase ended: repeated start or stop
    fn after_write(&mut self) -> AfterTransfer {
        AfterTransfer::Stop
    }

    /// The read phase begins
    fn reading(&mut self) {}

    /// Acknowledge policy for the next byte, or `None` to end the read phase
    ///
    /// I2C convention is to NACK the final byte of a read.
    fn next_read(&mut self) -> Option<Ack> {
        None
    }

    /// A byte requested through `next_read()` arrived
    fn read_completed(&mut self, _byte: u8) {}

    /// The read phase ended: repeated start or stop
    fn after_read(&mut self) -> AfterTransfer {
        AfterTransfer::Stop
    }

    /// The controller let go of the transaction
    fn detaching(&mut self, _cause: DetachCause) {}
}
