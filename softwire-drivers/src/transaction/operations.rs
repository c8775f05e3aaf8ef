//! `embedded-hal` operation list as a transaction
//!
//! Adjacent operations of the same direction share one phase, so no start
//! condition separates them. A change of direction issues a repeated start.
//! The last byte of every run of reads is NACKed. Empty reads are skipped,
//! since a slave addressed for reading immediately drives SDA.

use embedded_hal::i2c::Operation;
use softwire_core::{Ack, AfterStart, AfterTransfer, Starting, Transaction};

/// Transaction over a borrowed `embedded-hal` operation slice
pub struct Operations<'a, 'b> {
    address: u8,
    operations: &'a mut [Operation<'b>],
    index: usize,
    offset: usize,
}

impl<'a, 'b> Operations<'a, 'b> {
    /// Create a new transaction for `address`
    pub fn new(address: u8, operations: &'a mut [Operation<'b>]) -> Self {
        Self {
            address,
            operations,
            index: 0,
            offset: 0,
        }
    }

    fn advance(&mut self) {
        self.index += 1;
        self.offset = 0;
    }

    /// Check if a non-empty read directly follows the current one
    fn more_reads_follow(&self) -> bool {
        self.operations[self.index + 1..]
            .iter()
            .map_while(|operation| match operation {
                Operation::Read(buf) => Some(buf.len()),
                Operation::Write(_) => None,
            })
            .any(|len| len > 0)
    }

    fn skip_empty_reads(&mut self) {
        while let Some(Operation::Read(buf)) = self.operations.get(self.index) {
            if !buf.is_empty() {
                break;
            }
            self.advance();
        }
    }

    fn after_phase(&mut self) -> AfterTransfer {
        self.skip_empty_reads();
        if self.index < self.operations.len() {
            AfterTransfer::Restart
        } else {
            AfterTransfer::Stop
        }
    }
}

impl Transaction for Operations<'_, '_> {
    fn attaching(&mut self) -> bool {
        self.index = 0;
        self.offset = 0;
        true
    }

    fn starting(&mut self) -> Starting {
        self.skip_empty_reads();

        let next = match self.operations.get(self.index) {
            Some(Operation::Write(_)) => AfterStart::Write,
            Some(Operation::Read(_)) => AfterStart::Read,
            None => AfterStart::Stop,
        };
        Starting::new(self.address, next)
    }

    fn next_write(&mut self) -> Option<u8> {
        loop {
            let Some(Operation::Write(buf)) = self.operations.get(self.index) else {
                return None;
            };
            if let Some(&byte) = buf.get(self.offset) {
                self.offset += 1;
                return Some(byte);
            }
            self.advance();
        }
    }

    fn after_write(&mut self) -> AfterTransfer {
        self.after_phase()
    }

    fn next_read(&mut self) -> Option<Ack> {
        loop {
            let Some(Operation::Read(buf)) = self.operations.get(self.index) else {
                return None;
            };
            if self.offset < buf.len() {
                let last = self.offset + 1 == buf.len() && !self.more_reads_follow();
                return Some(if last { Ack::Nack } else { Ack::Ack });
            }
            self.advance();
        }
    }

    fn read_completed(&mut self, byte: u8) {
        if let Some(Operation::Read(buf)) = self.operations.get_mut(self.index) {
            if let Some(slot) = buf.get_mut(self.offset) {
                *slot = byte;
                self.offset += 1;
            }
        }
    }

    fn after_read(&mut self) -> AfterTransfer {
        self.after_phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_restarts_between_directions() {
        let mut buf = [0u8; 2];
        let mut ops = [Operation::Write(&[0x10]), Operation::Read(&mut buf)];
        let mut transaction = Operations::new(0x50, &mut ops);
        assert!(transaction.attaching());

        assert_eq!(transaction.starting().next, AfterStart::Write);
        assert_eq!(transaction.next_write(), Some(0x10));
        assert_eq!(transaction.next_write(), None);
        assert_eq!(transaction.after_write(), AfterTransfer::Restart);

        assert_eq!(transaction.starting().next, AfterStart::Read);
        assert_eq!(transaction.next_read(), Some(Ack::Ack));
        transaction.read_completed(0xAA);
        assert_eq!(transaction.next_read(), Some(Ack::Nack));
        transaction.read_completed(0xBB);
        assert_eq!(transaction.next_read(), None);
        assert_eq!(transaction.after_read(), AfterTransfer::Stop);

        drop(transaction);
        assert_eq!(buf, [0xAA, 0xBB]);
    }

    #[test]
    fn test_adjacent_writes_share_a_phase() {
        let mut ops = [
            Operation::Write(&[1]),
            Operation::Write(&[]),
            Operation::Write(&[2, 3]),
        ];
        let mut transaction = Operations::new(0x50, &mut ops);
        transaction.attaching();

        assert_eq!(transaction.starting().next, AfterStart::Write);
        assert_eq!(transaction.next_write(), Some(1));
        assert_eq!(transaction.next_write(), Some(2));
        assert_eq!(transaction.next_write(), Some(3));
        assert_eq!(transaction.next_write(), None);
        assert_eq!(transaction.after_write(), AfterTransfer::Stop);
    }

    #[test]
    fn test_only_last_byte_of_read_run_is_nacked() {
        let mut a = [0u8; 1];
        let mut b = [0u8; 0];
        let mut c = [0u8; 1];
        let mut ops = [
            Operation::Read(&mut a),
            Operation::Read(&mut b),
            Operation::Read(&mut c),
        ];
        let mut transaction = Operations::new(0x50, &mut ops);
        transaction.attaching();

        assert_eq!(transaction.starting().next, AfterStart::Read);
        assert_eq!(transaction.next_read(), Some(Ack::Ack));
        transaction.read_completed(1);
        assert_eq!(transaction.next_read(), Some(Ack::Nack));
        transaction.read_completed(2);
        assert_eq!(transaction.next_read(), None);
        assert_eq!(transaction.after_read(), AfterTransfer::Stop);

        drop(transaction);
        assert_eq!((a, c), ([1], [2]));
    }

    #[test]
    fn test_empty_reads_are_skipped() {
        let mut empty = [0u8; 0];
        let mut ops = [Operation::Write(&[0x10]), Operation::Read(&mut empty)];
        let mut transaction = Operations::new(0x50, &mut ops);
        transaction.attaching();

        transaction.starting();
        assert_eq!(transaction.next_write(), Some(0x10));
        assert_eq!(transaction.next_write(), None);
        assert_eq!(transaction.after_write(), AfterTransfer::Stop);
    }

    #[test]
    fn test_empty_read_between_writes_restarts() {
        let mut empty = [0u8; 0];
        let mut ops = [
            Operation::Write(&[1]),
            Operation::Read(&mut empty),
            Operation::Write(&[2]),
        ];
        let mut transaction = Operations::new(0x50, &mut ops);
        transaction.attaching();

        transaction.starting();
        assert_eq!(transaction.next_write(), Some(1));
        assert_eq!(transaction.next_write(), None);
        assert_eq!(transaction.after_write(), AfterTransfer::Restart);
        assert_eq!(transaction.starting().next, AfterStart::Write);
        assert_eq!(transaction.next_write(), Some(2));
    }

    #[test]
    fn test_empty_list_is_a_probe() {
        let mut ops: [Operation<'_>; 0] = [];
        let mut transaction = Operations::new(0x50, &mut ops);
        transaction.attaching();

        assert_eq!(transaction.starting().next, AfterStart::Stop);
    }
}
